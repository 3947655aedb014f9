//! Transcript content quality heuristics.
//!
//! All scores are on a 0-10 scale. Sentences split on `。.!?！？`, words on
//! whitespace.

use std::collections::{HashMap, HashSet};

use vvp_models::{ContentQuality, TranscriptStatistics};

const EMOTION_WORDS: [&str; 7] = ["すごい", "素晴らしい", "感動", "面白い", "楽しい", "驚き", "感動的"];
const KEY_PHRASE_MARKERS: [&str; 5] = ["重要", "ポイント", "要点", "結論", "まとめ"];
const MAX_KEY_PHRASES: usize = 5;

/// Score a transcript. Empty text yields all zeros.
pub fn analyze_content(text: &str) -> ContentQuality {
    let text = text.trim();
    if text.is_empty() {
        return ContentQuality {
            summary: "Transcript is empty; content could not be analyzed".to_string(),
            ..Default::default()
        };
    }

    let sentences = split_sentences(text);
    let words: Vec<&str> = text.split_whitespace().collect();

    let content_score = content_score(&sentences, &words);
    let speech_clarity = speech_clarity(text, &words);
    let content_structure = content_structure(&sentences);
    let engagement_factors = engagement_factors(text);
    let overall_quality =
        (content_score + speech_clarity + content_structure + engagement_factors) / 4.0;

    let unique: HashSet<&str> = words.iter().copied().collect();
    let statistics = TranscriptStatistics {
        total_characters: text.chars().count(),
        total_words: words.len(),
        total_sentences: sentences.len(),
        average_sentence_length: if sentences.is_empty() {
            0.0
        } else {
            round2(words.len() as f64 / sentences.len() as f64)
        },
        vocabulary_diversity: if words.is_empty() {
            0.0
        } else {
            round2(unique.len() as f64 / words.len() as f64)
        },
    };

    let summary = format!(
        "{} sentences, {} words. Overall quality {:.1}/10",
        statistics.total_sentences, statistics.total_words, overall_quality
    );

    ContentQuality {
        content_score: round2(content_score),
        speech_clarity: round2(speech_clarity),
        content_structure: round2(content_structure),
        engagement_factors: round2(engagement_factors),
        overall_quality: round2(overall_quality),
        statistics,
        key_phrases: key_phrases(&sentences),
        speech_patterns: speech_patterns(text, &words),
        summary,
    }
}

fn split_sentences(text: &str) -> Vec<&str> {
    text.split(['。', '.', '!', '?', '！', '？'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Sentence length near 20 words, vocabulary diversity and the share of
/// long sentences, averaged.
fn content_score(sentences: &[&str], words: &[&str]) -> f64 {
    if words.is_empty() || sentences.is_empty() {
        return 0.0;
    }
    let avg_len = words.len() as f64 / sentences.len() as f64;
    let length_score = (10.0 - (avg_len - 20.0).abs() / 2.0).max(0.0);

    let unique: HashSet<&str> = words.iter().copied().collect();
    let diversity_score = (unique.len() as f64 / words.len() as f64 * 20.0).min(10.0);

    let complex = sentences
        .iter()
        .filter(|s| s.split_whitespace().count() > 15)
        .count();
    let complexity_score = (complex as f64 / sentences.len() as f64 * 20.0).min(10.0);

    (length_score + diversity_score + complexity_score) / 3.0
}

/// Punctuation density minus a penalty for words repeated more than three
/// times.
fn speech_clarity(text: &str, words: &[&str]) -> f64 {
    if words.is_empty() {
        return 0.0;
    }
    let punctuation = text.chars().filter(|c| matches!(c, '。' | '、' | '！' | '？')).count();
    let base = (punctuation as f64 / words.len() as f64 * 50.0).min(5.0);

    let penalty: f64 = word_frequencies(words)
        .iter()
        .filter(|(word, freq)| **freq > 3 && word.chars().count() > 2)
        .map(|(_, freq)| (*freq - 3) as f64 * 0.5)
        .sum();

    (base - penalty).clamp(0.0, 10.0)
}

/// Variance of sentence lengths plus diversity of sentence openers.
fn content_structure(sentences: &[&str]) -> f64 {
    if sentences.is_empty() {
        return 0.0;
    }
    let lengths: Vec<f64> = sentences
        .iter()
        .map(|s| s.split_whitespace().count() as f64)
        .collect();
    let mean = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let variance = lengths.iter().map(|l| (l - mean).powi(2)).sum::<f64>() / lengths.len() as f64;

    let openers: HashSet<&str> = sentences
        .iter()
        .map(|s| s.split_whitespace().next().unwrap_or(""))
        .collect();
    let opener_diversity = openers.len() as f64 / sentences.len() as f64;

    ((variance / 10.0).min(5.0) + (opener_diversity * 10.0).min(5.0)).min(10.0)
}

/// Questions, exclamations and emotion words.
fn engagement_factors(text: &str) -> f64 {
    let questions = text.chars().filter(|c| matches!(c, '?' | '？')).count() as f64;
    let exclamations = text.chars().filter(|c| matches!(c, '!' | '！')).count() as f64;
    let emotions = EMOTION_WORDS.iter().filter(|w| text.contains(*w)).count() as f64;

    ((questions * 0.5).min(3.0) + (exclamations * 0.3).min(3.0) + (emotions * 0.5).min(4.0))
        .min(10.0)
}

fn key_phrases(sentences: &[&str]) -> Vec<String> {
    sentences
        .iter()
        .filter(|s| s.chars().count() > 10)
        .filter(|s| KEY_PHRASE_MARKERS.iter().any(|m| s.contains(m)))
        .take(MAX_KEY_PHRASES)
        .map(|s| s.to_string())
        .collect()
}

fn speech_patterns(text: &str, words: &[&str]) -> Vec<String> {
    let mut patterns = Vec::new();

    let freq = word_frequencies(words);
    let mut repeated: Vec<(&str, usize)> = freq
        .into_iter()
        .filter(|(word, count)| *count > 2 && word.chars().count() > 1)
        .collect();
    repeated.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    if !repeated.is_empty() {
        let top: Vec<&str> = repeated.iter().take(3).map(|(w, _)| *w).collect();
        patterns.push(format!("Repeated expressions: {}", top.join(", ")));
    }

    let questions = text.chars().filter(|c| matches!(c, '?' | '？')).count();
    if questions > 0 {
        patterns.push(format!("Questions: {}", questions));
    }

    let exclamations = text.chars().filter(|c| matches!(c, '!' | '！')).count();
    if exclamations > 0 {
        patterns.push(format!("Exclamations: {}", exclamations));
    }

    patterns
}

fn word_frequencies<'a>(words: &[&'a str]) -> HashMap<&'a str, usize> {
    let mut freq = HashMap::new();
    for word in words {
        *freq.entry(*word).or_insert(0) += 1;
    }
    freq
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript() {
        let quality = analyze_content("   ");
        assert_eq!(quality.overall_quality, 0.0);
        assert!(quality.key_phrases.is_empty());
    }

    #[test]
    fn test_scores_within_scale() {
        let text = "Welcome back everyone! Today we cover the most important point of the series. \
                    Why does it matter? Because the conclusion changes everything we know. \
                    This is amazing!";
        let quality = analyze_content(text);

        for score in [
            quality.content_score,
            quality.speech_clarity,
            quality.content_structure,
            quality.engagement_factors,
            quality.overall_quality,
        ] {
            assert!((0.0..=10.0).contains(&score), "score {score} out of range");
        }
        assert_eq!(quality.statistics.total_sentences, 5);
        assert!(quality.speech_patterns.contains(&"Questions: 1".to_string()));
        assert!(quality.speech_patterns.contains(&"Exclamations: 2".to_string()));
    }

    #[test]
    fn test_overall_is_mean_of_four() {
        let quality = analyze_content("すごい！ 本当に 面白い？ 今日の まとめ です。");
        let mean = (quality.content_score
            + quality.speech_clarity
            + quality.content_structure
            + quality.engagement_factors)
            / 4.0;
        assert!((quality.overall_quality - mean).abs() < 0.02);
    }

    #[test]
    fn test_engagement_factors() {
        // 2 questions (1.0) + 1 exclamation (0.3) + 2 emotion words (1.0)
        let score = engagement_factors("すごい? 面白い? 本当!");
        assert!((score - 2.3).abs() < 1e-9);
    }

    #[test]
    fn test_repetition_penalty() {
        let repeated = "really really really really really good、";
        let words: Vec<&str> = repeated.split_whitespace().collect();
        // base: 1 mark over 6 words * 50 capped at 5; penalty (5 - 3) * 0.5 = 1
        assert!((speech_clarity(repeated, &words) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_key_phrases() {
        let text = "今日の重要なポイントを説明します。短い。最後にまとめとして結論を述べます。";
        let quality = analyze_content(text);
        assert_eq!(quality.key_phrases.len(), 2);
        assert!(quality.key_phrases[0].contains("重要"));
    }

    #[test]
    fn test_length_score_peaks_at_twenty_words() {
        let sentence = vec!["word"; 20].join(" ");
        let sentences = vec![sentence.as_str()];
        let words: Vec<&str> = sentence.split_whitespace().collect();
        // length 10, diversity 1/20*20 = 1, complexity 1*20 capped 10
        assert!((content_score(&sentences, &words) - 7.0).abs() < 1e-9);
    }
}
