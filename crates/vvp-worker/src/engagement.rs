//! Comment engagement metrics and keyword sentiment.

use vvp_models::{
    Comment, EngagementMetrics, Sentiment, SentimentAnalysis, SentimentDistribution, VideoInfo,
};

const POSITIVE_KEYWORDS: [&str; 9] = [
    "素晴らしい", "最高", "感動", "面白い", "良い", "love", "amazing", "great", "awesome",
];
const NEGATIVE_KEYWORDS: [&str; 8] = [
    "つまらない", "悪い", "最悪", "退屈", "hate", "terrible", "boring", "bad",
];

/// Classify one comment. Positive keywords are checked first.
pub fn classify_comment(text: &str) -> Sentiment {
    let text = text.to_lowercase();
    if POSITIVE_KEYWORDS.iter().any(|k| text.contains(k)) {
        Sentiment::Positive
    } else if NEGATIVE_KEYWORDS.iter().any(|k| text.contains(k)) {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct SentimentCounts {
    positive: u64,
    negative: u64,
    neutral: u64,
}

impl SentimentCounts {
    fn tally(comments: &[Comment]) -> Self {
        let mut counts = Self::default();
        for comment in comments {
            match classify_comment(&comment.text) {
                Sentiment::Positive => counts.positive += 1,
                Sentiment::Negative => counts.negative += 1,
                Sentiment::Neutral => counts.neutral += 1,
            }
        }
        counts
    }

    fn distribution(&self) -> SentimentDistribution {
        let total = (self.positive + self.negative + self.neutral) as f64;
        if total == 0.0 {
            return SentimentDistribution::default();
        }
        SentimentDistribution {
            positive: self.positive as f64 / total,
            negative: self.negative as f64 / total,
            neutral: self.neutral as f64 / total,
        }
    }
}

/// Comment totals, likes and sentiment shares for a video.
pub fn engagement_metrics(video: &VideoInfo) -> EngagementMetrics {
    let comments = &video.comments;
    let total_comments = comments.len() as u64;
    let total_likes: u64 = comments.iter().map(|c| c.like_count).sum();

    let avg_likes_per_comment = if total_comments == 0 {
        0.0
    } else {
        round2(total_likes as f64 / total_comments as f64)
    };

    EngagementMetrics {
        total_comments,
        total_likes,
        avg_likes_per_comment,
        engagement_rate: video.engagement_rate(),
        sentiment_distribution: SentimentCounts::tally(comments).distribution(),
    }
}

/// Sentiment report over the fetched comments.
pub fn analyze_sentiment(comments: &[Comment]) -> SentimentAnalysis {
    let counts = SentimentCounts::tally(comments);
    let distribution = counts.distribution();
    let dominant = distribution.dominant();

    let summary = if comments.is_empty() {
        "No comments available for sentiment analysis".to_string()
    } else {
        format!(
            "Analyzed {} comments: {:.0}% positive, {:.0}% negative, {:.0}% neutral",
            comments.len(),
            distribution.positive * 100.0,
            distribution.negative * 100.0,
            distribution.neutral * 100.0
        )
    };

    SentimentAnalysis {
        distribution,
        dominant,
        positive_count: counts.positive,
        negative_count: counts.negative,
        neutral_count: counts.neutral,
        summary,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn video_with(comments: Vec<Comment>) -> VideoInfo {
        VideoInfo {
            view_count: 1000,
            like_count: 40,
            comment_count: 10,
            comments,
            ..Default::default()
        }
    }

    #[test]
    fn test_classify_comment() {
        assert_eq!(classify_comment("This is AMAZING"), Sentiment::Positive);
        assert_eq!(classify_comment("最高の動画"), Sentiment::Positive);
        assert_eq!(classify_comment("退屈でした"), Sentiment::Negative);
        assert_eq!(classify_comment("Boring"), Sentiment::Negative);
        assert_eq!(classify_comment("first"), Sentiment::Neutral);
        // Positive wins when both appear
        assert_eq!(classify_comment("great but bad audio"), Sentiment::Positive);
    }

    #[test]
    fn test_engagement_metrics() {
        let video = video_with(vec![
            Comment::new("a", "love it", 3),
            Comment::new("b", "terrible", 0),
            Comment::new("c", "ok", 2),
        ]);

        let metrics = engagement_metrics(&video);
        assert_eq!(metrics.total_comments, 3);
        assert_eq!(metrics.total_likes, 5);
        assert_eq!(metrics.avg_likes_per_comment, 1.67);
        assert_eq!(metrics.engagement_rate, 5.0);

        let dist = metrics.sentiment_distribution;
        assert!((dist.positive + dist.negative + dist.neutral - 1.0).abs() < 1e-9);
        assert!((dist.positive - 1.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_engagement_metrics_without_comments() {
        let metrics = engagement_metrics(&video_with(Vec::new()));
        assert_eq!(metrics.total_comments, 0);
        assert_eq!(metrics.avg_likes_per_comment, 0.0);
        assert_eq!(metrics.sentiment_distribution, SentimentDistribution::default());
    }

    #[test]
    fn test_analyze_sentiment() {
        let analysis = analyze_sentiment(&[
            Comment::new("a", "素晴らしい", 0),
            Comment::new("b", "awesome", 0),
            Comment::new("c", "hmm", 0),
        ]);

        assert_eq!(analysis.dominant, Sentiment::Positive);
        assert_eq!(analysis.positive_count, 2);
        assert_eq!(analysis.neutral_count, 1);
        assert!(analysis.summary.starts_with("Analyzed 3 comments"));

        let empty = analyze_sentiment(&[]);
        assert_eq!(empty.dominant, Sentiment::Neutral);
    }
}
