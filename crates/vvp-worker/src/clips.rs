//! Clip candidate derivation and ranking.
//!
//! Viewer comments that mention timestamps are grouped into 30-second
//! buckets. Each bucket is scored from how often it is mentioned
//! (quantitative, 60%) and from what the AI or the audio track says about
//! that moment (qualitative, 40%).

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use vvp_models::timestamp::{format_clock, parse_timestamp};
use vvp_models::{
    ClipCandidate, Comment, EngagementHotspot, ExcitementPoint, MentionComment, SemanticHotspot,
};

/// Width of a mention bucket.
pub const BUCKET_SECS: u64 = 30;
/// Length of a suggested clip.
pub const CLIP_LENGTH_SECS: f64 = 30.0;
/// How far an AI or audio hotspot may be from a bucket and still count.
pub const MATCH_WINDOW_SECS: f64 = 15.0;
/// Candidates surfaced alongside the golden clip.
pub const MAX_CANDIDATES: usize = 5;

const QUANT_WEIGHT: f64 = 0.6;
const QUAL_WEIGHT: f64 = 0.4;

const CLIMAX_KEYWORDS: [&str; 4] = ["感動", "クライマックス", "climax", "moving"];
const HUMOR_KEYWORDS: [&str; 4] = ["面白い", "ユーモア", "funny", "humor"];
const LEARNING_KEYWORDS: [&str; 4] = ["学び", "有益", "learning", "useful"];

const AUDIO_PEAK_SCORE: f64 = 60.0;
const BASELINE_SCORE: f64 = 50.0;
const AUDIO_PEAK_REASON: &str = "audio excitement peak";
const BASELINE_REASON: &str = "viewer attention";

static CLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}):(\d{2})(?::(\d{2}))?").expect("valid clock regex")
});
static JA_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})分(\d{1,2})秒").expect("valid ja regex"));
static MS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{1,2})m(\d{1,2})s").expect("valid m/s regex"));

/// Golden clip plus ranked runners-up.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClipSelection {
    pub golden: Option<ClipCandidate>,
    pub candidates: Vec<ClipCandidate>,
}

/// A timestamp mentioned in a comment, as seconds plus the written form.
fn mentions_in(text: &str) -> Vec<(u64, String)> {
    let mut found = Vec::new();

    for caps in CLOCK_PATTERN.captures_iter(text) {
        let a: u64 = caps[1].parse().unwrap_or(0);
        let b: u64 = caps[2].parse().unwrap_or(0);
        match caps.get(3) {
            Some(c) => {
                let c: u64 = c.as_str().parse().unwrap_or(0);
                if b < 60 && c < 60 {
                    found.push((a * 3600 + b * 60 + c, format!("{:02}:{:02}:{:02}", a, b, c)));
                }
            }
            None if b < 60 => found.push((a * 60 + b, format!("{:02}:{:02}", a, b))),
            None => {}
        }
    }

    for pattern in [&*JA_PATTERN, &*MS_PATTERN] {
        for caps in pattern.captures_iter(text) {
            let m: u64 = caps[1].parse().unwrap_or(0);
            let s: u64 = caps[2].parse().unwrap_or(0);
            if s < 60 {
                found.push((m * 60 + s, format!("{:02}:{:02}", m, s)));
            }
        }
    }

    found
}

/// Group timestamp mentions into 30-second buckets, ordered by time.
///
/// Every match counts as one mention. A bucket keeps the first time
/// mentioned in it.
pub fn extract_engagement_hotspots(comments: &[Comment]) -> Vec<EngagementHotspot> {
    let mut buckets: BTreeMap<u64, EngagementHotspot> = BTreeMap::new();

    for comment in comments {
        for (secs, formatted) in mentions_in(&comment.text) {
            let key = secs / BUCKET_SECS * BUCKET_SECS;
            let hotspot = buckets.entry(key).or_insert_with(|| EngagementHotspot {
                time: secs as f64,
                formatted_time: formatted,
                mention_count: 0,
                total_likes: 0,
                comments: Vec::new(),
            });
            hotspot.mention_count += 1;
            hotspot.total_likes += comment.like_count;
            hotspot.comments.push(MentionComment {
                text: comment.text.clone(),
                author: comment.author.clone(),
                likes: comment.like_count,
            });
        }
    }

    buckets.into_values().collect()
}

/// Score a moment from the first AI hotspot near it, falling back to audio
/// peaks and then to a baseline.
pub fn qualitative_score(
    time: f64,
    semantic: &[SemanticHotspot],
    audio: &[ExcitementPoint],
) -> (f64, String) {
    let near = |t: f64| (t - time).abs() <= MATCH_WINDOW_SECS;

    let ai_match = semantic.iter().find(|h| {
        parse_timestamp(&h.time)
            .map(near)
            .unwrap_or(false)
    });

    if let Some(hotspot) = ai_match {
        let reason = hotspot.reason.to_lowercase();
        let contains_any = |words: &[&str]| words.iter().any(|w| reason.contains(w));
        let score = if contains_any(&CLIMAX_KEYWORDS) {
            100.0
        } else if contains_any(&HUMOR_KEYWORDS) {
            90.0
        } else if contains_any(&LEARNING_KEYWORDS) {
            80.0
        } else {
            70.0
        };
        let reason = if hotspot.reason.trim().is_empty() {
            BASELINE_REASON.to_string()
        } else {
            hotspot.reason.clone()
        };
        return (score, reason);
    }

    if audio.iter().any(|p| near(p.time)) {
        return (AUDIO_PEAK_SCORE, AUDIO_PEAK_REASON.to_string());
    }

    (BASELINE_SCORE, BASELINE_REASON.to_string())
}

/// Turn hotspots into unranked clip candidates.
///
/// When `duration_secs` is known (> 0), hotspots at or past the end of the
/// video are dropped and each window is clipped to the duration.
pub fn build_candidates(
    hotspots: &[EngagementHotspot],
    semantic: &[SemanticHotspot],
    audio: &[ExcitementPoint],
    duration_secs: f64,
) -> Vec<ClipCandidate> {
    let in_video = |h: &&EngagementHotspot| duration_secs <= 0.0 || h.time < duration_secs;

    let max_mentions = hotspots
        .iter()
        .filter(in_video)
        .map(|h| h.mention_count)
        .max()
        .unwrap_or(0);
    if max_mentions == 0 {
        return Vec::new();
    }

    hotspots
        .iter()
        .filter(in_video)
        .map(|hotspot| {
            let quantitative =
                (hotspot.mention_count as f64 / max_mentions as f64 * 100.0).clamp(0.0, 100.0);
            let (qualitative, reason) = qualitative_score(hotspot.time, semantic, audio);
            let score = round2(quantitative * QUANT_WEIGHT + qualitative * QUAL_WEIGHT);

            let start_time = hotspot.time;
            let mut end_time = start_time + CLIP_LENGTH_SECS;
            if duration_secs > 0.0 {
                end_time = end_time.min(duration_secs);
            }

            ClipCandidate {
                start_time,
                end_time,
                formatted_time: hotspot.formatted_time.clone(),
                mention_count: hotspot.mention_count,
                total_likes: hotspot.total_likes,
                score,
                quantitative_score: round2(quantitative),
                qualitative_score: qualitative,
                reason,
                comments: hotspot.comments.clone(),
            }
        })
        .collect()
}

/// Total order used for ranking: score desc, mentions desc, start asc.
pub fn compare_candidates(a: &ClipCandidate, b: &ClipCandidate) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| b.mention_count.cmp(&a.mention_count))
        .then_with(|| a.start_time.total_cmp(&b.start_time))
}

/// Sort candidates best first.
pub fn rank_candidates(mut candidates: Vec<ClipCandidate>) -> Vec<ClipCandidate> {
    candidates.sort_by(compare_candidates);
    candidates
}

/// Rank candidates and split off the golden clip and the top five.
pub fn select_clips(candidates: Vec<ClipCandidate>) -> ClipSelection {
    let mut ranked = rank_candidates(candidates);
    ranked.truncate(MAX_CANDIDATES);
    ClipSelection {
        golden: ranked.first().cloned(),
        candidates: ranked,
    }
}

/// Full derivation from raw comments and hotspot sources.
pub fn derive_clips(
    comments: &[Comment],
    semantic: &[SemanticHotspot],
    audio: &[ExcitementPoint],
    duration_secs: f64,
) -> ClipSelection {
    let hotspots = extract_engagement_hotspots(comments);
    select_clips(build_candidates(&hotspots, semantic, audio, duration_secs))
}

/// `MM:SS-MM:SS` label of a clip window.
pub fn clip_range_label(candidate: &ClipCandidate) -> String {
    format!(
        "{}-{}",
        format_clock(candidate.start_time as u64),
        format_clock(candidate.end_time as u64)
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
