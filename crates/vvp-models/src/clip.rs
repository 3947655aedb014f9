//! Clip candidates and the hotspots they are derived from.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A viewer comment that mentioned a timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MentionComment {
    pub text: String,
    pub author: String,
    pub likes: u64,
}

/// Timestamp mentions grouped into a 30-second bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EngagementHotspot {
    /// First mentioned time in the bucket, in seconds
    pub time: f64,
    /// The mention as written (`MM:SS` or `HH:MM:SS`)
    pub formatted_time: String,
    pub mention_count: u32,
    pub total_likes: u64,
    pub comments: Vec<MentionComment>,
}

/// A moment the AI flagged as valuable, with its free-text reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SemanticHotspot {
    /// `MM:SS` or `HH:MM:SS`
    pub time: String,
    #[serde(default)]
    pub reason: String,
}

/// A ranked clip suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipCandidate {
    pub start_time: f64,
    pub end_time: f64,
    pub formatted_time: String,
    pub mention_count: u32,
    pub total_likes: u64,
    /// Blended clip score (0-100)
    pub score: f64,
    pub quantitative_score: f64,
    pub qualitative_score: f64,
    pub reason: String,
    #[serde(default)]
    pub comments: Vec<MentionComment>,
}

impl ClipCandidate {
    /// Clip length in seconds.
    pub fn duration(&self) -> f64 {
        (self.end_time - self.start_time).max(0.0)
    }
}
