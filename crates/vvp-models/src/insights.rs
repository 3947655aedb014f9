//! Reports produced by the partial analysis operations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    AudioFeatures, ClipCandidate, ClipSuggestion, ContentQuality, EngagementHotspot,
    EngagementMetrics, SemanticHotspot, SentimentAnalysis, TechnicalAssessment,
};

/// Clip candidates for a video without downloading it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ClipPointsReport {
    pub video_id: String,
    pub golden_clip: Option<ClipCandidate>,
    pub clip_candidates: Vec<ClipCandidate>,
    /// Comment timestamp buckets, ordered by time
    pub engagement_hotspots: Vec<EngagementHotspot>,
    pub semantic_hotspots: Vec<SemanticHotspot>,
    /// The AI's own pick, reported alongside the ranked candidates
    pub ai_suggestion: Option<ClipSuggestion>,
}

/// Comment sentiment for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EmotionReport {
    pub video_id: String,
    pub title: String,
    pub sentiment: SentimentAnalysis,
    pub engagement: EngagementMetrics,
}

/// Transcript and audio quality of a downloaded video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ContentReport {
    pub video_id: String,
    pub content: ContentQuality,
    pub audio: Option<AudioFeatures>,
    pub technical_quality: TechnicalAssessment,
    pub duration_secs: f64,
}
