//! Integrated analysis result.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{
    AudioFeatures, ClipCandidate, CompositeScore, ContentQuality, EngagementMetrics,
    QualitativeAnalysis, SentimentAnalysis, VideoInfo,
};

/// What is known about the downloaded media file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct TechnicalAssessment {
    pub media_downloaded: bool,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fps: Option<f64>,
    pub bitrate: Option<u64>,
    pub codec: Option<String>,
    pub has_subtitles: bool,
    pub summary: String,
}

/// Full report produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    pub video_id: String,
    /// Same as `composite.value`
    pub vvp_score: f64,
    pub composite: CompositeScore,
    pub golden_clip: Option<ClipCandidate>,
    /// Top five ranked candidates
    pub clip_candidates: Vec<ClipCandidate>,
    pub sentiment: SentimentAnalysis,
    pub engagement: EngagementMetrics,
    pub technical_quality: TechnicalAssessment,
    pub qualitative: QualitativeAnalysis,
    pub audio: Option<AudioFeatures>,
    pub content: Option<ContentQuality>,
    pub video_info: VideoInfo,
    pub analyzed_at: DateTime<Utc>,
    pub processing_time_secs: f64,
}
