//! Shared data models for the VVP analyzer.
//!
//! This crate provides Serde-serializable types for:
//! - Analysis requests and provider credentials
//! - Sub-scores, composite VVP scores and clip candidates
//! - Async job state and status transitions
//! - YouTube metadata, engagement, audio and content reports
//! - Partial analysis reports (clip points, emotion, content)

pub mod analysis;
pub mod audio;
pub mod clip;
pub mod content;
pub mod engagement;
pub mod insights;
pub mod job;
pub mod job_status;
pub mod qualitative;
pub mod request;
pub mod score;
pub mod timestamp;
pub mod utils;
pub mod video;

// Re-export common types
pub use analysis::{AnalysisResult, TechnicalAssessment};
pub use audio::{AudioFeatures, ExcitementKind, ExcitementPoint, PitchStats, VolumeStats};
pub use clip::{ClipCandidate, EngagementHotspot, MentionComment, SemanticHotspot};
pub use content::{ContentQuality, TranscriptStatistics};
pub use engagement::{EngagementMetrics, Sentiment, SentimentAnalysis, SentimentDistribution};
pub use insights::{ClipPointsReport, ContentReport, EmotionReport};
pub use job::{AnalysisJob, JobId, TransitionError};
pub use job_status::JobStatus;
pub use qualitative::{ClipSuggestion, Kpi, QualitativeAnalysis};
pub use request::{AnalysisOptions, AnalysisRequest, ApiKeys, OutputFormat, Provider};
pub use score::{CompositeScore, ScoreBreakdown, SubScoreSet, WeightedSubScore};
pub use utils::{extract_youtube_id, is_valid_youtube_id, YoutubeIdError, YoutubeIdResult};
pub use video::{ChannelInfo, Comment, VideoInfo};
