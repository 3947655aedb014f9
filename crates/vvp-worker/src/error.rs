//! Worker error types.

use thiserror::Error;
use vvp_models::{JobId, Provider, TransitionError};

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    /// A KPI came back from the AI without a numeric score.
    #[error("Incomplete analysis: missing {0} score")]
    IncompleteAnalysis(String),

    #[error("Score out of range: {field} = {value}")]
    ScoreOutOfRange { field: String, value: f64 },

    #[error("Job not found: {0}")]
    JobNotFound(JobId),

    #[error("Invalid job transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    #[error("Missing {0} API key")]
    MissingCredentials(Provider),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Engagement fetch failed: {0}")]
    EngagementFailed(String),

    #[error("Audio analysis failed: {0}")]
    AudioFailed(String),

    #[error("AI analysis failed: {0}")]
    AiFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Media error: {0}")]
    Media(#[from] vvp_media::MediaError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl WorkerError {
    pub fn incomplete_analysis(field: impl Into<String>) -> Self {
        Self::IncompleteAnalysis(field.into())
    }

    pub fn score_out_of_range(field: impl Into<String>, value: f64) -> Self {
        Self::ScoreOutOfRange {
            field: field.into(),
            value,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    pub fn engagement_failed(msg: impl Into<String>) -> Self {
        Self::EngagementFailed(msg.into())
    }

    pub fn audio_failed(msg: impl Into<String>) -> Self {
        Self::AudioFailed(msg.into())
    }

    pub fn ai_failed(msg: impl Into<String>) -> Self {
        Self::AiFailed(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Failures of an external collaborator (downloader, APIs, media tools).
    pub fn is_pipeline_failure(&self) -> bool {
        matches!(
            self,
            WorkerError::DownloadFailed(_)
                | WorkerError::EngagementFailed(_)
                | WorkerError::AudioFailed(_)
                | WorkerError::AiFailed(_)
                | WorkerError::Media(_)
                | WorkerError::Io(_)
        )
    }
}
