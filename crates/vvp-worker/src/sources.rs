//! Collaborator seams of the analysis pipeline.
//!
//! Each external system (downloader, YouTube Data API, audio tooling,
//! generative AI) sits behind a trait so the orchestrator can run against
//! fakes in tests.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use vvp_media::{ProbeInfo, Transcript};
use vvp_models::{AudioFeatures, Comment, OutputFormat, QualitativeAnalysis, VideoInfo};

use crate::error::WorkerResult;

/// Output of the acquisition stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AcquiredVideo {
    /// Directory holding every downloaded file for this video
    pub workdir: PathBuf,
    pub video_path: PathBuf,
    /// Empty when the video has no subtitles
    pub transcript: Transcript,
    /// `None` when probing failed
    pub probe: Option<ProbeInfo>,
    pub has_subtitles: bool,
}

/// Everything the AI sees about a video.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QualitativeInput {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// `[HH:MM:SS] text` lines, possibly empty
    pub transcript: String,
    pub comments: Vec<Comment>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub duration_secs: u64,
}

/// Downloads a video and its subtitles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VideoAcquirer: Send + Sync {
    async fn acquire(
        &self,
        url: &str,
        video_id: &str,
        format: OutputFormat,
    ) -> WorkerResult<AcquiredVideo>;
}

/// Fetches metadata, statistics and comments for a video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EngagementFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str, api_key: &str) -> WorkerResult<VideoInfo>;
}

/// Computes loudness features from a downloaded video.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AudioFeatureExtractor: Send + Sync {
    async fn extract(&self, video_path: &Path) -> WorkerResult<AudioFeatures>;
}

/// Grades a video with a generative-AI model.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QualitativeAnalyzer: Send + Sync {
    async fn analyze(
        &self,
        input: &QualitativeInput,
        api_key: &str,
    ) -> WorkerResult<QualitativeAnalysis>;
}
