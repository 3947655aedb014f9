//! VVP analysis pipeline.
//!
//! This crate provides:
//! - Composite VVP scoring and clip-candidate ranking
//! - Comment sentiment, engagement and transcript content heuristics
//! - YouTube Data API and Gemini clients
//! - The job orchestrator with its in-memory registry
//! - Structured job logging and pipeline metrics

pub mod acquisition;
pub mod clips;
pub mod config;
pub mod content;
pub mod engagement;
pub mod error;
pub mod gemini;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod registry;
pub mod scoring;
pub mod sources;
pub mod youtube;

#[cfg(test)]
mod test_support;

pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use logging::JobLogger;
pub use orchestrator::{Collaborators, Orchestrator};
pub use registry::JobRegistry;
pub use sources::{
    AcquiredVideo, AudioFeatureExtractor, EngagementFetcher, QualitativeAnalyzer,
    QualitativeInput, VideoAcquirer,
};
