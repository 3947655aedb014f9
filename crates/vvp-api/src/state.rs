//! Application state.

use std::sync::Arc;

use vvp_worker::{Orchestrator, WorkerConfig};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub orchestrator: Arc<Orchestrator>,
}

impl AppState {
    pub fn new(config: ApiConfig, orchestrator: Orchestrator) -> Self {
        Self {
            config,
            orchestrator: Arc::new(orchestrator),
        }
    }

    /// State backed by the real downloader and APIs, configured from the environment.
    pub fn from_env(config: ApiConfig) -> Self {
        Self::new(config, Orchestrator::new(WorkerConfig::from_env()))
    }
}
