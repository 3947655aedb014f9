//! In-memory registry of asynchronous analysis jobs.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use vvp_models::{AnalysisJob, AnalysisResult, JobId};

use crate::error::{WorkerError, WorkerResult};

/// Shared job table. Cloning shares the same table.
#[derive(Debug, Clone, Default)]
pub struct JobRegistry {
    jobs: Arc<RwLock<HashMap<JobId, AnalysisJob>>>,
}

impl JobRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pending job and return its snapshot.
    pub async fn create(&self) -> AnalysisJob {
        let job = AnalysisJob::new(JobId::new());
        self.jobs.write().await.insert(job.id.clone(), job.clone());
        job
    }

    /// Snapshot of a job.
    pub async fn get(&self, id: &JobId) -> WorkerResult<AnalysisJob> {
        self.jobs
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| WorkerError::JobNotFound(id.clone()))
    }

    async fn update<F>(&self, id: &JobId, f: F) -> WorkerResult<()>
    where
        F: FnOnce(&mut AnalysisJob) -> WorkerResult<()>,
    {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(id)
            .ok_or_else(|| WorkerError::JobNotFound(id.clone()))?;
        f(job)
    }

    pub async fn start(&self, id: &JobId) -> WorkerResult<()> {
        self.update(id, |job| Ok(job.start()?)).await
    }

    pub async fn record_progress(
        &self,
        id: &JobId,
        progress: u8,
        step: &str,
        thought: Option<String>,
    ) -> WorkerResult<()> {
        self.update(id, |job| {
            job.record_progress(progress, step, thought);
            Ok(())
        })
        .await
    }

    pub async fn complete(&self, id: &JobId, result: AnalysisResult) -> WorkerResult<()> {
        self.update(id, |job| Ok(job.complete(result)?)).await
    }

    pub async fn fail(&self, id: &JobId, error: impl Into<String>) -> WorkerResult<()> {
        let error = error.into();
        self.update(id, |job| Ok(job.fail(error)?)).await
    }

    /// Drop a job regardless of state. A running pipeline keeps going but
    /// its later updates are discarded.
    pub async fn remove(&self, id: &JobId) -> WorkerResult<AnalysisJob> {
        self.jobs
            .write()
            .await
            .remove(id)
            .ok_or_else(|| WorkerError::JobNotFound(id.clone()))
    }

    /// Drop every job, returning how many were removed.
    pub async fn clear(&self) -> usize {
        let mut jobs = self.jobs.write().await;
        let count = jobs.len();
        jobs.clear();
        count
    }

    /// Drop terminal jobs finished more than `ttl` ago.
    pub async fn evict_expired(&self, ttl: chrono::Duration) -> usize {
        let now = Utc::now();
        let mut jobs = self.jobs.write().await;
        let before = jobs.len();
        jobs.retain(|_, job| !job.is_expired(now, ttl));
        let evicted = before - jobs.len();
        if evicted > 0 {
            debug!(evicted, remaining = jobs.len(), "Evicted expired jobs");
        }
        evicted
    }

    pub async fn len(&self) -> usize {
        self.jobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.read().await.is_empty()
    }
}
