//! Background eviction of finished jobs.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, info};

use vvp_worker::Orchestrator;

use crate::metrics;

/// Periodically drops terminal jobs older than the TTL.
pub struct JobSweeper {
    orchestrator: Arc<Orchestrator>,
    ttl: Duration,
    every: Duration,
}

impl JobSweeper {
    pub fn new(orchestrator: Arc<Orchestrator>, ttl: Duration, every: Duration) -> Self {
        Self {
            orchestrator,
            ttl,
            every,
        }
    }

    /// Run forever. Spawn this as a background task.
    pub async fn run(&self) {
        info!(
            "Starting job sweeper (interval: {:?}, ttl: {:?})",
            self.every, self.ttl
        );

        let mut ticker = interval(self.every);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep_once().await;
        }
    }

    /// Run a single eviction pass and return how many jobs were dropped.
    pub async fn sweep_once(&self) -> usize {
        let ttl = chrono::Duration::seconds(self.ttl.as_secs() as i64);
        let evicted = self.orchestrator.evict_expired(ttl).await;

        if evicted > 0 {
            info!(evicted, "Evicted expired jobs");
            metrics::record_jobs_evicted(evicted);
        } else {
            debug!("No expired jobs");
        }
        evicted
    }
}
