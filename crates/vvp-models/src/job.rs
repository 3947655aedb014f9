//! Asynchronous analysis job records.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::{AnalysisResult, JobStatus};

/// Unique identifier for an analysis job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Rejected status change.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid job transition from {from} to {to}")]
pub struct TransitionError {
    pub from: JobStatus,
    pub to: JobStatus,
}

/// Snapshot of an analysis job as exposed by status polling.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisJob {
    pub id: JobId,
    pub status: JobStatus,
    /// Progress percentage (0-100), never decreases
    pub progress: u8,
    pub current_step: Option<String>,
    /// Append-only narration of what the pipeline is doing
    #[serde(default)]
    pub thoughts: Vec<String>,
    pub result: Option<AnalysisResult>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl AnalysisJob {
    /// Create a new job in the `pending` state.
    pub fn new(id: JobId) -> Self {
        let now = Utc::now();
        Self {
            id,
            status: JobStatus::Pending,
            progress: 0,
            current_step: Some("Queued".into()),
            thoughts: Vec::new(),
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
            finished_at: None,
        }
    }

    fn transition(&mut self, next: JobStatus) -> Result<(), TransitionError> {
        if !self.status.can_transition_to(next) {
            return Err(TransitionError {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Move `pending -> running`.
    pub fn start(&mut self) -> Result<(), TransitionError> {
        self.transition(JobStatus::Running)
    }

    /// Record stage progress. Progress is monotonic; a lower value is ignored.
    ///
    /// Has no effect once the job is terminal.
    pub fn record_progress(&mut self, progress: u8, step: impl Into<String>, thought: Option<String>) {
        if self.status.is_terminal() {
            return;
        }
        self.progress = self.progress.max(progress.min(100));
        self.current_step = Some(step.into());
        if let Some(thought) = thought {
            self.thoughts.push(thought);
        }
        self.updated_at = Utc::now();
    }

    /// Move `running -> complete` and attach the result.
    pub fn complete(&mut self, result: AnalysisResult) -> Result<(), TransitionError> {
        self.transition(JobStatus::Complete)?;
        self.progress = 100;
        self.current_step = Some("Analysis complete".into());
        self.result = Some(result);
        self.finished_at = Some(self.updated_at);
        Ok(())
    }

    /// Move `running -> failed` with the first error encountered.
    pub fn fail(&mut self, error: impl Into<String>) -> Result<(), TransitionError> {
        self.transition(JobStatus::Failed)?;
        let error = error.into();
        self.current_step = Some("Analysis failed".into());
        self.thoughts.push(format!("Stopped: {}", error));
        self.error = Some(error);
        self.finished_at = Some(self.updated_at);
        Ok(())
    }

    /// Check if the job is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }

    /// Whether a terminal job has been finished for longer than `ttl`.
    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        match self.finished_at {
            Some(finished) if self.is_terminal() => now - finished > ttl,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_job_is_pending() {
        let job = AnalysisJob::new(JobId::new());
        assert_eq!(job.status, JobStatus::Pending);
        assert_eq!(job.progress, 0);
        assert!(job.result.is_none());
        assert!(!job.is_terminal());
    }

    #[test]
    fn test_fail_requires_running() {
        let mut job = AnalysisJob::new(JobId::from("job-1"));
        let err = job.fail("boom").unwrap_err();
        assert_eq!(err.from, JobStatus::Pending);
        assert_eq!(err.to, JobStatus::Failed);

        job.start().unwrap();
        job.fail("download failed").unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(job.error.as_deref(), Some("download failed"));
        assert!(job.finished_at.is_some());

        // No way back
        assert!(job.start().is_err());
        assert!(job.fail("again").is_err());
        assert_eq!(job.error.as_deref(), Some("download failed"));
    }

    #[test]
    fn test_progress_is_monotonic() {
        let mut job = AnalysisJob::new(JobId::new());
        job.start().unwrap();
        job.record_progress(40, "Fetching", Some("step one".into()));
        job.record_progress(20, "Older update", None);
        assert_eq!(job.progress, 40);
        assert_eq!(job.current_step.as_deref(), Some("Older update"));
        assert_eq!(job.thoughts, vec!["step one".to_string()]);
    }

    #[test]
    fn test_expiry_only_applies_to_terminal_jobs() {
        let mut job = AnalysisJob::new(JobId::new());
        let later = Utc::now() + chrono::Duration::hours(2);
        assert!(!job.is_expired(later, chrono::Duration::hours(1)));

        job.start().unwrap();
        job.fail("x").unwrap();
        assert!(job.is_expired(later, chrono::Duration::hours(1)));
        assert!(!job.is_expired(Utc::now(), chrono::Duration::hours(1)));
    }
}
