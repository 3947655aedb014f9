//! Analysis job status and its allowed transitions.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Lifecycle state of an asynchronous analysis job.
///
/// Jobs only move forward: `pending -> running -> complete | failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Registered, not yet picked up by the runner
    #[default]
    Pending,
    /// Pipeline is executing
    Running,
    /// Pipeline finished and a result is available
    Complete,
    /// Pipeline stopped at the first stage error
    Failed,
}

impl JobStatus {
    /// Get string representation of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Complete => "complete",
            JobStatus::Failed => "failed",
        }
    }

    /// Check if this is a terminal state (no more updates expected).
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Complete | JobStatus::Failed)
    }

    /// Whether moving from `self` to `next` is a legal forward step.
    ///
    /// Terminal states are only reachable from `Running`; nothing leaves a
    /// terminal state.
    pub fn can_transition_to(&self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::Pending, JobStatus::Running)
                | (JobStatus::Running, JobStatus::Complete)
                | (JobStatus::Running, JobStatus::Failed)
        )
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_transitions_allowed() {
        assert!(JobStatus::Pending.can_transition_to(JobStatus::Running));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Complete));
        assert!(JobStatus::Running.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_skipping_running_rejected() {
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Complete));
        assert!(!JobStatus::Pending.can_transition_to(JobStatus::Failed));
    }

    #[test]
    fn test_backward_transitions_rejected() {
        let all = [
            JobStatus::Pending,
            JobStatus::Running,
            JobStatus::Complete,
            JobStatus::Failed,
        ];
        for next in all {
            assert!(!JobStatus::Complete.can_transition_to(next));
            assert!(!JobStatus::Failed.can_transition_to(next));
        }
        assert!(!JobStatus::Running.can_transition_to(JobStatus::Pending));
        assert!(!JobStatus::Running.can_transition_to(JobStatus::Running));
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(serde_json::to_string(&JobStatus::Complete).unwrap(), "\"complete\"");
        assert_eq!(JobStatus::Running.to_string(), "running");
        assert!(JobStatus::Failed.is_terminal());
        assert!(!JobStatus::Pending.is_terminal());
    }
}
