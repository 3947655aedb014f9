//! Async job polling and cleanup handlers.

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;
use tracing::info;

use vvp_models::{AnalysisJob, AnalysisResult, JobId, JobStatus};

use crate::error::ApiResult;
use crate::state::AppState;

/// Job status response.
#[derive(Debug, Serialize)]
pub struct JobStatusResponse {
    pub task_id: String,
    pub status: JobStatus,
    /// Progress percentage (0-100)
    pub progress: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_step: Option<String>,
    /// Human-readable notes collected while the job ran
    pub thoughts: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<AnalysisJob> for JobStatusResponse {
    fn from(job: AnalysisJob) -> Self {
        Self {
            task_id: job.id.to_string(),
            status: job.status,
            progress: job.progress,
            current_step: job.current_step,
            thoughts: job.thoughts,
            result: job.result,
            error: job.error,
            created_at: job.created_at.to_rfc3339(),
            updated_at: job.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CleanupResponse {
    pub message: String,
    pub removed: usize,
}

pub async fn analysis_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<JobStatusResponse>> {
    let job = state.orchestrator.status(&JobId::from(task_id)).await?;
    Ok(Json(job.into()))
}

/// Remove one job, whatever its state.
pub async fn cleanup_task(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> ApiResult<Json<CleanupResponse>> {
    let job = state.orchestrator.remove_job(&JobId::from(task_id)).await?;
    info!(task_id = %job.id, status = %job.status, "Job removed");

    Ok(Json(CleanupResponse {
        message: format!("Task {} removed", job.id),
        removed: 1,
    }))
}

pub async fn cleanup_all(State(state): State<AppState>) -> Json<CleanupResponse> {
    let removed = state.orchestrator.clear_jobs().await;
    info!(removed, "All jobs removed");

    Json(CleanupResponse {
        message: format!("{} tasks removed", removed),
        removed,
    })
}
