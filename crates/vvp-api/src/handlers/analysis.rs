//! Integrated analysis handlers.

use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::info;

use vvp_models::{AnalysisRequest, AnalysisResult, ContentReport, JobStatus};

use crate::error::{ApiError, ApiResult};
use crate::security::validate_video_url;
use crate::state::AppState;

/// Synchronous analysis response.
#[derive(Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub data: AnalysisResult,
    /// Wall-clock seconds spent handling the request
    pub processing_time_secs: f64,
}

/// Accepted async job.
#[derive(Serialize)]
pub struct AsyncAnalysisResponse {
    pub task_id: String,
    pub status: JobStatus,
    pub message: String,
}

#[derive(Serialize)]
pub struct ContentAnalysisResponse {
    pub success: bool,
    pub content_analysis: ContentReport,
}

/// Check the URL against the whitelist and normalize it in place.
fn validated(mut request: AnalysisRequest) -> ApiResult<AnalysisRequest> {
    request.url = validate_video_url(&request.url)
        .into_result()
        .map_err(ApiError::validation)?;
    Ok(request)
}

/// Run the full pipeline and wait for the result.
pub async fn analyze_video(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> ApiResult<Json<AnalysisResponse>> {
    let request = validated(request)?;
    let started = Instant::now();

    let result = state.orchestrator.analyze(&request).await?;
    info!(
        video_id = %result.video_id,
        vvp_score = result.vvp_score,
        "Synchronous analysis finished"
    );

    Ok(Json(AnalysisResponse {
        success: true,
        data: result,
        processing_time_secs: started.elapsed().as_secs_f64(),
    }))
}

/// Register a background job and return its id immediately.
pub async fn analyze_video_async(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> ApiResult<(StatusCode, Json<AsyncAnalysisResponse>)> {
    let request = validated(request)?;
    let task_id = state.orchestrator.submit(request).await?;
    info!(task_id = %task_id, "Analysis job accepted");

    Ok((
        StatusCode::ACCEPTED,
        Json(AsyncAnalysisResponse {
            task_id: task_id.to_string(),
            status: JobStatus::Pending,
            message: "Analysis started. Poll /analysis-status/{task_id} for progress".to_string(),
        }),
    ))
}

/// Transcript and audio quality. Always downloads the video.
pub async fn content_analysis(
    State(state): State<AppState>,
    Json(request): Json<AnalysisRequest>,
) -> ApiResult<Json<ContentAnalysisResponse>> {
    let request = validated(request)?;
    let report = state.orchestrator.content_analysis(&request).await?;

    Ok(Json(ContentAnalysisResponse {
        success: true,
        content_analysis: report,
    }))
}
