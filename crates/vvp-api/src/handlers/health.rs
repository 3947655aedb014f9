//! Health, readiness and service description handlers.

use std::path::Path;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    pub checks: ReadinessChecks,
}

#[derive(Serialize)]
pub struct ReadinessChecks {
    pub yt_dlp: CheckStatus,
    pub ffmpeg: CheckStatus,
    pub ffprobe: CheckStatus,
    pub work_dir: CheckStatus,
}

impl ReadinessChecks {
    fn all_ok(&self) -> bool {
        [&self.yt_dlp, &self.ffmpeg, &self.ffprobe, &self.work_dir]
            .iter()
            .all(|c| c.status == "ok")
    }
}

#[derive(Serialize)]
pub struct CheckStatus {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

impl CheckStatus {
    fn ok(latency_ms: u64) -> Self {
        Self {
            status: "ok".to_string(),
            error: None,
            latency_ms: Some(latency_ms),
        }
    }

    fn error(msg: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            error: Some(msg.into()),
            latency_ms: None,
        }
    }
}

fn check_tool(name: &str) -> CheckStatus {
    let start = Instant::now();
    match which::which(name) {
        Ok(_) => CheckStatus::ok(start.elapsed().as_millis() as u64),
        Err(e) => CheckStatus::error(format!("{name} not found on PATH: {e}")),
    }
}

async fn check_work_dir(dir: &Path) -> CheckStatus {
    let start = Instant::now();
    let probe = dir.join(".ready-probe");

    let result = async {
        tokio::fs::create_dir_all(dir).await?;
        tokio::fs::write(&probe, b"ok").await?;
        tokio::fs::remove_file(&probe).await
    }
    .await;

    match result {
        Ok(()) => CheckStatus::ok(start.elapsed().as_millis() as u64),
        Err(e) => CheckStatus::error(format!("{} is not writable: {e}", dir.display())),
    }
}

/// Readiness check endpoint (readiness probe).
/// Checks the external media tools and the work directory.
pub async fn ready(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (StatusCode, Json<ReadinessResponse>)> {
    let checks = ReadinessChecks {
        yt_dlp: check_tool("yt-dlp"),
        ffmpeg: check_tool("ffmpeg"),
        ffprobe: check_tool("ffprobe"),
        work_dir: check_work_dir(&state.orchestrator.config().work_dir).await,
    };

    let all_ok = checks.all_ok();
    let response = ReadinessResponse {
        status: if all_ok { "ready" } else { "degraded" }.to_string(),
        checks,
    };

    if all_ok {
        Ok(Json(response))
    } else {
        Err((StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}

/// Service index.
#[derive(Serialize)]
pub struct IndexResponse {
    pub title: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub method: &'static str,
    pub path: &'static str,
    pub description: &'static str,
}

const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("POST", "/analyze-video", "Run the full analysis and wait for the result"),
    ("POST", "/analyze-video-async", "Start a background analysis job"),
    ("GET", "/analysis-status/{task_id}", "Poll a background job"),
    ("GET", "/clip-points/{video_id}", "Rank clip candidates without downloading"),
    ("GET", "/emotion-analysis/{video_id}", "Comment sentiment"),
    ("POST", "/content-analysis", "Transcript and audio quality of a downloaded video"),
    ("GET", "/video-info/{video_id}", "Video metadata, statistics and comments"),
    ("DELETE", "/cleanup/{task_id}", "Remove one job"),
    ("DELETE", "/cleanup-all", "Remove every job"),
    ("GET", "/health", "Liveness probe"),
    ("GET", "/ready", "Readiness probe"),
    ("GET", "/api-info", "Capability listing"),
];

pub async fn index() -> Json<IndexResponse> {
    Json(IndexResponse {
        title: "VVP Analyzer API",
        version: env!("CARGO_PKG_VERSION"),
        description: "Viral video potential scoring for YouTube videos",
        endpoints: ENDPOINTS
            .iter()
            .map(|&(method, path, description)| EndpointInfo {
                method,
                path,
                description,
            })
            .collect(),
    })
}

/// Capability listing.
#[derive(Serialize)]
pub struct ApiInfoResponse {
    pub version: &'static str,
    pub features: Vec<Feature>,
    pub score_weights: ScoreWeights,
}

#[derive(Serialize)]
pub struct Feature {
    pub name: &'static str,
    pub description: &'static str,
    pub capabilities: &'static [&'static str],
}

#[derive(Serialize)]
pub struct ScoreWeights {
    pub narrative: f64,
    pub hook: f64,
    pub engagement: f64,
    pub technical: f64,
}

pub async fn api_info() -> Json<ApiInfoResponse> {
    use vvp_models::score::{ENGAGEMENT_WEIGHT, HOOK_WEIGHT, NARRATIVE_WEIGHT, TECHNICAL_WEIGHT};

    Json(ApiInfoResponse {
        version: env!("CARGO_PKG_VERSION"),
        features: vec![
            Feature {
                name: "YouTube metadata",
                description: "Video details, statistics and top-level comments",
                capabilities: &["title and description", "view, like and comment counts", "duration", "comments"],
            },
            Feature {
                name: "Media download",
                description: "Video and subtitle download through yt-dlp",
                capabilities: &["mp4, mov, avi and mkv output", "Japanese and English subtitles", "cookie-based access"],
            },
            Feature {
                name: "AI analysis",
                description: "Qualitative review by Gemini with model fallback",
                capabilities: &["narrative structure", "hook effectiveness", "emotional engagement", "technical quality", "semantic hotspots"],
            },
            Feature {
                name: "Clip points",
                description: "Ranked clip candidates from comments, AI and audio",
                capabilities: &["comment timestamp hotspots", "golden clip", "deterministic ranking"],
            },
            Feature {
                name: "Emotion analysis",
                description: "Keyword sentiment over viewer comments",
                capabilities: &["sentiment distribution", "dominant sentiment", "engagement rates"],
            },
            Feature {
                name: "Async processing",
                description: "Background jobs with progress polling",
                capabilities: &["progress and current step", "analysis thoughts", "job cleanup"],
            },
        ],
        score_weights: ScoreWeights {
            narrative: NARRATIVE_WEIGHT,
            hook: HOOK_WEIGHT,
            engagement: ENGAGEMENT_WEIGHT,
            technical: TECHNICAL_WEIGHT,
        },
    })
}
