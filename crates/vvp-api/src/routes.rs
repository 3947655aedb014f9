//! API routes.

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::limit::RequestBodyLimitLayer;

use crate::error::hide_internal_details;
use crate::handlers::{
    analysis_status, analyze_video, analyze_video_async, api_info, cleanup_all, cleanup_task,
    clip_points, content_analysis, emotion_analysis, health, index, ready, video_info,
};
use crate::metrics::metrics_middleware;
use crate::middleware::{
    cors_layer, rate_limit_middleware, request_id, request_logging, security_headers,
    RateLimiterCache,
};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    hide_internal_details(state.config.is_production());

    let analysis_routes = Router::new()
        .route("/analyze-video", post(analyze_video))
        .route("/analyze-video-async", post(analyze_video_async))
        .route("/content-analysis", post(content_analysis));

    let insight_routes = Router::new()
        .route("/clip-points/:video_id", get(clip_points))
        .route("/emotion-analysis/:video_id", get(emotion_analysis))
        .route("/video-info/:video_id", get(video_info));

    let job_routes = Router::new()
        .route("/analysis-status/:task_id", get(analysis_status))
        .route("/cleanup/:task_id", delete(cleanup_task))
        .route("/cleanup-all", delete(cleanup_all));

    let rate_limiter = Arc::new(RateLimiterCache::new(
        state.config.rate_limit_rps,
        state.config.rate_limit_burst,
    ));

    let api_routes = Router::new()
        .merge(analysis_routes)
        .merge(insight_routes)
        .merge(job_routes)
        .layer(middleware::from_fn_with_state(
            rate_limiter,
            rate_limit_middleware,
        ));

    let info_routes = Router::new()
        .route("/", get(index))
        .route("/api-info", get(api_info));

    let health_routes = Router::new()
        .route("/health", get(health))
        .route("/healthz", get(health))
        .route("/ready", get(ready));

    let metrics_routes = if let Some(handle) = metrics_handle {
        Router::new().route("/metrics", get(move || async move { handle.render() }))
    } else {
        Router::new()
    };

    Router::new()
        .merge(api_routes)
        .merge(info_routes)
        .merge(health_routes)
        .merge(metrics_routes)
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(security_headers))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .layer(cors_layer(&state.config.cors_origins))
        .with_state(state)
}
