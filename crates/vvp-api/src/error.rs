//! API error types.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use vvp_worker::WorkerError;

pub type ApiResult<T> = Result<T, ApiError>;

static HIDE_INTERNAL_DETAILS: AtomicBool = AtomicBool::new(false);

/// Replace 500 response details with a generic message. Set from
/// [`ApiConfig::is_production`](crate::ApiConfig::is_production) when the router is built.
pub fn hide_internal_details(hide: bool) {
    HIDE_INTERNAL_DETAILS.store(hide, Ordering::Relaxed);
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Worker(#[from] WorkerError),
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Worker(err) => match err {
                WorkerError::IncompleteAnalysis(_) | WorkerError::ScoreOutOfRange { .. } => {
                    StatusCode::UNPROCESSABLE_ENTITY
                }
                WorkerError::JobNotFound(_) => StatusCode::NOT_FOUND,
                WorkerError::MissingCredentials(_) | WorkerError::InvalidInput(_) => {
                    StatusCode::BAD_REQUEST
                }
                WorkerError::InvalidTransition(_) | WorkerError::ConfigError(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                e if e.is_pipeline_failure() => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Machine-readable error code carried in the response body.
    /// Message sent to clients. Internal errors are masked when `hide_internal` is set.
    pub fn public_detail(&self, hide_internal: bool) -> String {
        if hide_internal && self.status_code() == StatusCode::INTERNAL_SERVER_ERROR {
            "An internal error occurred".to_string()
        } else {
            self.to_string()
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "not_found",
            ApiError::BadRequest(_) => "bad_request",
            ApiError::Validation(_) => "validation_error",
            ApiError::RateLimited => "rate_limited",
            ApiError::Internal(_) => "internal_error",
            ApiError::Worker(err) => match err {
                WorkerError::IncompleteAnalysis(_) => "incomplete_analysis",
                WorkerError::ScoreOutOfRange { .. } => "score_out_of_range",
                WorkerError::JobNotFound(_) => "job_not_found",
                WorkerError::InvalidTransition(_) => "invalid_transition",
                WorkerError::MissingCredentials(_) => "missing_credentials",
                WorkerError::InvalidInput(_) => "invalid_input",
                WorkerError::DownloadFailed(_) => "download_failed",
                WorkerError::EngagementFailed(_) => "engagement_failed",
                WorkerError::AudioFailed(_) => "audio_failed",
                WorkerError::AiFailed(_) => "ai_failed",
                WorkerError::ConfigError(_) => "config_error",
                WorkerError::Media(_) => "media_error",
                WorkerError::Io(_) => "io_error",
            },
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.public_detail(HIDE_INTERNAL_DETAILS.load(Ordering::Relaxed));

        let body = ErrorResponse {
            detail,
            code: Some(self.code().to_string()),
        };

        (status, Json(body)).into_response()
    }
}
