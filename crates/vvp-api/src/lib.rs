//! Axum HTTP API for the VVP analysis service.
//!
//! This crate provides:
//! - Synchronous and asynchronous integrated analysis endpoints
//! - Partial analyses (clip points, emotion, content, video info)
//! - Rate limiting, security headers and Prometheus metrics

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use services::JobSweeper;
pub use state::AppState;
