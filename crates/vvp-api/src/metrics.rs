//! Prometheus metrics for the API server.

use std::sync::LazyLock;
use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use regex_lite::Regex;

/// Install the Prometheus recorder and return a handle for rendering.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "vvp_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "vvp_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "vvp_http_requests_in_flight";

    pub const JOBS_EVICTED_TOTAL: &str = "vvp_jobs_evicted_total";

    pub const RATE_LIMIT_HITS_TOTAL: &str = "vvp_rate_limit_hits_total";
}

static TASK_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(analysis-status|cleanup)/[^/]+$").unwrap());
static VIDEO_PATH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^/(clip-points|emotion-analysis|video-info)/[^/]+$").unwrap());

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", sanitize_path(path)),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record jobs dropped by the TTL sweep.
pub fn record_jobs_evicted(count: usize) {
    counter!(names::JOBS_EVICTED_TOTAL).increment(count as u64);
}

/// Record rate limit hit.
pub fn record_rate_limit_hit(endpoint: &str) {
    let labels = [("endpoint", sanitize_path(endpoint))];
    counter!(names::RATE_LIMIT_HITS_TOTAL, &labels).increment(1);
}

/// Collapse task and video ids so label cardinality stays bounded.
fn sanitize_path(path: &str) -> String {
    let path = TASK_PATH.replace(path, "/$1/:task_id");
    let path = VIDEO_PATH.replace(&path, "/$1/:video_id");
    path.to_string()
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &path, status, duration);

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_path() {
        assert_eq!(
            sanitize_path("/analysis-status/550e8400-e29b-41d4-a716-446655440000"),
            "/analysis-status/:task_id"
        );
        assert_eq!(sanitize_path("/cleanup/abc"), "/cleanup/:task_id");
        assert_eq!(sanitize_path("/clip-points/dQw4w9WgXcQ"), "/clip-points/:video_id");
        assert_eq!(sanitize_path("/video-info/dQw4w9WgXcQ"), "/video-info/:video_id");
        assert_eq!(sanitize_path("/cleanup-all"), "/cleanup-all");
        assert_eq!(sanitize_path("/analyze-video"), "/analyze-video");
    }
}
