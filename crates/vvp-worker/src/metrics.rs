//! Pipeline metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use metrics::{counter, histogram};

pub mod names {
    pub const JOBS_SUBMITTED_TOTAL: &str = "vvp_jobs_submitted_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "vvp_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "vvp_jobs_failed_total";
    pub const STAGE_DURATION_SECONDS: &str = "vvp_stage_duration_seconds";
    pub const ANALYSIS_DURATION_SECONDS: &str = "vvp_analysis_duration_seconds";
}

/// Pipeline stage labels.
pub mod stage {
    pub const ACQUISITION: &str = "acquisition";
    pub const ENGAGEMENT: &str = "engagement";
    pub const AUDIO: &str = "audio";
    pub const QUALITATIVE: &str = "qualitative";
    pub const SCORING: &str = "scoring";
}

pub fn record_job_submitted() {
    counter!(names::JOBS_SUBMITTED_TOTAL).increment(1);
}

pub fn record_job_completed() {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
}

pub fn record_job_failed() {
    counter!(names::JOBS_FAILED_TOTAL).increment(1);
}

/// Record how long one pipeline stage took.
pub fn record_stage_duration(stage: &'static str, duration_secs: f64) {
    histogram!(names::STAGE_DURATION_SECONDS, "stage" => stage).record(duration_secs);
}

/// Record a full analysis run. `mode` is `sync` or `async`.
pub fn record_analysis_duration(mode: &'static str, duration_secs: f64) {
    histogram!(names::ANALYSIS_DURATION_SECONDS, "mode" => mode).record(duration_secs);
}
