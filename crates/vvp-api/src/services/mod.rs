//! Background services.

pub mod job_sweeper;

pub use job_sweeper::JobSweeper;
