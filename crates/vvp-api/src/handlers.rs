//! Request handlers.

pub mod analysis;
pub mod health;
pub mod insights;
pub mod jobs;

pub use analysis::*;
pub use health::*;
pub use insights::*;
pub use jobs::*;
