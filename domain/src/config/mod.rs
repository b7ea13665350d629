//! Domain configuration concepts
//!
//! - [`FailurePolicy`] - what the orchestrator does when a source fails
//! - [`OutputFormat`] - how aggregated results are rendered

mod failure_policy;
mod output_format;

pub use failure_policy::FailurePolicy;
pub use output_format::OutputFormat;
