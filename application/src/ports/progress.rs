//! Progress notification port
//!
//! Defines the interface for reporting progress during an aggregation run.

use subharvest_domain::{DomainQuery, SourceKind};

/// Callback for progress updates during an aggregation run
///
/// Implementations live in the presentation layer.
pub trait SourceProgressNotifier: Send + Sync {
    /// Called once before any source is invoked
    fn on_run_start(&self, domain: &DomainQuery, total_sources: usize);

    /// Called when a source finishes, successfully or not
    fn on_source_complete(&self, source: SourceKind, success: bool, returned: usize);

    /// Called after the last source finished
    fn on_run_complete(&self, _unique: usize) {}

    /// Called instead of `on_run_complete` when the run ends in an error
    fn on_run_failed(&self) {}
}

/// No-op progress notifier for when progress reporting is not needed
pub struct NoProgress;

impl SourceProgressNotifier for NoProgress {
    fn on_run_start(&self, _domain: &DomainQuery, _total_sources: usize) {}
    fn on_source_complete(&self, _source: SourceKind, _success: bool, _returned: usize) {}
}
