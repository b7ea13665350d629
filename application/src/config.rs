//! Application-level configuration.
//!
//! This module provides configuration types that control how use cases behave,
//! such as invocation timeouts and the failure policy.

use std::time::Duration;
use subharvest_domain::FailurePolicy;

/// Application behavior configuration.
#[derive(Debug, Clone, Default)]
pub struct BehaviorConfig {
    /// What to do when a source fails.
    pub failure_policy: FailurePolicy,
    /// Maximum time to wait for one source invocation. `None` leaves it to
    /// the transport's own defaults.
    pub timeout: Option<Duration>,
}

impl BehaviorConfig {
    /// Creates a BehaviorConfig from an optional timeout in seconds.
    pub fn from_timeout_seconds(seconds: Option<u64>) -> Self {
        Self {
            timeout: seconds.map(Duration::from_secs),
            ..Default::default()
        }
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }
}
