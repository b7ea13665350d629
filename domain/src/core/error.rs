//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No domain in event payload")]
    EmptyDomain,

    #[error("Unknown source: {0}")]
    UnknownSource(String),

    #[error("Invalid failure policy: {0}")]
    InvalidFailurePolicy(String),
}
