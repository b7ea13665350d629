//! Source adapter port
//!
//! Defines the contract every hostname source implements.

use async_trait::async_trait;
use subharvest_domain::{DomainQuery, SourceKind};
use thiserror::Error;

use super::credential_provider::CredentialError;

/// Coarse classification of a [`SourceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Required input was missing
    Input,
    /// The external system could not be reached
    Transport,
    /// The external system answered with something unexpected
    Protocol,
    /// API credentials were missing or unusable
    Credential,
    /// The database rejected the query or failed mid-iteration
    Query,
}

/// Errors a source adapter can report
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("No domain in event payload")]
    EmptyDomain,

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Failed to initialize enumeration: {0}")]
    Initialization(String),

    #[error("Enumeration timed out: {0}")]
    Timeout(String),

    #[error("Request failed: {0}")]
    Request(String),

    #[error("Invalid status code: {status}")]
    Response { status: u16 },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Credential error: {0}")]
    Credential(String),
}

impl SourceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SourceError::EmptyDomain => ErrorCategory::Input,
            SourceError::Connection(_)
            | SourceError::Request(_)
            | SourceError::Initialization(_)
            | SourceError::Timeout(_) => ErrorCategory::Transport,
            SourceError::Response { .. } | SourceError::Decode(_) => ErrorCategory::Protocol,
            SourceError::Credential(_) => ErrorCategory::Credential,
            SourceError::Query(_) => ErrorCategory::Query,
        }
    }

    /// Stable identifier carried in the `errorType` field of failure envelopes
    pub fn error_type(&self) -> &'static str {
        match self {
            SourceError::EmptyDomain => "EmptyDomainError",
            SourceError::Connection(_) => "ConnectionError",
            SourceError::Query(_) => "QueryError",
            SourceError::Initialization(_) => "InitializationError",
            SourceError::Timeout(_) => "TimeoutError",
            SourceError::Request(_) => "RequestError",
            SourceError::Response { .. } => "ResponseError",
            SourceError::Decode(_) => "DecodeError",
            SourceError::Credential(_) => "CredentialError",
        }
    }
}

impl From<CredentialError> for SourceError {
    fn from(e: CredentialError) -> Self {
        SourceError::Credential(e.to_string())
    }
}

/// A single hostname source
///
/// Implementations live in the infrastructure layer. Each call performs its
/// external lookup afresh; adapters keep no state between calls.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// Which source this adapter queries
    fn kind(&self) -> SourceKind;

    /// Look up hostnames for an already validated domain
    async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError>;

    /// Look up hostnames for a raw domain string.
    ///
    /// An empty domain fails with [`SourceError::EmptyDomain`] before any
    /// external call is made.
    async fn subdomains(&self, domain: &str) -> Result<Vec<String>, SourceError> {
        let query = DomainQuery::try_new(domain).map_err(|_| SourceError::EmptyDomain)?;
        self.fetch(&query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SourceAdapter for CountingSource {
        fn kind(&self) -> SourceKind {
            SourceKind::Sublist3r
        }

        async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![format!("www.{}", query)])
        }
    }

    #[tokio::test]
    async fn test_empty_domain_short_circuits() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let result = source.subdomains("").await;
        assert!(matches!(result, Err(SourceError::EmptyDomain)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_non_empty_domain_reaches_fetch() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
        };
        let hosts = source.subdomains("example.com").await.unwrap();
        assert_eq!(hosts, vec!["www.example.com"]);
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_categories() {
        assert_eq!(SourceError::EmptyDomain.category(), ErrorCategory::Input);
        assert_eq!(
            SourceError::Response { status: 500 }.category(),
            ErrorCategory::Protocol
        );
        assert_eq!(
            SourceError::Decode("eof".into()).category(),
            ErrorCategory::Protocol
        );
        assert_eq!(
            SourceError::Connection("refused".into()).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            SourceError::Query("syntax".into()).category(),
            ErrorCategory::Query
        );
        assert_eq!(
            SourceError::Credential("missing".into()).category(),
            ErrorCategory::Credential
        );
        assert_eq!(
            SourceError::Timeout("14 minutes".into()).category(),
            ErrorCategory::Transport
        );
        assert_eq!(
            SourceError::Timeout("14 minutes".into()).error_type(),
            "TimeoutError"
        );
    }

    #[test]
    fn test_response_error_display() {
        assert_eq!(
            SourceError::Response { status: 500 }.to_string(),
            "Invalid status code: 500"
        );
    }

    #[test]
    fn test_credential_error_conversion() {
        let err: SourceError = CredentialError::Missing.into();
        assert_eq!(err.error_type(), "CredentialError");
    }
}
