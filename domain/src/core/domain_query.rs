//! DomainQuery value object

use super::error::DomainError;
use serde::{Deserialize, Serialize};

/// A domain whose subdomains should be enumerated (Value Object)
///
/// The only invariant is non-emptiness. Anything beyond that (label syntax,
/// public suffix rules) is left to the sources, which reject what they
/// cannot resolve.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DomainQuery {
    domain: String,
}

impl DomainQuery {
    /// Try to create a new query, failing on empty or whitespace-only input
    pub fn try_new(domain: impl Into<String>) -> Result<Self, DomainError> {
        let domain = domain.into();
        let trimmed = domain.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyDomain);
        }
        Ok(Self {
            domain: trimmed.to_string(),
        })
    }

    /// Get the domain name
    pub fn as_str(&self) -> &str {
        &self.domain
    }
}

impl std::fmt::Display for DomainQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.domain)
    }
}

impl TryFrom<String> for DomainQuery {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl TryFrom<&str> for DomainQuery {
    type Error = DomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<DomainQuery> for String {
    fn from(query: DomainQuery) -> Self {
        query.domain
    }
}
