//! Credential provider port
//!
//! Abstracts the secrets store that holds API key pairs for authenticated
//! sources.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur while fetching credentials
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Secret lookup failed: {0}")]
    Lookup(String),

    #[error("Malformed API key: {0}")]
    Malformed(String),

    #[error("No API key provided")]
    Missing,
}

/// An API key pair stored as `{"id": "...", "secret": "..."}`
#[derive(Clone, Default, Deserialize)]
pub struct ApiKey {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub secret: String,
}

impl ApiKey {
    pub fn new(id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            secret: secret.into(),
        }
    }

    /// Parse the JSON document stored in the secrets service
    pub fn from_json(value: &str) -> Result<Self, CredentialError> {
        serde_json::from_str(value).map_err(|e| CredentialError::Malformed(e.to_string()))
    }

    /// Reject key pairs with an empty half
    pub fn ensure_complete(self) -> Result<Self, CredentialError> {
        if self.id.is_empty() || self.secret.is_empty() {
            return Err(CredentialError::Missing);
        }
        Ok(self)
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKey")
            .field("id", &self.id)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Source of API credentials
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Fetch the key pair stored under `path`
    async fn api_key(&self, path: &str) -> Result<ApiKey, CredentialError>;
}
