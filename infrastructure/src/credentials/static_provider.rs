use async_trait::async_trait;
use subharvest_application::{ApiKey, CredentialError, CredentialProvider};
use tracing::debug;

/// Returns the same key pair for every path
///
/// Used when the key is supplied inline in configuration and in tests.
#[derive(Debug, Clone)]
pub struct StaticCredentialProvider {
    key: Option<ApiKey>,
}

impl StaticCredentialProvider {
    pub fn new(key: ApiKey) -> Self {
        Self { key: Some(key) }
    }

    /// Provider that reports every lookup as missing
    pub fn empty() -> Self {
        Self { key: None }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn api_key(&self, path: &str) -> Result<ApiKey, CredentialError> {
        debug!(path, "Using inline API key");
        self.key.clone().ok_or(CredentialError::Missing)
    }
}
