use crate::aws::{AwsSettings, load_sdk_config};
use async_trait::async_trait;
use aws_sdk_ssm::Client as SsmClient;
use aws_sdk_ssm::error::DisplayErrorContext;
use subharvest_application::{ApiKey, CredentialError, CredentialProvider};
use tracing::debug;

/// Reads key pairs from AWS Systems Manager Parameter Store
///
/// The parameter value is the JSON document `{"id": ..., "secret": ...}`.
/// Parameters are read without decryption.
#[derive(Clone)]
pub struct SsmCredentialProvider {
    client: SsmClient,
}

impl SsmCredentialProvider {
    pub fn new(client: SsmClient) -> Self {
        Self { client }
    }

    pub async fn from_settings(settings: &AwsSettings) -> Self {
        let config = load_sdk_config(settings).await;
        Self::new(SsmClient::new(&config))
    }
}

#[async_trait]
impl CredentialProvider for SsmCredentialProvider {
    async fn api_key(&self, path: &str) -> Result<ApiKey, CredentialError> {
        if path.is_empty() {
            return Err(CredentialError::Lookup(
                "no parameter path configured".to_string(),
            ));
        }

        debug!(path, "Fetching API key from parameter store");
        let output = self
            .client
            .get_parameter()
            .name(path)
            .with_decryption(false)
            .send()
            .await
            .map_err(|e| CredentialError::Lookup(format!("{}: {}", path, DisplayErrorContext(&e))))?;

        let value = output
            .parameter()
            .and_then(|p| p.value())
            .ok_or_else(|| CredentialError::Lookup(format!("{}: parameter has no value", path)))?;

        ApiKey::from_json(value)
    }
}
