//! AlienVault OTX passive DNS source
//!
//! `GET /api/v1/indicators/domain/{domain}/passive_dns`, keeping every
//! recorded hostname that is not an IPv4 literal.

use super::http::{base_url, decode_json, ensure_success, request_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use subharvest_application::{SourceAdapter, SourceError};
use subharvest_domain::{DomainQuery, SourceKind, without_ipv4_literals};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://otx.alienvault.com";

#[derive(Debug, Deserialize)]
struct PassiveDnsResponse {
    passive_dns: Vec<PassiveDnsRecord>,
}

#[derive(Debug, Deserialize)]
struct PassiveDnsRecord {
    hostname: String,
}

pub struct AlienVaultSource {
    client: Client,
    base_url: String,
}

impl AlienVaultSource {
    pub fn new(client: Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url(url),
        }
    }
}

#[async_trait]
impl SourceAdapter for AlienVaultSource {
    fn kind(&self) -> SourceKind {
        SourceKind::AlienVault
    }

    async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError> {
        let url = format!(
            "{}/api/v1/indicators/domain/{}/passive_dns",
            self.base_url, query
        );
        debug!(%url, "Querying AlienVault passive DNS");

        let response = self.client.get(&url).send().await.map_err(request_error)?;
        let response = ensure_success(response)?;
        let body: PassiveDnsResponse = decode_json(response).await?;

        Ok(without_ipv4_literals(
            body.passive_dns.into_iter().map(|record| record.hostname),
        ))
    }
}
