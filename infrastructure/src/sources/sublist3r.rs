//! Sublist3r search source
//!
//! The API answers with a bare JSON array of hostnames.

use super::http::{base_url, decode_json, request_error};
use async_trait::async_trait;
use reqwest::Client;
use subharvest_application::{SourceAdapter, SourceError};
use subharvest_domain::{DomainQuery, SourceKind};
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.sublist3r.com";

pub struct Sublist3rSource {
    client: Client,
    base_url: String,
}

impl Sublist3rSource {
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
impl SourceAdapter for Sublist3rSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Sublist3r
    }

    async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError> {
        let url = format!("{}/search.php", self.base_url);
        debug!(%url, domain = %query, "Querying Sublist3r");

        let response = self
            .client
            .get(&url)
            .query(&[("domain", query.as_str())])
            .send()
            .await
            .map_err(request_error)?;

        // No status check: error pages fail to decode as an array.
        let hosts: Option<Vec<String>> = decode_json(response).await?;
        Ok(hosts.unwrap_or_default())
    }
}
