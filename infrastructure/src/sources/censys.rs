//! Censys certificate search source
//!
//! Pages through `POST /api/v1/search/certificates` with HTTP Basic
//! authentication, collecting subject alternative names and parsed names
//! from every result record.

use super::http::{base_url, decode_json, ensure_success, request_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use subharvest_application::{ApiKey, CredentialProvider, SourceAdapter, SourceError};
use subharvest_domain::{DomainQuery, SourceKind};
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://www.censys.io";

const SAN_FIELD: &str = "parsed.extensions.subject_alt_name.dns_names";
const NAMES_FIELD: &str = "parsed.names";

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
    metadata: SearchMetadata,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    #[serde(rename = "parsed.extensions.subject_alt_name.dns_names", default)]
    dns_names: Vec<String>,
    #[serde(rename = "parsed.names", default)]
    names: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchMetadata {
    pages: u32,
}

pub struct CensysSource {
    client: Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    api_key_path: String,
}

impl CensysSource {
    pub fn new(
        client: Client,
        credentials: Arc<dyn CredentialProvider>,
        api_key_path: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials,
            api_key_path: api_key_path.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = base_url(url);
        self
    }

    async fn api_key(&self) -> Result<ApiKey, SourceError> {
        let key = self.credentials.api_key(&self.api_key_path).await?;
        Ok(key.ensure_complete()?)
    }

    async fn search_page(
        &self,
        key: &ApiKey,
        query: &DomainQuery,
        page: u32,
    ) -> Result<SearchResponse, SourceError> {
        let url = format!("{}/api/v1/search/certificates", self.base_url);
        debug!(%url, page, "Querying Censys certificates");

        let response = self
            .client
            .post(&url)
            .basic_auth(&key.id, Some(&key.secret))
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&json!({
                "query": query.as_str(),
                "page": page,
                "fields": [NAMES_FIELD, SAN_FIELD],
                "flatten": true,
            }))
            .send()
            .await
            .map_err(request_error)?;

        decode_json(ensure_success(response)?).await
    }
}

#[async_trait]
impl SourceAdapter for CensysSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Censys
    }

    async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError> {
        let key = self.api_key().await?;

        let mut subdomains = Vec::new();
        let mut page = 1;
        loop {
            let response = match self.search_page(&key, query, page).await {
                Ok(response) => response,
                Err(e) => {
                    if !subdomains.is_empty() {
                        warn!(
                            page,
                            collected = subdomains.len(),
                            "Discarding partial Censys results"
                        );
                    }
                    return Err(e);
                }
            };

            for result in response.results {
                subdomains.extend(result.dns_names);
                subdomains.extend(result.names);
            }

            if page >= response.metadata.pages {
                break;
            }
            page += 1;
        }

        Ok(subdomains)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredentialProvider;
    use subharvest_application::CredentialError;
    use wiremock::matchers::{basic_auth, body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SEARCH_PATH: &str = "/api/v1/search/certificates";

    struct FailingCredentials;

    #[async_trait]
    impl CredentialProvider for FailingCredentials {
        async fn api_key(&self, path: &str) -> Result<ApiKey, CredentialError> {
            Err(CredentialError::Lookup(format!("parameter {} not found", path)))
        }
    }

    fn source(server: &MockServer, credentials: Arc<dyn CredentialProvider>) -> CensysSource {
        CensysSource::new(Client::new(), credentials, "/subharvest/censys")
            .with_base_url(server.uri())
    }

    fn valid_key() -> Arc<dyn CredentialProvider> {
        Arc::new(StaticCredentialProvider::new(ApiKey::new("uid", "s3cret")))
    }

    fn page_body(pages: u32, names: &[&str], sans: &[&str]) -> serde_json::Value {
        json!({
            "status": "ok",
            "results": [{ NAMES_FIELD: names, SAN_FIELD: sans }],
            "metadata": { "pages": pages, "page": 1, "count": names.len() }
        })
    }

    #[tokio::test]
    async fn single_page_issues_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(basic_auth("uid", "s3cret"))
            .and(header("accept", "application/json"))
            .and(body_partial_json(json!({"query": "example.com", "page": 1, "flatten": true})))
            .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
                1,
                &["example.com", "www.example.com"],
                &["api.example.com"],
            )))
            .expect(1)
            .mount(&server)
            .await;

        let hosts = source(&server, valid_key())
            .subdomains("example.com")
            .await
            .unwrap();
        assert_eq!(hosts, vec!["api.example.com", "example.com", "www.example.com"]);
    }

    #[tokio::test]
    async fn follows_pages_until_last() {
        let server = MockServer::start().await;
        for page in 1..=3u32 {
            let host = format!("p{}.example.com", page);
            Mock::given(method("POST"))
                .and(path(SEARCH_PATH))
                .and(body_partial_json(json!({ "page": page })))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(page_body(3, &[host.as_str()], &[])),
                )
                .expect(1)
                .mount(&server)
                .await;
        }

        let hosts = source(&server, valid_key())
            .subdomains("example.com")
            .await
            .unwrap();
        assert_eq!(
            hosts,
            vec!["p1.example.com", "p2.example.com", "p3.example.com"]
        );
    }

    #[tokio::test]
    async fn zero_pages_stops_after_first_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "metadata": { "pages": 0 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let hosts = source(&server, valid_key())
            .subdomains("example.com")
            .await
            .unwrap();
        assert!(hosts.is_empty());
    }

    #[tokio::test]
    async fn mid_loop_failure_fails_the_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(body_partial_json(json!({ "page": 1 })))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(page_body(2, &["a.example.com"], &[])),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .and(body_partial_json(json!({ "page": 2 })))
            .respond_with(ResponseTemplate::new(429))
            .expect(1)
            .mount(&server)
            .await;

        let err = source(&server, valid_key())
            .subdomains("example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Response { status: 429 }));
    }

    #[tokio::test]
    async fn malformed_page_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
            .mount(&server)
            .await;

        let err = source(&server, valid_key())
            .subdomains("example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Decode(_)));
    }

    #[tokio::test]
    async fn credential_lookup_failure_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = source(&server, Arc::new(FailingCredentials))
            .subdomains("example.com")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Credential(ref m) if m.contains("/subharvest/censys")));
    }

    #[tokio::test]
    async fn incomplete_key_is_credential_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let credentials = Arc::new(StaticCredentialProvider::new(ApiKey::new("uid", "")));
        let err = source(&server, credentials)
            .subdomains("example.com")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Credential error: No API key provided");
    }

    #[tokio::test]
    async fn empty_domain_skips_credentials_and_requests() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let err = source(&server, Arc::new(FailingCredentials))
            .subdomains("")
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::EmptyDomain));
    }
}
