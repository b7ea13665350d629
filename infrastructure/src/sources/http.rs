//! Shared HTTP plumbing for the intelligence API sources

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use subharvest_application::SourceError;

/// Build the HTTP client shared by every API source
pub fn build_client(user_agent: &str) -> Result<Client, SourceError> {
    Client::builder()
        .user_agent(user_agent)
        .build()
        .map_err(|e| SourceError::Request(format!("failed to build HTTP client: {}", e)))
}

/// Trim a configured base URL so paths can be appended with `/`
pub fn base_url(url: impl Into<String>) -> String {
    url.into().trim_end_matches('/').to_string()
}

/// Fail with [`SourceError::Response`] unless the status is a success
pub fn ensure_success(response: Response) -> Result<Response, SourceError> {
    let status = response.status();
    if !status.is_success() {
        return Err(SourceError::Response {
            status: status.as_u16(),
        });
    }
    Ok(response)
}

/// Decode a JSON body, mapping failures to [`SourceError::Decode`]
pub async fn decode_json<T: DeserializeOwned>(response: Response) -> Result<T, SourceError> {
    let body = response
        .bytes()
        .await
        .map_err(|e| SourceError::Request(format!("failed to read response body: {}", e)))?;
    serde_json::from_slice(&body).map_err(|e| SourceError::Decode(e.to_string()))
}

pub fn request_error(e: reqwest::Error) -> SourceError {
    SourceError::Request(e.to_string())
}
