//! Source handler use case
//!
//! The entry point of a source running as a remote function: decode the
//! invocation payload, run the adapter, encode the answer.

use crate::ports::remote_invoker::InvocationOutput;
use crate::ports::source_adapter::{SourceAdapter, SourceError};
use std::sync::Arc;
use subharvest_domain::{FunctionErrorEnvelope, InvocationPayload, SourceKind, SubdomainsResponse};
use tracing::{info, warn};

/// Marker set on [`InvocationOutput::function_error`] for handled failures
pub const FUNCTION_ERROR_MARKER: &str = "Handled";

/// Wraps one [`SourceAdapter`] behind the remote function wire contract
#[derive(Clone)]
pub struct SourceHandler {
    adapter: Arc<dyn SourceAdapter>,
}

impl SourceHandler {
    pub fn new(adapter: Arc<dyn SourceAdapter>) -> Self {
        Self { adapter }
    }

    pub fn kind(&self) -> SourceKind {
        self.adapter.kind()
    }

    /// Handle one invocation.
    ///
    /// Never fails: every error is turned into an `errorMessage`/`errorType`
    /// envelope with the function-error marker set.
    pub async fn handle(&self, payload: &[u8]) -> InvocationOutput {
        let request: InvocationPayload = match serde_json::from_slice(payload) {
            Ok(request) => request,
            Err(e) => {
                warn!(source = %self.kind(), "Rejecting malformed payload: {}", e);
                return Self::failure(&SourceError::Decode(format!("invalid event payload: {}", e)));
            }
        };

        match self.adapter.subdomains(&request.domain).await {
            Ok(subdomains) => {
                info!(
                    source = %self.kind(),
                    domain = %request.domain,
                    returned = subdomains.len(),
                    "Source lookup complete"
                );
                let body = serde_json::to_vec(&SubdomainsResponse::new(subdomains))
                    .unwrap_or_else(|_| b"{}".to_vec());
                InvocationOutput::success(body)
            }
            Err(e) => {
                warn!(
                    source = %self.kind(),
                    domain = %request.domain,
                    category = ?e.category(),
                    "Source lookup failed: {}",
                    e
                );
                Self::failure(&e)
            }
        }
    }

    fn failure(error: &SourceError) -> InvocationOutput {
        let envelope = FunctionErrorEnvelope::new(error.error_type(), error.to_string());
        let body = serde_json::to_vec(&envelope).unwrap_or_else(|_| b"{}".to_vec());
        InvocationOutput::function_error(FUNCTION_ERROR_MARKER, body)
    }
}

impl std::fmt::Debug for SourceHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceHandler")
            .field("kind", &self.kind())
            .finish()
    }
}
