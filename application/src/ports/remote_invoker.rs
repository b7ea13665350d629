//! Remote invoker port
//!
//! Defines how the orchestrator calls a source that runs as an isolated
//! function, addressed by name.

use async_trait::async_trait;
use thiserror::Error;

/// Errors raised while calling a remote function (transport level)
#[derive(Error, Debug)]
pub enum InvokeError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Invocation timed out")]
    Timeout,
}

/// Raw result of a remote invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutput {
    /// Response body as returned by the function
    pub payload: Vec<u8>,
    /// Set when the function itself reported a failure. The payload then
    /// holds an `errorMessage`/`errorType` envelope.
    pub function_error: Option<String>,
}

impl InvocationOutput {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            payload,
            function_error: None,
        }
    }

    pub fn function_error(marker: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            payload,
            function_error: Some(marker.into()),
        }
    }

    pub fn is_function_error(&self) -> bool {
        self.function_error.is_some()
    }
}

/// Calls remote functions by name
#[async_trait]
pub trait RemoteInvoker: Send + Sync {
    /// Invoke `function_name` synchronously with a JSON `payload`
    async fn invoke(
        &self,
        function_name: &str,
        payload: Vec<u8>,
    ) -> Result<InvocationOutput, InvokeError>;
}
