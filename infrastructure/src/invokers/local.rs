use crate::sources::SourceRegistry;
use async_trait::async_trait;
use std::collections::HashMap;
use subharvest_application::{InvocationOutput, InvokeError, RemoteInvoker, SourceHandler};
use subharvest_domain::SourceKind;
use tracing::debug;

/// Dispatches invocations to in-process [`SourceHandler`]s by function name
///
/// Handlers see exactly the bytes a remote function would, so the wire
/// contract is exercised end to end without a deployment.
#[derive(Debug, Default, Clone)]
pub struct LocalInvoker {
    handlers: HashMap<String, SourceHandler>,
}

impl LocalInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every adapter in `registry` under the name `function_name` gives it
    pub fn from_registry(
        registry: &SourceRegistry,
        function_name: impl Fn(SourceKind) -> String,
    ) -> Self {
        registry.iter().fold(Self::new(), |invoker, (kind, adapter)| {
            invoker.with_handler(function_name(kind), SourceHandler::new(adapter.clone()))
        })
    }

    pub fn with_handler(mut self, function_name: impl Into<String>, handler: SourceHandler) -> Self {
        self.handlers.insert(function_name.into(), handler);
        self
    }

    pub fn function_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

#[async_trait]
impl RemoteInvoker for LocalInvoker {
    async fn invoke(
        &self,
        function_name: &str,
        payload: Vec<u8>,
    ) -> Result<InvocationOutput, InvokeError> {
        let handler = self
            .handlers
            .get(function_name)
            .ok_or_else(|| InvokeError::UnknownFunction(function_name.to_string()))?;

        debug!(function = function_name, "Invoking handler in-process");
        Ok(handler.handle(&payload).await)
    }
}
