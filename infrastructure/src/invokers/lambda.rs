use crate::aws::{AwsSettings, load_sdk_config};
use async_trait::async_trait;
use aws_sdk_lambda::Client as LambdaClient;
use aws_sdk_lambda::error::DisplayErrorContext;
use aws_sdk_lambda::primitives::Blob;
use aws_sdk_lambda::types::InvocationType;
use subharvest_application::{InvocationOutput, InvokeError, RemoteInvoker};
use tracing::debug;

/// Invokes deployed source functions synchronously through AWS Lambda
#[derive(Clone)]
pub struct LambdaInvoker {
    client: LambdaClient,
}

impl LambdaInvoker {
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }

    pub async fn from_settings(settings: &AwsSettings) -> Self {
        let config = load_sdk_config(settings).await;
        Self::new(LambdaClient::new(&config))
    }
}

#[async_trait]
impl RemoteInvoker for LambdaInvoker {
    async fn invoke(
        &self,
        function_name: &str,
        payload: Vec<u8>,
    ) -> Result<InvocationOutput, InvokeError> {
        debug!(function = function_name, "Invoking Lambda function");

        let output = self
            .client
            .invoke()
            .function_name(function_name)
            .invocation_type(InvocationType::RequestResponse)
            .payload(Blob::new(payload))
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_resource_not_found_exception());
                if not_found {
                    InvokeError::UnknownFunction(function_name.to_string())
                } else {
                    InvokeError::Transport(DisplayErrorContext(&e).to_string())
                }
            })?;

        let body = output
            .payload()
            .map(|blob| blob.as_ref().to_vec())
            .unwrap_or_default();

        Ok(match output.function_error() {
            Some(marker) => InvocationOutput::function_error(marker, body),
            None => InvocationOutput::success(body),
        })
    }
}
