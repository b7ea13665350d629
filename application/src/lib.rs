//! Application layer for subharvest
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::BehaviorConfig;
pub use ports::{
    credential_provider::{ApiKey, CredentialError, CredentialProvider},
    progress::{NoProgress, SourceProgressNotifier},
    remote_invoker::{InvocationOutput, InvokeError, RemoteInvoker},
    source_adapter::{ErrorCategory, SourceAdapter, SourceError},
};
pub use use_cases::aggregate_subdomains::{
    AggregateError, AggregateInput, AggregateSubdomainsUseCase, SourceTarget, decode_output,
};
pub use use_cases::handle_source::{FUNCTION_ERROR_MARKER, SourceHandler};
