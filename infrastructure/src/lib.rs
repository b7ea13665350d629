//! Infrastructure layer for subharvest
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the five source adapters, the remote
//! invokers, credential providers and configuration file loading.

#[cfg(feature = "aws")]
pub mod aws;
pub mod config;
pub mod credentials;
pub mod invokers;
pub mod sources;

// Re-export commonly used types
#[cfg(feature = "aws")]
pub use aws::AwsSettings;
pub use config::{
    ConfigLoader, ConfigValidationError, FileAmassConfig, FileAwsConfig, FileBehaviorConfig,
    FileCensysConfig, FileConfig, FileCrtShConfig, FileHttpConfig, FileOutputConfig,
    FileSourcesConfig,
};
#[cfg(feature = "aws")]
pub use credentials::SsmCredentialProvider;
pub use credentials::StaticCredentialProvider;
#[cfg(feature = "aws")]
pub use invokers::LambdaInvoker;
pub use invokers::LocalInvoker;
pub use sources::SourceRegistry;
