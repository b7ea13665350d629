//! Credential provider implementations

mod static_provider;
#[cfg(feature = "aws")]
mod ssm;

pub use static_provider::StaticCredentialProvider;
#[cfg(feature = "aws")]
pub use ssm::SsmCredentialProvider;
