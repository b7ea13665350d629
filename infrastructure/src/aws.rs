//! Shared AWS SDK configuration

use aws_config::SdkConfig;

/// Region and profile overrides for the AWS clients
#[derive(Debug, Clone, Default)]
pub struct AwsSettings {
    pub region: Option<String>,
    pub profile: Option<String>,
}

impl AwsSettings {
    pub fn new(region: Option<String>, profile: Option<String>) -> Self {
        Self { region, profile }
    }
}

/// Load SDK configuration, falling back to the default provider chain for
/// anything not overridden
pub async fn load_sdk_config(settings: &AwsSettings) -> SdkConfig {
    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());

    if let Some(ref region) = settings.region {
        loader = loader.region(aws_config::Region::new(region.clone()));
    }
    if let Some(ref profile) = settings.profile {
        loader = loader.profile_name(profile);
    }

    loader.load().await
}
