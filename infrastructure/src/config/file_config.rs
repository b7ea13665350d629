//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and use domain types where appropriate.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use subharvest_application::SourceTarget;
use subharvest_domain::{FailurePolicy, OutputFormat, SourceKind};
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("timeout_seconds cannot be 0")]
    InvalidTimeout,

    #[error("amass timeout_minutes cannot be 0")]
    InvalidEnumerationTimeout,

    #[error("unknown source in configuration: {0}")]
    UnknownSource(String),

    #[error("function name for {0} cannot be empty")]
    EmptyFunctionName(String),

    #[error("no sources enabled")]
    NoSourcesEnabled,
}

/// Raw `[sources]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileSourcesConfig {
    /// Source names to query when none are given on the command line
    pub enabled: Vec<String>,
    /// Remote function name overrides (source name -> function name)
    pub functions: HashMap<String, String>,
}

impl Default for FileSourcesConfig {
    fn default() -> Self {
        Self {
            enabled: SourceKind::default_enabled()
                .iter()
                .map(|k| k.as_str().to_string())
                .collect(),
            functions: HashMap::new(),
        }
    }
}

/// Raw `[behavior]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileBehaviorConfig {
    /// `fail_fast` or `best_effort`
    pub failure_policy: FailurePolicy,
    /// Per-source invocation timeout in seconds
    pub timeout_seconds: Option<u64>,
}

/// Raw `[aws]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAwsConfig {
    pub region: Option<String>,
    pub profile: Option<String>,
}

/// Raw `[crtsh]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCrtShConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
}

impl Default for FileCrtShConfig {
    fn default() -> Self {
        Self {
            host: "crt.sh".to_string(),
            port: 5432,
            user: "guest".to_string(),
            database: "certwatch".to_string(),
        }
    }
}

/// Raw `[amass]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileAmassConfig {
    /// Executable name or path
    pub binary: String,
    /// Maximum enumeration time in minutes
    pub timeout_minutes: u64,
    /// Allow active techniques (zone transfers, certificate grabs)
    pub active: bool,
    /// Seed for resolver ordering; random when unset
    pub seed: Option<u64>,
    /// DNS resolvers handed to the engine
    pub resolvers: Vec<String>,
}

impl Default for FileAmassConfig {
    fn default() -> Self {
        Self {
            binary: "amass".to_string(),
            timeout_minutes: 14,
            active: true,
            seed: None,
            resolvers: Vec::new(),
        }
    }
}

/// Raw `[http]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileHttpConfig {
    pub user_agent: String,
    pub alienvault_url: String,
    pub sublist3r_url: String,
    pub censys_url: String,
}

impl Default for FileHttpConfig {
    fn default() -> Self {
        Self {
            user_agent: concat!("subharvest/", env!("CARGO_PKG_VERSION")).to_string(),
            alienvault_url: "https://otx.alienvault.com".to_string(),
            sublist3r_url: "https://api.sublist3r.com".to_string(),
            censys_url: "https://www.censys.io".to_string(),
        }
    }
}

/// Raw `[censys]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileCensysConfig {
    /// Secrets store parameter holding `{"id": ..., "secret": ...}`
    pub api_key_path: Option<String>,
    /// Inline key pair, used instead of the secrets store when both are set
    pub api_id: Option<String>,
    pub api_secret: Option<String>,
}

impl FileCensysConfig {
    pub fn has_inline_key(&self) -> bool {
        self.api_id.is_some() && self.api_secret.is_some()
    }
}

/// Raw `[output]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    pub format: Option<OutputFormat>,
    /// Enable colored terminal output
    pub color: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
        }
    }
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub sources: FileSourcesConfig,
    pub behavior: FileBehaviorConfig,
    pub aws: FileAwsConfig,
    pub crtsh: FileCrtShConfig,
    pub amass: FileAmassConfig,
    pub http: FileHttpConfig,
    pub censys: FileCensysConfig,
    pub output: FileOutputConfig,
}

impl FileConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if let Some(0) = self.behavior.timeout_seconds {
            return Err(ConfigValidationError::InvalidTimeout);
        }

        if self.amass.timeout_minutes == 0 {
            return Err(ConfigValidationError::InvalidEnumerationTimeout);
        }

        if self.enabled_sources()?.is_empty() {
            return Err(ConfigValidationError::NoSourcesEnabled);
        }

        for (name, function) in &self.sources.functions {
            Self::parse_source(name)?;
            if function.trim().is_empty() {
                return Err(ConfigValidationError::EmptyFunctionName(name.clone()));
            }
        }

        Ok(())
    }

    /// Parse `[sources].enabled`, preserving order and dropping repeats
    pub fn enabled_sources(&self) -> Result<Vec<SourceKind>, ConfigValidationError> {
        let mut kinds = Vec::new();
        for name in &self.sources.enabled {
            let kind = Self::parse_source(name)?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        Ok(kinds)
    }

    /// Remote function name for a source, honouring overrides
    pub fn function_name(&self, kind: SourceKind) -> String {
        self.sources
            .functions
            .iter()
            .find(|(name, _)| Self::parse_source(name).ok() == Some(kind))
            .map(|(_, function)| function.clone())
            .unwrap_or_else(|| kind.default_function_name().to_string())
    }

    /// Build invocation targets for the given sources
    pub fn source_targets(&self, kinds: &[SourceKind]) -> Vec<SourceTarget> {
        kinds
            .iter()
            .map(|kind| SourceTarget::new(*kind, self.function_name(*kind)))
            .collect()
    }

    fn parse_source(name: &str) -> Result<SourceKind, ConfigValidationError> {
        name.parse()
            .map_err(|_| ConfigValidationError::UnknownSource(name.to_string()))
    }
}
