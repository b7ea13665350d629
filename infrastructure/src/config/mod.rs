//! Configuration file loading for subharvest
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`SUBHARVEST_SECTION__KEY`, `API_KEY_PATH`, ...)
//! 2. `--config <path>` specified file
//! 3. Project root: `./subharvest.toml` or `./.subharvest.toml`
//! 4. Global: `$XDG_CONFIG_HOME/subharvest/config.toml`
//! 5. Default values

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileAmassConfig, FileAwsConfig, FileBehaviorConfig, FileCensysConfig,
    FileConfig, FileCrtShConfig, FileHttpConfig, FileOutputConfig, FileSourcesConfig,
};
pub use loader::ConfigLoader;
