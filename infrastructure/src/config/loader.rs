//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::PathBuf;

const PROJECT_FILES: [&str; 2] = ["subharvest.toml", ".subharvest.toml"];

/// Unprefixed variables read for the Censys source (variable, config key)
const CENSYS_ENV: [(&str, &str); 3] = [
    ("API_KEY_PATH", "censys.api_key_path"),
    ("CENSYS_API_ID", "censys.api_id"),
    ("CENSYS_API_SECRET", "censys.api_secret"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. `SUBHARVEST_*` environment variables (`__` separates sections),
    ///    plus `API_KEY_PATH`, `CENSYS_API_ID` and `CENSYS_API_SECRET`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./subharvest.toml` or `./.subharvest.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/subharvest/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Load only default configuration (for --no-config).
    ///
    /// Environment variables still apply so credentials can be supplied
    /// without a file.
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        let figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));
        Self::with_env(figment).extract().map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        let figment = figment.merge(Env::prefixed("SUBHARVEST_").split("__"));
        Self::with_censys_env(figment, |name| std::env::var(name).ok())
    }

    /// Merge the Censys variables as plain strings so digit-only ids and
    /// secrets are not parsed as numbers
    fn with_censys_env(mut figment: Figment, lookup: impl Fn(&str) -> Option<String>) -> Figment {
        for (var, key) in CENSYS_ENV {
            if let Some(value) = lookup(var) {
                figment = figment.merge(Serialized::default(key, value));
            }
        }
        figment
    }

    /// Get the global config file path
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("subharvest").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources() {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] SUBHARVEST_* / API_KEY_PATH / CENSYS_API_ID / CENSYS_API_SECRET");

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./subharvest.toml or ./.subharvest.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}
