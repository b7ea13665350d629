//! Local enumeration source backed by the amass engine

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;
use subharvest_application::{SourceAdapter, SourceError};
use subharvest_domain::{DomainQuery, SourceKind};
use tokio::process::Command;
use tracing::{debug, info};

pub const DEFAULT_TIMEOUT_MINUTES: u64 = 14;

/// Grace period on top of the engine's own deadline before the child is killed
const DEADLINE_GRACE: Duration = Duration::from_secs(60);

/// Parameters for a single enumeration run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumerationConfig {
    pub domain: String,
    pub active: bool,
    pub timeout_minutes: u64,
    /// Seed for resolver ordering; `None` draws from the OS
    pub seed: Option<u64>,
    pub resolvers: Vec<String>,
}

impl EnumerationConfig {
    pub fn for_domain(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            active: true,
            timeout_minutes: DEFAULT_TIMEOUT_MINUTES,
            seed: None,
            resolvers: Vec::new(),
        }
    }

    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_resolvers(mut self, resolvers: Vec<String>) -> Self {
        self.resolvers = resolvers;
        self
    }

    pub fn with_timeout_minutes(mut self, minutes: u64) -> Self {
        self.timeout_minutes = minutes;
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    /// Resolvers in the order handed to the engine
    pub fn ordered_resolvers(&self) -> Vec<String> {
        let mut resolvers = self.resolvers.clone();
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        resolvers.shuffle(&mut rng);
        resolvers
    }
}

/// Runs an enumeration to completion
#[async_trait]
pub trait EnumerationEngine: Send + Sync {
    async fn enumerate(&self, config: &EnumerationConfig) -> Result<Vec<String>, SourceError>;
}

/// [`EnumerationEngine`] that drives the `amass enum` command
#[derive(Debug, Clone)]
pub struct AmassCliEngine {
    binary: String,
}

impl AmassCliEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command_args(config: &EnumerationConfig) -> Vec<String> {
        let mut args = vec![
            "enum".to_string(),
            "-nocolor".to_string(),
            "-d".to_string(),
            config.domain.clone(),
            "-timeout".to_string(),
            config.timeout_minutes.to_string(),
        ];
        if config.active {
            args.push("-active".to_string());
        }
        let resolvers = config.ordered_resolvers();
        if !resolvers.is_empty() {
            args.push("-r".to_string());
            args.push(resolvers.join(","));
        }
        args
    }
}

impl Default for AmassCliEngine {
    fn default() -> Self {
        Self::new("amass")
    }
}

#[async_trait]
impl EnumerationEngine for AmassCliEngine {
    async fn enumerate(&self, config: &EnumerationConfig) -> Result<Vec<String>, SourceError> {
        let binary = which::which(&self.binary).map_err(|e| {
            SourceError::Initialization(format!("{} not found: {}", self.binary, e))
        })?;

        let args = Self::command_args(config);
        info!(binary = %binary.display(), domain = %config.domain, "Starting enumeration");
        debug!(?args, "Enumeration arguments");

        let child = Command::new(&binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| SourceError::Initialization(format!("failed to start {}: {}", self.binary, e)))?;

        let output = tokio::time::timeout(engine_deadline(config), child.wait_with_output())
            .await
            .map_err(|_| {
                SourceError::Timeout(format!(
                    "enumeration exceeded {} minutes",
                    config.timeout_minutes
                ))
            })?
            .map_err(|e| SourceError::Initialization(format!("failed to read engine output: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SourceError::Initialization(format!(
                "{} exited with {}: {}",
                self.binary,
                output.status,
                stderr.trim()
            )));
        }

        Ok(parse_names(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// How long to wait for the engine before killing it
fn engine_deadline(config: &EnumerationConfig) -> Duration {
    Duration::from_secs(config.timeout_minutes.saturating_mul(60)).saturating_add(DEADLINE_GRACE)
}

/// One discovered name per line; extra columns after the name are dropped
fn parse_names(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .map(str::to_string)
        .collect()
}

pub struct AmassSource {
    engine: Arc<dyn EnumerationEngine>,
    template: EnumerationConfig,
}

impl AmassSource {
    pub fn new(engine: Arc<dyn EnumerationEngine>) -> Self {
        Self {
            engine,
            template: EnumerationConfig::for_domain(""),
        }
    }

    /// Settings applied to every run; the domain is replaced per call
    pub fn with_template(mut self, template: EnumerationConfig) -> Self {
        self.template = template;
        self
    }
}

#[async_trait]
impl SourceAdapter for AmassSource {
    fn kind(&self) -> SourceKind {
        SourceKind::Amass
    }

    async fn fetch(&self, query: &DomainQuery) -> Result<Vec<String>, SourceError> {
        let config = EnumerationConfig {
            domain: query.as_str().to_string(),
            ..self.template.clone()
        };
        let names = self.engine.enumerate(&config).await?;
        debug!(domain = %query, found = names.len(), "Enumeration finished");
        Ok(names)
    }
}
