//! CLI command definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use subharvest_domain::SourceKind;

/// Output format for aggregated results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One hostname per line
    Lines,
    /// JSON document with per-source reports
    Json,
}

impl From<OutputFormat> for subharvest_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Lines => subharvest_domain::OutputFormat::Lines,
            OutputFormat::Json => subharvest_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for subharvest
#[derive(Parser, Debug)]
#[command(name = "subharvest")]
#[command(author, version, about = "Gather subdomains of a domain from several sources")]
#[command(long_about = r#"
subharvest asks several subdomain sources about a domain at once and prints
the union of their answers.

Sources:
  crtsh      certificate transparency database (crt.sh)
  amass      local enumeration engine (off by default)
  alienvault AlienVault OTX passive DNS
  sublist3r  Sublist3r search API
  censys     Censys certificate search (needs an API key)

Each source runs as a remote function. Use --local to run them in-process.

Configuration files are loaded from (in priority order):
1. --config <path>     Explicit config file
2. ./subharvest.toml   Project-level config
3. ~/.config/subharvest/config.toml   Global config

Example:
  subharvest example.com
  subharvest -s crtsh -s alienvault --region eu-west-1 example.com
  subharvest --local --best-effort -o json example.com
"#)]
pub struct Cli {
    /// Domain to enumerate
    pub domain: Option<String>,

    /// AWS region the source functions are deployed in
    #[arg(long, value_name = "REGION")]
    pub region: Option<String>,

    /// Sources to query (can be specified multiple times)
    #[arg(short, long = "source", value_name = "SOURCE", value_parser = parse_source)]
    pub sources: Vec<SourceKind>,

    /// Run source handlers in-process instead of invoking remote functions
    #[arg(long)]
    pub local: bool,

    /// Keep going when a source fails and report what the others found
    #[arg(long)]
    pub best_effort: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Write logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

fn parse_source(value: &str) -> Result<SourceKind, String> {
    value.parse().map_err(|e: subharvest_domain::DomainError| e.to_string())
}
