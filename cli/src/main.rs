//! CLI entrypoint for subharvest
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use subharvest_application::{
    AggregateInput, AggregateSubdomainsUseCase, ApiKey, BehaviorConfig, CredentialProvider,
    NoProgress, RemoteInvoker, SourceProgressNotifier,
};
use subharvest_domain::{AggregatedResult, DomainQuery, FailurePolicy, OutputFormat};
use subharvest_infrastructure::{
    ConfigLoader, FileConfig, LocalInvoker, SourceRegistry, StaticCredentialProvider,
};
use subharvest_presentation::{Cli, ConsoleFormatter, ProgressReporter};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let _log_guard = init_logging(&cli);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Initialize logging based on verbosity level.
///
/// Logs go to stderr (or `--log-file`) so stdout carries only results.
fn init_logging(cli: &Cli) -> Option<WorkerGuard> {
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let file = cli.log_file.as_deref().and_then(|path| {
        let name = path.file_name()?;
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        Some(tracing_appender::rolling::never(dir, name))
    });

    match file {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            builder.with_writer(writer).with_ansi(false).init();
            Some(guard)
        }
        None => {
            builder.with_writer(std::io::stderr).init();
            None
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let Some(domain) = cli.domain.as_deref().filter(|d| !d.trim().is_empty()) else {
        bail!("Missing domain argument");
    };
    let query = DomainQuery::try_new(domain)?;

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    }
    .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
    config.validate().context("Invalid configuration")?;

    info!("Starting subharvest");

    let kinds = if cli.sources.is_empty() {
        config.enabled_sources()?
    } else {
        cli.sources.clone()
    };
    let input = AggregateInput::new(query, config.source_targets(&kinds));

    let policy = if cli.best_effort {
        FailurePolicy::BestEffort
    } else {
        config.behavior.failure_policy
    };
    let behavior =
        BehaviorConfig::from_timeout_seconds(config.behavior.timeout_seconds).with_failure_policy(policy);

    let format: OutputFormat = cli
        .output
        .map(Into::into)
        .or(config.output.format)
        .unwrap_or_default();
    ConsoleFormatter::set_color(config.output.color);

    let progress: Box<dyn SourceProgressNotifier> = if cli.quiet || format == OutputFormat::Json {
        Box::new(NoProgress)
    } else {
        Box::new(ProgressReporter::new())
    };

    // === Dependency Injection ===
    let result = if cli.local {
        let registry = SourceRegistry::from_config(&config, credential_provider(&config).await)?;
        let invoker = LocalInvoker::from_registry(&registry, |kind| config.function_name(kind));
        aggregate(Arc::new(invoker), behavior, input, progress.as_ref()).await?
    } else {
        remote_aggregate(&cli, &config, behavior, input, progress.as_ref()).await?
    };

    if !cli.quiet && format == OutputFormat::Lines && result.failures().next().is_some() {
        eprint!("{}", ConsoleFormatter::format_summary(&result));
    }

    let output = match format {
        OutputFormat::Lines => ConsoleFormatter::format_lines(&result),
        OutputFormat::Json => ConsoleFormatter::format_json(&result),
    };
    println!("{}", output);

    Ok(())
}

async fn aggregate<I: RemoteInvoker + 'static>(
    invoker: Arc<I>,
    behavior: BehaviorConfig,
    input: AggregateInput,
    progress: &dyn SourceProgressNotifier,
) -> Result<AggregatedResult> {
    let use_case = AggregateSubdomainsUseCase::new(invoker).with_behavior(behavior);
    Ok(use_case.execute_with_progress(input, progress).await?)
}

#[cfg(feature = "aws")]
async fn remote_aggregate(
    cli: &Cli,
    config: &FileConfig,
    behavior: BehaviorConfig,
    input: AggregateInput,
    progress: &dyn SourceProgressNotifier,
) -> Result<AggregatedResult> {
    use subharvest_infrastructure::{AwsSettings, LambdaInvoker};

    let settings = AwsSettings::new(
        cli.region.clone().or_else(|| config.aws.region.clone()),
        config.aws.profile.clone(),
    );
    tracing::debug!(region = ?settings.region, "Invoking sources through Lambda");
    let invoker = LambdaInvoker::from_settings(&settings).await;
    aggregate(Arc::new(invoker), behavior, input, progress).await
}

#[cfg(not(feature = "aws"))]
async fn remote_aggregate(
    _cli: &Cli,
    _config: &FileConfig,
    _behavior: BehaviorConfig,
    _input: AggregateInput,
    _progress: &dyn SourceProgressNotifier,
) -> Result<AggregatedResult> {
    bail!("Remote invocation requires the `aws` feature; use --local to run sources in-process")
}

/// Inline keys win over the secrets store
#[cfg(feature = "aws")]
async fn credential_provider(config: &FileConfig) -> Arc<dyn CredentialProvider> {
    use subharvest_infrastructure::{AwsSettings, SsmCredentialProvider};

    if let Some(key) = inline_key(config) {
        return Arc::new(StaticCredentialProvider::new(key));
    }
    let settings = AwsSettings::new(config.aws.region.clone(), config.aws.profile.clone());
    Arc::new(SsmCredentialProvider::from_settings(&settings).await)
}

#[cfg(not(feature = "aws"))]
async fn credential_provider(config: &FileConfig) -> Arc<dyn CredentialProvider> {
    match inline_key(config) {
        Some(key) => Arc::new(StaticCredentialProvider::new(key)),
        None => Arc::new(StaticCredentialProvider::empty()),
    }
}

fn inline_key(config: &FileConfig) -> Option<ApiKey> {
    let censys = &config.censys;
    if !censys.has_inline_key() {
        return None;
    }
    Some(ApiKey::new(
        censys.api_id.clone().unwrap_or_default(),
        censys.api_secret.clone().unwrap_or_default(),
    ))
}
