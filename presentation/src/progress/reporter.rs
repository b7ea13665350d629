//! Progress reporting for aggregation runs

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::Mutex;
use subharvest_application::SourceProgressNotifier;
use subharvest_domain::{DomainQuery, SourceKind};

/// Reports progress with a single bar that advances as sources finish
pub struct ProgressReporter {
    bar: Mutex<Option<ProgressBar>>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        Self {
            bar: Mutex::new(None),
        }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl SourceProgressNotifier for ProgressReporter {
    fn on_run_start(&self, domain: &DomainQuery, total_sources: usize) {
        let pb = ProgressBar::with_draw_target(
            Some(total_sources as u64),
            ProgressDrawTarget::stderr(),
        );
        pb.set_style(Self::style());
        pb.set_prefix(domain.to_string());
        pb.set_message("Querying sources...");

        if let Ok(mut bar) = self.bar.lock() {
            *bar = Some(pb);
        }
    }

    fn on_source_complete(&self, source: SourceKind, success: bool, returned: usize) {
        if let Ok(bar) = self.bar.lock()
            && let Some(pb) = bar.as_ref()
        {
            let status = if success {
                format!("{} {} ({})", "v".green(), source, returned)
            } else {
                format!("{} {}", "x".red(), source)
            };
            pb.set_message(status);
            pb.inc(1);
        }
    }

    fn on_run_complete(&self, unique: usize) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.finish_and_clear();
            eprintln!("{} {} unique subdomains", "Done:".green().bold(), unique);
        }
    }

    fn on_run_failed(&self) {
        if let Ok(mut bar) = self.bar.lock()
            && let Some(pb) = bar.take()
        {
            pb.abandon_with_message(format!("{}", "failed".red()));
        }
    }
}
