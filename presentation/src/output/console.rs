//! Console output formatter for aggregation results

use colored::Colorize;
use subharvest_domain::AggregatedResult;

/// Printed instead of a hostname list when the union is empty
pub const NO_SUBDOMAINS_MESSAGE: &str = "There were no subdomains";

/// Formats aggregation results for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Force colored output on or off for the rest of the process
    pub fn set_color(enabled: bool) {
        colored::control::set_override(enabled);
    }

    /// One hostname per line in lexical order
    pub fn format_lines(result: &AggregatedResult) -> String {
        if result.is_empty() {
            return NO_SUBDOMAINS_MESSAGE.to_string();
        }
        result
            .subdomains
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Format as JSON
    pub fn format_json(result: &AggregatedResult) -> String {
        serde_json::to_string_pretty(result).unwrap_or_else(|_| "{}".to_string())
    }

    /// Per-source summary, meant for stderr
    pub fn format_summary(result: &AggregatedResult) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "{} {}\n",
            "Domain:".cyan().bold(),
            result.domain
        ));

        for report in &result.sources {
            match &report.error {
                None => output.push_str(&format!(
                    "  {} {:<10} {} returned\n",
                    "v".green(),
                    report.source.as_str(),
                    report.returned
                )),
                Some(error) => output.push_str(&format!(
                    "  {} {:<10} {}\n",
                    "x".red(),
                    report.source.as_str(),
                    error.dimmed()
                )),
            }
        }

        let elapsed = result
            .finished_at
            .map(|end| (end - result.started_at).num_milliseconds() as f64 / 1000.0);
        match elapsed {
            Some(seconds) => output.push_str(&format!(
                "{} {} unique in {:.1}s\n",
                "Total:".cyan().bold(),
                result.len(),
                seconds
            )),
            None => output.push_str(&format!(
                "{} {} unique\n",
                "Total:".cyan().bold(),
                result.len()
            )),
        }

        output
    }
}
