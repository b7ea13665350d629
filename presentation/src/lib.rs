//! Presentation layer for subharvest
//!
//! This crate contains the CLI definition, output formatters
//! and progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::{ConsoleFormatter, NO_SUBDOMAINS_MESSAGE};
pub use progress::reporter::ProgressReporter;
