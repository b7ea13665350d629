//! Output format value object

use serde::{Deserialize, Serialize};

/// Output format for aggregated results
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One hostname per line (default)
    #[default]
    Lines,
    /// JSON document with hostnames and per-source reports
    Json,
}
