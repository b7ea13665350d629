//! Aggregation value objects
//!
//! - [`AggregatedResult`] - the merged, deduplicated hostnames of one run
//! - [`SourceReport`] - how a single source fared during that run

use crate::core::domain_query::DomainQuery;
use crate::source::SourceKind;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Outcome of one source during an aggregation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceReport {
    pub source: SourceKind,
    /// Hostnames the source returned, duplicates included
    pub returned: usize,
    /// Error message if the source failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SourceReport {
    pub fn success(source: SourceKind, returned: usize) -> Self {
        Self {
            source,
            returned,
            error: None,
        }
    }

    pub fn failure(source: SourceKind, error: impl Into<String>) -> Self {
        Self {
            source,
            returned: 0,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Union of every hostname list returned without error during one run.
///
/// Membership is case-sensitive. Iteration order is lexical, which callers
/// must not rely on beyond display stability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub domain: DomainQuery,
    pub subdomains: BTreeSet<String>,
    pub sources: Vec<SourceReport>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl AggregatedResult {
    pub fn new(domain: DomainQuery) -> Self {
        Self {
            domain,
            subdomains: BTreeSet::new(),
            sources: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Merge one source's hostnames into the set and record its report.
    pub fn merge<I>(&mut self, source: SourceKind, hostnames: I)
    where
        I: IntoIterator<Item = String>,
    {
        let mut returned = 0;
        for host in hostnames {
            returned += 1;
            self.subdomains.insert(host);
        }
        self.sources.push(SourceReport::success(source, returned));
    }

    /// Record a failed source without touching the hostname set.
    pub fn record_failure(&mut self, source: SourceKind, error: impl Into<String>) {
        self.sources.push(SourceReport::failure(source, error));
    }

    pub fn finish(mut self) -> Self {
        self.finished_at = Some(Utc::now());
        self.sources.sort_by_key(|r| r.source);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.subdomains.is_empty()
    }

    pub fn len(&self) -> usize {
        self.subdomains.len()
    }

    pub fn failures(&self) -> impl Iterator<Item = &SourceReport> {
        self.sources.iter().filter(|r| !r.is_success())
    }
}
