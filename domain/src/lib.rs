//! Domain layer for subharvest
//!
//! This crate contains the value objects and wire types shared by every
//! other layer. It has no dependencies on infrastructure or presentation
//! concerns.
//!
//! # Core Concepts
//!
//! - **Source**: one external place hostnames come from (certificate
//!   transparency, passive DNS, search APIs, a local enumeration run)
//! - **Aggregation**: the case-sensitive set union of every source that
//!   answered without error
//! - **Envelope**: the JSON shapes exchanged with remotely invoked sources

pub mod aggregation;
pub mod config;
pub mod core;
pub mod envelope;
pub mod source;

// Re-export commonly used types
pub use aggregation::{AggregatedResult, SourceReport};
pub use config::{FailurePolicy, OutputFormat};
pub use core::{
    domain_query::DomainQuery,
    error::DomainError,
    hostname::{is_ipv4_literal, without_ipv4_literals},
};
pub use envelope::{FunctionErrorEnvelope, InvocationPayload, SubdomainsResponse};
pub use source::SourceKind;
