//! Core domain concepts shared across all subdomains.
//!
//! - [`domain_query::DomainQuery`] - a validated domain to enumerate
//! - [`hostname`] - helpers for classifying hostnames returned by sources
//! - [`error::DomainError`] - domain-level errors

pub mod domain_query;
pub mod error;
pub mod hostname;
