//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod aggregate_subdomains;
pub mod handle_source;
