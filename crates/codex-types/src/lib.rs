//! Shared domain types for the Engineering Codex freshness audit.
//!
//! Entries, staleness verdicts, technology findings, industry shifts, link
//! issues, audit configuration and their error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod config;
pub mod entry;
pub mod error;
pub mod freshness;
pub mod industry;
pub mod links;
pub mod technology;
