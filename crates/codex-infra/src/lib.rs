//! Infrastructure layer for the Engineering Codex audit.
//!
//! Filesystem and network adapters around the pure logic in `codex-core`:
//! config file lookup, the corpus loader, the HTTP search backend for the
//! industry-shift phase, disk-backed link validation, and the
//! `last_updated` rewriter.

pub mod config;
pub mod corpus;
pub mod links;
pub mod search;
pub mod touch;
