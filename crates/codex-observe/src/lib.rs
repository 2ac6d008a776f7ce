//! Logging setup for the `cdx` binary.

pub mod tracing_setup;
