use std::path::PathBuf;

use thiserror::Error;

/// Errors reading YAML frontmatter from a markdown file.
#[derive(Debug, Error)]
pub enum FrontmatterError {
    #[error("file does not start with a frontmatter delimiter '---'")]
    Missing,

    #[error("frontmatter is missing its closing delimiter '---'")]
    Unterminated,

    #[error("invalid frontmatter YAML: {0}")]
    InvalidYaml(String),
}

/// Errors loading or validating audit configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid technology rule '{token}': {message}")]
    InvalidRule { token: String, message: String },

    #[error("base threshold must be at least one month")]
    ZeroThreshold,
}

/// Errors walking the codex tree.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("codex root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("entry not found: {0}")]
    EntryNotFound(PathBuf),

    #[error("filesystem error at {path}: {message}")]
    Io { path: PathBuf, message: String },
}

/// Errors from an industry-shift search backend.
#[derive(Debug, Error)]
pub enum ShiftSearchError {
    #[error("search backend unavailable: {0}")]
    Unavailable(String),

    #[error("search request failed with status {0}")]
    Status(u16),

    #[error("invalid search response: {0}")]
    InvalidResponse(String),
}
