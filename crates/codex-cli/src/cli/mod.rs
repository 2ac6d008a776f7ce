//! CLI command definitions for the `cdx` binary.
//!
//! Uses clap derive macros for argument parsing. Each subcommand has its own
//! module with an async `run` handler.

pub mod audit;
pub mod config;
pub mod links;
pub mod touch;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use codex_infra::config::LoadedConfig;

/// Freshness audit and link checker for the Engineering Codex.
#[derive(Parser)]
#[command(name = "cdx", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors and the requested report.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Codex root directory.
    #[arg(long, global = true, env = "CODEX_ROOT", default_value = ".")]
    pub root: PathBuf,

    /// Config file to use instead of the default lookup.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the freshness audit and print the markdown report.
    Audit(AuditArgs),

    /// Validate internal markdown links.
    Links {
        /// Sub-directory of the codex to check (default: whole codex).
        subdir: Option<PathBuf>,
    },

    /// Set last_updated on every file of an entry after a review.
    Touch(TouchArgs),

    /// Print the effective configuration as TOML.
    Config,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[derive(Args)]
pub struct AuditArgs {
    /// Audit as of this date (YYYY-MM-DD) instead of today.
    #[arg(long, value_parser = parse_date)]
    pub today: Option<NaiveDate>,

    /// Base staleness threshold in months, overriding the config.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub threshold: Option<u32>,

    /// Skip the industry-shift web search phase.
    #[arg(long)]
    pub skip_industry: bool,

    /// Write the report to FILE instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Print a styled summary table.
    #[arg(long)]
    pub summary: bool,
}

#[derive(Args)]
pub struct TouchArgs {
    /// Entry directory, e.g. facets/security.
    pub entry: PathBuf,

    /// Date to stamp (YYYY-MM-DD), default today.
    #[arg(long, value_parser = parse_date)]
    pub date: Option<NaiveDate>,

    /// Prepend a frontmatter block to files that have none.
    #[arg(long)]
    pub add_missing: bool,

    /// Show what would change without writing.
    #[arg(long)]
    pub dry_run: bool,
}

/// Settings shared by every command after config resolution.
pub struct CommandContext {
    pub root: PathBuf,
    pub loaded: LoadedConfig,
    pub json: bool,
    pub quiet: bool,
}

/// Parse a `YYYY-MM-DD` argument.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| format!("expected YYYY-MM-DD, got '{value}': {e}"))
}

/// Today's date in local time.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}
