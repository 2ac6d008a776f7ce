//! Engineering Codex freshness audit entry point.
//!
//! Binary name: `cdx`
//!
//! Parses CLI arguments, sets up tracing, resolves the audit config and
//! dispatches to the command handler.

mod cli;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, CommandContext, Commands};
use codex_infra::config::load_audit_config;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let filter = codex_observe::tracing_setup::verbosity_filter(cli.verbose, cli.quiet);
    if let Err(err) = codex_observe::tracing_setup::init_tracing(filter, cli.otel) {
        eprintln!("Warning: failed to initialize tracing: {err}");
    }

    let result = dispatch(cli).await;
    codex_observe::tracing_setup::shutdown_tracing();
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<ExitCode> {
    // Shell completions don't need config
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "cdx", &mut std::io::stdout());
        return Ok(ExitCode::SUCCESS);
    }

    let loaded = load_audit_config(cli.config.as_deref(), &cli.root)
        .await
        .context("Failed to load configuration")?;
    tracing::debug!(source = ?loaded.source, root = %cli.root.display(), "Configuration resolved");
    let ctx = CommandContext {
        root: cli.root,
        loaded,
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Audit(args) => cli::audit::run(&ctx, args).await?,
        Commands::Links { subdir } => {
            if !cli::links::run(&ctx, subdir).await? {
                return Ok(ExitCode::FAILURE);
            }
        }
        Commands::Touch(args) => cli::touch::run(&ctx, args).await?,
        Commands::Config => cli::config::run(&ctx)?,
        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(ExitCode::SUCCESS)
}
