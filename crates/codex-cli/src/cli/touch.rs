//! `cdx touch`: stamp an entry's files with a new `last_updated`.

use anyhow::Result;
use console::style;

use codex_infra::touch::{touch_entry, TouchOptions, TouchOutcome};
use codex_types::entry::slash_path;

use super::{local_today, CommandContext, TouchArgs};

pub async fn run(ctx: &CommandContext, args: TouchArgs) -> Result<()> {
    let date = args.date.unwrap_or_else(local_today);
    let options = TouchOptions {
        add_missing: args.add_missing,
        dry_run: args.dry_run,
    };

    let report = touch_entry(&ctx.root, &args.entry, date, &ctx.loaded.config, options).await?;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }
    if ctx.quiet {
        return Ok(());
    }

    println!();
    let verb = if report.dry_run { "Would set" } else { "Set" };
    println!(
        "  {} {} last_updated: {} on {}",
        style("✎").bold(),
        verb,
        style(report.date).cyan(),
        style(slash_path(&report.entry)).bold()
    );
    println!();
    for file in &report.files {
        let marker = match file.outcome {
            TouchOutcome::Updated => style("✓ updated").green(),
            TouchOutcome::Unchanged => style("= unchanged").dim(),
            TouchOutcome::SkippedNoFrontmatter => style("○ no frontmatter (use --add-missing)").yellow(),
        };
        println!("  {marker}  {}", slash_path(&file.path));
    }
    println!();
    Ok(())
}
