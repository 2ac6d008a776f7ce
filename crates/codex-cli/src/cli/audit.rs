//! `cdx audit`: run the freshness audit.

use anyhow::{Context, Result};
use comfy_table::{presets, Cell, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use codex_core::audit::{run_audit, AuditOptions};
use codex_core::report::{render_markdown, AuditReport, Priority};
use codex_core::scanner::TechnologyScanner;
use codex_core::shift::ShiftPhasePlan;
use codex_infra::corpus::load_corpus;
use codex_infra::search::HttpShiftSearch;
use codex_types::config::AuditConfig;

use super::{local_today, AuditArgs, CommandContext};

/// Choose the search backend and whether phase 4 runs.
fn plan_shift_phase(config: &AuditConfig, skip_industry: bool) -> (Option<HttpShiftSearch>, ShiftPhasePlan) {
    if skip_industry {
        return (
            None,
            ShiftPhasePlan::Skip {
                reason: "disabled by --skip-industry".to_string(),
            },
        );
    }
    match &config.industry_search {
        Some(search) => (
            Some(HttpShiftSearch::new(search)),
            ShiftPhasePlan::Run {
                max_results: search.max_results,
            },
        ),
        None => (
            None,
            ShiftPhasePlan::Skip {
                reason: "no search endpoint configured".to_string(),
            },
        ),
    }
}

pub async fn run(ctx: &CommandContext, args: AuditArgs) -> Result<()> {
    let mut config = ctx.loaded.config.clone();
    if let Some(threshold) = args.threshold {
        config.base_threshold_months = threshold;
    }
    let today = args.today.unwrap_or_else(local_today);

    let scanner = TechnologyScanner::new(config.technology_rules(), config.scanned_perspectives.clone())
        .context("Invalid technology table")?;
    let corpus = load_corpus(&ctx.root, &config)
        .await
        .with_context(|| format!("Failed to load codex at {}", ctx.root.display()))?;

    let (search, shift_plan) = plan_shift_phase(&config, args.skip_industry);

    let spinner = if ctx.quiet || ctx.json || search.is_none() {
        ProgressBar::hidden()
    } else {
        ProgressBar::new_spinner()
    };
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("Auditing {} entries (industry search)...", corpus.len()));
    spinner.enable_steady_tick(std::time::Duration::from_millis(80));

    let options = AuditOptions {
        today,
        base_threshold_months: config.base_threshold_months,
        approaching_window_months: config.approaching_window_months,
        shift_plan,
    };
    let report = run_audit(&corpus, &scanner, search.as_ref(), options).await;

    spinner.finish_and_clear();

    let rendered = if ctx.json {
        serde_json::to_string_pretty(&report)?
    } else {
        render_markdown(&report)
    };

    match &args.output {
        Some(path) => {
            tokio::fs::write(path, &rendered)
                .await
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            if !ctx.quiet && !ctx.json {
                println!(
                    "  {} Report written to {}",
                    style("✓").green().bold(),
                    style(path.display()).cyan()
                );
            }
        }
        None if report_goes_to_stdout(ctx.json, args.summary) => print!("{rendered}"),
        None => {}
    }

    if args.summary && !ctx.json {
        print_summary(&report);
    }

    Ok(())
}

/// With no `--output`, the report prints unless the summary table replaces
/// it. The summary is never shown for `--json`, so JSON always prints.
fn report_goes_to_stdout(json: bool, summary: bool) -> bool {
    json || !summary
}

fn priority_cell(priority: Priority) -> Cell {
    match priority {
        Priority::StaleWithIssues => Cell::new("P1 stale + issues").fg(Color::Red),
        Priority::Stale => Cell::new("P2 stale").fg(Color::Red),
        Priority::ApproachingStale => Cell::new("P3 approaching").fg(Color::Yellow),
        Priority::CurrentWithIssues => Cell::new("P4 issues").fg(Color::Yellow),
        Priority::Current => Cell::new("current").fg(Color::Green),
    }
}

/// Styled terminal summary: counts plus the review queue.
fn print_summary(report: &AuditReport) {
    let s = &report.summary;

    println!();
    println!(
        "  {} Codex freshness audit ({})",
        style("⚡").bold(),
        report.audit_date
    );
    println!();
    println!("  {}", style("── Summary ──").dim());
    println!("  Entries:      {}", style(s.entries).bold());
    println!("  Stale:        {}", style(s.stale).red());
    println!("  No date:      {}", style(s.no_date).red());
    println!("  Approaching:  {}", style(s.approaching_stale).yellow());
    println!("  Current:      {}", style(s.current).green());
    println!("  Tech refs:    {}", s.technology_findings);
    match report.industry.skip_reason() {
        Some(reason) => println!("  Industry:     {}", style(format!("skipped ({reason})")).dim()),
        None => println!("  Industry:     {}", s.industry_shifts),
    }
    println!();

    let queue: Vec<_> = report
        .entries
        .iter()
        .filter(|e| e.priority != Priority::Current)
        .collect();
    if queue.is_empty() {
        println!("  {} Nothing needs review.", style("✓").green().bold());
        println!();
        return;
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Priority").fg(Color::White),
        Cell::new("Entry").fg(Color::White),
        Cell::new("Category").fg(Color::White),
        Cell::new("Age").fg(Color::White),
        Cell::new("Threshold").fg(Color::White),
        Cell::new("Tech").fg(Color::White),
        Cell::new("Industry").fg(Color::White),
    ]);

    for entry in queue {
        let age = match entry.verdict.age_months {
            Some(months) => format!("{months:.1} mo"),
            None => "no date".to_string(),
        };
        table.add_row(vec![
            priority_cell(entry.priority),
            Cell::new(entry.path.display()).fg(Color::Cyan),
            Cell::new(entry.category),
            Cell::new(age),
            Cell::new(format!("{:.1} mo", entry.verdict.effective_threshold_months)).fg(Color::DarkGrey),
            Cell::new(entry.technology_findings),
            Cell::new(entry.industry_shifts),
        ]);
    }

    println!("{table}");
    println!();
}
