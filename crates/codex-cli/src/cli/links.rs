//! `cdx links`: validate internal markdown links.

use std::path::PathBuf;

use anyhow::{Context, Result};
use console::style;

use codex_infra::links::validate_tree;
use codex_types::links::LinkReport;

use super::CommandContext;

/// Validate links and print the report. Returns whether every link is valid.
pub async fn run(ctx: &CommandContext, subdir: Option<PathBuf>) -> Result<bool> {
    let root = ctx.root.clone();
    let report = tokio::task::spawn_blocking(move || validate_tree(&root, subdir.as_deref()))
        .await
        .context("Link validation task failed")??;

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(report.is_clean())
}

/// Plain-text report: totals, then one block per broken link.
pub fn render_text(report: &LinkReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n{}\n", style("Link Validation Report").bold()));
    out.push_str(&format!("{}\n", "=".repeat(50)));
    out.push_str(&format!("Files scanned: {}\n", report.files_scanned));
    out.push_str(&format!("Internal links checked: {}\n", report.links_checked));
    out.push_str(&format!("Broken links: {}\n", report.issues.len()));

    if report.is_clean() {
        out.push_str(&format!("\n{} All links valid.\n", style("✓").green().bold()));
        return out;
    }

    out.push_str(&format!("\n{}\n", style("Broken Links:").red().bold()));
    out.push_str(&format!("{}\n", "-".repeat(50)));
    for issue in &report.issues {
        out.push_str(&format!(
            "  {}:{}\n",
            style(codex_types::entry::slash_path(&issue.file)).cyan(),
            issue.line
        ));
        out.push_str(&format!("    Link: {}\n", issue.link));
        out.push_str(&format!("    Issue: {}\n\n", issue.issue));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_types::links::{LinkIssue, LinkIssueKind};

    #[test]
    fn renders_issues_with_location() {
        console::set_colors_enabled(false);
        let report = LinkReport {
            files_scanned: 2,
            links_checked: 4,
            issues: vec![LinkIssue {
                file: PathBuf::from("facets/security/gotchas.md"),
                line: 7,
                link: "#missing".to_string(),
                issue: LinkIssueKind::AnchorNotFound,
            }],
        };
        let text = render_text(&report);
        assert!(text.contains("Files scanned: 2\n"));
        assert!(text.contains("Broken links: 1\n"));
        assert!(text.contains("  facets/security/gotchas.md:7\n"));
        assert!(text.contains("    Issue: Anchor not found in file\n"));
    }

    #[test]
    fn clean_report_says_so() {
        console::set_colors_enabled(false);
        let text = render_text(&LinkReport::default());
        assert!(text.contains("All links valid."));
    }
}
