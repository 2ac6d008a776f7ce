//! Report assembly and markdown rendering.
//!
//! The assembler groups entries into priority buckets and stable-sorts them
//! by (bucket, most overdue first). Rendering is a pure function of the
//! assembled report: identical inputs give byte-identical markdown.

use std::cmp::Ordering;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use codex_types::entry::{slash_path, CodexEntry, EntryKind};
use codex_types::freshness::{Category, Classification, StalenessVerdict};
use codex_types::industry::ShiftPhase;
use codex_types::technology::TechnologyFinding;

/// Review priority of an entry. Lower sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    StaleWithIssues,
    Stale,
    ApproachingStale,
    CurrentWithIssues,
    Current,
}

impl Priority {
    /// Bucket for a classification given whether technology or industry issues exist.
    pub fn from_verdict(classification: Classification, has_issues: bool) -> Self {
        match (classification, has_issues) {
            (c, true) if c.is_stale() => Self::StaleWithIssues,
            (c, false) if c.is_stale() => Self::Stale,
            (Classification::ApproachingStale, _) => Self::ApproachingStale,
            (_, true) => Self::CurrentWithIssues,
            (_, false) => Self::Current,
        }
    }

    pub fn heading(&self) -> &'static str {
        match self {
            Self::StaleWithIssues => "Priority 1: Stale with technology or industry issues",
            Self::Stale => "Priority 2: Stale",
            Self::ApproachingStale => "Priority 3: Approaching stale",
            Self::CurrentWithIssues => "Priority 4: Current with technology or industry issues",
            Self::Current => "Current",
        }
    }
}

/// One entry's line in the report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryReport {
    pub path: PathBuf,
    pub name: String,
    pub kind: EntryKind,
    pub category: Category,
    pub verdict: StalenessVerdict,
    pub technology_findings: usize,
    pub industry_shifts: usize,
    pub priority: Priority,
}

/// Counts per classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub entries: usize,
    pub stale: usize,
    pub no_date: usize,
    pub approaching_stale: usize,
    pub current: usize,
    pub technology_findings: usize,
    pub industry_shifts: usize,
}

/// The assembled audit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub audit_date: NaiveDate,
    pub base_threshold_months: u32,
    pub summary: ReportSummary,
    /// Entries in priority order.
    pub entries: Vec<EntryReport>,
    /// Findings ordered by entry, file, line.
    pub technology: Vec<TechnologyFinding>,
    pub industry: ShiftPhase,
}

impl AuditReport {
    /// Entries in a given bucket, in report order.
    pub fn bucket(&self, priority: Priority) -> impl Iterator<Item = &EntryReport> {
        self.entries.iter().filter(move |e| e.priority == priority)
    }

    /// Entries that need review (everything but plain current ones).
    pub fn needs_review(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.priority != Priority::Current)
            .count()
    }
}

/// Assemble the report from classifier, scanner and search outputs.
pub fn assemble_report(
    audit_date: NaiveDate,
    base_threshold_months: u32,
    verdicts: &[(&CodexEntry, StalenessVerdict)],
    mut technology: Vec<TechnologyFinding>,
    industry: ShiftPhase,
) -> AuditReport {
    technology.sort_by(|a, b| {
        a.entry
            .cmp(&b.entry)
            .then_with(|| a.file.cmp(&b.file))
            .then_with(|| a.line.cmp(&b.line))
    });

    let mut entries: Vec<EntryReport> = verdicts
        .iter()
        .map(|(entry, verdict)| {
            let technology_findings = technology.iter().filter(|f| f.entry == entry.path).count();
            let industry_shifts = industry
                .shifts()
                .iter()
                .filter(|s| s.entry == entry.path)
                .count();
            let has_issues = technology_findings + industry_shifts > 0;
            EntryReport {
                path: entry.path.clone(),
                name: entry.display_name().to_string(),
                kind: entry.kind,
                category: entry.category,
                verdict: verdict.clone(),
                technology_findings,
                industry_shifts,
                priority: Priority::from_verdict(verdict.classification, has_issues),
            }
        })
        .collect();

    entries.sort_by(|a, b| a.path.cmp(&b.path));
    entries.sort_by(|a, b| {
        a.priority.cmp(&b.priority).then_with(|| {
            b.verdict
                .overdue_months()
                .partial_cmp(&a.verdict.overdue_months())
                .unwrap_or(Ordering::Equal)
        })
    });

    let mut summary = ReportSummary {
        entries: entries.len(),
        technology_findings: technology.len(),
        industry_shifts: industry.shifts().len(),
        ..ReportSummary::default()
    };
    for entry in &entries {
        match entry.verdict.classification {
            Classification::Stale => summary.stale += 1,
            Classification::NoDate => summary.no_date += 1,
            Classification::ApproachingStale => summary.approaching_stale += 1,
            Classification::Current => summary.current += 1,
        }
    }

    AuditReport {
        audit_date,
        base_threshold_months,
        summary,
        entries,
        technology,
        industry,
    }
}

// ---------------------------------------------------------------------------
// Markdown rendering
// ---------------------------------------------------------------------------

/// Escape characters that would break a markdown table cell.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace(['\r', '\n'], " ")
}

fn format_age(verdict: &StalenessVerdict) -> String {
    match (verdict.age_months, verdict.age_days) {
        (Some(months), Some(days)) => format!("{months:.1} mo ({days} d)"),
        _ => "unknown".to_string(),
    }
}

fn format_issues(entry: &EntryReport) -> String {
    let mut parts = Vec::new();
    if entry.technology_findings > 0 {
        parts.push(format!("{} technology", entry.technology_findings));
    }
    if entry.industry_shifts > 0 {
        parts.push(format!("{} industry", entry.industry_shifts));
    }
    if entry.verdict.classification == Classification::NoDate {
        parts.push("no last_updated".to_string());
    }
    if parts.is_empty() {
        "-".to_string()
    } else {
        parts.join(", ")
    }
}

/// Render the report as markdown.
pub fn render_markdown(report: &AuditReport) -> String {
    let mut out = String::new();
    let s = &report.summary;

    out.push_str("# Codex Freshness Audit Report\n\n");
    out.push_str(&format!("**Audit date:** {}\n", report.audit_date.format("%Y-%m-%d")));
    out.push_str(&format!("**Base threshold:** {} months\n", report.base_threshold_months));
    out.push_str(&format!("**Entries scanned:** {}\n", s.entries));
    out.push_str(&format!("**Needs review:** {}\n", report.needs_review()));
    out.push('\n');

    out.push_str("## Summary\n\n");
    out.push_str("| Status | Count |\n");
    out.push_str("|--------|-------|\n");
    out.push_str(&format!("| Stale | {} |\n", s.stale));
    out.push_str(&format!("| No date | {} |\n", s.no_date));
    out.push_str(&format!("| Approaching stale | {} |\n", s.approaching_stale));
    out.push_str(&format!("| Current | {} |\n", s.current));
    out.push_str(&format!("| Outdated technology references | {} |\n", s.technology_findings));
    out.push_str(&format!("| Industry shifts | {} |\n", s.industry_shifts));
    out.push('\n');

    out.push_str("## Priority Review Queue\n");
    for priority in [
        Priority::StaleWithIssues,
        Priority::Stale,
        Priority::ApproachingStale,
        Priority::CurrentWithIssues,
    ] {
        out.push('\n');
        out.push_str(&format!("### {}\n", priority.heading()));
        out.push('\n');

        let rows: Vec<_> = report.bucket(priority).collect();
        if rows.is_empty() {
            out.push_str("_None._\n");
            continue;
        }

        out.push_str("| Entry | Path | Type | Category | Last Updated | Age | Threshold | Issues |\n");
        out.push_str("|-------|------|------|----------|--------------|-----|-----------|--------|\n");
        for row in rows {
            let last_updated = row
                .verdict
                .last_updated
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "none".to_string());
            out.push_str(&format!(
                "| {} | `{}` | {} | {} | {} | {} | {:.1} mo | {} |\n",
                cell(&row.name),
                slash_path(&row.path),
                row.kind,
                row.category,
                last_updated,
                format_age(&row.verdict),
                row.verdict.effective_threshold_months,
                format_issues(row),
            ));
        }
    }
    out.push('\n');

    out.push_str("## Outdated Technology References\n\n");
    if report.technology.is_empty() {
        out.push_str("_None found._\n");
    } else {
        out.push_str("| File | Line | Found | Suggested Update | Context |\n");
        out.push_str("|------|------|-------|------------------|---------|\n");
        for finding in &report.technology {
            out.push_str(&format!(
                "| `{}` | {} | {} | {} | {} |\n",
                slash_path(&finding.file),
                finding.line,
                cell(&finding.matched),
                cell(&finding.suggested),
                cell(&finding.context),
            ));
        }
    }
    out.push('\n');

    out.push_str("## Industry Shifts\n\n");
    match &report.industry {
        ShiftPhase::Skipped { reason } => {
            out.push_str(&format!("> Phase 4 skipped: {reason}\n"));
        }
        ShiftPhase::Completed { shifts } if shifts.is_empty() => {
            out.push_str("_No notable shifts found._\n");
        }
        ShiftPhase::Completed { shifts } => {
            let mut current: Option<&PathBuf> = None;
            for shift in shifts {
                if current != Some(&shift.entry) {
                    if current.is_some() {
                        out.push('\n');
                    }
                    out.push_str(&format!("### `{}`\n", slash_path(&shift.entry)));
                    out.push('\n');
                    current = Some(&shift.entry);
                }
                let published = shift
                    .published
                    .map(|d| format!(" ({})", d.format("%Y-%m-%d")))
                    .unwrap_or_default();
                out.push_str(&format!("- [{}]({}){published}", shift.title, shift.url));
                if shift.snippet.trim().is_empty() {
                    out.push('\n');
                } else {
                    out.push_str(&format!(": {}\n", shift.snippet.trim()));
                }
            }
        }
    }
    out.push('\n');

    out.push_str("## Current Entries\n\n");
    let current: Vec<_> = report.bucket(Priority::Current).collect();
    if current.is_empty() {
        out.push_str("_None._\n");
    } else {
        for row in current {
            out.push_str(&format!(
                "- `{}` ({}, {} of {:.1} mo)\n",
                slash_path(&row.path),
                row.category,
                format_age(&row.verdict),
                row.verdict.effective_threshold_months,
            ));
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_types::industry::IndustryShift;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn entry(path: &str, category: Category) -> CodexEntry {
        CodexEntry {
            path: PathBuf::from(path),
            name: path.rsplit('/').next().unwrap().to_string(),
            kind: EntryKind::Facet,
            title: None,
            category,
            last_updated: None,
            perspectives: BTreeSet::new(),
            tags: BTreeSet::new(),
            files: Vec::new(),
        }
    }

    fn verdict(
        path: &str,
        classification: Classification,
        age_months: Option<f64>,
        threshold: f64,
    ) -> StalenessVerdict {
        StalenessVerdict {
            entry: PathBuf::from(path),
            last_updated: age_months.map(|_| date(2025, 8, 15)),
            age_days: age_months.map(|m| (m * 30.0).round() as i64),
            age_months,
            category: Category::Backend,
            multiplier: 1.0,
            effective_threshold_months: threshold,
            classification,
        }
    }

    fn finding(entry: &str, line: usize) -> TechnologyFinding {
        TechnologyFinding {
            entry: PathBuf::from(entry),
            file: PathBuf::from(format!("{entry}/options.md")),
            line,
            token: "Spring Boot 2.x".to_string(),
            matched: "Spring Boot 2.x".to_string(),
            suggested: "Spring Boot 3.x".to_string(),
            context: "Use Spring Boot 2.x | legacy".to_string(),
            note: None,
        }
    }

    fn sample_report(industry: ShiftPhase) -> AuditReport {
        let api = entry("facets/api", Category::Backend);
        let security = entry("facets/security", Category::Security);
        let perf = entry("facets/performance", Category::Backend);
        let i18n = entry("facets/i18n", Category::UxAccessibility);
        let notif = entry("experiences/notifications", Category::Frontend);
        let verdicts = vec![
            (&api, verdict("facets/api", Classification::Current, Some(1.0), 6.0)),
            (&security, verdict("facets/security", Classification::Stale, Some(5.8), 4.5)),
            (&perf, verdict("facets/performance", Classification::Stale, Some(9.0), 6.0)),
            (&i18n, verdict("facets/i18n", Classification::ApproachingStale, Some(5.5), 6.0)),
            (&notif, verdict("experiences/notifications", Classification::NoDate, None, 4.5)),
        ];
        assemble_report(
            date(2026, 2, 9),
            6,
            &verdicts,
            vec![finding("facets/security", 7), finding("facets/api", 3)],
            industry,
        )
    }

    #[test]
    fn priority_buckets_follow_policy() {
        assert_eq!(
            Priority::from_verdict(Classification::Stale, true),
            Priority::StaleWithIssues
        );
        assert_eq!(
            Priority::from_verdict(Classification::NoDate, false),
            Priority::Stale
        );
        assert_eq!(
            Priority::from_verdict(Classification::ApproachingStale, true),
            Priority::ApproachingStale
        );
        assert_eq!(
            Priority::from_verdict(Classification::Current, true),
            Priority::CurrentWithIssues
        );
        assert_eq!(
            Priority::from_verdict(Classification::Current, false),
            Priority::Current
        );
    }

    #[test]
    fn entries_sorted_by_bucket_then_overdue() {
        let report = sample_report(ShiftPhase::skipped("disabled"));
        let order: Vec<_> = report
            .entries
            .iter()
            .map(|e| slash_path(&e.path))
            .collect();
        assert_eq!(
            order,
            vec![
                "facets/security",
                "experiences/notifications",
                "facets/performance",
                "facets/i18n",
                "facets/api",
            ]
        );
        assert_eq!(report.entries[0].priority, Priority::StaleWithIssues);
        assert_eq!(report.entries[4].priority, Priority::CurrentWithIssues);
    }

    #[test]
    fn summary_counts_classifications() {
        let report = sample_report(ShiftPhase::skipped("disabled"));
        assert_eq!(
            report.summary,
            ReportSummary {
                entries: 5,
                stale: 2,
                no_date: 1,
                approaching_stale: 1,
                current: 1,
                technology_findings: 2,
                industry_shifts: 0,
            }
        );
        assert_eq!(report.needs_review(), 5);
        // Findings ordered by entry path.
        assert_eq!(report.technology[0].entry, PathBuf::from("facets/api"));
    }

    #[test]
    fn industry_shifts_raise_priority() {
        let shifts = vec![IndustryShift {
            entry: PathBuf::from("experiences/notifications"),
            title: "Web push on iOS".to_string(),
            url: "https://example.com/push".to_string(),
            snippet: String::new(),
            published: Some(date(2025, 10, 1)),
        }];
        let report = sample_report(ShiftPhase::Completed { shifts });
        let notif = report
            .entries
            .iter()
            .find(|e| e.path == PathBuf::from("experiences/notifications"))
            .unwrap();
        assert_eq!(notif.priority, Priority::StaleWithIssues);
        // No-date sorts ahead of dated stale entries within a bucket.
        assert_eq!(report.entries[0].path, PathBuf::from("experiences/notifications"));

        let md = render_markdown(&report);
        assert!(md.contains("### `experiences/notifications`"));
        assert!(md.contains("- [Web push on iOS](https://example.com/push) (2025-10-01)\n"));
    }

    #[test]
    fn markdown_is_idempotent() {
        let a = render_markdown(&sample_report(ShiftPhase::skipped("disabled")));
        let b = render_markdown(&sample_report(ShiftPhase::skipped("disabled")));
        assert_eq!(a, b);
    }

    #[test]
    fn markdown_contains_sections_and_escapes_cells() {
        let md = render_markdown(&sample_report(ShiftPhase::skipped(
            "web search unavailable (timeout)",
        )));
        assert!(md.starts_with("# Codex Freshness Audit Report\n\n**Audit date:** 2026-02-09\n"));
        assert!(md.contains("| Stale | 2 |"));
        assert!(md.contains("### Priority 1: Stale with technology or industry issues"));
        assert!(md.contains(
            "| security | `facets/security` | facet | security | 2025-08-15 | 5.8 mo (174 d) | 4.5 mo | 1 technology |"
        ));
        assert!(md.contains("| notifications | `experiences/notifications` | facet | frontend | none | unknown | 4.5 mo | no last_updated |"));
        assert!(md.contains("Use Spring Boot 2.x \\| legacy"));
        assert!(md.contains("> Phase 4 skipped: web search unavailable (timeout)"));
        assert!(md.contains("## Current Entries\n\n_None._"));
    }

    #[test]
    fn report_serializes_to_json() {
        let report = sample_report(ShiftPhase::skipped("disabled"));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["audit_date"], "2026-02-09");
        assert_eq!(json["entries"][0]["priority"], "stale_with_issues");
        assert_eq!(json["industry"]["status"], "skipped");
    }
}
