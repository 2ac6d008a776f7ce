//! Full audit run over a loaded corpus.
//!
//! Phases run in order: staleness classification, technology scan,
//! industry-shift search, report assembly. Only phase 3 touches the network
//! and it goes through the `ShiftSearch` port.

use chrono::NaiveDate;

use codex_types::entry::CodexEntry;
use codex_types::freshness::StalenessVerdict;

use crate::classifier::{classify, ClassifierSettings};
use crate::corpus::Corpus;
use crate::report::{assemble_report, AuditReport};
use crate::scanner::TechnologyScanner;
use crate::shift::{run_shift_phase, ShiftPhasePlan, ShiftSearch};

/// Inputs that shape one audit run.
#[derive(Debug, Clone)]
pub struct AuditOptions {
    pub today: NaiveDate,
    pub base_threshold_months: u32,
    pub approaching_window_months: f64,
    pub shift_plan: ShiftPhasePlan,
}

impl AuditOptions {
    fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            base_threshold_months: f64::from(self.base_threshold_months),
            approaching_window_months: self.approaching_window_months,
        }
    }
}

/// Run every phase and assemble the report.
pub async fn run_audit<S: ShiftSearch>(
    corpus: &Corpus,
    scanner: &TechnologyScanner,
    search: Option<&S>,
    options: AuditOptions,
) -> AuditReport {
    let settings = options.classifier_settings();
    tracing::info!(
        entries = corpus.len(),
        today = %options.today,
        base_threshold = options.base_threshold_months,
        "Starting freshness audit"
    );

    let verdicts: Vec<(&CodexEntry, StalenessVerdict)> = corpus
        .entries
        .iter()
        .map(|loaded| (&loaded.entry, classify(&loaded.entry, &settings, options.today)))
        .collect();

    let technology: Vec<_> = corpus
        .entries
        .iter()
        .flat_map(|loaded| scanner.scan_entry(loaded))
        .collect();
    tracing::info!(
        findings = technology.len(),
        rules = scanner.rule_count(),
        "Technology scan complete"
    );

    let search_inputs: Vec<(&CodexEntry, &StalenessVerdict)> =
        verdicts.iter().map(|(entry, verdict)| (*entry, verdict)).collect();
    let industry = run_shift_phase(search, options.shift_plan, &search_inputs, options.today).await;

    assemble_report(
        options.today,
        options.base_threshold_months,
        &verdicts,
        technology,
        industry,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use codex_types::config::AuditConfig;
    use codex_types::entry::EntryKind;
    use codex_types::error::ShiftSearchError;
    use codex_types::freshness::Classification;
    use codex_types::industry::{SearchHit, ShiftQuery};
    use std::path::PathBuf;

    use crate::corpus::{build_entry, Document};
    use crate::report::Priority;

    struct OneHit;

    impl ShiftSearch for OneHit {
        fn name(&self) -> &str {
            "one-hit"
        }

        async fn search(&self, query: &ShiftQuery) -> Result<Vec<SearchHit>, ShiftSearchError> {
            Ok(vec![SearchHit {
                title: format!("News for {}", query.entry.display()),
                url: "https://example.com/news".to_string(),
                snippet: String::new(),
                published: None,
            }])
        }
    }

    fn corpus() -> Corpus {
        let config = AuditConfig::default();
        Corpus::new(vec![
            build_entry(
                PathBuf::from("facets/security"),
                EntryKind::Facet,
                vec![Document::new(
                    "facets/security/options.md",
                    "---\nlast_updated: 2025-08-15\n---\nPrefer TLS 1.3.\n",
                )],
                &config,
            ),
            build_entry(
                PathBuf::from("facets/api-design"),
                EntryKind::Facet,
                vec![Document::new(
                    "facets/api-design/options.md",
                    "---\nlast_updated: 2026-01-20\n---\nUse Java 8 clients.\n",
                )],
                &config,
            ),
            build_entry(
                PathBuf::from("experiences/onboarding"),
                EntryKind::Experience,
                vec![Document::new(
                    "experiences/onboarding/product.md",
                    "# Onboarding\n",
                )],
                &config,
            ),
        ])
    }

    fn scanner() -> TechnologyScanner {
        let config = AuditConfig::default();
        TechnologyScanner::new(config.technology_rules(), config.scanned_perspectives).unwrap()
    }

    fn options(plan: ShiftPhasePlan) -> AuditOptions {
        AuditOptions {
            today: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
            base_threshold_months: 6,
            approaching_window_months: 1.0,
            shift_plan: plan,
        }
    }

    #[tokio::test]
    async fn audit_without_search_prioritises_entries() {
        let report = run_audit::<OneHit>(
            &corpus(),
            &scanner(),
            None,
            options(ShiftPhasePlan::Skip {
                reason: "disabled by --skip-industry".to_string(),
            }),
        )
        .await;

        assert_eq!(report.summary.entries, 3);
        assert!(report.industry.skip_reason().is_some());

        let order: Vec<_> = report
            .entries
            .iter()
            .map(|e| (e.path.to_string_lossy().into_owned(), e.priority))
            .collect();
        assert_eq!(
            order,
            vec![
                ("experiences/onboarding".to_string(), Priority::Stale),
                ("facets/security".to_string(), Priority::Stale),
                ("facets/api-design".to_string(), Priority::CurrentWithIssues),
            ]
        );
        assert_eq!(report.technology.len(), 1);
        assert_eq!(report.technology[0].token, "Java 8");
    }

    #[tokio::test]
    async fn audit_with_search_only_queries_non_current_entries() {
        let report = run_audit(
            &corpus(),
            &scanner(),
            Some(&OneHit),
            options(ShiftPhasePlan::Run { max_results: 3 }),
        )
        .await;

        let shifted: Vec<_> = report.industry.shifts().iter().map(|s| s.entry.clone()).collect();
        assert_eq!(
            shifted,
            vec![
                PathBuf::from("experiences/onboarding"),
                PathBuf::from("facets/security"),
            ]
        );
        let security = report
            .entries
            .iter()
            .find(|e| e.path == PathBuf::from("facets/security"))
            .unwrap();
        assert_eq!(security.verdict.classification, Classification::Stale);
        assert_eq!(security.priority, Priority::StaleWithIssues);
    }
}
