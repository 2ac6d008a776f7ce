//! Industry-shift detection (audit phase 4).
//!
//! Searches for notable changes in the topic of every entry that is stale,
//! undated or approaching stale. The phase is advisory: it is skipped (and
//! the report annotated) when disabled, unconfigured, or when the search
//! backend fails on the first request.

use chrono::{Datelike, NaiveDate};

use codex_types::entry::CodexEntry;
use codex_types::error::ShiftSearchError;
use codex_types::freshness::{Classification, StalenessVerdict};
use codex_types::industry::{IndustryShift, SearchHit, ShiftPhase, ShiftQuery};

/// Port for a web search backend. Implementations live in codex-infra.
pub trait ShiftSearch: Send + Sync {
    /// Backend name for logs (e.g. "http").
    fn name(&self) -> &str;

    /// Run one query and return its hits, best first.
    fn search(
        &self,
        query: &ShiftQuery,
    ) -> impl std::future::Future<Output = Result<Vec<SearchHit>, ShiftSearchError>> + Send;
}

/// Why the phase may not run at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShiftPhasePlan {
    Run { max_results: usize },
    Skip { reason: String },
}

/// Build the query string for an entry.
pub fn build_query(entry: &CodexEntry, today: NaiveDate) -> String {
    format!(
        "{} {} best practices {}",
        entry.display_name(),
        entry.category,
        today.year()
    )
}

/// Whether an entry's classification warrants a search.
pub fn needs_search(classification: Classification) -> bool {
    !matches!(classification, Classification::Current)
}

/// Run the industry-shift phase over the given entries.
///
/// `entries` pairs each entry with its verdict. The first failing search
/// skips the whole phase; later failures only drop that entry's results.
pub async fn run_shift_phase<S: ShiftSearch>(
    search: Option<&S>,
    plan: ShiftPhasePlan,
    entries: &[(&CodexEntry, &StalenessVerdict)],
    today: NaiveDate,
) -> ShiftPhase {
    let max_results = match plan {
        ShiftPhasePlan::Skip { reason } => {
            tracing::info!(%reason, "Skipping industry-shift phase");
            return ShiftPhase::skipped(reason);
        }
        ShiftPhasePlan::Run { max_results } => max_results,
    };
    let Some(search) = search else {
        return ShiftPhase::skipped("no search backend configured");
    };

    let mut shifts = Vec::new();
    let mut first = true;

    for (entry, verdict) in entries {
        if !needs_search(verdict.classification) {
            continue;
        }

        let query = ShiftQuery {
            entry: entry.path.clone(),
            query: build_query(entry, today),
            since: entry.last_updated,
            max_results,
        };

        match search.search(&query).await {
            Ok(hits) => {
                let relevant = hits
                    .into_iter()
                    .filter(|hit| match (hit.published, query.since) {
                        (Some(published), Some(since)) => published > since,
                        _ => true,
                    })
                    .take(max_results)
                    .map(|hit| IndustryShift {
                        entry: entry.path.clone(),
                        title: hit.title,
                        url: hit.url,
                        snippet: hit.snippet,
                        published: hit.published,
                    });
                shifts.extend(relevant);
            }
            Err(err) if first => {
                tracing::warn!(
                    backend = search.name(),
                    error = %err,
                    "Web search unavailable; skipping industry-shift phase"
                );
                return ShiftPhase::skipped(format!("web search unavailable ({err})"));
            }
            Err(err) => {
                tracing::warn!(
                    backend = search.name(),
                    entry = %entry.path.display(),
                    error = %err,
                    "Search failed for entry; continuing"
                );
            }
        }
        first = false;
    }

    tracing::info!(count = shifts.len(), "Industry-shift phase complete");
    ShiftPhase::Completed { shifts }
}
