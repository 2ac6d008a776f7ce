//! Stamp an entry as reviewed by rewriting `last_updated` in its files.

use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;

use codex_core::frontmatter::set_last_updated;
use codex_types::config::AuditConfig;

use crate::corpus::load_entry;

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchOutcome {
    Updated,
    /// Already carried the requested date.
    Unchanged,
    /// No frontmatter and `add_missing` not set.
    SkippedNoFrontmatter,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TouchedFile {
    pub path: PathBuf,
    pub outcome: TouchOutcome,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TouchOptions {
    pub add_missing: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TouchReport {
    pub entry: PathBuf,
    pub date: NaiveDate,
    pub dry_run: bool,
    pub files: Vec<TouchedFile>,
}

impl TouchReport {
    pub fn updated(&self) -> usize {
        self.files
            .iter()
            .filter(|f| f.outcome == TouchOutcome::Updated)
            .count()
    }
}

/// Set `last_updated` to `date` in every markdown file of an entry.
///
/// With `dry_run` nothing is written; the report shows what would change.
pub async fn touch_entry(
    root: &Path,
    entry: &Path,
    date: NaiveDate,
    config: &AuditConfig,
    options: TouchOptions,
) -> anyhow::Result<TouchReport> {
    let loaded = load_entry(root, entry, config).await?;
    let mut files = Vec::with_capacity(loaded.documents.len());

    for doc in &loaded.documents {
        let outcome = match set_last_updated(&doc.content, date, options.add_missing) {
            None => TouchOutcome::SkippedNoFrontmatter,
            Some(updated) if updated == doc.content => TouchOutcome::Unchanged,
            Some(updated) => {
                if !options.dry_run {
                    let path = root.join(&doc.path);
                    tokio::fs::write(&path, updated)
                        .await
                        .with_context(|| format!("Failed to write {}", path.display()))?;
                }
                TouchOutcome::Updated
            }
        };
        tracing::debug!(file = %doc.path.display(), ?outcome, dry_run = options.dry_run, "Touched");
        files.push(TouchedFile {
            path: doc.path.clone(),
            outcome,
        });
    }

    let report = TouchReport {
        entry: loaded.entry.path,
        date,
        dry_run: options.dry_run,
        files,
    };
    tracing::info!(
        entry = %report.entry.display(),
        %date,
        updated = report.updated(),
        dry_run = options.dry_run,
        "Entry touched"
    );
    Ok(report)
}
