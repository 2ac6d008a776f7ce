//! Staleness classifier.
//!
//! Classification is a pure function of (today, last_updated, category,
//! base threshold). Entries are classified as a whole; all perspective files
//! of an entry share its date.

use chrono::NaiveDate;
use codex_types::entry::CodexEntry;
use codex_types::freshness::{Classification, StalenessVerdict};

use crate::calendar::{days_between, months_between};

/// Thresholds the classifier works with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierSettings {
    pub base_threshold_months: f64,
    /// Distance to the threshold (in months) that counts as approaching stale.
    pub approaching_window_months: f64,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            base_threshold_months: 6.0,
            approaching_window_months: 1.0,
        }
    }
}

/// Classify an age against a threshold.
///
/// The boundary is inclusive: an age exactly at the threshold is
/// approaching stale, not stale.
pub fn classify_age(age_months: f64, effective_threshold: f64, window: f64) -> Classification {
    if age_months > effective_threshold {
        Classification::Stale
    } else if effective_threshold - age_months <= window {
        Classification::ApproachingStale
    } else {
        Classification::Current
    }
}

/// Produce the verdict for one dated or undated entry.
pub fn classify(entry: &CodexEntry, settings: &ClassifierSettings, today: NaiveDate) -> StalenessVerdict {
    let category = entry.category;
    let multiplier = category.multiplier();
    let effective = category.effective_threshold(settings.base_threshold_months);

    let Some(last_updated) = entry.last_updated else {
        return StalenessVerdict {
            entry: entry.path.clone(),
            last_updated: None,
            age_days: None,
            age_months: None,
            category,
            multiplier,
            effective_threshold_months: effective,
            classification: Classification::NoDate,
        };
    };

    if last_updated > today {
        tracing::warn!(
            entry = %entry.path.display(),
            %last_updated,
            %today,
            "last_updated is in the future; treating age as zero"
        );
    }

    let age_months = months_between(last_updated, today);
    let classification = classify_age(age_months, effective, settings.approaching_window_months);

    tracing::debug!(
        entry = %entry.path.display(),
        category = %category,
        age_months,
        threshold = effective,
        %classification,
        "Classified entry"
    );

    StalenessVerdict {
        entry: entry.path.clone(),
        last_updated: Some(last_updated),
        age_days: Some(days_between(last_updated, today).max(0)),
        age_months: Some(age_months),
        category,
        multiplier,
        effective_threshold_months: effective,
        classification,
    }
}
