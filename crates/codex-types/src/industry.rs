//! Industry-shift search types.
//!
//! Phase 4 of the audit looks for notable changes in an entry's topic since
//! it was last updated. It is advisory: when search is unavailable the phase
//! is skipped and the report says so.

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A query issued for one entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftQuery {
    pub entry: PathBuf,
    pub query: String,
    /// Only hits published after this date are relevant.
    pub since: Option<NaiveDate>,
    pub max_results: usize,
}

/// One search hit as returned by a search backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
    #[serde(default)]
    pub published: Option<NaiveDate>,
}

/// A search hit attributed to an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustryShift {
    pub entry: PathBuf,
    pub title: String,
    pub url: String,
    pub snippet: String,
    pub published: Option<NaiveDate>,
}

/// Outcome of the industry-shift phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ShiftPhase {
    Completed { shifts: Vec<IndustryShift> },
    Skipped { reason: String },
}

impl ShiftPhase {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Self::Skipped {
            reason: reason.into(),
        }
    }

    /// Shifts found, empty when the phase was skipped.
    pub fn shifts(&self) -> &[IndustryShift] {
        match self {
            Self::Completed { shifts } => shifts,
            Self::Skipped { .. } => &[],
        }
    }

    pub fn skip_reason(&self) -> Option<&str> {
        match self {
            Self::Completed { .. } => None,
            Self::Skipped { reason } => Some(reason),
        }
    }
}
