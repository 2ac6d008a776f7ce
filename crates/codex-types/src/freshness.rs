//! Freshness classification types.
//!
//! Topic categories and their threshold multipliers, the four-way staleness
//! classification, and the per-entry verdict the classifier produces.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// Topic category of an entry. Determines how quickly its content ages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Frontend,
    Security,
    Backend,
    UxAccessibility,
    Process,
    Data,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Self::Frontend,
        Self::Security,
        Self::Backend,
        Self::UxAccessibility,
        Self::Process,
        Self::Data,
    ];

    /// Multiplier applied to the base threshold for this category.
    pub fn multiplier(&self) -> f64 {
        match self {
            Self::Frontend => 0.75,
            Self::Security => 0.75,
            Self::Backend => 1.0,
            Self::UxAccessibility => 1.0,
            Self::Process => 1.5,
            Self::Data => 1.25,
        }
    }

    /// `base_threshold_months * multiplier`.
    pub fn effective_threshold(&self, base_threshold_months: f64) -> f64 {
        base_threshold_months * self.multiplier()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Security => "security",
            Self::Backend => "backend",
            Self::UxAccessibility => "ux-accessibility",
            Self::Process => "process",
            Self::Data => "data",
        }
    }
}

impl Default for Category {
    fn default() -> Self {
        Self::Backend
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['_', ' ', '/'], "-").as_str() {
            "frontend" => Ok(Self::Frontend),
            "security" => Ok(Self::Security),
            "backend" => Ok(Self::Backend),
            "ux-accessibility" | "ux" | "accessibility" | "ux-a11y" | "a11y" => {
                Ok(Self::UxAccessibility)
            }
            "process" => Ok(Self::Process),
            "data" => Ok(Self::Data),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Freshness classification of an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    Current,
    ApproachingStale,
    Stale,
    NoDate,
}

impl Classification {
    /// Whether the classification counts as stale for priority purposes.
    ///
    /// `NoDate` is treated as stale by policy.
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::Stale | Self::NoDate)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Current => "Current",
            Self::ApproachingStale => "Approaching stale",
            Self::Stale => "Stale",
            Self::NoDate => "No date",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::ApproachingStale => write!(f, "approaching-stale"),
            Self::Stale => write!(f, "stale"),
            Self::NoDate => write!(f, "no-date"),
        }
    }
}

// ---------------------------------------------------------------------------
// Verdict
// ---------------------------------------------------------------------------

/// Classifier output for one entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StalenessVerdict {
    /// Entry path relative to the codex root.
    pub entry: PathBuf,
    pub last_updated: Option<NaiveDate>,
    /// Days between `last_updated` and the audit date. `None` for `NoDate`.
    pub age_days: Option<i64>,
    /// Calendar-month age. `None` for `NoDate`.
    pub age_months: Option<f64>,
    pub category: Category,
    pub multiplier: f64,
    pub effective_threshold_months: f64,
    pub classification: Classification,
}

impl StalenessVerdict {
    /// How far past the threshold the entry is, in months. Negative when
    /// still inside the threshold; `f64::INFINITY` when undated.
    pub fn overdue_months(&self) -> f64 {
        match self.age_months {
            Some(age) => age - self.effective_threshold_months,
            None => f64::INFINITY,
        }
    }
}
