//! Audit configuration types.
//!
//! `AuditConfig` represents the `codex.toml` file that tunes thresholds,
//! category assignment, the technology table and the optional search
//! backend. All fields have sensible defaults.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::freshness::Category;
use crate::technology::{default_technology_rules, TechnologyRule};

/// Top-level configuration for a freshness audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Base staleness threshold before the category multiplier is applied.
    #[serde(default = "default_base_threshold_months")]
    pub base_threshold_months: u32,

    /// An entry within this many months of its threshold is approaching stale.
    #[serde(default = "default_approaching_window_months")]
    pub approaching_window_months: f64,

    /// Directories under the codex root whose children are entries.
    #[serde(default = "default_content_roots")]
    pub content_roots: Vec<String>,

    /// Perspective files searched for outdated technology references.
    #[serde(default = "default_scanned_perspectives")]
    pub scanned_perspectives: Vec<String>,

    /// Category used when nothing else assigns one.
    #[serde(default)]
    pub default_category: Category,

    /// When true, `technology` replaces the built-in table instead of extending it.
    #[serde(default)]
    pub replace_default_technology: bool,

    /// Per-entry category overrides keyed by entry directory name.
    #[serde(default)]
    pub categories: BTreeMap<String, Category>,

    /// Extra technology rules (or the full table, see `replace_default_technology`).
    #[serde(default)]
    pub technology: Vec<TechnologyRule>,

    /// Web search backend for the industry-shift phase. Absent disables the phase.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub industry_search: Option<IndustrySearchConfig>,
}

fn default_base_threshold_months() -> u32 {
    6
}

fn default_approaching_window_months() -> f64 {
    1.0
}

fn default_content_roots() -> Vec<String> {
    vec!["facets".to_string(), "experiences".to_string()]
}

fn default_scanned_perspectives() -> Vec<String> {
    vec!["options.md".to_string(), "best-practices.md".to_string()]
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            base_threshold_months: default_base_threshold_months(),
            approaching_window_months: default_approaching_window_months(),
            content_roots: default_content_roots(),
            scanned_perspectives: default_scanned_perspectives(),
            default_category: Category::default(),
            categories: BTreeMap::new(),
            technology: Vec::new(),
            replace_default_technology: false,
            industry_search: None,
        }
    }
}

impl AuditConfig {
    /// The technology table in effect: built-in rules plus configured ones,
    /// or only the configured ones when `replace_default_technology` is set.
    pub fn technology_rules(&self) -> Vec<TechnologyRule> {
        if self.replace_default_technology {
            return self.technology.clone();
        }
        let mut rules = default_technology_rules();
        rules.extend(self.technology.iter().cloned());
        rules
    }
}

/// Search backend settings for the industry-shift phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndustrySearchConfig {
    /// Search endpoint queried as `GET {endpoint}?q=...&limit=...`.
    pub endpoint: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_max_results")]
    pub max_results: usize,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_results() -> usize {
    3
}
