//! Technology reference scanner.
//!
//! A flat regex match of a curated table of superseded version tokens
//! against the scanned perspective files of each entry. One finding per
//! (rule, file, line).

use regex::Regex;

use codex_types::error::ConfigError;
use codex_types::technology::{TechnologyFinding, TechnologyRule};

use crate::corpus::LoadedEntry;

/// A rule with its compiled matcher.
#[derive(Debug, Clone)]
struct CompiledRule {
    rule: TechnologyRule,
    regex: Regex,
}

/// Scanner over a fixed technology table.
#[derive(Debug, Clone)]
pub struct TechnologyScanner {
    rules: Vec<CompiledRule>,
    scanned_files: Vec<String>,
}

impl TechnologyScanner {
    /// Compile a technology table.
    ///
    /// Rules without an explicit `pattern` match their token literally,
    /// bounded by word boundaries. `scanned_files` lists the perspective file
    /// names to search (e.g. `options.md`).
    pub fn new(rules: Vec<TechnologyRule>, scanned_files: Vec<String>) -> Result<Self, ConfigError> {
        let rules = rules
            .into_iter()
            .map(|rule| {
                let pattern = match &rule.pattern {
                    Some(p) => p.clone(),
                    None => format!(r"\b{}\b", regex::escape(&rule.token)),
                };
                let regex = Regex::new(&pattern).map_err(|e| ConfigError::InvalidRule {
                    token: rule.token.clone(),
                    message: e.to_string(),
                })?;
                Ok(CompiledRule { rule, regex })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(Self {
            rules,
            scanned_files,
        })
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Whether a file with this name is scanned.
    pub fn scans(&self, file_name: &str) -> bool {
        self.scanned_files.iter().any(|f| f == file_name)
    }

    /// Scan a single text. Findings are attributed to `entry` and `file`.
    pub fn scan_text(
        &self,
        entry: &std::path::Path,
        file: &std::path::Path,
        text: &str,
    ) -> Vec<TechnologyFinding> {
        let mut findings = Vec::new();
        for (index, line) in text.lines().enumerate() {
            for compiled in &self.rules {
                let Some(found) = compiled.regex.find(line) else {
                    continue;
                };
                findings.push(TechnologyFinding {
                    entry: entry.to_path_buf(),
                    file: file.to_path_buf(),
                    line: index + 1,
                    token: compiled.rule.token.clone(),
                    matched: found.as_str().to_string(),
                    suggested: compiled.rule.replacement.clone(),
                    context: line.trim().to_string(),
                    note: compiled.rule.note.clone(),
                });
            }
        }
        findings
    }

    /// Scan every scanned perspective file of an entry.
    pub fn scan_entry(&self, loaded: &LoadedEntry) -> Vec<TechnologyFinding> {
        let findings: Vec<_> = loaded
            .documents
            .iter()
            .filter(|doc| self.scans(doc.file_name()))
            .flat_map(|doc| self.scan_text(&loaded.entry.path, &doc.path, &doc.content))
            .collect();

        if !findings.is_empty() {
            tracing::debug!(
                entry = %loaded.entry.path.display(),
                count = findings.len(),
                "Outdated technology references found"
            );
        }
        findings
    }
}
