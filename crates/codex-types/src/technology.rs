//! Technology reference types.
//!
//! `TechnologyRule` is one row of the curated table of superseded version
//! tokens; `TechnologyFinding` is a match of a rule inside a codex file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A superseded technology reference and its current equivalent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyRule {
    /// Token as it appears in prose, e.g. `Spring Boot 2.x`.
    pub token: String,
    /// Suggested current equivalent, e.g. `Spring Boot 3.x`.
    pub replacement: String,
    /// Optional regex used instead of the word-bounded token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl TechnologyRule {
    pub fn new(token: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            replacement: replacement.into(),
            pattern: None,
            note: None,
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// An outdated technology reference found in an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyFinding {
    /// Entry path relative to the codex root.
    pub entry: PathBuf,
    /// File path relative to the codex root.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    /// Rule token that matched.
    pub token: String,
    /// Exact text that matched on the line.
    pub matched: String,
    pub suggested: String,
    /// Trimmed line the match was found on.
    pub context: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// The built-in curated table of superseded technology references.
///
/// Used when the configuration does not replace it.
pub fn default_technology_rules() -> Vec<TechnologyRule> {
    vec![
        TechnologyRule::new("Vue 2", "Vue 3").with_note("Vue 2 reached end of life on 2023-12-31"),
        TechnologyRule::new("AngularJS", "Angular (current LTS)")
            .with_pattern(r"\bAngular(?:JS|\.js| 1\.x)\b"),
        TechnologyRule::new("Spring Boot 2.x", "Spring Boot 3.x")
            .with_pattern(r"\bSpring Boot 2(?:\.\d+|\.x)?\b"),
        TechnologyRule::new("Java 8", "Java 21"),
        TechnologyRule::new("Java 11", "Java 21"),
        TechnologyRule::new("Node 16", "Node 22").with_pattern(r"\bNode(?:\.js)? 16\b"),
        TechnologyRule::new("Node 18", "Node 22").with_pattern(r"\bNode(?:\.js)? 18\b"),
        TechnologyRule::new("Python 3.8", "Python 3.12"),
        TechnologyRule::new("React 17", "React 19"),
        TechnologyRule::new("Create React App", "Vite"),
        TechnologyRule::new("Webpack 4", "Vite or Webpack 5"),
        TechnologyRule::new("TLS 1.0", "TLS 1.3").with_pattern(r"\bTLS 1\.[01]\b"),
        TechnologyRule::new("Moment.js", "date-fns or Temporal"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_suggests_spring_boot_3() {
        let rules = default_technology_rules();
        let spring: Vec<_> = rules
            .iter()
            .filter(|r| r.token.starts_with("Spring Boot"))
            .collect();
        assert_eq!(spring.len(), 1);
        assert_eq!(spring[0].replacement, "Spring Boot 3.x");
    }

    #[test]
    fn rule_deserializes_from_toml_without_optional_fields() {
        let rule: TechnologyRule =
            toml::from_str("token = \"Vue 2\"\nreplacement = \"Vue 3\"\n").unwrap();
        assert_eq!(rule, TechnologyRule::new("Vue 2", "Vue 3"));
    }
}
