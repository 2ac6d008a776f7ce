//! Internal link validation types.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Why an internal link is broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LinkIssueKind {
    /// `#anchor` link whose heading does not exist in the same file.
    AnchorNotFound,
    /// Relative target that does not exist on disk.
    TargetNotFound {
        directory: bool,
        suggestion: Option<String>,
    },
    /// Existing target file without the referenced heading.
    AnchorNotFoundInTarget { anchor: String },
}

impl fmt::Display for LinkIssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AnchorNotFound => write!(f, "Anchor not found in file"),
            Self::TargetNotFound {
                directory,
                suggestion,
            } => {
                let what = if *directory { "Directory" } else { "File" };
                write!(f, "{what} not found")?;
                if let Some(s) = suggestion {
                    write!(f, " (did you mean `{s}`?)")?;
                }
                Ok(())
            }
            Self::AnchorNotFoundInTarget { anchor } => {
                write!(f, "Anchor `#{anchor}` not found in target file")
            }
        }
    }
}

/// A broken internal link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkIssue {
    /// File containing the link, relative to the codex root.
    pub file: PathBuf,
    /// 1-based line number.
    pub line: usize,
    pub link: String,
    pub issue: LinkIssueKind,
}

/// Totals and issues from one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkReport {
    pub files_scanned: usize,
    pub links_checked: usize,
    pub issues: Vec<LinkIssue>,
}

impl LinkReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issue_kind_messages() {
        assert_eq!(LinkIssueKind::AnchorNotFound.to_string(), "Anchor not found in file");
        assert_eq!(
            LinkIssueKind::TargetNotFound {
                directory: true,
                suggestion: None
            }
            .to_string(),
            "Directory not found"
        );
        assert_eq!(
            LinkIssueKind::TargetNotFound {
                directory: false,
                suggestion: Some("gotchas.md".to_string())
            }
            .to_string(),
            "File not found (did you mean `gotchas.md`?)"
        );
        assert_eq!(
            LinkIssueKind::AnchorNotFoundInTarget {
                anchor: "retries".to_string()
            }
            .to_string(),
            "Anchor `#retries` not found in target file"
        );
    }
}
