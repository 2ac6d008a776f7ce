//! Codex entry types.
//!
//! A `CodexEntry` is one facet or experience directory together with the
//! perspective files it contains and the metadata pulled from their YAML
//! frontmatter.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::freshness::Category;

/// Whether an entry documents a cross-cutting facet or a user-facing experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryKind {
    Facet,
    Experience,
}

impl EntryKind {
    /// Infer the kind from the content root directory name.
    ///
    /// `experiences` (or anything starting with `experience`) maps to
    /// `Experience`; everything else is treated as a facet.
    pub fn from_root(root: &str) -> Self {
        if root.starts_with("experience") {
            Self::Experience
        } else {
            Self::Facet
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Facet => write!(f, "facet"),
            Self::Experience => write!(f, "experience"),
        }
    }
}

/// One angle on a facet or experience, stored as `<perspective>.md`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Perspective {
    Architecture,
    Testing,
    BestPractices,
    Gotchas,
    Options,
    Product,
}

impl Perspective {
    pub const ALL: [Perspective; 6] = [
        Self::Architecture,
        Self::Testing,
        Self::BestPractices,
        Self::Gotchas,
        Self::Options,
        Self::Product,
    ];

    /// The markdown file name holding this perspective.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::Architecture => "architecture.md",
            Self::Testing => "testing.md",
            Self::BestPractices => "best-practices.md",
            Self::Gotchas => "gotchas.md",
            Self::Options => "options.md",
            Self::Product => "product.md",
        }
    }

    /// Map a file name back to its perspective, if it is one.
    pub fn from_file_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.file_name() == name)
    }
}

impl fmt::Display for Perspective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.file_name().trim_end_matches(".md");
        write!(f, "{name}")
    }
}

/// Parsed YAML frontmatter of a codex markdown file.
///
/// Every field is optional; unknown fields are ignored. `last_updated` and
/// `category` stay raw strings so one malformed value does not discard the
/// rest of the block. `tags` accepts a single string as well as a list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Frontmatter {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, rename = "type")]
    pub doc_type: Option<String>,
    #[serde(default)]
    pub last_updated: Option<String>,
    #[serde(default, deserialize_with = "one_or_many")]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// `tags: security`, `tags: [a, b]` and an empty `tags:` all deserialize.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        Some(OneOrMany::One(tag)) => vec![tag],
        Some(OneOrMany::Many(tags)) => tags,
        None => Vec::new(),
    })
}

impl Frontmatter {
    /// Parse `last_updated` as `YYYY-MM-DD`.
    pub fn last_updated_date(&self) -> Option<NaiveDate> {
        self.last_updated
            .as_deref()
            .and_then(|raw| NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok())
    }
}

/// A markdown file belonging to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryFile {
    /// Path relative to the codex root.
    pub path: PathBuf,
    pub perspective: Option<Perspective>,
    pub last_updated: Option<NaiveDate>,
    pub has_frontmatter: bool,
}

/// A facet or experience directory and everything the audit needs to know about it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodexEntry {
    /// Directory path relative to the codex root (e.g. `facets/security`).
    pub path: PathBuf,
    /// Directory name (e.g. `security`).
    pub name: String,
    pub kind: EntryKind,
    pub title: Option<String>,
    pub category: Category,
    /// Shared entry date: the oldest `last_updated` among the entry's files.
    pub last_updated: Option<NaiveDate>,
    pub perspectives: BTreeSet<Perspective>,
    pub tags: BTreeSet<String>,
    pub files: Vec<EntryFile>,
}

impl CodexEntry {
    /// Human-readable name: the frontmatter title when present, else the directory name.
    pub fn display_name(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.name)
    }

    /// Path as a forward-slash string, stable across platforms for report output.
    pub fn path_display(&self) -> String {
        slash_path(&self.path)
    }
}

/// Render a relative path with `/` separators.
pub fn slash_path(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
