//! Building `CodexEntry` values from already-read documents.
//!
//! The infra loader walks the content roots and reads files; this module
//! turns each entry's documents into an entry: perspectives present, shared
//! date, tags, title and category.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use codex_types::config::AuditConfig;
use codex_types::entry::{CodexEntry, EntryFile, EntryKind, Frontmatter, Perspective};
use codex_types::error::FrontmatterError;
use codex_types::freshness::Category;

use crate::category::resolve_category;
use crate::frontmatter::parse_frontmatter;

/// A markdown document read from the codex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Path relative to the codex root.
    pub path: PathBuf,
    pub content: String,
}

impl Document {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// File name component, empty when the path has none.
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
    }
}

/// An entry together with the documents it was built from.
#[derive(Debug, Clone)]
pub struct LoadedEntry {
    pub entry: CodexEntry,
    pub documents: Vec<Document>,
}

/// All entries of one codex, sorted by path.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    pub entries: Vec<LoadedEntry>,
}

impl Corpus {
    pub fn new(mut entries: Vec<LoadedEntry>) -> Self {
        entries.sort_by(|a, b| a.entry.path.cmp(&b.entry.path));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find(&self, path: &Path) -> Option<&LoadedEntry> {
        self.entries.iter().find(|e| e.entry.path == path)
    }
}

/// Read the frontmatter of a document, treating any problem as "no frontmatter".
///
/// Missing frontmatter is normal; malformed frontmatter is logged.
fn read_frontmatter(doc: &Document) -> Option<Frontmatter> {
    match parse_frontmatter(&doc.content) {
        Ok(fm) => Some(fm),
        Err(FrontmatterError::Missing) => None,
        Err(err) => {
            tracing::warn!(file = %doc.path.display(), error = %err, "Ignoring malformed frontmatter");
            None
        }
    }
}

/// Build an entry from the documents found in its directory.
///
/// The entry date is the oldest `last_updated` among its files, so one stale
/// perspective makes the whole entry stale. Files without a date do not
/// contribute. The title comes from `README.md`/`index.md` when present,
/// otherwise from the first file that has one.
pub fn build_entry(
    path: PathBuf,
    kind: EntryKind,
    mut documents: Vec<Document>,
    config: &AuditConfig,
) -> LoadedEntry {
    documents.sort_by(|a, b| a.path.cmp(&b.path));

    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let mut files = Vec::with_capacity(documents.len());
    let mut perspectives = BTreeSet::new();
    let mut tags = BTreeSet::new();
    let mut last_updated = None;
    let mut overview_title = None;
    let mut first_title = None;
    let mut frontmatter_category: Option<Category> = None;

    for doc in &documents {
        let perspective = Perspective::from_file_name(doc.file_name());
        if let Some(p) = perspective {
            perspectives.insert(p);
        }

        let frontmatter = read_frontmatter(doc);
        let file_date = frontmatter.as_ref().and_then(Frontmatter::last_updated_date);

        if let Some(fm) = &frontmatter {
            if fm.last_updated.is_some() && file_date.is_none() {
                tracing::warn!(
                    file = %doc.path.display(),
                    value = fm.last_updated.as_deref().unwrap_or_default(),
                    "Unparseable last_updated (expected YYYY-MM-DD)"
                );
            }
            tags.extend(fm.tags.iter().map(|t| t.trim().to_string()).filter(|t| !t.is_empty()));

            if let Some(title) = &fm.title {
                let is_overview = matches!(
                    doc.file_name().to_ascii_lowercase().as_str(),
                    "readme.md" | "index.md"
                );
                if is_overview && overview_title.is_none() {
                    overview_title = Some(title.clone());
                }
                if first_title.is_none() {
                    first_title = Some(title.clone());
                }
            }

            if frontmatter_category.is_none() {
                if let Some(raw) = &fm.category {
                    match raw.parse::<Category>() {
                        Ok(category) => frontmatter_category = Some(category),
                        Err(err) => tracing::warn!(file = %doc.path.display(), %err, "Ignoring category"),
                    }
                }
            }
        }

        if let Some(date) = file_date {
            last_updated = Some(match last_updated {
                Some(current) if current <= date => current,
                _ => date,
            });
        }

        files.push(EntryFile {
            path: doc.path.clone(),
            perspective,
            last_updated: file_date,
            has_frontmatter: frontmatter.is_some(),
        });
    }

    let category = resolve_category(
        frontmatter_category,
        &name,
        tags.iter().map(String::as_str),
        config,
    );

    LoadedEntry {
        entry: CodexEntry {
            path,
            name,
            kind,
            title: overview_title.or(first_title),
            category,
            last_updated,
            perspectives,
            tags,
            files,
        },
        documents,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn doc(path: &str, content: &str) -> Document {
        Document::new(path, content)
    }

    #[test]
    fn builds_entry_with_perspectives_and_oldest_date() {
        let loaded = build_entry(
            PathBuf::from("facets/security"),
            EntryKind::Facet,
            vec![
                doc(
                    "facets/security/README.md",
                    "---\ntitle: Security\nlast_updated: 2025-10-01\ntags: [auth]\n---\n# Security\n",
                ),
                doc(
                    "facets/security/options.md",
                    "---\ntitle: Security Options\nlast_updated: 2025-08-15\ntags: [owasp]\n---\nText\n",
                ),
                doc("facets/security/gotchas.md", "# Gotchas without frontmatter\n"),
            ],
            &AuditConfig::default(),
        );

        let entry = &loaded.entry;
        assert_eq!(entry.name, "security");
        assert_eq!(entry.title.as_deref(), Some("Security"));
        assert_eq!(entry.last_updated, Some(date(2025, 8, 15)));
        assert_eq!(entry.category, Category::Security);
        assert_eq!(
            entry.perspectives,
            BTreeSet::from([Perspective::Gotchas, Perspective::Options])
        );
        assert_eq!(
            entry.tags,
            BTreeSet::from(["auth".to_string(), "owasp".to_string()])
        );
        assert_eq!(entry.files.len(), 3);
        let gotchas = entry
            .files
            .iter()
            .find(|f| f.perspective == Some(Perspective::Gotchas))
            .unwrap();
        assert!(!gotchas.has_frontmatter);
        assert!(gotchas.last_updated.is_none());
    }

    #[test]
    fn entry_without_any_date_has_none() {
        let loaded = build_entry(
            PathBuf::from("experiences/notifications"),
            EntryKind::Experience,
            vec![doc(
                "experiences/notifications/product.md",
                "---\ntitle: Notifications\n---\nText\n",
            )],
            &AuditConfig::default(),
        );
        assert!(loaded.entry.last_updated.is_none());
        assert_eq!(loaded.entry.kind, EntryKind::Experience);
        assert_eq!(loaded.entry.category, Category::Backend);
    }

    #[test]
    fn malformed_frontmatter_is_ignored() {
        let loaded = build_entry(
            PathBuf::from("facets/performance"),
            EntryKind::Facet,
            vec![
                doc("facets/performance/testing.md", "---\ntitle: [broken\n---\n"),
                doc(
                    "facets/performance/architecture.md",
                    "---\nlast_updated: 2025-12-01\n---\n",
                ),
            ],
            &AuditConfig::default(),
        );
        assert_eq!(loaded.entry.last_updated, Some(date(2025, 12, 1)));
        assert_eq!(loaded.entry.files.len(), 2);
    }

    #[test]
    fn scalar_tags_keep_the_date() {
        let loaded = build_entry(
            PathBuf::from("facets/security"),
            EntryKind::Facet,
            vec![doc(
                "facets/security/README.md",
                "---\ntitle: Security\nlast_updated: 2025-08-15\ntags: security\n---\n",
            )],
            &AuditConfig::default(),
        );
        assert_eq!(loaded.entry.last_updated, Some(date(2025, 8, 15)));
        assert_eq!(loaded.entry.title.as_deref(), Some("Security"));
        assert_eq!(loaded.entry.tags, BTreeSet::from(["security".to_string()]));
    }

    #[test]
    fn frontmatter_category_is_used() {
        let loaded = build_entry(
            PathBuf::from("facets/performance"),
            EntryKind::Facet,
            vec![doc(
                "facets/performance/architecture.md",
                "---\ncategory: frontend\nlast_updated: 2025-12-01\n---\n",
            )],
            &AuditConfig::default(),
        );
        assert_eq!(loaded.entry.category, Category::Frontend);
    }

    #[test]
    fn corpus_sorts_entries_by_path() {
        let config = AuditConfig::default();
        let corpus = Corpus::new(vec![
            build_entry(PathBuf::from("facets/zeta"), EntryKind::Facet, vec![], &config),
            build_entry(PathBuf::from("facets/alpha"), EntryKind::Facet, vec![], &config),
        ]);
        assert_eq!(corpus.entries[0].entry.name, "alpha");
        assert!(corpus.find(Path::new("facets/zeta")).is_some());
    }
}
