//! Internal markdown link validation.
//!
//! Checks relative file links, directory links and anchor references.
//! Filesystem lookups go through the `LinkTargets` port so the rules can be
//! tested against an in-memory tree; `codex-infra` provides the disk-backed
//! implementation.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;

use codex_types::links::{LinkIssue, LinkIssueKind};

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^#{1,6}\s+(.+)$").unwrap());
static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.+?)\*\*").unwrap());
static EM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.+?)\*").unwrap());
static CODE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`(.+?)`").unwrap());
static INLINE_LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").unwrap());
static NON_SLUG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s-]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const EXTERNAL_PREFIXES: [&str; 3] = ["http://", "https://", "mailto:"];

/// What exists at a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    File,
    Directory,
}

/// Read-only view of the codex tree. Paths are relative to the codex root.
pub trait LinkTargets {
    /// Kind of the path, `None` when it does not exist.
    fn kind(&self, path: &Path) -> Option<TargetKind>;

    /// Content of a file, `None` when unreadable.
    fn read(&self, path: &Path) -> Option<String>;

    /// Entry names directly inside a directory, sorted.
    fn children(&self, dir: &Path) -> Vec<String>;
}

/// A `[text](target)` link found on a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownLink<'a> {
    pub text: &'a str,
    pub target: &'a str,
}

impl MarkdownLink<'_> {
    pub fn is_external(&self) -> bool {
        EXTERNAL_PREFIXES.iter().any(|p| self.target.starts_with(p))
    }
}

/// All links on one line.
pub fn extract_links(line: &str) -> Vec<MarkdownLink<'_>> {
    LINK_RE
        .captures_iter(line)
        .filter_map(|caps| {
            Some(MarkdownLink {
                text: caps.get(1)?.as_str(),
                target: caps.get(2)?.as_str(),
            })
        })
        .collect()
}

/// GitHub-style heading slug.
///
/// Strips bold, emphasis, code and link markup, lowercases, drops anything
/// that is not a word character, whitespace or `-`, turns whitespace runs
/// into `-` and trims leading/trailing `-`.
pub fn slugify_heading(heading: &str) -> String {
    let heading = heading.trim();
    let heading = BOLD_RE.replace_all(heading, "$1");
    let heading = EM_RE.replace_all(&heading, "$1");
    let heading = CODE_RE.replace_all(&heading, "$1");
    let heading = INLINE_LINK_RE.replace_all(&heading, "$1");
    let heading = heading.to_lowercase();
    let heading = NON_SLUG_RE.replace_all(&heading, "");
    let heading = WHITESPACE_RE.replace_all(&heading, "-");
    heading.trim_matches('-').to_string()
}

/// Slugs of every heading in a document.
pub fn extract_anchors(content: &str) -> BTreeSet<String> {
    HEADING_RE
        .captures_iter(content)
        .filter_map(|caps| caps.get(1))
        .map(|m| slugify_heading(m.as_str()))
        .filter(|slug| !slug.is_empty())
        .collect()
}

/// Join `target` onto `base_dir` and fold `.`/`..` components lexically.
pub fn resolve_relative(base_dir: &Path, target: &str) -> PathBuf {
    let mut resolved = PathBuf::new();
    for component in base_dir.join(target).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !resolved.pop() {
                    resolved.push("..");
                }
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Number of internal links a document contributes to the checked total.
pub fn count_internal_links(content: &str) -> usize {
    content
        .lines()
        .filter(|line| !line.trim().starts_with("```"))
        .flat_map(extract_links)
        .filter(|link| !link.is_external())
        .count()
}

/// Validate every internal link in one document.
///
/// `file` is the document path relative to the codex root. Lines that open
/// or close a fenced code block are skipped.
pub fn validate_document(
    file: &Path,
    content: &str,
    targets: &impl LinkTargets,
) -> Vec<LinkIssue> {
    let base_dir = file.parent().unwrap_or(Path::new(""));
    let mut own_anchors: Option<BTreeSet<String>> = None;
    let mut issues = Vec::new();

    for (index, line) in content.lines().enumerate() {
        if line.trim().starts_with("```") {
            continue;
        }

        for link in extract_links(line) {
            if link.is_external() {
                continue;
            }
            let issue = |kind: LinkIssueKind| LinkIssue {
                file: file.to_path_buf(),
                line: index + 1,
                link: link.target.to_string(),
                issue: kind,
            };

            if let Some(anchor) = link.target.strip_prefix('#') {
                let anchors = own_anchors.get_or_insert_with(|| extract_anchors(content));
                if !anchors.contains(anchor) {
                    issues.push(issue(LinkIssueKind::AnchorNotFound));
                }
                continue;
            }

            let (file_part, anchor_part) = match link.target.split_once('#') {
                Some((f, a)) => (f, Some(a)),
                None => (link.target, None),
            };

            let resolved = resolve_relative(base_dir, file_part);
            let Some(kind) = targets.kind(&resolved) else {
                issues.push(issue(LinkIssueKind::TargetNotFound {
                    directory: file_part.ends_with('/'),
                    suggestion: suggest_sibling(&resolved, targets),
                }));
                continue;
            };

            if let Some(anchor) = anchor_part.filter(|a| !a.is_empty()) {
                if kind == TargetKind::File {
                    let target_anchors = targets
                        .read(&resolved)
                        .map(|c| extract_anchors(&c))
                        .unwrap_or_default();
                    if !target_anchors.contains(anchor) {
                        issues.push(issue(LinkIssueKind::AnchorNotFoundInTarget {
                            anchor: anchor.to_string(),
                        }));
                    }
                }
            }
        }
    }

    issues
}

/// A sibling whose name contains the missing name or is contained by it.
fn suggest_sibling(resolved: &Path, targets: &impl LinkTargets) -> Option<String> {
    let name = resolved.file_name()?.to_str()?;
    let parent = resolved.parent().unwrap_or(Path::new(""));
    if targets.kind(parent) != Some(TargetKind::Directory) {
        return None;
    }
    targets
        .children(parent)
        .into_iter()
        .find(|sibling| sibling.contains(name) || name.contains(sibling.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    /// In-memory tree keyed by relative file path.
    struct MemoryTree {
        files: BTreeMap<PathBuf, String>,
    }

    impl MemoryTree {
        fn new(files: &[(&str, &str)]) -> Self {
            Self {
                files: files
                    .iter()
                    .map(|(p, c)| (PathBuf::from(p), c.to_string()))
                    .collect(),
            }
        }
    }

    impl LinkTargets for MemoryTree {
        fn kind(&self, path: &Path) -> Option<TargetKind> {
            if self.files.contains_key(path) {
                return Some(TargetKind::File);
            }
            let is_dir = path.as_os_str().is_empty()
                || self.files.keys().any(|f| f.starts_with(path) && f != path);
            is_dir.then_some(TargetKind::Directory)
        }

        fn read(&self, path: &Path) -> Option<String> {
            self.files.get(path).cloned()
        }

        fn children(&self, dir: &Path) -> Vec<String> {
            let names: BTreeSet<String> = self
                .files
                .keys()
                .filter_map(|f| f.strip_prefix(dir).ok())
                .filter_map(|rest| rest.components().next())
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            names.into_iter().collect()
        }
    }

    #[test]
    fn slugify_matches_github_style() {
        assert_eq!(slugify_heading("Retry & Backoff"), "retry-backoff");
        assert_eq!(slugify_heading("**Bold** `code` *em*"), "bold-code-em");
        assert_eq!(slugify_heading("See [Options](options.md) now"), "see-options-now");
        assert_eq!(slugify_heading("  Trailing -  "), "trailing");
        assert_eq!(slugify_heading("Über Caching"), "über-caching");
    }

    #[test]
    fn extract_links_finds_all_on_line() {
        let links = extract_links("See [a](a.md) and [b](https://x.io) and [](#top)");
        assert_eq!(links.len(), 3);
        assert_eq!(links[0].target, "a.md");
        assert!(links[1].is_external());
        assert_eq!(links[2].text, "");
    }

    #[test]
    fn resolve_relative_folds_parent_components() {
        assert_eq!(
            resolve_relative(Path::new("facets/security"), "../api/options.md"),
            PathBuf::from("facets/api/options.md")
        );
        assert_eq!(
            resolve_relative(Path::new("facets"), "./security/"),
            PathBuf::from("facets/security")
        );
        assert_eq!(
            resolve_relative(Path::new(""), "../outside.md"),
            PathBuf::from("../outside.md")
        );
    }

    #[test]
    fn detects_each_issue_kind() {
        let tree = MemoryTree::new(&[
            ("facets/api/options.md", "# Options\n## Pagination\n"),
            ("facets/api/best-practices.md", "# Best Practices\n"),
            (
                "facets/api/gotchas.md",
                "# Gotchas\n\
                 [ok](#gotchas)\n\
                 [bad anchor](#missing)\n\
                 [ok file](options.md#pagination)\n\
                 [bad target anchor](options.md#cursors)\n\
                 [typo](best-practices)\n\
                 [missing dir](../nowhere/)\n\
                 [external](https://example.com/missing)\n\
                 ```\n\
                 [dir ok](../api/)\n",
            ),
        ]);
        let content = tree.read(Path::new("facets/api/gotchas.md")).unwrap();
        let issues = validate_document(Path::new("facets/api/gotchas.md"), &content, &tree);

        let summary: Vec<_> = issues
            .iter()
            .map(|i| (i.line, i.link.as_str(), i.issue.to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                (3, "#missing", "Anchor not found in file".to_string()),
                (
                    5,
                    "options.md#cursors",
                    "Anchor `#cursors` not found in target file".to_string()
                ),
                (
                    6,
                    "best-practices",
                    "File not found (did you mean `best-practices.md`?)".to_string()
                ),
                (7, "../nowhere/", "Directory not found".to_string()),
            ]
        );
    }

    #[test]
    fn empty_anchor_on_existing_file_is_valid() {
        let tree = MemoryTree::new(&[("facets/api/options.md", "# Options\n")]);
        let issues = validate_document(
            Path::new("facets/api/gotchas.md"),
            "[x](options.md#)\n",
            &tree,
        );
        assert!(issues.is_empty());
    }

    #[test]
    fn counts_only_internal_links() {
        let content = "[a](a.md) [b](http://x)\n```\n[c](c.md)\n";
        assert_eq!(count_internal_links(content), 2);
    }
}
