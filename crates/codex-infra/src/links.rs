//! Disk-backed internal link validation.

use std::path::{Path, PathBuf};

use anyhow::Context;

use codex_core::links::{count_internal_links, validate_document, LinkTargets, TargetKind};
use codex_types::error::ScanError;
use codex_types::links::LinkReport;

/// `LinkTargets` over a directory on disk.
#[derive(Debug, Clone)]
pub struct FsLinkTargets {
    root: PathBuf,
}

impl FsLinkTargets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl LinkTargets for FsLinkTargets {
    fn kind(&self, path: &Path) -> Option<TargetKind> {
        let metadata = std::fs::metadata(self.root.join(path)).ok()?;
        if metadata.is_dir() {
            Some(TargetKind::Directory)
        } else {
            Some(TargetKind::File)
        }
    }

    fn read(&self, path: &Path) -> Option<String> {
        std::fs::read_to_string(self.root.join(path)).ok()
    }

    fn children(&self, dir: &Path) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.root.join(dir)) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

/// Every `*.md` file below `dir`, sorted, skipping hidden directories.
fn collect_markdown(dir: &Path, out: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut paths: Vec<PathBuf> = entries.filter_map(Result::ok).map(|e| e.path()).collect();
    paths.sort();

    for path in paths {
        let hidden = path
            .file_name()
            .is_some_and(|n| n.to_string_lossy().starts_with('.'));
        if path.is_dir() {
            if !hidden {
                collect_markdown(&path, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "md") {
            out.push(path);
        }
    }
    Ok(())
}

/// Validate all markdown files under `root`, or under `root/subdir` when given.
///
/// Reported paths are relative to `root`.
pub fn validate_tree(root: &Path, subdir: Option<&Path>) -> anyhow::Result<LinkReport> {
    if !root.is_dir() {
        return Err(ScanError::RootNotFound(root.to_path_buf()).into());
    }
    let start = match subdir {
        Some(sub) => root.join(sub),
        None => root.to_path_buf(),
    };
    if !start.is_dir() {
        return Err(ScanError::RootNotFound(start).into());
    }

    let mut files = Vec::new();
    collect_markdown(&start, &mut files)?;

    let targets = FsLinkTargets::new(root);
    let mut report = LinkReport::default();

    for path in &files {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!(file = %path.display(), error = %err, "Skipping unreadable file");
                continue;
            }
        };
        let relative = path.strip_prefix(root).unwrap_or(path);

        report.files_scanned += 1;
        report.links_checked += count_internal_links(&content);
        let issues = validate_document(relative, &content, &targets);
        if !issues.is_empty() {
            tracing::debug!(file = %relative.display(), broken = issues.len(), "Broken links");
        }
        report.issues.extend(issues);
    }

    tracing::info!(
        files = report.files_scanned,
        links = report.links_checked,
        broken = report.issues.len(),
        "Link validation complete"
    );
    Ok(report)
}
