//! Corpus loader.
//!
//! Walks `{root}/{content_root}/{entry}/` for every configured content root
//! and reads the markdown files directly inside each entry directory.
//! Unreadable and non-UTF-8 files are skipped with a warning.

use std::path::{Path, PathBuf};

use anyhow::Context;

use codex_core::corpus::{build_entry, Corpus, Document, LoadedEntry};
use codex_types::config::AuditConfig;
use codex_types::entry::EntryKind;
use codex_types::error::ScanError;

/// Sorted child paths of a directory, hidden names excluded.
async fn sorted_children(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let mut read_dir = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read directory {}", dir.display()))?;

    let mut children = Vec::new();
    while let Some(child) = read_dir
        .next_entry()
        .await
        .with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let hidden = child.file_name().to_string_lossy().starts_with('.');
        if !hidden {
            children.push(child.path());
        }
    }
    children.sort();
    Ok(children)
}

fn is_markdown(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("md"))
}

/// Read a file as UTF-8, `None` (with a warning) when that is not possible.
async fn read_document(root: &Path, path: &Path) -> Option<Document> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(file = %path.display(), error = %err, "Skipping unreadable file");
            return None;
        }
    };
    let content = match String::from_utf8(bytes) {
        Ok(content) => content,
        Err(_) => {
            tracing::warn!(file = %path.display(), "Skipping non-UTF-8 file");
            return None;
        }
    };
    let relative = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    Some(Document::new(relative, content))
}

/// Read the markdown documents of one entry directory.
async fn read_entry_documents(root: &Path, entry_dir: &Path) -> anyhow::Result<Vec<Document>> {
    let mut documents = Vec::new();
    for path in sorted_children(entry_dir).await? {
        if !is_markdown(&path) || !tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            continue;
        }
        if let Some(doc) = read_document(root, &path).await {
            tracing::debug!(file = %doc.path.display(), bytes = doc.content.len(), "Read document");
            documents.push(doc);
        }
    }
    Ok(documents)
}

fn ensure_root(root: &Path) -> Result<(), ScanError> {
    if root.is_dir() {
        Ok(())
    } else {
        Err(ScanError::RootNotFound(root.to_path_buf()))
    }
}

/// Load every entry under the configured content roots.
///
/// A content root that does not exist is skipped; a missing codex root is
/// an error.
pub async fn load_corpus(root: &Path, config: &AuditConfig) -> anyhow::Result<Corpus> {
    ensure_root(root)?;

    let mut entries = Vec::new();
    for content_root in &config.content_roots {
        let dir = root.join(content_root);
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "Content root not present, skipping");
            continue;
        }

        let kind = EntryKind::from_root(content_root);
        for entry_dir in sorted_children(&dir).await? {
            if !entry_dir.is_dir() {
                continue;
            }
            let documents = read_entry_documents(root, &entry_dir).await?;
            if documents.is_empty() {
                tracing::debug!(dir = %entry_dir.display(), "No markdown files, not an entry");
                continue;
            }
            let relative = entry_dir.strip_prefix(root).unwrap_or(&entry_dir).to_path_buf();
            entries.push(build_entry(relative, kind, documents, config));
        }
    }

    tracing::info!(root = %root.display(), entries = entries.len(), "Loaded codex corpus");
    Ok(Corpus::new(entries))
}

/// Load a single entry given its path (absolute, or relative to `root`).
pub async fn load_entry(root: &Path, entry: &Path, config: &AuditConfig) -> anyhow::Result<LoadedEntry> {
    ensure_root(root)?;

    let entry_dir = if entry.is_absolute() {
        entry.to_path_buf()
    } else {
        root.join(entry)
    };
    if !entry_dir.is_dir() {
        return Err(ScanError::EntryNotFound(entry.to_path_buf()).into());
    }

    let relative = entry_dir
        .strip_prefix(root)
        .map(Path::to_path_buf)
        .map_err(|_| ScanError::EntryNotFound(entry.to_path_buf()))?;
    let kind = relative
        .components()
        .next()
        .map(|c| EntryKind::from_root(&c.as_os_str().to_string_lossy()))
        .unwrap_or(EntryKind::Facet);

    let documents = read_entry_documents(root, &entry_dir).await?;
    Ok(build_entry(relative, kind, documents, config))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use codex_types::entry::Perspective;
    use tempfile::TempDir;

    async fn write(root: &Path, rel: &str, content: &[u8]) {
        let path = root.join(rel);
        tokio::fs::create_dir_all(path.parent().unwrap()).await.unwrap();
        tokio::fs::write(path, content).await.unwrap();
    }

    async fn sample_codex() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        write(
            root,
            "facets/security/options.md",
            b"---\ntitle: Security\nlast_updated: 2025-08-15\n---\nTLS 1.3\n",
        )
        .await;
        write(root, "facets/security/gotchas.md", b"# Gotchas\n").await;
        write(root, "facets/security/diagram.png", b"\x89PNG").await;
        write(root, "facets/security/notes/deep.md", b"# nested, ignored\n").await;
        write(root, "facets/api-design/best-practices.md", b"\xff\xfe not utf-8").await;
        write(
            root,
            "experiences/onboarding/product.md",
            b"---\nlast_updated: 2026-01-05\n---\n",
        )
        .await;
        write(root, "facets/.hidden/options.md", b"# hidden\n").await;
        write(root, "facets/README.md", b"# Facets index\n").await;
        tmp
    }

    #[tokio::test]
    async fn loads_entries_from_both_content_roots() {
        let tmp = sample_codex().await;
        let corpus = load_corpus(tmp.path(), &AuditConfig::default()).await.unwrap();

        let paths: Vec<_> = corpus
            .entries
            .iter()
            .map(|e| e.entry.path.to_string_lossy().into_owned())
            .collect();
        assert_eq!(paths, vec!["experiences/onboarding", "facets/security"]);

        let security = corpus.find(Path::new("facets/security")).unwrap();
        assert_eq!(security.documents.len(), 2);
        assert_eq!(
            security.entry.last_updated,
            NaiveDate::from_ymd_opt(2025, 8, 15)
        );
        assert!(security.entry.perspectives.contains(&Perspective::Gotchas));
        assert_eq!(
            security.documents[0].path,
            PathBuf::from("facets/security/gotchas.md")
        );

        let onboarding = corpus.find(Path::new("experiences/onboarding")).unwrap();
        assert_eq!(onboarding.entry.kind, EntryKind::Experience);
    }

    #[tokio::test]
    async fn missing_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let err = load_corpus(&tmp.path().join("nope"), &AuditConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::RootNotFound(_))
        ));
    }

    #[tokio::test]
    async fn load_entry_accepts_relative_path() {
        let tmp = sample_codex().await;
        let loaded = load_entry(tmp.path(), Path::new("facets/security"), &AuditConfig::default())
            .await
            .unwrap();
        assert_eq!(loaded.entry.name, "security");
        assert_eq!(loaded.documents.len(), 2);

        let err = load_entry(tmp.path(), Path::new("facets/missing"), &AuditConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::EntryNotFound(_))
        ));
    }
}
