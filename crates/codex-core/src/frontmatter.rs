//! YAML frontmatter extraction, parsing and `last_updated` rewriting.
//!
//! Codex articles start with a block delimited by `---` lines:
//!
//! ```text
//! ---
//! title: Security
//! type: facet
//! last_updated: 2025-08-15
//! tags: [auth, owasp]
//! ---
//! # Security
//! ```

use std::ops::Range;

use chrono::NaiveDate;
use codex_types::entry::Frontmatter;
use codex_types::error::FrontmatterError;

/// Location of the frontmatter block inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontmatterBlock<'a> {
    /// YAML text between the delimiters (including its trailing newline).
    pub yaml: &'a str,
    /// Byte range of `yaml` within the document.
    pub yaml_range: Range<usize>,
    /// Markdown body after the closing delimiter, leading blank lines trimmed.
    pub body: &'a str,
}

/// Locate the frontmatter block of a markdown document.
///
/// The first line (after an optional BOM) must be exactly `---`; the block
/// ends at the next line that is exactly `---`.
pub fn extract_frontmatter(content: &str) -> Result<FrontmatterBlock<'_>, FrontmatterError> {
    let content_start = if content.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let rest = &content[content_start..];
    let first_line_end = rest.find('\n').unwrap_or(rest.len());
    if rest[..first_line_end].trim_end() != "---" {
        return Err(FrontmatterError::Missing);
    }

    let yaml_start = content_start + (first_line_end + 1).min(rest.len());
    let mut offset = yaml_start;
    for line in content[yaml_start..].split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body_start = offset + line.len();
            return Ok(FrontmatterBlock {
                yaml: &content[yaml_start..offset],
                yaml_range: yaml_start..offset,
                body: content[body_start..].trim_start_matches(['\r', '\n']),
            });
        }
        offset += line.len();
    }

    Err(FrontmatterError::Unterminated)
}

/// Parse the frontmatter of a document.
///
/// An empty block yields `Frontmatter::default()`.
pub fn parse_frontmatter(content: &str) -> Result<Frontmatter, FrontmatterError> {
    let block = extract_frontmatter(content)?;
    if block.yaml.trim().is_empty() {
        return Ok(Frontmatter::default());
    }
    serde_yaml_ng::from_str(block.yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))
}

/// Return `content` with its top-level `last_updated` set to `date`.
///
/// Replaces an existing `last_updated:` line or inserts one before the
/// closing delimiter. Without frontmatter, a minimal block is prepended only
/// when `add_missing` is true; otherwise `None` is returned. The rest of the
/// document is left byte-identical.
pub fn set_last_updated(content: &str, date: NaiveDate, add_missing: bool) -> Option<String> {
    let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let field = format!("last_updated: {}", date.format("%Y-%m-%d"));

    let block = match extract_frontmatter(content) {
        Ok(block) => block,
        Err(FrontmatterError::Missing) if add_missing => {
            return Some(format!("---{newline}{field}{newline}---{newline}{newline}{content}"));
        }
        Err(_) => return None,
    };

    let mut offset = block.yaml_range.start;
    for line in block.yaml.split_inclusive('\n') {
        if line.starts_with("last_updated:") {
            let line_body_len = line.trim_end_matches(['\r', '\n']).len();
            let mut updated = String::with_capacity(content.len() + field.len());
            updated.push_str(&content[..offset]);
            updated.push_str(&field);
            updated.push_str(&content[offset + line_body_len..]);
            return Some(updated);
        }
        offset += line.len();
    }

    let insert_at = block.yaml_range.end;
    let mut updated = String::with_capacity(content.len() + field.len() + 2);
    updated.push_str(&content[..insert_at]);
    updated.push_str(&field);
    updated.push_str(newline);
    updated.push_str(&content[insert_at..]);
    Some(updated)
}
