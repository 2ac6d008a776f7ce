//! Category resolution for codex entries.
//!
//! Priority:
//! 1. `category` field in the frontmatter of any file in the entry
//! 2. `[categories]` override in config, keyed by entry directory name
//! 3. Keyword inference from the entry name and tags
//! 4. `default_category` from config

use codex_types::config::AuditConfig;
use codex_types::freshness::Category;

/// Keywords that map an entry name or tag to a category. First match wins,
/// so more specific topics come first.
const KEYWORDS: &[(&str, Category)] = &[
    ("security", Category::Security),
    ("auth", Category::Security),
    ("owasp", Category::Security),
    ("privacy", Category::Security),
    ("accessibility", Category::UxAccessibility),
    ("a11y", Category::UxAccessibility),
    ("i18n", Category::UxAccessibility),
    ("internationalization", Category::UxAccessibility),
    ("localization", Category::UxAccessibility),
    ("ux", Category::UxAccessibility),
    ("frontend", Category::Frontend),
    ("front-end", Category::Frontend),
    ("css", Category::Frontend),
    ("ui", Category::Frontend),
    ("data", Category::Data),
    ("analytics", Category::Data),
    ("database", Category::Data),
    ("process", Category::Process),
    ("code-review", Category::Process),
    ("testing", Category::Process),
    ("workflow", Category::Process),
    ("backend", Category::Backend),
    ("api", Category::Backend),
];

/// Infer a category from the entry name and tags.
///
/// Names and tags are split on `-`, `_` and whitespace; a keyword matches
/// either the whole value or one of its parts.
pub fn infer_category<'a>(name: &str, tags: impl IntoIterator<Item = &'a str>) -> Option<Category> {
    let mut values: Vec<String> = vec![name.to_ascii_lowercase()];
    values.extend(tags.into_iter().map(str::to_ascii_lowercase));

    KEYWORDS.iter().find_map(|(keyword, category)| {
        let hit = values.iter().any(|value| {
            value == keyword
                || value
                    .split(['-', '_', ' '])
                    .any(|part| part == *keyword)
        });
        hit.then_some(*category)
    })
}

/// Resolve an entry's category according to the priority order above.
pub fn resolve_category<'a>(
    frontmatter_category: Option<Category>,
    name: &str,
    tags: impl IntoIterator<Item = &'a str>,
    config: &AuditConfig,
) -> Category {
    if let Some(category) = frontmatter_category {
        return category;
    }
    if let Some(category) = config.categories.get(name) {
        return *category;
    }
    infer_category(name, tags).unwrap_or(config.default_category)
}
