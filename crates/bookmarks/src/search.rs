//! Substring search over the flat index.

use crate::types::BookmarkEntry;

/// A compiled search query.
///
/// The needle is trimmed and lowercased once; an empty needle means the
/// query passes every entry through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    raw: String,
    needle: Option<String>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let needle = (!trimmed.is_empty()).then(|| trimmed.to_lowercase());
        Self {
            raw: raw.to_string(),
            needle,
        }
    }

    /// The query text as the user typed it.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_passthrough(&self) -> bool {
        self.needle.is_none()
    }

    /// Returns true when the entry's title, URL or path contains the needle,
    /// ignoring case.
    pub fn matches(&self, entry: &BookmarkEntry) -> bool {
        let Some(needle) = self.needle.as_deref() else {
            return true;
        };
        contains_lowercase(&entry.title, needle)
            || contains_lowercase(&entry.url, needle)
            || contains_lowercase(&entry.path, needle)
    }
}

fn contains_lowercase(haystack: &str, needle: &str) -> bool {
    !haystack.is_empty() && haystack.to_lowercase().contains(needle)
}

/// Filters `entries` by `query`, keeping input order.
pub fn search<'a>(entries: &'a [BookmarkEntry], query: &str) -> Vec<&'a BookmarkEntry> {
    let query = SearchQuery::parse(query);
    if query.is_passthrough() {
        return entries.iter().collect();
    }
    entries.iter().filter(|entry| query.matches(entry)).collect()
}
