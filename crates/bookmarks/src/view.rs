//! What the rendering layer gets to draw.

use crate::index::BookmarkIndex;
use crate::types::BookmarkEntry;

/// Formats the bookmark count line.
pub fn count_label(total: usize, matched: usize, is_searching: bool) -> String {
    if is_searching {
        format!("找到 {matched} / {total} 个书签")
    } else {
        format!("共 {total} 个书签")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSnapshot {
    pub total: usize,
    pub matched: usize,
    pub is_searching: bool,
    /// Filtered entries in display order.
    pub entries: Vec<BookmarkEntry>,
    pub label: String,
}

impl ViewSnapshot {
    pub fn from_index(index: &BookmarkIndex) -> Self {
        let total = index.len();
        let matched = index.filtered_len();
        let is_searching = index.is_searching();
        Self {
            total,
            matched,
            is_searching,
            entries: index.filtered().into_iter().cloned().collect(),
            label: count_label(total, matched, is_searching),
        }
    }

    /// The "no results" panel only shows for a search that matched nothing.
    pub fn show_no_results(&self) -> bool {
        self.is_searching && self.entries.is_empty()
    }
}
