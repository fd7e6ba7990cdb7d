//! The flat bookmark index and its filtered view.
//!
//! `all` is authoritative and ordered by tree preorder. The filtered view is
//! stored as positions into `all`, so it can never name an entry that is not
//! in the index. Any change to `all` recomputes the view from the active
//! query, or from the published id set, instead of patching it.

use std::collections::HashSet;

use crate::config::IndexConfig;
use crate::path::flatten_tree;
use crate::search::SearchQuery;
use crate::types::{BookmarkEntry, BookmarkNode};

#[derive(Debug, Default)]
pub struct BookmarkIndex {
    all: Vec<BookmarkEntry>,
    filtered: Vec<usize>,
    query: SearchQuery,
    /// Set by `set_filtered_view`; takes precedence over `query` until the
    /// next search or rebuild.
    published: Option<HashSet<String>>,
}

impl BookmarkIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the index with a fresh flattening of `roots`.
    ///
    /// Clears the active query, so the filtered view is everything.
    pub fn rebuild(&mut self, roots: &[BookmarkNode], config: &IndexConfig) -> &[BookmarkEntry] {
        self.all = flatten_tree(roots, config);
        self.query = SearchQuery::default();
        self.published = None;
        self.refilter();
        &self.all
    }

    pub fn all(&self) -> &[BookmarkEntry] {
        &self.all
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    pub fn filtered(&self) -> Vec<&BookmarkEntry> {
        self.filtered.iter().map(|&pos| &self.all[pos]).collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn query(&self) -> &SearchQuery {
        &self.query
    }

    pub fn is_searching(&self) -> bool {
        self.published.is_some() || !self.query.is_passthrough()
    }

    pub fn find_by_id(&self, id: &str) -> Option<&BookmarkEntry> {
        self.all.iter().find(|entry| entry.id == id)
    }

    /// Sets the title of `id` if it is still indexed.
    ///
    /// Returns false when the entry is gone; the store may already have
    /// removed it, which is not an error here.
    pub fn apply_title_update(&mut self, id: &str, title: &str) -> bool {
        let Some(entry) = self.all.iter_mut().find(|entry| entry.id == id) else {
            return false;
        };
        entry.title = title.to_string();
        self.refilter();
        true
    }

    /// Removes `id` from the index. Removing an absent id is a no-op.
    pub fn apply_deletion(&mut self, id: &str) -> bool {
        let before = self.all.len();
        self.all.retain(|entry| entry.id != id);
        if self.all.len() == before {
            return false;
        }
        if let Some(published) = self.published.as_mut() {
            published.remove(id);
        }
        self.refilter();
        true
    }

    /// Makes `query` the active query and recomputes the filtered view.
    ///
    /// Returns the number of matching entries.
    pub fn apply_search(&mut self, query: &str) -> usize {
        self.query = SearchQuery::parse(query);
        self.published = None;
        self.refilter();
        self.filtered.len()
    }

    /// Publishes an externally computed view.
    ///
    /// Ids that are not indexed are dropped and the view keeps index order.
    /// The view survives later title updates and deletions (minus the
    /// deleted ids) until the next `apply_search` or `rebuild`.
    pub fn set_filtered_view<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let published = ids
            .into_iter()
            .filter(|id| self.find_by_id(id.as_ref()).is_some())
            .map(|id| id.as_ref().to_string())
            .collect::<HashSet<_>>();
        self.published = Some(published);
        self.refilter();
    }

    fn refilter(&mut self) {
        let published = self.published.as_ref();
        self.filtered = self
            .all
            .iter()
            .enumerate()
            .filter(|(_, entry)| match published {
                Some(ids) => ids.contains(&entry.id),
                None => self.query.matches(entry),
            })
            .map(|(pos, _)| pos)
            .collect();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> Vec<BookmarkNode> {
        vec![BookmarkNode::folder(
            "0",
            "",
            vec![BookmarkNode::folder(
                "1",
                "书签栏",
                vec![
                    BookmarkNode::folder(
                        "10",
                        "Work",
                        vec![
                            BookmarkNode::bookmark("11", "Jira", "https://jira.example"),
                            BookmarkNode::bookmark("12", "Wiki", "https://wiki.example"),
                        ],
                    ),
                    BookmarkNode::bookmark("13", "News", "https://news.example"),
                ],
            )],
        )]
    }

    fn loaded() -> BookmarkIndex {
        let mut index = BookmarkIndex::new();
        index.rebuild(&tree(), &IndexConfig::default());
        index
    }

    fn filtered_ids(index: &BookmarkIndex) -> Vec<&str> {
        index.filtered().iter().map(|e| e.id.as_str()).collect()
    }

    fn assert_filtered_subset(index: &BookmarkIndex) {
        for entry in index.filtered() {
            assert!(index.find_by_id(&entry.id).is_some(), "{} not in all", entry.id);
        }
    }

    #[test]
    fn rebuild_resets_filtered_to_all() {
        let mut index = loaded();
        index.apply_search("wiki");
        assert_eq!(index.filtered_len(), 1);

        let entries = index.rebuild(&tree(), &IndexConfig::default());
        assert_eq!(entries.len(), 3);
        assert_eq!(index.filtered_len(), 3);
        assert!(!index.is_searching());
    }

    #[test]
    fn find_by_id_returns_entry_or_none() {
        let index = loaded();
        assert_eq!(index.find_by_id("12").map(|e| e.title.as_str()), Some("Wiki"));
        assert!(index.find_by_id("10").is_none());
        assert!(index.find_by_id("missing").is_none());
    }

    #[test]
    fn title_update_touches_only_its_entry() {
        let mut index = loaded();
        let before = index.all().to_vec();

        assert!(index.apply_title_update("11", "New"));
        assert_eq!(index.find_by_id("11").map(|e| e.title.as_str()), Some("New"));
        for (old, new) in before.iter().zip(index.all()) {
            if old.id != "11" {
                assert_eq!(old, new);
            }
        }
    }

    #[test]
    fn title_update_for_missing_id_is_noop() {
        let mut index = loaded();
        let before = index.all().to_vec();
        assert!(!index.apply_title_update("gone", "New"));
        assert_eq!(index.all(), before.as_slice());
    }

    #[test]
    fn title_update_reapplies_active_query() {
        let mut index = loaded();
        index.apply_search("jira");
        assert_eq!(filtered_ids(&index), vec!["11"]);

        index.apply_title_update("11", "Tracker");
        // Still matches through its URL.
        assert_eq!(filtered_ids(&index), vec!["11"]);

        index.apply_search("tracker");
        index.apply_title_update("11", "Issues");
        assert!(filtered_ids(&index).is_empty());
    }

    #[test]
    fn deletion_is_idempotent() {
        let mut once = loaded();
        assert!(once.apply_deletion("12"));

        let mut twice = loaded();
        twice.apply_deletion("12");
        assert!(!twice.apply_deletion("12"));

        assert_eq!(once.all(), twice.all());
        assert_eq!(filtered_ids(&once), filtered_ids(&twice));
        assert_filtered_subset(&twice);
    }

    #[test]
    fn deletion_removes_from_filtered_view() {
        let mut index = loaded();
        index.apply_search("example");
        assert_eq!(index.filtered_len(), 3);

        index.apply_deletion("11");
        assert_eq!(filtered_ids(&index), vec!["12", "13"]);
        assert_filtered_subset(&index);
    }

    #[test]
    fn set_filtered_view_drops_unknown_ids_and_keeps_order() {
        let mut index = loaded();
        index.set_filtered_view(["13", "missing", "11", "13"]);
        assert_eq!(filtered_ids(&index), vec!["11", "13"]);
        assert_filtered_subset(&index);
    }

    #[test]
    fn published_view_survives_deletion_and_rename() {
        let mut index = loaded();
        index.set_filtered_view(["12", "13"]);
        assert!(index.is_searching());

        index.apply_deletion("11");
        assert_eq!(filtered_ids(&index), vec!["12", "13"]);

        index.apply_deletion("12");
        assert_eq!(filtered_ids(&index), vec!["13"]);

        index.apply_title_update("13", "Headlines");
        assert_eq!(filtered_ids(&index), vec!["13"]);
        assert_filtered_subset(&index);
    }

    #[test]
    fn published_view_is_not_widened_by_deletion() {
        let mut index = loaded();
        index.set_filtered_view(["13"]);

        index.apply_deletion("11");
        assert_eq!(filtered_ids(&index), vec!["13"]);
        assert!(index.is_searching());
    }

    #[test]
    fn search_replaces_published_view() {
        let mut index = loaded();
        index.set_filtered_view(["13"]);
        assert_eq!(index.apply_search(""), 3);
        assert!(!index.is_searching());

        index.set_filtered_view(["11"]);
        index.rebuild(&tree(), &IndexConfig::default());
        assert_eq!(index.filtered_len(), 3);
        assert!(!index.is_searching());
    }

    #[test]
    fn apply_search_reports_matches() {
        let mut index = loaded();
        assert_eq!(index.apply_search("WORK"), 2);
        assert!(index.is_searching());
        assert_eq!(index.apply_search(""), 3);
        assert!(!index.is_searching());
    }
}
