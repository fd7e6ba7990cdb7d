//! Flattening of the bookmark tree into index entries.
//!
//! The walk is a preorder depth-first traversal in source order, so the
//! resulting entries are ordered exactly as the tree lists them. Each
//! bookmark's location is the chain of ancestor folder titles, skipping the
//! reserved root folders.

use crate::config::IndexConfig;
use crate::types::{BookmarkEntry, BookmarkNode};

/// Flattens `roots` into one entry per bookmark, in preorder.
pub fn flatten_tree(roots: &[BookmarkNode], config: &IndexConfig) -> Vec<BookmarkEntry> {
    let mut entries = Vec::new();
    collect_entries(roots, &[], config, &mut entries);
    entries
}

fn collect_entries<'a>(
    nodes: &'a [BookmarkNode],
    path: &[&'a str],
    config: &IndexConfig,
    entries: &mut Vec<BookmarkEntry>,
) {
    for node in nodes {
        if let Some(url) = node.url.as_deref() {
            entries.push(BookmarkEntry {
                id: node.id.clone(),
                title: node.title.clone(),
                url: url.to_string(),
                path: join_path(path, config),
                parent_id: node.parent_id.clone().unwrap_or_default(),
            });
        }

        if let Some(children) = node.children.as_deref() {
            // Copied so each sibling starts again from its parent's path.
            let mut current = path.to_vec();
            if !config.reserved_root_ids.contains(&node.id) {
                current.push(node.title.as_str());
            }
            collect_entries(children, &current, config, entries);
        }
    }
}

/// Joins ancestor folder titles, or the default label when there are none.
fn join_path(segments: &[&str], config: &IndexConfig) -> String {
    if segments.is_empty() {
        config.default_path_label.clone()
    } else {
        segments.join(config.path_separator.as_str())
    }
}
