//! In-memory bookmark store.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::BookmarkStore;
use crate::config::ReservedRoots;
use crate::error::{BookmarkError, Result, StoreError, StoreResult};
use crate::types::BookmarkNode;

const UNKNOWN_ID_MESSAGE: &str = "Can't find bookmark for id.";
const ROOT_FOLDER_MESSAGE: &str = "Can't modify the root bookmark folders.";
const NON_EMPTY_FOLDER_MESSAGE: &str = "Can't remove non-empty folder (use recursive to force).";

/// A bookmark tree held in memory.
///
/// Rejects the same requests a browser store would: unknown ids, edits to
/// the reserved root folders, and removal of folders that still have
/// children.
#[derive(Debug)]
pub struct MemoryBookmarkStore {
    roots: Mutex<Vec<BookmarkNode>>,
    reserved: ReservedRoots,
}

impl MemoryBookmarkStore {
    pub fn new(roots: Vec<BookmarkNode>) -> Self {
        Self::with_reserved_roots(roots, ReservedRoots::default())
    }

    pub fn with_reserved_roots(roots: Vec<BookmarkNode>, reserved: ReservedRoots) -> Self {
        Self {
            roots: Mutex::new(roots),
            reserved,
        }
    }

    /// Parses the JSON array produced by the browser's `getTree`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let roots: Vec<BookmarkNode> = serde_json::from_str(raw).map_err(|error| {
            BookmarkError::Serialization(format!("invalid bookmark tree: {error}"))
        })?;
        Ok(Self::new(roots))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Copy of the current tree.
    pub fn snapshot(&self) -> Vec<BookmarkNode> {
        self.roots.lock().clone()
    }

    fn ensure_mutable(&self, id: &str) -> StoreResult<()> {
        if self.reserved.contains(id) {
            return Err(StoreError::new(ROOT_FOLDER_MESSAGE));
        }
        Ok(())
    }
}

#[async_trait]
impl BookmarkStore for MemoryBookmarkStore {
    async fn fetch_tree(&self) -> StoreResult<Vec<BookmarkNode>> {
        Ok(self.snapshot())
    }

    async fn update_title(&self, id: &str, title: &str) -> StoreResult<BookmarkNode> {
        self.ensure_mutable(id)?;
        let mut roots = self.roots.lock();
        let node =
            find_node_mut(&mut roots, id).ok_or_else(|| StoreError::new(UNKNOWN_ID_MESSAGE))?;
        node.title = title.to_string();
        Ok(node.clone())
    }

    async fn remove(&self, id: &str) -> StoreResult<()> {
        self.ensure_mutable(id)?;
        let mut roots = self.roots.lock();
        match remove_node(&mut roots, id) {
            Some(Ok(_)) => Ok(()),
            Some(Err(error)) => Err(error),
            None => Err(StoreError::new(UNKNOWN_ID_MESSAGE)),
        }
    }
}

fn find_node_mut<'a>(nodes: &'a mut [BookmarkNode], id: &str) -> Option<&'a mut BookmarkNode> {
    for node in nodes.iter_mut() {
        if node.id == id {
            return Some(node);
        }
        if let Some(children) = node.children.as_deref_mut() {
            if let Some(found) = find_node_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

fn remove_node(nodes: &mut Vec<BookmarkNode>, id: &str) -> Option<StoreResult<BookmarkNode>> {
    if let Some(pos) = nodes.iter().position(|node| node.id == id) {
        if !nodes[pos].children().is_empty() {
            return Some(Err(StoreError::new(NON_EMPTY_FOLDER_MESSAGE)));
        }
        return Some(Ok(nodes.remove(pos)));
    }
    for node in nodes.iter_mut() {
        if let Some(children) = node.children.as_mut() {
            if let Some(result) = remove_node(children, id) {
                return Some(result);
            }
        }
    }
    None
}
