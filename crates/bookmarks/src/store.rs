//! The external bookmark store.
//!
//! The index never owns bookmark data; it mirrors what the store reports.
//! `BookmarkStore` abstracts the browser's bookmark API so the coordinator
//! can be driven by anything that speaks the same CRUD contract.

mod memory;

use async_trait::async_trait;

use crate::error::StoreResult;
use crate::types::BookmarkNode;

pub use memory::MemoryBookmarkStore;

#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Returns the top-level nodes of the bookmark tree.
    async fn fetch_tree(&self) -> StoreResult<Vec<BookmarkNode>>;

    /// Renames `id` and returns the updated node.
    async fn update_title(&self, id: &str, title: &str) -> StoreResult<BookmarkNode>;

    async fn remove(&self, id: &str) -> StoreResult<()>;
}
