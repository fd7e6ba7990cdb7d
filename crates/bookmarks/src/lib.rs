//! Bookmark indexing, search, and edit coordination library.
//!
//! This crate provides the core of a bookmark browser:
//! - Flattening of a hierarchical bookmark tree into an ordered index
//! - Location paths computed from ancestor folder titles
//! - Case-insensitive substring search over title, URL and path
//! - Per-bookmark edit/delete coordination against an external store

pub mod config;
pub mod coordinator;
pub mod error;
pub mod events;
pub mod index;
pub mod path;
pub mod search;
pub mod store;
pub mod types;
pub mod view;

// Re-export main types
pub use config::{IndexConfig, ReservedRoots};
pub use coordinator::{
    DeleteConfirmation, DeleteOutcome, EditCoordinator, EditPhase, EditSession, SaveOutcome,
};
pub use error::{BookmarkError, Result, StoreError, StoreResult};
pub use events::{IndexEvent, IndexEvents};
pub use index::BookmarkIndex;
pub use path::flatten_tree;
pub use search::{search, SearchQuery};
pub use store::{BookmarkStore, MemoryBookmarkStore};
pub use types::{BookmarkEntry, BookmarkNode};
pub use view::{count_label, ViewSnapshot};
