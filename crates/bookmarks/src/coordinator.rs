//! Edit and delete coordination against the external store.
//!
//! The coordinator owns the index and is the only thing that mutates it
//! after a load. Store calls are the only suspension points; the index and
//! session locks are never held across them. Changes are confirm-then-apply:
//! nothing touches the index until the store has reported success, and a
//! response whose ticket was superseded in the meantime is discarded.

mod session;


use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::broadcast;

use crate::config::IndexConfig;
use crate::error::{BookmarkError, Result};
use crate::events::{IndexEvent, IndexEvents};
use crate::index::BookmarkIndex;
use crate::store::BookmarkStore;
use crate::types::BookmarkEntry;
use crate::view::ViewSnapshot;

use session::SessionTable;
pub use session::{EditPhase, EditSession};

/// Asks the user whether a bookmark should really be removed.
pub trait DeleteConfirmation {
    fn confirm(&self, entry: &BookmarkEntry) -> bool;
}

impl<F> DeleteConfirmation for F
where
    F: Fn(&BookmarkEntry) -> bool,
{
    fn confirm(&self, entry: &BookmarkEntry) -> bool {
        self(entry)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The store accepted the title and the index now carries it.
    Saved(BookmarkEntry),
    /// The session was closed while the store call was in flight (by a
    /// delete or a reload). The response was dropped, but the store may
    /// still have applied the title; call `load` to resynchronize.
    Superseded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user did not confirm; nothing was sent to the store.
    Declined,
    /// The store removed the bookmark, but a reload or a newer delete took
    /// over the slot while the call was in flight. The index no longer
    /// carries the entry either way.
    Superseded,
}

pub struct EditCoordinator {
    store: Arc<dyn BookmarkStore>,
    config: IndexConfig,
    index: Mutex<BookmarkIndex>,
    sessions: Mutex<SessionTable>,
    events: IndexEvents,
}

impl std::fmt::Debug for EditCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditCoordinator")
            .field("config", &self.config)
            .field("index", &self.index)
            .field("sessions", &self.sessions)
            .field("store", &"<store>")
            .finish()
    }
}

impl EditCoordinator {
    pub fn new(store: Arc<dyn BookmarkStore>, config: IndexConfig) -> Self {
        let events = IndexEvents::new(config.event_capacity.max(1));
        Self {
            store,
            config,
            index: Mutex::new(BookmarkIndex::new()),
            sessions: Mutex::new(SessionTable::default()),
            events,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<IndexEvent> {
        self.events.subscribe()
    }

    /// Fetches the tree and rebuilds the index from it.
    ///
    /// On failure the previous index is kept as is. On success every open
    /// session is dropped and in-flight responses will be discarded.
    pub async fn load(&self) -> Result<Vec<BookmarkEntry>> {
        let roots = self.store.fetch_tree().await.map_err(|error| {
            tracing::warn!(%error, "bookmark tree fetch failed");
            BookmarkError::Load(error)
        })?;

        let entries = self.index.lock().rebuild(&roots, &self.config).to_vec();
        let dropped_sessions = self.sessions.lock().clear();

        tracing::info!(
            total = entries.len(),
            dropped_sessions,
            "bookmark index loaded"
        );
        self.events.publish(IndexEvent::Loaded {
            total: entries.len(),
        });
        Ok(entries)
    }

    /// Applies `query` to the index. Returns the number of matches.
    pub fn search(&self, query: &str) -> usize {
        let matched = self.index.lock().apply_search(query);
        tracing::debug!(query, matched, "bookmark filter applied");
        self.events.publish(IndexEvent::FilterChanged {
            query: query.to_string(),
            matched,
        });
        matched
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::from_index(&self.index.lock())
    }

    pub fn find(&self, id: &str) -> Option<BookmarkEntry> {
        self.index.lock().find_by_id(id).cloned()
    }

    pub fn phase(&self, id: &str) -> EditPhase {
        self.sessions.lock().phase(id)
    }

    pub fn session(&self, id: &str) -> Option<EditSession> {
        self.sessions.lock().session(id).cloned()
    }

    /// Opens an edit session for `id`, replacing an existing idle one.
    pub fn start_edit(&self, id: &str) -> Result<EditSession> {
        let original_title = self
            .index
            .lock()
            .find_by_id(id)
            .map(|entry| entry.title.clone())
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;

        let session = EditSession {
            bookmark_id: id.to_string(),
            pending_value: original_title.clone(),
            original_title,
        };
        let replaced = self.sessions.lock().open(session.clone())?;
        tracing::debug!(id, replaced = replaced.is_some(), "edit session opened");
        Ok(session)
    }

    /// Saves `candidate` as the title of `id`.
    ///
    /// Blank titles are rejected before anything else happens. On store
    /// failure the session stays open and the index is untouched.
    pub async fn request_save(&self, id: &str, candidate: &str) -> Result<SaveOutcome> {
        if candidate.trim().is_empty() {
            return Err(BookmarkError::EmptyTitle);
        }

        let ticket = self.sessions.lock().begin_save(id, candidate)?;
        tracing::debug!(id, ticket, "saving bookmark title");

        let result = self.store.update_title(id, candidate).await;

        let mut sessions = self.sessions.lock();
        match result {
            Ok(_) => {
                if !sessions.finish_save(id, ticket, true) {
                    tracing::debug!(id, ticket, "discarding superseded save response");
                    return Ok(SaveOutcome::Superseded);
                }
                let entry = {
                    let mut index = self.index.lock();
                    index.apply_title_update(id, candidate);
                    index.find_by_id(id).cloned()
                };
                drop(sessions);

                let Some(entry) = entry else {
                    tracing::debug!(id, "saved bookmark is no longer indexed");
                    return Ok(SaveOutcome::Superseded);
                };
                tracing::info!(id, "bookmark title saved");
                self.events.publish(IndexEvent::TitleUpdated { id: id.to_string() });
                Ok(SaveOutcome::Saved(entry))
            }
            Err(source) => {
                if !sessions.finish_save(id, ticket, false) {
                    tracing::debug!(id, ticket, %source, "discarding superseded save failure");
                    return Ok(SaveOutcome::Superseded);
                }
                tracing::warn!(id, error = %source, "bookmark title save failed");
                Err(BookmarkError::Save {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }

    /// Closes the edit session for `id` without saving.
    ///
    /// Returns the title the display should revert to, or `None` if there
    /// was no session.
    pub fn cancel_edit(&self, id: &str) -> Result<Option<String>> {
        let Some(closed) = self.sessions.lock().cancel(id)? else {
            return Ok(None);
        };
        tracing::debug!(id, "edit session cancelled");
        let title = self
            .index
            .lock()
            .find_by_id(id)
            .map(|entry| entry.title.clone())
            .unwrap_or(closed.original_title);
        Ok(Some(title))
    }

    /// Removes `id` from the store once `confirm` approves it.
    ///
    /// An open edit session for the same id is closed silently, and a save
    /// still in flight for it will be discarded when it returns.
    pub async fn request_delete<C>(&self, id: &str, confirm: &C) -> Result<DeleteOutcome>
    where
        C: DeleteConfirmation + ?Sized,
    {
        let entry = self
            .find(id)
            .ok_or_else(|| BookmarkError::NotFound(id.to_string()))?;
        if self.phase(id) == EditPhase::Deleting {
            return Err(BookmarkError::Busy(id.to_string()));
        }
        if !confirm.confirm(&entry) {
            tracing::debug!(id, "bookmark deletion declined");
            return Ok(DeleteOutcome::Declined);
        }

        let (ticket, closed) = self.sessions.lock().begin_delete(id)?;
        tracing::debug!(id, ticket, closed_session = closed.is_some(), "deleting bookmark");

        let result = self.store.remove(id).await;

        let mut sessions = self.sessions.lock();
        let current = sessions.finish_delete(id, ticket);
        match result {
            Ok(()) => {
                // The store confirmed the removal, so it is applied even if
                // a reload raced it.
                let removed = self.index.lock().apply_deletion(id);
                drop(sessions);
                tracing::info!(id, current, "bookmark deleted");
                if removed {
                    self.events.publish(IndexEvent::Removed { id: id.to_string() });
                }
                if current {
                    Ok(DeleteOutcome::Deleted)
                } else {
                    Ok(DeleteOutcome::Superseded)
                }
            }
            Err(source) => {
                tracing::warn!(id, current, error = %source, "bookmark deletion failed");
                Err(BookmarkError::Delete {
                    id: id.to_string(),
                    source,
                })
            }
        }
    }
}
