//! Per-bookmark edit state.
//!
//! Each bookmark id has at most one slot. Every transition into an
//! in-flight phase issues a fresh ticket; a store response only gets to
//! change the slot if its ticket is still the one on record. Tickets are
//! never reused, so clearing the table also orphans every in-flight call.

use std::collections::HashMap;

use crate::error::{BookmarkError, Result};

pub(crate) type Ticket = u64;

/// An in-progress title edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub bookmark_id: String,
    /// Title in the index when the edit started.
    pub original_title: String,
    /// Last value submitted for saving, or the original title.
    pub pending_value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPhase {
    Idle,
    Editing,
    Saving,
    Deleting,
}

#[derive(Debug)]
enum SlotState {
    Editing(EditSession),
    Saving(EditSession),
    Deleting,
}

#[derive(Debug)]
struct Slot {
    ticket: Ticket,
    state: SlotState,
}

#[derive(Debug, Default)]
pub(crate) struct SessionTable {
    slots: HashMap<String, Slot>,
    last_ticket: Ticket,
}

impl SessionTable {
    fn issue(&mut self) -> Ticket {
        self.last_ticket += 1;
        self.last_ticket
    }

    pub(crate) fn phase(&self, id: &str) -> EditPhase {
        match self.slots.get(id).map(|slot| &slot.state) {
            None => EditPhase::Idle,
            Some(SlotState::Editing(_)) => EditPhase::Editing,
            Some(SlotState::Saving(_)) => EditPhase::Saving,
            Some(SlotState::Deleting) => EditPhase::Deleting,
        }
    }

    pub(crate) fn session(&self, id: &str) -> Option<&EditSession> {
        match &self.slots.get(id)?.state {
            SlotState::Editing(session) | SlotState::Saving(session) => Some(session),
            SlotState::Deleting => None,
        }
    }

    /// Opens an edit session, replacing an idle one for the same id.
    ///
    /// Returns the replaced session, if any.
    pub(crate) fn open(&mut self, session: EditSession) -> Result<Option<EditSession>> {
        let id = session.bookmark_id.clone();
        let replaced = match self.slots.get(&id).map(|slot| &slot.state) {
            Some(SlotState::Saving(_)) | Some(SlotState::Deleting) => {
                return Err(BookmarkError::Busy(id));
            }
            Some(SlotState::Editing(previous)) => Some(previous.clone()),
            None => None,
        };
        let ticket = self.issue();
        self.slots.insert(
            id,
            Slot {
                ticket,
                state: SlotState::Editing(session),
            },
        );
        Ok(replaced)
    }

    /// Moves an open session into the saving phase.
    pub(crate) fn begin_save(&mut self, id: &str, candidate: &str) -> Result<Ticket> {
        let ticket = self.issue();
        let Some(slot) = self.slots.get_mut(id) else {
            return Err(BookmarkError::NoActiveEdit(id.to_string()));
        };
        let SlotState::Editing(session) = &slot.state else {
            return Err(BookmarkError::Busy(id.to_string()));
        };
        let mut session = session.clone();
        session.pending_value = candidate.to_string();
        *slot = Slot {
            ticket,
            state: SlotState::Saving(session),
        };
        Ok(ticket)
    }

    /// Settles a save. A successful save closes the session, a failed one
    /// reopens it for another attempt.
    ///
    /// Returns false if `ticket` was superseded, in which case nothing changes.
    pub(crate) fn finish_save(&mut self, id: &str, ticket: Ticket, saved: bool) -> bool {
        let Some(slot) = self.slots.get_mut(id) else {
            return false;
        };
        if slot.ticket != ticket {
            return false;
        }
        let SlotState::Saving(session) = &slot.state else {
            return false;
        };
        if saved {
            self.slots.remove(id);
        } else {
            slot.state = SlotState::Editing(session.clone());
        }
        true
    }

    /// Closes an open edit session. Idle ids are left alone.
    pub(crate) fn cancel(&mut self, id: &str) -> Result<Option<EditSession>> {
        match self.slots.get(id).map(|slot| &slot.state) {
            None => Ok(None),
            Some(SlotState::Editing(_)) => match self.slots.remove(id) {
                Some(Slot {
                    state: SlotState::Editing(session),
                    ..
                }) => Ok(Some(session)),
                _ => Ok(None),
            },
            Some(_) => Err(BookmarkError::Busy(id.to_string())),
        }
    }

    /// Moves `id` into the deleting phase, closing any edit session.
    ///
    /// Returns the new ticket and the session that was closed.
    pub(crate) fn begin_delete(&mut self, id: &str) -> Result<(Ticket, Option<EditSession>)> {
        if self.phase(id) == EditPhase::Deleting {
            return Err(BookmarkError::Busy(id.to_string()));
        }
        let ticket = self.issue();
        let previous = self.slots.insert(
            id.to_string(),
            Slot {
                ticket,
                state: SlotState::Deleting,
            },
        );
        let closed = previous.and_then(|slot| match slot.state {
            SlotState::Editing(session) | SlotState::Saving(session) => Some(session),
            SlotState::Deleting => None,
        });
        Ok((ticket, closed))
    }

    /// Clears the deleting phase if `ticket` is still current.
    pub(crate) fn finish_delete(&mut self, id: &str, ticket: Ticket) -> bool {
        let current = self
            .slots
            .get(id)
            .is_some_and(|slot| slot.ticket == ticket && matches!(slot.state, SlotState::Deleting));
        if current {
            self.slots.remove(id);
        }
        current
    }

    /// Drops every slot. Returns how many there were.
    pub(crate) fn clear(&mut self) -> usize {
        let count = self.slots.len();
        self.slots.clear();
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(id: &str, title: &str) -> EditSession {
        EditSession {
            bookmark_id: id.to_string(),
            original_title: title.to_string(),
            pending_value: title.to_string(),
        }
    }

    #[test]
    fn open_replaces_editing_session() {
        let mut table = SessionTable::default();
        assert_eq!(table.open(session("1", "A")).expect("open"), None);
        let replaced = table.open(session("1", "B")).expect("reopen");
        assert_eq!(replaced.map(|s| s.original_title), Some("A".to_string()));
        assert_eq!(table.session("1").map(|s| s.original_title.as_str()), Some("B"));
    }

    #[test]
    fn save_requires_open_session() {
        let mut table = SessionTable::default();
        let error = table.begin_save("1", "x").expect_err("no session");
        assert!(matches!(error, BookmarkError::NoActiveEdit(id) if id == "1"));
    }

    #[test]
    fn saving_blocks_second_save_and_reopen() {
        let mut table = SessionTable::default();
        table.open(session("1", "A")).expect("open");
        table.begin_save("1", "B").expect("save");

        assert_eq!(table.phase("1"), EditPhase::Saving);
        assert!(matches!(table.begin_save("1", "C"), Err(BookmarkError::Busy(_))));
        assert!(matches!(table.open(session("1", "A")), Err(BookmarkError::Busy(_))));
        assert!(matches!(table.cancel("1"), Err(BookmarkError::Busy(_))));
    }

    #[test]
    fn failed_save_reopens_session_with_candidate() {
        let mut table = SessionTable::default();
        table.open(session("1", "A")).expect("open");
        let ticket = table.begin_save("1", "B").expect("save");

        assert!(table.finish_save("1", ticket, false));
        assert_eq!(table.phase("1"), EditPhase::Editing);
        assert_eq!(table.session("1").map(|s| s.pending_value.as_str()), Some("B"));
    }

    #[test]
    fn delete_supersedes_in_flight_save() {
        let mut table = SessionTable::default();
        table.open(session("1", "A")).expect("open");
        let save_ticket = table.begin_save("1", "B").expect("save");

        let (delete_ticket, closed) = table.begin_delete("1").expect("delete");
        assert_eq!(closed.map(|s| s.pending_value), Some("B".to_string()));
        assert!(matches!(table.begin_delete("1"), Err(BookmarkError::Busy(_))));

        assert!(table.finish_delete("1", delete_ticket));
        assert!(!table.finish_save("1", save_ticket, true));
        assert_eq!(table.phase("1"), EditPhase::Idle);
    }

    #[test]
    fn clear_orphans_in_flight_tickets() {
        let mut table = SessionTable::default();
        table.open(session("1", "A")).expect("open");
        let ticket = table.begin_save("1", "B").expect("save");

        assert_eq!(table.clear(), 1);
        table.open(session("1", "A")).expect("open again");
        assert!(!table.finish_save("1", ticket, true));
        assert_eq!(table.phase("1"), EditPhase::Editing);
    }

    #[test]
    fn cancel_idle_is_noop() {
        let mut table = SessionTable::default();
        assert_eq!(table.cancel("1").expect("cancel"), None);
    }
}
