//! Optimistic Mutations
//!
//! Insert before the server answers, then either swap in the server's
//! version at the same position or take the change back.

use tracing::{debug, warn};

use crate::entity::{Entity, EntityId, EntryKey, TempIdGenerator};
use crate::paged::{Entry, PagedList};

/// An optimistically inserted entity awaiting the server
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Pending {
    pub key: EntryKey,
    pub temp_id: EntityId,
}

/// An entry taken out of a list, with enough to put it back where it was
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Removal<T> {
    pub index: usize,
    pub entry: Entry<T>,
}

impl<T> Removal<T> {
    pub fn value(&self) -> &T {
        &self.entry.value
    }
}

impl<T: Entity> PagedList<T> {
    /// Insert `value` under a fresh temporary id at the head of the list
    pub fn insert_front(&mut self, temp_ids: &mut TempIdGenerator, mut value: T) -> Pending {
        let temp_id = temp_ids.next_id();
        value.set_id(temp_id.clone());
        let key = self.allocate_key();
        self.entries.insert(0, Entry { key, value });
        debug!(%temp_id, "optimistic insert (front)");
        Pending { key, temp_id }
    }

    /// Insert `value` under a fresh temporary id at the tail of the list
    pub fn insert_back(&mut self, temp_ids: &mut TempIdGenerator, mut value: T) -> Pending {
        let temp_id = temp_ids.next_id();
        value.set_id(temp_id.clone());
        let key = self.allocate_key();
        self.entries.push(Entry { key, value });
        debug!(%temp_id, "optimistic insert (back)");
        Pending { key, temp_id }
    }

    /// Replace a pending entry with the server's version, in place
    ///
    /// The entry keeps its key and index. If the server entity already
    /// reached the list by another route (a page fetch or realtime push),
    /// that other copy is dropped so ids stay unique.
    pub fn reconcile(&mut self, pending: &Pending, confirmed: T) -> bool {
        let server_id = confirmed.id().clone();
        let Some(index) = self.position(pending.key) else {
            warn!(temp_id = %pending.temp_id, "reconcile target no longer cached");
            return false;
        };
        self.entries[index].value = confirmed;
        let key = pending.key;
        self.entries.retain(|entry| entry.key == key || entry.value.id() != &server_id);
        debug!(temp_id = %pending.temp_id, %server_id, "optimistic entry reconciled");
        true
    }

    /// Drop a pending entry after its create request failed
    pub fn discard(&mut self, pending: &Pending) -> Option<T> {
        let index = self.position(pending.key)?;
        warn!(temp_id = %pending.temp_id, "optimistic entry rolled back");
        Some(self.entries.remove(index).value)
    }

    /// Take an entry out of the list ahead of a delete request
    pub fn remove(&mut self, key: EntryKey) -> Option<Removal<T>> {
        let index = self.position(key)?;
        let entry = self.entries.remove(index);
        Some(Removal { index, entry })
    }

    /// Put a removed entry back at its original index (clamped to the end)
    pub fn restore(&mut self, removal: Removal<T>) {
        if self.contains_id(removal.entry.value.id()) {
            return;
        }
        let index = removal.index.min(self.entries.len());
        warn!(id = %removal.entry.value.id(), index, "removal rolled back");
        self.entries.insert(index, removal.entry);
    }
}
