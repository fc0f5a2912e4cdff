//! Notification State

use tracing::warn;

use crate::entity::EntryKey;
use crate::models::{Notification, SeenStatus};
use crate::optimistic::Removal;
use crate::paged::PagedList;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotificationState {
    pub list: PagedList<Notification>,
}

/// A seen-status change that can be taken back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct SeenChange {
    pub key: EntryKey,
    pub previous: SeenStatus,
}

impl NotificationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unseen_count(&self) -> usize {
        self.list.values().filter(|n| !n.is_seen()).count()
    }

    /// Mark one notification seen; `None` if it already was
    pub fn begin_mark_seen(&mut self, key: EntryKey) -> Option<SeenChange> {
        let notification = self.list.get_mut(key)?;
        if notification.is_seen() {
            return None;
        }
        let previous = std::mem::replace(&mut notification.seen, SeenStatus::Seen);
        Some(SeenChange { key, previous })
    }

    pub fn mark_all_seen(&mut self) -> Vec<SeenChange> {
        self.list
            .entries
            .iter_mut()
            .filter(|entry| !entry.value.is_seen())
            .map(|entry| {
                let previous = std::mem::replace(&mut entry.value.seen, SeenStatus::Seen);
                SeenChange { key: entry.key, previous }
            })
            .collect()
    }

    pub fn revert_seen(&mut self, changes: &[SeenChange]) {
        if !changes.is_empty() {
            warn!(count = changes.len(), "seen status rolled back");
        }
        for change in changes {
            if let Some(notification) = self.list.get_mut(change.key) {
                notification.seen = change.previous;
            }
        }
    }

    /// Notification pushed over the realtime channel
    pub fn push(&mut self, notification: Notification) -> Option<EntryKey> {
        self.list.prepend(notification)
    }

    pub fn begin_remove(&mut self, key: EntryKey) -> Option<Removal<Notification>> {
        self.list.remove(key)
    }

    pub fn restore(&mut self, removal: Removal<Notification>) {
        self.list.restore(removal);
    }
}
