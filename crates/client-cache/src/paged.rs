//! Paged List
//!
//! Ordered, page-appended buffer plus an offset cursor. One per scrollable
//! list (posts, notifications, users, jobs).

use tracing::debug;

use crate::entity::{Entity, EntityId, EntryKey};
use crate::error::ClientResult;

/// Fixed page size shared with the backend
pub const PAGE_SIZE: usize = 10;

/// A cached value and its stable key
#[derive(Debug, Clone, PartialEq)]
pub struct Entry<T> {
    pub key: EntryKey,
    pub value: T,
}

/// Reservation for one page request
///
/// Handed out by [`PagedList::begin_fetch`] and given back to
/// [`PagedList::complete_fetch`] with the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub struct FetchTicket {
    pub offset: usize,
    generation: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PagedList<T> {
    pub(crate) entries: Vec<Entry<T>>,
    cursor: usize,
    page_size: usize,
    in_flight: bool,
    exhausted: bool,
    next_key: u64,
    /// Bumped by `reset`; tickets from an older generation are ignored
    generation: u64,
}

impl<T> Default for PagedList<T> {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl<T> PagedList<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            page_size: page_size.max(1),
            in_flight: false,
            exhausted: false,
            next_key: 0,
            generation: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Offset of the next page to request
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// A fetch has been issued and not completed yet
    pub fn is_loading(&self) -> bool {
        self.in_flight
    }

    /// The last fetch came back empty; no more pages
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn entries(&self) -> &[Entry<T>] {
        &self.entries
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.iter().map(|entry| &entry.value)
    }

    pub fn get(&self, key: EntryKey) -> Option<&T> {
        self.entries.iter().find(|entry| entry.key == key).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: EntryKey) -> Option<&mut T> {
        self.entries.iter_mut().find(|entry| entry.key == key).map(|entry| &mut entry.value)
    }

    pub fn position(&self, key: EntryKey) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key == key)
    }

    pub(crate) fn allocate_key(&mut self) -> EntryKey {
        self.next_key += 1;
        EntryKey(self.next_key)
    }

    /// Reserve the next page
    ///
    /// Returns `None` while another fetch is in flight or once the list is
    /// exhausted, so repeated sentinel hits issue a single request.
    pub fn begin_fetch(&mut self) -> Option<FetchTicket> {
        if self.in_flight || self.exhausted {
            return None;
        }
        let ticket = FetchTicket { offset: self.cursor, generation: self.generation };
        self.in_flight = true;
        self.cursor += self.page_size;
        debug!(offset = ticket.offset, "page fetch started");
        Some(ticket)
    }

    /// Clear cached entries and pagination state
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = 0;
        self.in_flight = false;
        self.exhausted = false;
        self.generation += 1;
    }
}

impl<T: Entity> PagedList<T> {
    pub fn key_of(&self, id: &EntityId) -> Option<EntryKey> {
        self.entries.iter().find(|entry| entry.value.id() == id).map(|entry| entry.key)
    }

    pub fn contains_id(&self, id: &EntityId) -> bool {
        self.key_of(id).is_some()
    }

    /// Apply the outcome of a page request, returning how many items were appended
    ///
    /// Empty page: cursor goes back to the ticket offset and the list is
    /// marked exhausted. Error: cursor rolls back one page (floor 0).
    /// A ticket issued before the last `reset` is dropped without touching
    /// the list.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, result: ClientResult<Vec<T>>) -> ClientResult<usize> {
        if ticket.generation != self.generation {
            debug!(offset = ticket.offset, "stale page response dropped");
            return Ok(0);
        }
        self.in_flight = false;
        match result {
            Ok(items) if items.is_empty() => {
                self.cursor = ticket.offset;
                self.exhausted = true;
                debug!(offset = ticket.offset, "page fetch returned no items");
                Ok(0)
            }
            Ok(items) => {
                let mut appended = 0;
                for item in items {
                    // Realtime pushes may already have delivered this one
                    if self.contains_id(item.id()) {
                        continue;
                    }
                    let key = self.allocate_key();
                    self.entries.push(Entry { key, value: item });
                    appended += 1;
                }
                debug!(offset = ticket.offset, appended, "page fetch appended");
                Ok(appended)
            }
            Err(err) => {
                self.cursor = self.cursor.saturating_sub(self.page_size);
                debug!(offset = ticket.offset, cursor = self.cursor, "page fetch failed, cursor rolled back");
                Err(err)
            }
        }
    }

    /// Insert a server-delivered item at the head without touching the cursor
    pub fn prepend(&mut self, item: T) -> Option<EntryKey> {
        if self.contains_id(item.id()) {
            return None;
        }
        let key = self.allocate_key();
        self.entries.insert(0, Entry { key, value: item });
        Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;
    use crate::models::UserSummary;

    fn user(id: usize) -> UserSummary {
        UserSummary {
            id: EntityId::server(id.to_string()),
            name: format!("User {}", id),
            avatar_url: None,
        }
    }

    fn page(start: usize, len: usize) -> Vec<UserSummary> {
        (start..start + len).map(user).collect()
    }

    #[test]
    fn test_cursor_tracks_successful_pages() {
        let mut list = PagedList::<UserSummary>::default();
        let sizes = [10, 10, 7];
        let mut next = 0;
        for (n, size) in sizes.iter().enumerate() {
            let ticket = list.begin_fetch().unwrap();
            assert_eq!(ticket.offset, n * PAGE_SIZE);
            list.complete_fetch(ticket, Ok(page(next, *size))).unwrap();
            next += size;
            assert_eq!(list.cursor(), (n + 1) * PAGE_SIZE);
        }
        assert_eq!(list.len(), 27);
    }

    #[test]
    fn test_empty_page_marks_exhausted() {
        let mut list = PagedList::<UserSummary>::default();
        let ticket = list.begin_fetch().unwrap();
        list.complete_fetch(ticket, Ok(page(0, 10))).unwrap();
        assert_eq!(list.cursor(), 10);

        let ticket = list.begin_fetch().unwrap();
        assert_eq!(ticket.offset, 10);
        assert_eq!(list.complete_fetch(ticket, Ok(Vec::new())), Ok(0));
        assert_eq!(list.cursor(), 10);
        assert!(list.is_exhausted());
        assert!(list.begin_fetch().is_none());
    }

    #[test]
    fn test_error_rolls_cursor_back() {
        let mut list = PagedList::<UserSummary>::default();
        let ticket = list.begin_fetch().unwrap();
        list.complete_fetch(ticket, Ok(page(0, 10))).unwrap();

        let ticket = list.begin_fetch().unwrap();
        let err = ClientError::Network("offline".into());
        assert_eq!(list.complete_fetch(ticket, Err(err.clone())), Err(err));
        assert_eq!(list.cursor(), 10);
        assert!(!list.is_loading());

        // Retry asks for the same page
        assert_eq!(list.begin_fetch().unwrap().offset, 10);
    }

    #[test]
    fn test_first_page_error_floors_at_zero() {
        let mut list = PagedList::<UserSummary>::default();
        let ticket = list.begin_fetch().unwrap();
        let _ = list.complete_fetch(ticket, Err(ClientError::Network("offline".into())));
        assert_eq!(list.cursor(), 0);
    }

    #[test]
    fn test_in_flight_guard() {
        let mut list = PagedList::<UserSummary>::default();
        let ticket = list.begin_fetch().unwrap();
        assert!(list.is_loading());
        assert!(list.begin_fetch().is_none());
        list.complete_fetch(ticket, Ok(page(0, 3))).unwrap();
        assert!(list.begin_fetch().is_some());
    }

    #[test]
    fn test_prepend_and_page_skip_duplicates() {
        let mut list = PagedList::<UserSummary>::default();
        assert!(list.prepend(user(5)).is_some());
        assert!(list.prepend(user(5)).is_none());

        let ticket = list.begin_fetch().unwrap();
        assert_eq!(list.complete_fetch(ticket, Ok(page(0, 10))), Ok(9));
        assert_eq!(list.len(), 10);
        assert_eq!(list.values().next().unwrap().id, EntityId::server("5"));
    }

    #[test]
    fn test_reset() {
        let mut list = PagedList::<UserSummary>::default();
        let ticket = list.begin_fetch().unwrap();
        list.complete_fetch(ticket, Ok(Vec::new())).unwrap();
        list.reset();
        assert!(list.is_empty());
        assert!(!list.is_exhausted());
        assert_eq!(list.begin_fetch().unwrap().offset, 0);
    }

    #[test]
    fn test_response_from_before_reset_is_dropped() {
        let mut list = PagedList::<UserSummary>::default();
        let ticket = list.begin_fetch().unwrap();
        list.complete_fetch(ticket, Ok(page(0, 10))).unwrap();
        let old = list.begin_fetch().unwrap();

        list.reset();
        let fresh = list.begin_fetch().unwrap();
        assert_eq!(fresh.offset, 0);

        assert_eq!(list.complete_fetch(old, Ok(vec![user(99)])), Ok(0));
        assert!(list.is_empty());
        assert!(list.is_loading());
        assert_eq!(list.cursor(), 10);
        assert!(list.begin_fetch().is_none());

        assert_eq!(list.complete_fetch(fresh, Ok(page(0, 4))), Ok(4));
        assert!(!list.is_loading());
    }

    #[test]
    fn test_error_from_before_reset_is_dropped() {
        let mut list = PagedList::<UserSummary>::default();
        let old = list.begin_fetch().unwrap();
        list.reset();
        let _fresh = list.begin_fetch().unwrap();
        assert_eq!(list.complete_fetch(old, Err(ClientError::Network("offline".into()))), Ok(0));
        assert_eq!(list.cursor(), 10);
        assert!(list.is_loading());
    }
}
