//! Global Application State Store
//!
//! Uses Leptos reactive_stores for fine-grained reactivity. Each cache
//! slice is exposed to `client_cache::flows` through a `StateCell` wrapper.

use leptos::prelude::*;
use reactive_stores::Store;

use client_cache::flows::StateCell;
use client_cache::{DirectoryState, FeedState, Locale, Message, NotificationState, Toast, ToastLevel, User};

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Signed-in user, once `GET me` has answered
    pub current_user: Option<User>,
    pub feed: FeedState,
    pub notifications: NotificationState,
    pub directory: DirectoryState,
    /// Toasts currently on screen, oldest first
    pub toasts: Vec<Toast>,
    pub next_toast_id: u64,
    pub locale: Locale,
}

impl AppState {
    pub fn new(locale: Locale) -> Self {
        Self { locale, ..Default::default() }
    }
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

/// Get the app store from context
pub fn use_app_store() -> AppStore {
    expect_context::<AppStore>()
}

// ========================
// State Cells
// ========================

#[derive(Clone, Copy)]
pub struct FeedCell(pub AppStore);

impl StateCell<FeedState> for FeedCell {
    fn update<R>(&self, f: impl FnOnce(&mut FeedState) -> R) -> R {
        let feed_field = self.0.feed();
        let mut feed = feed_field.write();
        f(&mut feed)
    }
}

#[derive(Clone, Copy)]
pub struct NotificationCell(pub AppStore);

impl StateCell<NotificationState> for NotificationCell {
    fn update<R>(&self, f: impl FnOnce(&mut NotificationState) -> R) -> R {
        let notifications_field = self.0.notifications();
        let mut notifications = notifications_field.write();
        f(&mut notifications)
    }
}

#[derive(Clone, Copy)]
pub struct DirectoryCell(pub AppStore);

impl StateCell<DirectoryState> for DirectoryCell {
    fn update<R>(&self, f: impl FnOnce(&mut DirectoryState) -> R) -> R {
        let directory_field = self.0.directory();
        let mut directory = directory_field.write();
        f(&mut directory)
    }
}

// ========================
// Store Helper Functions
// ========================

/// Queue a localized toast, returning its id
pub fn store_push_toast(store: &AppStore, level: ToastLevel, message: Message) -> u64 {
    let id = {
        let next_field = store.next_toast_id();
        let mut next = next_field.write();
        *next += 1;
        *next
    };
    let locale = store.locale().get_untracked();
    store.toasts().write().push(Toast::new(id, level, message, locale));
    id
}

pub fn store_dismiss_toast(store: &AppStore, id: u64) {
    store.toasts().write().retain(|toast| toast.id != id);
}

pub fn store_set_user(store: &AppStore, user: Option<User>) {
    *store.current_user().write() = user;
}

/// Drop every cached list (sign-out, tenant switch)
pub fn store_reset_lists(store: &AppStore) {
    store.feed().write().posts.reset();
    store.notifications().write().list.reset();
    let directory_field = store.directory();
    let mut directory = directory_field.write();
    directory.companies.reset();
    directory.jobs.reset();
    directory.not_in_company.reset();
}
