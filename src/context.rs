//! Application Context
//!
//! Shared handles provided via Leptos Context API.

use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;

use client_cache::{ClientResult, Message, ToastLevel, User};
use rolling_logger::LogBuffer;

use crate::api::ApiClient;
use crate::store::{store_push_toast, AppStateStoreFields, AppStore, DirectoryCell, FeedCell, NotificationCell};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub store: AppStore,
    api: StoredValue<ApiClient, LocalStorage>,
    logs: StoredValue<Option<LogBuffer>>,
}

impl AppContext {
    pub fn new(store: AppStore, api: ApiClient, logs: Option<LogBuffer>) -> Self {
        Self {
            store,
            api: StoredValue::new_local(api),
            logs: StoredValue::new(logs),
        }
    }

    /// Cheap clone of the REST client (shares the connection pool)
    pub fn api(&self) -> ApiClient {
        self.api.get_value()
    }

    pub fn set_token(&self, token: Option<String>) {
        self.api.update_value(|api| api.set_token(token));
    }

    pub fn feed(&self) -> FeedCell {
        FeedCell(self.store)
    }

    pub fn notifications(&self) -> NotificationCell {
        NotificationCell(self.store)
    }

    pub fn directory(&self) -> DirectoryCell {
        DirectoryCell(self.store)
    }

    /// Signed-in user (tracked)
    pub fn current_user(&self) -> Option<User> {
        self.store.current_user().get()
    }

    pub fn recent_logs(&self) -> Vec<String> {
        self.logs.with_value(|logs| logs.as_ref().map(LogBuffer::lines).unwrap_or_default())
    }

    pub fn notify(&self, level: ToastLevel, message: Message) {
        store_push_toast(&self.store, level, message);
    }

    /// Run a flow in the background, toasting `on_error` if it fails
    pub fn run<T, Fut>(&self, on_error: Message, action: Fut)
    where
        T: 'static,
        Fut: Future<Output = ClientResult<T>> + 'static,
    {
        let ctx = *self;
        spawn_local(async move {
            if let Err(err) = action.await {
                warn!(error = %err, ?on_error, "user action failed");
                ctx.notify(ToastLevel::Error, on_error);
            }
        });
    }
}

pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
