//! Notification Components
//!
//! Bell with the unseen count, and the panel listing notifications.

use leptos::prelude::*;

use client_cache::flows;
use client_cache::{EntryKey, Message};

use crate::components::{display_time, DeleteConfirmButton, LoadMoreSentinel};
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

/// Header bell; toggles the panel
#[component]
pub fn NotificationBell(#[prop(into)] on_toggle: Callback<()>) -> impl IntoView {
    let store = use_app_context().store;
    let unseen = Memo::new(move |_| store.notifications().read().unseen_count());

    view! {
        <button class="notification-bell" on:click=move |_| on_toggle.run(())>
            "🔔"
            <Show when=move || { unseen.get() > 0 }>
                <span class="badge">{move || unseen.get()}</span>
            </Show>
        </button>
    }
}

#[component]
fn NotificationRow(entry_key: EntryKey) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let notification = Memo::new(move |_| store.notifications().read().list.get(entry_key).cloned());

    let on_open = move |_| {
        let api = ctx.api();
        ctx.run(Message::NotificationUpdateFailed, async move {
            flows::mark_seen(&api, &ctx.notifications(), entry_key).await
        });
    };

    let on_delete = move |_| {
        let api = ctx.api();
        ctx.run(Message::NotificationUpdateFailed, async move {
            flows::delete_notification(&api, &ctx.notifications(), entry_key).await
        });
    };

    move || {
        notification.get().map(|n| {
            let pending = n.id.is_temp();
            let unseen = !n.is_seen();
            view! {
                <li class="notification" class:unseen=unseen on:click=on_open>
                    <span class="notification-sender">{n.sender.name}</span>
                    <span class="notification-message">{n.message}</span>
                    <span class="notification-date">{display_time(&n.created_at, "%d/%m %H:%M")}</span>
                    {(!pending).then(|| view! {
                        <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete />
                    })}
                </li>
            }
        })
    }
}

#[component]
pub fn NotificationList() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let keys = Memo::new(move |_| {
        store.notifications().read().list.entries().iter().map(|entry| entry.key).collect::<Vec<_>>()
    });
    let loading = Signal::derive(move || store.notifications().read().list.is_loading());
    let done = Signal::derive(move || store.notifications().read().list.is_exhausted());
    let any_unseen = Memo::new(move |_| store.notifications().read().unseen_count() > 0);

    let load_more = move |_| {
        let api = ctx.api();
        ctx.run(Message::LoadFailed, async move {
            flows::load_notifications(&api, &ctx.notifications()).await
        });
    };

    let on_mark_all = move |_| {
        let api = ctx.api();
        ctx.run(Message::NotificationUpdateFailed, async move {
            flows::mark_all_seen(&api, &ctx.notifications()).await
        });
    };

    view! {
        <aside class="notification-panel">
            <header>
                <h2>"Notifications"</h2>
                <button class="mark-all-btn" disabled=move || !any_unseen.get() on:click=on_mark_all>
                    "Mark all as read"
                </button>
            </header>
            <ul class="notification-list">
                <For
                    each=move || keys.get()
                    key=|key| *key
                    children=move |key| view! { <NotificationRow entry_key=key /> }
                />
            </ul>
            <Show when=move || done.get() && keys.with(|k| k.is_empty())>
                <p class="empty-state">"No notifications."</p>
            </Show>
            <LoadMoreSentinel on_visible=load_more done=done loading=loading />
        </aside>
    }
}
