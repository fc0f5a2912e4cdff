//! Feed Component
//!
//! The infinite post list. Rows are keyed by `EntryKey`, so a post keeps its
//! DOM node when its temporary id is swapped for the server one.

use leptos::prelude::*;

use client_cache::flows;
use client_cache::{EntryKey, Message};

use crate::components::{LoadMoreSentinel, NewPostForm, PostCard};
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn Feed() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let keys = Memo::new(move |_| {
        store.feed().read().posts.entries().iter().map(|entry| entry.key).collect::<Vec<EntryKey>>()
    });
    let loading = Signal::derive(move || store.feed().read().posts.is_loading());
    let done = Signal::derive(move || store.feed().read().posts.is_exhausted());

    let load_more = move |_| {
        let api = ctx.api();
        ctx.run(Message::LoadFailed, async move { flows::load_posts(&api, &ctx.feed()).await });
    };

    view! {
        <section class="feed">
            <NewPostForm />
            <For
                each=move || keys.get()
                key=|key| *key
                children=move |post_key| view! { <PostCard post_key=post_key /> }
            />
            <Show when=move || done.get() && keys.with(|k| k.is_empty())>
                <p class="empty-state">"Nothing has been posted yet."</p>
            </Show>
            <LoadMoreSentinel on_visible=load_more done=done loading=loading />
        </section>
    }
}
