//! Toast Host Component
//!
//! Shows queued toasts and dismisses each after a delay or on click.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use client_cache::ToastLevel;

use crate::store::{store_dismiss_toast, use_app_store, AppStateStoreFields};

const TOAST_DURATION_MS: u32 = 4_000;

#[component]
pub fn ToastHost() -> impl IntoView {
    let store = use_app_store();

    view! {
        <div class="toast-host">
            <For
                each=move || store.toasts().get()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    spawn_local(async move {
                        TimeoutFuture::new(TOAST_DURATION_MS).await;
                        store_dismiss_toast(&store, id);
                    });
                    let class = match toast.level {
                        ToastLevel::Success => "toast success",
                        ToastLevel::Error => "toast error",
                    };
                    view! {
                        <div class=class on:click=move |_| store_dismiss_toast(&store, id)>
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
