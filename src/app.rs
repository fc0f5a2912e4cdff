//! EventHub Frontend App
//!
//! Header with notifications, tabbed main area, toasts.

use leptos::prelude::*;
use leptos::task::spawn_local;
use reactive_stores::Store;
use tracing::{info, warn};

use client_cache::{Message, ToastLevel};
use rolling_logger::LogBuffer;

use crate::api::ApiClient;
use crate::components::{
    CompanyList, DiagnosticsPanel, Feed, JobBoard, NotificationBell, NotificationList, ToastHost, UsersNotInCompany,
};
use crate::config::{clear_session, load_session, save_session, AppConfig, Session};
use crate::context::AppContext;
use crate::realtime;
use crate::store::{store_reset_lists, store_set_user, AppState, AppStateStoreFields};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Tab {
    Feed,
    Directory,
    Jobs,
}

impl Tab {
    const ALL: [Tab; 3] = [Tab::Feed, Tab::Directory, Tab::Jobs];

    fn label(self) -> &'static str {
        match self {
            Tab::Feed => "Feed",
            Tab::Directory => "Directory",
            Tab::Jobs => "Jobs",
        }
    }
}

/// Token prompt shown while signed out
#[component]
fn SignIn(#[prop(into)] on_token: Callback<String>) -> impl IntoView {
    let (token, set_token) = signal(String::new());

    view! {
        <form
            class="sign-in"
            on:submit=move |ev| {
                ev.prevent_default();
                let value = token.get_untracked().trim().to_string();
                if !value.is_empty() {
                    on_token.run(value);
                }
            }
        >
            <h1>"EventHub"</h1>
            <input
                type="password"
                placeholder="Access token"
                prop:value=move || token.get()
                on:input=move |ev| set_token.set(event_target_value(&ev))
            />
            <button type="submit">"Sign in"</button>
        </form>
    }
}

#[component]
pub fn App(config: AppConfig, logs: Option<LogBuffer>) -> impl IntoView {
    let store = Store::new(AppState::new(config.locale));
    provide_context(store);

    let session = load_session();
    let api = ApiClient::new(&config, session.map(|s| s.token));
    let (signed_in, set_signed_in) = signal(api.is_authenticated());

    let ctx = AppContext::new(store, api, logs);
    provide_context(ctx);

    realtime::listen(store);

    let sign_out = move || {
        clear_session();
        ctx.set_token(None);
        store_set_user(&store, None);
        store_reset_lists(&store);
        set_signed_in.set(false);
        info!("signed out");
    };

    let on_token = move |token: String| {
        if let Err(err) = save_session(&Session { token: token.clone() }) {
            warn!(error = %err, "session not persisted");
            ctx.notify(ToastLevel::Error, Message::SessionNotSaved);
        }
        ctx.set_token(Some(token));
        set_signed_in.set(true);
    };

    // Resolve the current user whenever a session starts
    let realtime_url = config.realtime_url.clone();
    Effect::new(move |_| {
        if !signed_in.get() {
            return;
        }
        let api = ctx.api();
        let realtime_url = realtime_url.clone();
        spawn_local(async move {
            match api.fetch_me().await {
                Ok(user) => {
                    info!(user = %user.id, roles = user.roles.len(), "session resumed");
                    realtime::announce(&user.id, realtime_url);
                    store_set_user(&store, Some(user));
                }
                Err(err) if err.status() == Some(401) => {
                    warn!("session expired");
                    sign_out();
                }
                Err(err) => warn!(error = %err, "could not load current user"),
            }
        });
    });

    let (tab, set_tab) = signal(Tab::Feed);
    let (panel_open, set_panel_open) = signal(false);
    let user_name = move || store.current_user().read().as_ref().map(|u| u.name.clone()).unwrap_or_default();

    view! {
        <Show
            when=move || signed_in.get()
            fallback=move || view! { <SignIn on_token=on_token /> }
        >
            <div class="app-layout">
                <header class="app-header">
                    <h1>"EventHub"</h1>
                    <nav class="tab-bar">
                        {Tab::ALL.into_iter().map(|t| view! {
                            <button
                                class="tab"
                                class:active=move || tab.get() == t
                                on:click=move |_| set_tab.set(t)
                            >
                                {t.label()}
                            </button>
                        }).collect_view()}
                    </nav>
                    <span class="user-name">{user_name}</span>
                    <NotificationBell on_toggle=move |_| set_panel_open.update(|open| *open = !*open) />
                    <button class="sign-out-btn" on:click=move |_| sign_out()>"Sign out"</button>
                </header>

                <main class="main-content">
                    {move || match tab.get() {
                        Tab::Feed => view! { <Feed /> }.into_any(),
                        Tab::Directory => view! {
                            <UsersNotInCompany />
                            <CompanyList />
                        }.into_any(),
                        Tab::Jobs => view! { <JobBoard /> }.into_any(),
                    }}
                </main>

                <Show when=move || panel_open.get()>
                    <NotificationList />
                </Show>

                <DiagnosticsPanel />
            </div>
        </Show>
        <ToastHost />
    }
}
