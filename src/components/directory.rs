//! Directory Components
//!
//! Exhibitor companies and, for company admins, the users who can still be
//! invited into their company.

use leptos::prelude::*;

use client_cache::flows;
use client_cache::{EntryKey, Message, ToastLevel};

use crate::components::{roles, LoadMoreSentinel, RoleGuard};
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn CompanyList() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let companies = Memo::new(move |_| store.directory().read().companies.values().cloned().collect::<Vec<_>>());
    let loading = Signal::derive(move || store.directory().read().companies.is_loading());
    let done = Signal::derive(move || store.directory().read().companies.is_exhausted());

    let load_more = move |_| {
        let api = ctx.api();
        ctx.run(Message::LoadFailed, async move { flows::load_companies(&api, &ctx.directory()).await });
    };

    view! {
        <section class="company-list">
            <h2>"Exhibitors"</h2>
            <ul>
                <For
                    each=move || companies.get()
                    key=|company| company.id.clone()
                    children=move |company| view! {
                        <li class="company">
                            {company.logo_url.map(|src| view! { <img class="company-logo" src=src /> })}
                            <span class="company-name">{company.name}</span>
                            {company.description.map(|d| view! { <p class="company-description">{d}</p> })}
                        </li>
                    }
                />
            </ul>
            <LoadMoreSentinel on_visible=load_more done=done loading=loading />
        </section>
    }
}

#[component]
fn InviteRow(entry_key: EntryKey, company_id: String) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;
    let user = Memo::new(move |_| store.directory().read().not_in_company.get(entry_key).cloned());

    let on_invite = move |_| {
        let api = ctx.api();
        let company_id = company_id.clone();
        ctx.run(Message::InviteFailed, async move {
            flows::invite_user(&api, &ctx.directory(), &company_id, entry_key).await?;
            ctx.notify(ToastLevel::Success, Message::InviteSent);
            Ok(())
        });
    };

    move || {
        user.get().map(|u| {
            let on_invite = on_invite.clone();
            view! {
                <li class="invite-row">
                    {u.avatar_url.map(|src| view! { <img class="avatar" src=src /> })}
                    <span class="user-name">{u.name}</span>
                    <button class="invite-btn" on:click=on_invite>"Invite"</button>
                </li>
            }
        })
    }
}

/// Users outside the signed-in admin's company, with an invite action
#[component]
pub fn UsersNotInCompany() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let company_id = Memo::new(move |_| {
        store
            .current_user()
            .read()
            .as_ref()
            .and_then(|u| u.company_id.as_ref())
            .and_then(|id| id.as_server())
            .map(str::to_string)
    });
    let keys = Memo::new(move |_| {
        store.directory().read().not_in_company.entries().iter().map(|entry| entry.key).collect::<Vec<_>>()
    });
    let loading = Signal::derive(move || store.directory().read().not_in_company.is_loading());
    let done = Signal::derive(move || {
        company_id.get().is_none() || store.directory().read().not_in_company.is_exhausted()
    });

    let load_more = move |_| {
        let Some(company) = company_id.get_untracked() else { return };
        let api = ctx.api();
        ctx.run(Message::LoadFailed, async move {
            flows::load_users_not_in_company(&api, &ctx.directory(), &company).await
        });
    };

    view! {
        <RoleGuard allowed=roles(&["admin", "company-admin"])>
            <section class="users-not-in-company">
                <h2>"Invite to your company"</h2>
                <ul>
                    <For
                        each=move || keys.get()
                        key=|key| *key
                        children=move |key| {
                            let company = company_id.get_untracked().unwrap_or_default();
                            view! { <InviteRow entry_key=key company_id=company /> }
                        }
                    />
                </ul>
                <LoadMoreSentinel on_visible=load_more done=done loading=loading />
            </section>
        </RoleGuard>
    }
}
