//! Job Board Components
//!
//! Job offers posted by exhibitors. Descriptions are Markdown; the list
//! shows a plain excerpt and expands to the rendered text.

use leptos::prelude::*;

use client_cache::flows;
use client_cache::{EntryKey, JobDraft, Message};

use crate::components::{roles, DeleteConfirmButton, LoadMoreSentinel, RoleGuard};
use crate::context::use_app_context;
use crate::markdown::{parse_markdown, plain_excerpt};
use crate::store::AppStateStoreFields;

const EXCERPT_CHARS: usize = 160;

/// Roles that publish offers for their own company
const PUBLISHER_ROLES: &[&str] = &["admin", "company-admin"];

fn optional(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[component]
fn NewJobForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let (title, set_title) = signal(String::new());
    let (description, set_description) = signal(String::new());
    let (location, set_location) = signal(String::new());
    let (contract_type, set_contract_type) = signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let job_title = title.get_untracked();
        if job_title.trim().is_empty() {
            return;
        }
        let Some(company_id) = store.current_user().get_untracked().and_then(|u| u.company_id) else {
            return;
        };
        let draft = JobDraft {
            title: job_title.trim().to_string(),
            description: description.get_untracked(),
            location: optional(location.get_untracked()),
            contract_type: optional(contract_type.get_untracked()),
        };
        set_title.set(String::new());
        set_description.set(String::new());
        set_location.set(String::new());
        set_contract_type.set(String::new());

        let api = ctx.api();
        ctx.run(Message::JobCreateFailed, async move {
            flows::create_job(&api, &ctx.directory(), company_id, draft).await
        });
    };

    view! {
        <form class="new-job-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Job title"
                prop:value=move || title.get()
                on:input=move |ev| set_title.set(event_target_value(&ev))
            />
            <textarea
                placeholder="Description (Markdown)"
                prop:value=move || description.get()
                on:input=move |ev| set_description.set(event_target_value(&ev))
            ></textarea>
            <input
                type="text"
                placeholder="Location"
                prop:value=move || location.get()
                on:input=move |ev| set_location.set(event_target_value(&ev))
            />
            <input
                type="text"
                placeholder="Contract type"
                prop:value=move || contract_type.get()
                on:input=move |ev| set_contract_type.set(event_target_value(&ev))
            />
            <button type="submit">"Publish offer"</button>
        </form>
    }
}

#[component]
fn JobCard(entry_key: EntryKey) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let job = Memo::new(move |_| store.directory().read().jobs.get(entry_key).cloned());
    let (expanded, set_expanded) = signal(false);

    // Publishers may only remove offers of their own company; admins any.
    let can_delete = move |company_id: &client_cache::EntityId| {
        store.current_user().read().as_ref().is_some_and(|u| {
            let admin = client_cache::RoleGuard::allow(["admin"]).permits(&u.roles);
            let publisher = client_cache::RoleGuard::allow(roles(PUBLISHER_ROLES)).permits(&u.roles);
            admin || (publisher && u.company_id.as_ref() == Some(company_id))
        })
    };

    let on_delete = move |_| {
        let api = ctx.api();
        ctx.run(Message::JobDeleteFailed, async move {
            flows::delete_job(&api, &ctx.directory(), entry_key).await
        });
    };

    move || {
        job.get().map(|job| {
            let pending = job.id.is_temp();
            let deletable = !pending && can_delete(&job.company_id);
            let excerpt = plain_excerpt(&job.description, EXCERPT_CHARS);
            let full_html = parse_markdown(&job.description);
            view! {
                <article class="job-card" class:pending=pending>
                    <header>
                        <h3>{job.title}</h3>
                        {job.location.map(|l| view! { <span class="job-location">{l}</span> })}
                        {job.contract_type.map(|c| view! { <span class="job-contract">{c}</span> })}
                        {deletable.then(|| view! {
                            <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete />
                        })}
                    </header>
                    {move || if expanded.get() {
                        view! { <div class="job-description markdown" inner_html=full_html.clone()></div> }.into_any()
                    } else {
                        view! { <p class="job-excerpt">{excerpt.clone()}</p> }.into_any()
                    }}
                    <button class="toggle-btn" on:click=move |_| set_expanded.update(|e| *e = !*e)>
                        {move || if expanded.get() { "Show less" } else { "Read more" }}
                    </button>
                </article>
            }
        })
    }
}

#[component]
pub fn JobBoard() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let keys = Memo::new(move |_| {
        store.directory().read().jobs.entries().iter().map(|entry| entry.key).collect::<Vec<_>>()
    });
    let loading = Signal::derive(move || store.directory().read().jobs.is_loading());
    let done = Signal::derive(move || store.directory().read().jobs.is_exhausted());

    let load_more = move |_| {
        let api = ctx.api();
        ctx.run(Message::LoadFailed, async move { flows::load_jobs(&api, &ctx.directory()).await });
    };

    view! {
        <section class="job-board">
            <h2>"Job offers"</h2>
            <RoleGuard allowed=roles(PUBLISHER_ROLES)>
                <NewJobForm />
            </RoleGuard>
            <For
                each=move || keys.get()
                key=|key| *key
                children=move |key| view! { <JobCard entry_key=key /> }
            />
            <Show when=move || done.get() && keys.with(|k| k.is_empty())>
                <p class="empty-state">"No job offers yet."</p>
            </Show>
            <LoadMoreSentinel on_visible=load_more done=done loading=loading />
        </section>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_optional_trims_blank() {
        assert_eq!(optional("  ".into()), None);
        assert_eq!(optional(" Lyon ".into()), Some("Lyon".to_string()));
    }
}
