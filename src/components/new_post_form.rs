//! New Post Form Component
//!
//! Text plus optional media. Files are uploaded first; the post is then
//! published optimistically with the returned media attached.

use leptos::prelude::*;
use leptos::task::spawn_local;
use tracing::warn;
use wasm_bindgen::JsCast;

use client_cache::flows;
use client_cache::{MediaRef, Message, PostDraft, ToastLevel};

use crate::api::read_file;
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

#[component]
pub fn NewPostForm() -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let (body, set_body) = signal(String::new());
    let (media, set_media) = signal(Vec::<MediaRef>::new());
    let (uploading, set_uploading) = signal(false);

    let on_files = move |ev: web_sys::Event| {
        let Some(input) = ev.target().and_then(|t| t.dyn_into::<web_sys::HtmlInputElement>().ok()) else {
            return;
        };
        let Some(files) = input.files() else { return };
        let files: Vec<web_sys::File> = (0..files.length()).filter_map(|i| files.get(i)).collect();
        input.set_value("");
        if files.is_empty() {
            return;
        }

        set_uploading.set(true);
        let api = ctx.api();
        spawn_local(async move {
            for file in files {
                let uploaded = match read_file(&file).await {
                    Ok(upload) => api.upload_media(upload).await,
                    Err(err) => Err(err),
                };
                match uploaded {
                    Ok(media_ref) => set_media.update(|m| m.push(media_ref)),
                    Err(err) => {
                        warn!(error = %err, name = %file.name(), "media upload failed");
                        ctx.notify(ToastLevel::Error, Message::UploadFailed);
                    }
                }
            }
            set_uploading.set(false);
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = body.get_untracked();
        let attached = media.get_untracked();
        if text.trim().is_empty() && attached.is_empty() {
            return;
        }
        let Some(author) = store.current_user().get_untracked().map(|u| u.summary()) else { return };

        let draft = PostDraft { body: text, media: attached };
        set_body.set(String::new());
        set_media.set(Vec::new());

        let api = ctx.api();
        ctx.run(Message::PostCreateFailed, async move {
            flows::create_post(&api, &ctx.feed(), author, draft).await?;
            ctx.notify(ToastLevel::Success, Message::PostPublished);
            Ok(())
        });
    };

    view! {
        <form class="new-post-form" on:submit=on_submit>
            <textarea
                placeholder="Share something with the fair..."
                prop:value=move || body.get()
                on:input=move |ev| set_body.set(event_target_value(&ev))
            ></textarea>
            <div class="attached-media">
                <For
                    each=move || media.get()
                    key=|m| m.id.clone()
                    children=move |m| {
                        let id = m.id.clone();
                        view! {
                            <span class="attached-item">
                                {m.url.map(|src| view! { <img src=src /> })}
                                <button
                                    type="button"
                                    class="remove-btn"
                                    on:click=move |_| set_media.update(|list| list.retain(|x| x.id != id))
                                >
                                    "×"
                                </button>
                            </span>
                        }
                    }
                />
            </div>
            <div class="form-actions">
                <input type="file" accept="image/*,video/*" multiple=true on:change=on_files />
                <button type="submit" disabled=move || uploading.get()>
                    {move || if uploading.get() { "Uploading..." } else { "Publish" }}
                </button>
            </div>
        </form>
    }
}
