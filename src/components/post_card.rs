//! Post Card Component
//!
//! One feed item with likes, comments, edit and delete. Every action goes
//! through `client_cache::flows`, so the card updates before the server
//! answers and reverts if it refuses.

use leptos::prelude::*;

use client_cache::flows;
use client_cache::{Comment, EntityId, EntryKey, Message, Post, RoleGuard};

use crate::components::{display_time, roles, DeleteConfirmButton};
use crate::context::use_app_context;
use crate::store::AppStateStoreFields;

/// Roles allowed to moderate other people's posts and comments
const MODERATOR_ROLES: &[&str] = &["admin", "moderator"];

/// Like toggle with count
#[component]
pub fn LikeButton(post_key: EntryKey, liked: bool, count: usize, disabled: bool) -> impl IntoView {
    let ctx = use_app_context();

    let on_click = move |_| {
        let Some(liker) = ctx.store.current_user().get_untracked().map(|u| u.id) else { return };
        let api = ctx.api();
        ctx.run(Message::LikeFailed, async move {
            flows::toggle_like(&api, &ctx.feed(), post_key, liker).await
        });
    };

    view! {
        <button
            class=if liked { "like-btn liked" } else { "like-btn" }
            disabled=disabled
            on:click=on_click
        >
            "♥ " {count}
        </button>
    }
}

/// Comments under a post plus the new-comment input
#[component]
pub fn CommentList(
    post_key: EntryKey,
    comments: Vec<Comment>,
    /// Current user id, if signed in
    me: Option<EntityId>,
    /// Author or moderator of the parent post
    can_moderate: bool,
    /// Parent post not yet confirmed by the server
    pending_post: bool,
) -> impl IntoView {
    let ctx = use_app_context();
    let (comment_text, set_comment_text) = signal(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let body = comment_text.get_untracked();
        if body.trim().is_empty() {
            return;
        }
        let Some(author) = ctx.store.current_user().get_untracked().map(|u| u.summary()) else { return };
        set_comment_text.set(String::new());
        let api = ctx.api();
        ctx.run(Message::CommentFailed, async move {
            flows::add_comment(&api, &ctx.feed(), post_key, author, body).await
        });
    };

    let rows = comments
        .into_iter()
        .map(|comment| {
            let pending = comment.id.is_temp();
            let can_delete = !pending && (can_moderate || me.as_ref() == Some(&comment.author.id));
            let comment_id = comment.id.clone();
            let on_delete = move |_| {
                let api = ctx.api();
                let comment_id = comment_id.clone();
                ctx.run(Message::CommentDeleteFailed, async move {
                    flows::delete_comment(&api, &ctx.feed(), post_key, comment_id).await
                });
            };
            view! {
                <li class="comment" class:pending=pending>
                    <span class="comment-author">{comment.author.name}</span>
                    <span class="comment-body">{comment.body}</span>
                    {can_delete.then(|| view! {
                        <DeleteConfirmButton button_class="comment-delete-btn" on_confirm=on_delete />
                    })}
                </li>
            }
        })
        .collect_view();

    view! {
        <ul class="comment-list">{rows}</ul>
        <form class="comment-form" on:submit=on_submit>
            <input
                type="text"
                placeholder="Write a comment..."
                disabled=pending_post
                prop:value=move || comment_text.get()
                on:input=move |ev| set_comment_text.set(event_target_value(&ev))
            />
        </form>
    }
}

/// Feed item card
#[component]
pub fn PostCard(post_key: EntryKey) -> impl IntoView {
    let ctx = use_app_context();
    let store = ctx.store;

    let post = Memo::new(move |_| store.feed().read().post(post_key).cloned());
    let me = Memo::new(move |_| store.current_user().read().as_ref().map(|u| u.id.clone()));
    let is_moderator = Memo::new(move |_| {
        let guard = RoleGuard::allow(roles(MODERATOR_ROLES));
        store.current_user().read().as_ref().is_some_and(|u| guard.permits(&u.roles))
    });

    let (editing, set_editing) = signal(false);
    let (edit_text, set_edit_text) = signal(String::new());

    let on_save_edit = move |_| {
        let body = edit_text.get_untracked();
        set_editing.set(false);
        let api = ctx.api();
        ctx.run(Message::PostUpdateFailed, async move {
            flows::edit_post(&api, &ctx.feed(), post_key, body).await
        });
    };

    let on_delete = move |_| {
        let api = ctx.api();
        ctx.run(Message::PostDeleteFailed, async move {
            flows::delete_post(&api, &ctx.feed(), post_key).await
        });
    };

    let render = move |p: Post| {
        let pending = p.id.is_temp();
        let me_id = me.get();
        let is_author = me_id.as_ref() == Some(&p.author.id);
        let can_moderate = is_author || is_moderator.get();
        let liked = me_id.as_ref().is_some_and(|id| p.is_liked_by(id));
        let body = p.body.clone();
        let edit_source = p.body.clone();

        view! {
            <article class="post-card" class:pending=pending>
                <header class="post-header">
                    {p.author.avatar_url.clone().map(|src| view! { <img class="avatar" src=src /> })}
                    <span class="post-author">{p.author.name.clone()}</span>
                    <span class="post-date">{display_time(&p.created_at, "%d/%m/%Y %H:%M")}</span>
                    {(is_author && !pending).then(|| view! {
                        <button class="edit-btn" on:click=move |_| {
                            set_edit_text.set(edit_source.clone());
                            set_editing.set(true);
                        }>"Edit"</button>
                    })}
                    {(can_moderate && !pending).then(|| view! {
                        <DeleteConfirmButton button_class="delete-btn" on_confirm=on_delete />
                    })}
                </header>

                {move || if editing.get() {
                    view! {
                        <div class="post-edit">
                            <textarea
                                prop:value=move || edit_text.get()
                                on:input=move |ev| set_edit_text.set(event_target_value(&ev))
                            ></textarea>
                            <button on:click=on_save_edit>"Save"</button>
                            <button class="cancel-btn" on:click=move |_| set_editing.set(false)>"Cancel"</button>
                        </div>
                    }.into_any()
                } else {
                    view! { <p class="post-body">{body.clone()}</p> }.into_any()
                }}

                <div class="post-media">
                    {p.media.iter().filter_map(|m| m.url.clone()).map(|src| view! {
                        <img class="post-media-item" src=src />
                    }).collect_view()}
                </div>

                <footer class="post-actions">
                    <LikeButton post_key=post_key liked=liked count=p.like_count() disabled=pending />
                    <span class="comment-count">{p.comments.len()} " 💬"</span>
                </footer>

                <CommentList
                    post_key=post_key
                    comments=p.comments
                    me=me_id
                    can_moderate=can_moderate
                    pending_post=pending
                />
            </article>
        }
    };

    move || post.get().map(|p| render(p))
}
