//! Async Flows
//!
//! Drive each user action end to end: synchronous optimistic mutation,
//! network request, synchronous reconcile or rollback. The backend sits
//! behind the `*Api` traits and state behind [`StateCell`], so the same
//! flows run against the browser store and against test doubles.

mod tests;

use async_trait::async_trait;
use std::cell::RefCell;
use std::future::Future;
use tracing::warn;

use crate::directory::DirectoryState;
use crate::entity::{EntityId, EntryKey};
use crate::error::{ClientError, ClientResult};
use crate::feed::FeedState;
use crate::models::{Comment, Company, JobDraft, JobOffer, Notification, Post, PostDraft, UserSummary};
use crate::notifications::NotificationState;
use crate::paged::PagedList;

/// Synchronous, exclusive access to one slice of client state
pub trait StateCell<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R;
}

impl<S> StateCell<S> for RefCell<S> {
    fn update<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

// ========================
// Backend Traits
// ========================

#[async_trait(?Send)]
pub trait FeedApi {
    async fn fetch_posts(&self, offset: usize) -> ClientResult<Vec<Post>>;
    async fn create_post(&self, draft: &PostDraft) -> ClientResult<Post>;
    async fn update_post(&self, id: &str, body: &str) -> ClientResult<Post>;
    async fn delete_post(&self, id: &str) -> ClientResult<()>;
    async fn create_comment(&self, post_id: &str, body: &str) -> ClientResult<Comment>;
    async fn delete_comment(&self, id: &str) -> ClientResult<()>;
    async fn like_post(&self, post_id: &str) -> ClientResult<()>;
    async fn unlike_post(&self, post_id: &str) -> ClientResult<()>;
}

#[async_trait(?Send)]
pub trait NotificationApi {
    async fn fetch_notifications(&self, offset: usize) -> ClientResult<Vec<Notification>>;
    async fn mark_seen(&self, id: &str) -> ClientResult<()>;
    async fn mark_all_seen(&self) -> ClientResult<()>;
    async fn delete_notification(&self, id: &str) -> ClientResult<()>;
}

#[async_trait(?Send)]
pub trait DirectoryApi {
    async fn fetch_companies(&self, offset: usize) -> ClientResult<Vec<Company>>;
    async fn fetch_users_not_in_company(&self, company_id: &str, offset: usize) -> ClientResult<Vec<UserSummary>>;
    async fn invite_user(&self, company_id: &str, user_id: &str) -> ClientResult<()>;
    async fn fetch_jobs(&self, offset: usize) -> ClientResult<Vec<JobOffer>>;
    async fn create_job(&self, company_id: &str, draft: &JobDraft) -> ClientResult<JobOffer>;
    async fn delete_job(&self, id: &str) -> ClientResult<()>;
}

fn server_id(id: &EntityId) -> ClientResult<String> {
    id.as_server()
        .map(str::to_string)
        .ok_or_else(|| ClientError::Conflict(format!("{} is not saved yet", id)))
}

fn missing(what: &str) -> ClientError {
    ClientError::NotFound(what.to_string())
}

// ========================
// Pagination
// ========================

/// Fetch the next page of one list, returning how many items were appended
///
/// Returns `Ok(0)` without a request when a fetch is already in flight or
/// the list is exhausted.
pub async fn load_next_page<S, T, C, L, F, Fut>(state: &C, list: L, fetch: F) -> ClientResult<usize>
where
    T: crate::entity::Entity,
    C: StateCell<S>,
    L: Fn(&mut S) -> &mut PagedList<T>,
    F: FnOnce(usize) -> Fut,
    Fut: Future<Output = ClientResult<Vec<T>>>,
{
    let Some(ticket) = state.update(|s| list(s).begin_fetch()) else {
        return Ok(0);
    };
    let result = fetch(ticket.offset).await;
    state.update(|s| list(s).complete_fetch(ticket, result))
}

pub async fn load_posts<A: FeedApi + ?Sized>(api: &A, state: &impl StateCell<FeedState>) -> ClientResult<usize> {
    load_next_page(state, |feed: &mut FeedState| &mut feed.posts, |offset| api.fetch_posts(offset)).await
}

pub async fn load_notifications<A: NotificationApi + ?Sized>(
    api: &A,
    state: &impl StateCell<NotificationState>,
) -> ClientResult<usize> {
    load_next_page(state, |n: &mut NotificationState| &mut n.list, |offset| api.fetch_notifications(offset)).await
}

pub async fn load_companies<A: DirectoryApi + ?Sized>(api: &A, state: &impl StateCell<DirectoryState>) -> ClientResult<usize> {
    load_next_page(state, |d: &mut DirectoryState| &mut d.companies, |offset| api.fetch_companies(offset)).await
}

pub async fn load_jobs<A: DirectoryApi + ?Sized>(api: &A, state: &impl StateCell<DirectoryState>) -> ClientResult<usize> {
    load_next_page(state, |d: &mut DirectoryState| &mut d.jobs, |offset| api.fetch_jobs(offset)).await
}

pub async fn load_users_not_in_company<A: DirectoryApi + ?Sized>(
    api: &A,
    state: &impl StateCell<DirectoryState>,
    company_id: &str,
) -> ClientResult<usize> {
    load_next_page(
        state,
        |d: &mut DirectoryState| &mut d.not_in_company,
        |offset| api.fetch_users_not_in_company(company_id, offset),
    )
    .await
}

// ========================
// Feed
// ========================

/// Publish a post, returning its server id
pub async fn create_post<A: FeedApi + ?Sized>(
    api: &A,
    state: &impl StateCell<FeedState>,
    author: UserSummary,
    draft: PostDraft,
) -> ClientResult<EntityId> {
    let pending = state.update(|feed| feed.begin_create_post(author, &draft));
    match api.create_post(&draft).await {
        Ok(post) => {
            let id = post.id.clone();
            state.update(|feed| feed.confirm_post(&pending, post));
            Ok(id)
        }
        Err(err) => {
            warn!(error = %err, "create post failed");
            state.update(|feed| feed.fail_post(&pending));
            Err(err)
        }
    }
}

pub async fn edit_post<A: FeedApi + ?Sized>(
    api: &A,
    state: &impl StateCell<FeedState>,
    post_key: EntryKey,
    body: String,
) -> ClientResult<()> {
    let (edit, id) = state
        .update(|feed| {
            let edit = feed.begin_edit_post(post_key, &body)?;
            let id = feed.post(post_key)?.id.clone();
            Some((edit, id))
        })
        .ok_or_else(|| missing("post"))?;
    let id = server_id(&id)?;
    match api.update_post(&id, &body).await {
        Ok(post) => {
            state.update(|feed| feed.confirm_edit(&edit, post));
            Ok(())
        }
        Err(err) => {
            warn!(error = %err, "edit post failed");
            state.update(|feed| feed.revert_edit(edit));
            Err(err)
        }
    }
}

pub async fn delete_post<A: FeedApi + ?Sized>(api: &A, state: &impl StateCell<FeedState>, post_key: EntryKey) -> ClientResult<()> {
    let removal = state
        .update(|feed| feed.begin_delete_post(post_key))
        .ok_or_else(|| missing("post"))?;
    let id = match server_id(&removal.value().id) {
        Ok(id) => id,
        Err(err) => {
            state.update(|feed| feed.restore_post(removal));
            return Err(err);
        }
    };
    if let Err(err) = api.delete_post(&id).await {
        warn!(error = %err, "delete post failed");
        state.update(|feed| feed.restore_post(removal));
        return Err(err);
    }
    Ok(())
}

pub async fn add_comment<A: FeedApi + ?Sized>(
    api: &A,
    state: &impl StateCell<FeedState>,
    post_key: EntryKey,
    author: UserSummary,
    body: String,
) -> ClientResult<EntityId> {
    let (pending, post_id) = state
        .update(|feed| {
            let pending = feed.begin_add_comment(post_key, author, &body)?;
            let post_id = feed.post(post_key)?.id.clone();
            Some((pending, post_id))
        })
        .ok_or_else(|| missing("post"))?;
    let post_id = server_id(&post_id)?;
    match api.create_comment(&post_id, &body).await {
        Ok(comment) => {
            let id = comment.id.clone();
            state.update(|feed| feed.confirm_comment(&pending, comment));
            Ok(id)
        }
        Err(err) => {
            warn!(error = %err, "add comment failed");
            state.update(|feed| feed.fail_comment(&pending));
            Err(err)
        }
    }
}

pub async fn delete_comment<A: FeedApi + ?Sized>(
    api: &A,
    state: &impl StateCell<FeedState>,
    post_key: EntryKey,
    comment_id: EntityId,
) -> ClientResult<()> {
    let id = server_id(&comment_id)?;
    let removal = state
        .update(|feed| feed.begin_delete_comment(post_key, &comment_id))
        .ok_or_else(|| missing("comment"))?;
    if let Err(err) = api.delete_comment(&id).await {
        warn!(error = %err, "delete comment failed");
        state.update(|feed| feed.restore_comment(removal));
        return Err(err);
    }
    Ok(())
}

/// Like or unlike, returning whether the post is now liked by `liker`
pub async fn toggle_like<A: FeedApi + ?Sized>(
    api: &A,
    state: &impl StateCell<FeedState>,
    post_key: EntryKey,
    liker: EntityId,
) -> ClientResult<bool> {
    let change = state
        .update(|feed| feed.toggle_like(post_key, &liker))
        .ok_or_else(|| missing("post"))?;
    let post_id = match server_id(&change.like().post_id) {
        Ok(id) => id,
        Err(err) => {
            state.update(|feed| feed.revert_like(change));
            return Err(err);
        }
    };
    let liked = matches!(change, crate::feed::LikeChange::Liked { .. });
    let result = if liked {
        api.like_post(&post_id).await
    } else {
        api.unlike_post(&post_id).await
    };
    if let Err(err) = result {
        warn!(error = %err, "like toggle failed");
        state.update(|feed| feed.revert_like(change));
        return Err(err);
    }
    Ok(liked)
}

// ========================
// Notifications
// ========================

pub async fn mark_seen<A: NotificationApi + ?Sized>(
    api: &A,
    state: &impl StateCell<NotificationState>,
    key: EntryKey,
) -> ClientResult<()> {
    let Some((change, id)) = state.update(|n| {
        let id = n.list.get(key)?.id.clone();
        let change = n.begin_mark_seen(key)?;
        Some((change, id))
    }) else {
        return Ok(());
    };
    let id = server_id(&id)?;
    if let Err(err) = api.mark_seen(&id).await {
        warn!(error = %err, "mark seen failed");
        state.update(|n| n.revert_seen(&[change]));
        return Err(err);
    }
    Ok(())
}

pub async fn mark_all_seen<A: NotificationApi + ?Sized>(api: &A, state: &impl StateCell<NotificationState>) -> ClientResult<()> {
    let changes = state.update(|n| n.mark_all_seen());
    if changes.is_empty() {
        return Ok(());
    }
    if let Err(err) = api.mark_all_seen().await {
        warn!(error = %err, "mark all seen failed");
        state.update(|n| n.revert_seen(&changes));
        return Err(err);
    }
    Ok(())
}

pub async fn delete_notification<A: NotificationApi + ?Sized>(
    api: &A,
    state: &impl StateCell<NotificationState>,
    key: EntryKey,
) -> ClientResult<()> {
    let removal = state
        .update(|n| n.begin_remove(key))
        .ok_or_else(|| missing("notification"))?;
    let id = match server_id(&removal.value().id) {
        Ok(id) => id,
        Err(err) => {
            state.update(|n| n.restore(removal));
            return Err(err);
        }
    };
    if let Err(err) = api.delete_notification(&id).await {
        warn!(error = %err, "delete notification failed");
        state.update(|n| n.restore(removal));
        return Err(err);
    }
    Ok(())
}

// ========================
// Directory
// ========================

pub async fn invite_user<A: DirectoryApi + ?Sized>(
    api: &A,
    state: &impl StateCell<DirectoryState>,
    company_id: &str,
    key: EntryKey,
) -> ClientResult<()> {
    let removal = state
        .update(|d| d.begin_invite(key))
        .ok_or_else(|| missing("user"))?;
    let user_id = match server_id(&removal.value().id) {
        Ok(id) => id,
        Err(err) => {
            state.update(|d| d.restore_invite(removal));
            return Err(err);
        }
    };
    if let Err(err) = api.invite_user(company_id, &user_id).await {
        warn!(error = %err, "invite failed");
        state.update(|d| d.restore_invite(removal));
        return Err(err);
    }
    Ok(())
}

pub async fn create_job<A: DirectoryApi + ?Sized>(
    api: &A,
    state: &impl StateCell<DirectoryState>,
    company_id: EntityId,
    draft: JobDraft,
) -> ClientResult<EntityId> {
    let company = server_id(&company_id)?;
    let pending = state.update(|d| d.begin_create_job(company_id, &draft));
    match api.create_job(&company, &draft).await {
        Ok(job) => {
            let id = job.id.clone();
            state.update(|d| d.confirm_job(&pending, job));
            Ok(id)
        }
        Err(err) => {
            warn!(error = %err, "create job failed");
            state.update(|d| d.fail_job(&pending));
            Err(err)
        }
    }
}

pub async fn delete_job<A: DirectoryApi + ?Sized>(api: &A, state: &impl StateCell<DirectoryState>, key: EntryKey) -> ClientResult<()> {
    let removal = state
        .update(|d| d.begin_delete_job(key))
        .ok_or_else(|| missing("job offer"))?;
    let id = match server_id(&removal.value().id) {
        Ok(id) => id,
        Err(err) => {
            state.update(|d| d.restore_job(removal));
            return Err(err);
        }
    };
    if let Err(err) = api.delete_job(&id).await {
        warn!(error = %err, "delete job failed");
        state.update(|d| d.restore_job(removal));
        return Err(err);
    }
    Ok(())
}
