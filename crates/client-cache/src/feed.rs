//! Feed State
//!
//! Posts with their comments and likes. Every user action is split in a
//! synchronous `begin_*` step applied before the request and a
//! `confirm_*` / `fail_*` / `revert_*` step applied after it.

use chrono::Utc;
use tracing::{debug, warn};

use crate::entity::{EntityId, EntryKey, TempIdGenerator};
use crate::models::{Comment, Like, Post, PostDraft, UserSummary};
use crate::optimistic::{Pending, Removal};
use crate::paged::PagedList;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedState {
    pub posts: PagedList<Post>,
    temp_ids: TempIdGenerator,
}

/// Comment inserted under a temporary id
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct PendingComment {
    pub post_key: EntryKey,
    pub temp_id: EntityId,
}

/// Applied like/unlike, reversible
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum LikeChange {
    Liked { post_key: EntryKey, like: Like },
    Unliked { post_key: EntryKey, like: Like, index: usize },
}

impl LikeChange {
    pub fn post_key(&self) -> EntryKey {
        match self {
            LikeChange::Liked { post_key, .. } | LikeChange::Unliked { post_key, .. } => *post_key,
        }
    }

    pub fn like(&self) -> &Like {
        match self {
            LikeChange::Liked { like, .. } | LikeChange::Unliked { like, .. } => like,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct CommentRemoval {
    pub post_key: EntryKey,
    pub index: usize,
    pub comment: Comment,
}

#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct PostEdit {
    pub post_key: EntryKey,
    pub previous_body: String,
}

impl FeedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post(&self, key: EntryKey) -> Option<&Post> {
        self.posts.get(key)
    }

    // ========================
    // Posts
    // ========================

    /// Show a new post at the top of the feed before the server has it
    pub fn begin_create_post(&mut self, author: UserSummary, draft: &PostDraft) -> Pending {
        let post = Post {
            id: EntityId::Temp(0),
            author,
            body: draft.body.clone(),
            media: draft.media.clone(),
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
        self.posts.insert_front(&mut self.temp_ids, post)
    }

    pub fn confirm_post(&mut self, pending: &Pending, post: Post) -> bool {
        self.posts.reconcile(pending, post)
    }

    pub fn fail_post(&mut self, pending: &Pending) {
        let _ = self.posts.discard(pending);
    }

    /// Optimistically replace a post body
    pub fn begin_edit_post(&mut self, post_key: EntryKey, body: &str) -> Option<PostEdit> {
        let post = self.posts.get_mut(post_key)?;
        post.id.as_server()?;
        let previous_body = std::mem::replace(&mut post.body, body.to_string());
        Some(PostEdit { post_key, previous_body })
    }

    pub fn confirm_edit(&mut self, edit: &PostEdit, post: Post) {
        if let Some(current) = self.posts.get_mut(edit.post_key) {
            *current = post;
        }
    }

    pub fn revert_edit(&mut self, edit: PostEdit) {
        if let Some(post) = self.posts.get_mut(edit.post_key) {
            warn!(id = %post.id, "post edit rolled back");
            post.body = edit.previous_body;
        }
    }

    /// Take a post out of the feed ahead of the delete request
    ///
    /// Posts still waiting for their create response cannot be deleted.
    pub fn begin_delete_post(&mut self, post_key: EntryKey) -> Option<Removal<Post>> {
        if self.posts.get(post_key)?.id.is_temp() {
            return None;
        }
        self.posts.remove(post_key)
    }

    pub fn restore_post(&mut self, removal: Removal<Post>) {
        self.posts.restore(removal);
    }

    // ========================
    // Comments
    // ========================

    pub fn begin_add_comment(&mut self, post_key: EntryKey, author: UserSummary, body: &str) -> Option<PendingComment> {
        let post = self.posts.get_mut(post_key)?;
        if post.id.is_temp() {
            return None;
        }
        let temp_id = self.temp_ids.next_id();
        post.comments.push(Comment {
            id: temp_id.clone(),
            post_id: post.id.clone(),
            author,
            body: body.to_string(),
            created_at: Utc::now(),
        });
        debug!(post = %post.id, %temp_id, "optimistic comment");
        Some(PendingComment { post_key, temp_id })
    }

    pub fn confirm_comment(&mut self, pending: &PendingComment, comment: Comment) -> bool {
        let Some(post) = self.posts.get_mut(pending.post_key) else {
            return false;
        };
        let Some(index) = post.comments.iter().position(|c| c.id == pending.temp_id) else {
            return false;
        };
        let server_id = comment.id.clone();
        post.comments[index] = comment;
        // Keep ids unique if a realtime push already added it
        let mut seen = false;
        post.comments.retain(|c| {
            if c.id != server_id {
                return true;
            }
            let keep = !seen;
            seen = true;
            keep
        });
        true
    }

    pub fn fail_comment(&mut self, pending: &PendingComment) {
        if let Some(post) = self.posts.get_mut(pending.post_key) {
            warn!(temp_id = %pending.temp_id, "optimistic comment rolled back");
            post.comments.retain(|c| c.id != pending.temp_id);
        }
    }

    pub fn begin_delete_comment(&mut self, post_key: EntryKey, comment_id: &EntityId) -> Option<CommentRemoval> {
        if comment_id.is_temp() {
            return None;
        }
        let post = self.posts.get_mut(post_key)?;
        let index = post.comments.iter().position(|c| &c.id == comment_id)?;
        let comment = post.comments.remove(index);
        Some(CommentRemoval { post_key, index, comment })
    }

    pub fn restore_comment(&mut self, removal: CommentRemoval) {
        if let Some(post) = self.posts.get_mut(removal.post_key) {
            if post.comments.iter().any(|c| c.id == removal.comment.id) {
                return;
            }
            let index = removal.index.min(post.comments.len());
            post.comments.insert(index, removal.comment);
        }
    }

    // ========================
    // Likes
    // ========================

    /// Like if `liker` has not liked the post yet, unlike otherwise
    pub fn toggle_like(&mut self, post_key: EntryKey, liker: &EntityId) -> Option<LikeChange> {
        let post = self.posts.get_mut(post_key)?;
        if post.id.is_temp() {
            return None;
        }
        match post.likes.iter().position(|like| &like.user_id == liker) {
            Some(index) => {
                let like = post.likes.remove(index);
                Some(LikeChange::Unliked { post_key, like, index })
            }
            None => {
                let like = Like { post_id: post.id.clone(), user_id: liker.clone() };
                post.likes.push(like.clone());
                Some(LikeChange::Liked { post_key, like })
            }
        }
    }

    pub fn revert_like(&mut self, change: LikeChange) {
        let Some(post) = self.posts.get_mut(change.post_key()) else {
            return;
        };
        warn!(post = %post.id, "like change rolled back");
        match change {
            LikeChange::Liked { like, .. } => {
                post.likes.retain(|l| l.user_id != like.user_id);
            }
            LikeChange::Unliked { like, index, .. } => {
                if !post.likes.iter().any(|l| l.user_id == like.user_id) {
                    let index = index.min(post.likes.len());
                    post.likes.insert(index, like);
                }
            }
        }
    }

    // ========================
    // Realtime
    // ========================

    /// Like delivered by the server for a cached post
    pub fn apply_remote_like(&mut self, like: Like) -> bool {
        let Some(key) = self.posts.key_of(&like.post_id) else {
            return false;
        };
        let Some(post) = self.posts.get_mut(key) else {
            return false;
        };
        if post.is_liked_by(&like.user_id) {
            return false;
        }
        post.likes.push(like);
        true
    }

    pub fn apply_remote_unlike(&mut self, like: &Like) -> bool {
        let Some(key) = self.posts.key_of(&like.post_id) else {
            return false;
        };
        let Some(post) = self.posts.get_mut(key) else {
            return false;
        };
        let before = post.likes.len();
        post.likes.retain(|l| l.user_id != like.user_id);
        post.likes.len() != before
    }

    pub fn apply_remote_comment(&mut self, comment: Comment) -> bool {
        let Some(key) = self.posts.key_of(&comment.post_id) else {
            return false;
        };
        let Some(post) = self.posts.get_mut(key) else {
            return false;
        };
        if post.comments.iter().any(|c| c.id == comment.id) {
            return false;
        }
        post.comments.push(comment);
        true
    }

    pub fn apply_remote_delete(&mut self, post_id: &EntityId) -> bool {
        match self.posts.key_of(post_id) {
            Some(key) => self.posts.remove(key).is_some(),
            None => false,
        }
    }
}
