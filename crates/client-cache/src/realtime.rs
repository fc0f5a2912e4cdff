//! Realtime Events
//!
//! Push events arrive on per-user channels and are folded into the same
//! state operations as fetch results. The socket itself lives outside.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::EntityId;
use crate::feed::FeedState;
use crate::models::{Comment, Like, Notification};
use crate::notifications::NotificationState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    LikedPost,
    CommentedPost,
    Notification,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::LikedPost, ChannelKind::CommentedPost, ChannelKind::Notification];

    fn suffix(&self) -> &'static str {
        match self {
            ChannelKind::LikedPost => "liked-post-channel",
            ChannelKind::CommentedPost => "commented-post-channel",
            ChannelKind::Notification => "notification-channel",
        }
    }
}

/// Channel name for one user, e.g. `42-liked-post-channel`
pub fn channel_name(user_id: &EntityId, kind: ChannelKind) -> String {
    format!("{}-{}", user_id, kind.suffix())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "payload", rename_all = "snake_case")]
pub enum RealtimeEvent {
    PostLiked(Like),
    PostUnliked(Like),
    PostCommented(Comment),
    PostDeleted { post_id: EntityId },
    NotificationReceived(Notification),
}

/// Fold one event into client state; returns whether anything changed
pub fn apply_event(feed: &mut FeedState, notifications: &mut NotificationState, event: RealtimeEvent) -> bool {
    let changed = match event {
        RealtimeEvent::PostLiked(like) => feed.apply_remote_like(like),
        RealtimeEvent::PostUnliked(like) => feed.apply_remote_unlike(&like),
        RealtimeEvent::PostCommented(comment) => feed.apply_remote_comment(comment),
        RealtimeEvent::PostDeleted { post_id } => feed.apply_remote_delete(&post_id),
        RealtimeEvent::NotificationReceived(notification) => notifications.push(notification).is_some(),
    };
    debug!(changed, "realtime event applied");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Post, UserSummary};
    use chrono::Utc;

    fn feed_with_post(id: &str) -> FeedState {
        let mut feed = FeedState::new();
        let ticket = feed.posts.begin_fetch().unwrap();
        let post = Post {
            id: EntityId::server(id),
            author: UserSummary { id: EntityId::server("u1"), name: "U1".into(), avatar_url: None },
            body: "hello".into(),
            media: Vec::new(),
            comments: Vec::new(),
            likes: Vec::new(),
            created_at: Utc::now(),
            updated_at: None,
        };
        feed.posts.complete_fetch(ticket, Ok(vec![post])).unwrap();
        feed
    }

    #[test]
    fn test_channel_names() {
        let user = EntityId::server("42");
        assert_eq!(channel_name(&user, ChannelKind::LikedPost), "42-liked-post-channel");
        assert_eq!(channel_name(&user, ChannelKind::Notification), "42-notification-channel");
    }

    #[test]
    fn test_decode_and_apply_like() {
        let mut feed = feed_with_post("10");
        let mut notifications = NotificationState::new();
        let event: RealtimeEvent =
            serde_json::from_str(r#"{"event":"post_liked","payload":{"post_id":10,"user_id":3}}"#).unwrap();

        assert!(apply_event(&mut feed, &mut notifications, event.clone()));
        // Same like again is a no-op
        assert!(!apply_event(&mut feed, &mut notifications, event));
        assert_eq!(feed.posts.values().next().unwrap().like_count(), 1);
    }

    #[test]
    fn test_unknown_post_ignored() {
        let mut feed = feed_with_post("10");
        let mut notifications = NotificationState::new();
        let event = RealtimeEvent::PostDeleted { post_id: EntityId::server("404") };
        assert!(!apply_event(&mut feed, &mut notifications, event));
        assert_eq!(feed.posts.len(), 1);
    }
}
