//! Client Models
//!
//! Data structures matching backend resources.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::entity::{Entity, EntityId};
use crate::roles::Role;

/// Author / sender reference embedded in other resources
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// The signed-in user (`GET me`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub company_id: Option<EntityId>,
}

impl User {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// Uploaded media attached to a post or product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: EntityId,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub post_id: EntityId,
    pub user_id: EntityId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: EntityId,
    pub post_id: EntityId,
    pub author: UserSummary,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// Feed item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: EntityId,
    pub author: UserSummary,
    pub body: String,
    #[serde(default)]
    pub media: Vec<MediaRef>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub likes: Vec<Like>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn is_liked_by(&self, user_id: &EntityId) -> bool {
        self.likes.iter().any(|like| &like.user_id == user_id)
    }

    pub fn like_count(&self) -> usize {
        self.likes.len()
    }
}

/// Payload for `POST posts`
///
/// Keeps the full upload results so the optimistic post can show them;
/// only their ids go over the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PostDraft {
    pub body: String,
    #[serde(rename = "media_ids", serialize_with = "serialize_media_ids")]
    pub media: Vec<MediaRef>,
}

fn serialize_media_ids<S: Serializer>(media: &[MediaRef], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(media.iter().map(|m| &m.id))
}

/// Notification read state
///
/// The backend only distinguishes the literal `"Not seen"` from anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeenStatus {
    NotSeen,
    Seen,
}

const NOT_SEEN: &str = "Not seen";

impl Serialize for SeenStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SeenStatus::NotSeen => serializer.serialize_str(NOT_SEEN),
            SeenStatus::Seen => serializer.serialize_str("Seen"),
        }
    }
}

impl<'de> Deserialize<'de> for SeenStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(if raw == NOT_SEEN { SeenStatus::NotSeen } else { SeenStatus::Seen })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: EntityId,
    pub sender: UserSummary,
    #[serde(default)]
    pub message: String,
    pub seen: SeenStatus,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_seen(&self) -> bool {
        self.seen == SeenStatus::Seen
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobOffer {
    pub id: EntityId,
    pub company_id: EntityId,
    pub title: String,
    /// Markdown
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Payload for `POST jobs`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct JobDraft {
    pub title: String,
    pub description: String,
    pub location: Option<String>,
    pub contract_type: Option<String>,
}

/// Laravel paginator envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    #[serde(default = "first_page")]
    pub current_page: u32,
    #[serde(default = "first_page")]
    pub last_page: u32,
    #[serde(default)]
    pub per_page: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

fn first_page() -> u32 {
    1
}

impl<T> Page<T> {
    pub fn is_last(&self) -> bool {
        self.current_page >= self.last_page
    }
}

macro_rules! impl_entity {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Entity for $ty {
                fn id(&self) -> &EntityId {
                    &self.id
                }

                fn set_id(&mut self, id: EntityId) {
                    self.id = id;
                }
            }
        )*
    };
}

impl_entity!(Post, Comment, Notification, UserSummary, Company, JobOffer);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seen_status_wire_values() {
        let statuses: Vec<SeenStatus> =
            serde_json::from_str(r#"["Not seen", "Seen", "seen", "read"]"#).unwrap();
        assert_eq!(
            statuses,
            vec![SeenStatus::NotSeen, SeenStatus::Seen, SeenStatus::Seen, SeenStatus::Seen]
        );
        assert_eq!(serde_json::to_string(&SeenStatus::NotSeen).unwrap(), r#""Not seen""#);
    }

    #[test]
    fn test_page_envelope() {
        let json = r#"{
            "data": [{"id": 7, "name": "Acme"}],
            "current_page": 2,
            "last_page": 2,
            "total": 11
        }"#;
        let page: Page<Company> = serde_json::from_str(json).unwrap();
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].id, EntityId::server("7"));
        assert!(page.is_last());
        assert_eq!(page.per_page, None);
    }

    #[test]
    fn test_post_draft_sends_media_ids() {
        let draft = PostDraft {
            body: "Stand B12".into(),
            media: vec![
                MediaRef { id: EntityId::server("m1"), url: Some("/m1.jpg".into()), mime_type: None },
                MediaRef { id: EntityId::server("m2"), url: None, mime_type: None },
            ],
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json, serde_json::json!({"body": "Stand B12", "media_ids": ["m1", "m2"]}));
    }

    #[test]
    fn test_post_defaults_missing_collections() {
        let json = r#"{
            "id": "p1",
            "author": {"id": 3, "name": "Ada"},
            "body": "Hello",
            "created_at": "2024-03-01T10:00:00Z"
        }"#;
        let post: Post = serde_json::from_str(json).unwrap();
        assert!(post.comments.is_empty());
        assert_eq!(post.like_count(), 0);
        assert!(!post.is_liked_by(&EntityId::server("3")));
    }
}
