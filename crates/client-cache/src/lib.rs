//! EventHub Client Cache
//!
//! In-memory state behind the EventHub web client:
//! - paged lists with an offset cursor and an in-flight guard
//! - the optimistic mutation protocol (temporary ids, reconciliation, rollback)
//! - feed, notification and directory state built on top of both
//! - role guard predicate, realtime event translation, localized messages
//!
//! Nothing here touches the network or the DOM. The async drivers in
//! [`flows`] talk to the backend through the `*Api` traits.

pub mod entity;
pub mod error;
pub mod models;
pub mod paged;
pub mod optimistic;
pub mod feed;
pub mod notifications;
pub mod directory;
pub mod roles;
pub mod realtime;
pub mod messages;
pub mod flows;

pub use entity::{Entity, EntityId, EntryKey, TempIdGenerator};
pub use error::{ClientError, ClientResult};
pub use models::{
    Comment, Company, JobDraft, JobOffer, Like, MediaRef, Notification, Page, Post, PostDraft,
    SeenStatus, User, UserSummary,
};
pub use paged::{Entry, FetchTicket, PagedList, PAGE_SIZE};
pub use optimistic::{Pending, Removal};
pub use feed::{CommentRemoval, FeedState, LikeChange, PendingComment, PostEdit};
pub use notifications::{NotificationState, SeenChange};
pub use directory::DirectoryState;
pub use roles::{Role, RoleGuard};
pub use realtime::{apply_event, channel_name, ChannelKind, RealtimeEvent};
pub use messages::{Locale, Message, Toast, ToastLevel};
