//! Entity Identity
//!
//! Cached entities carry either a client temporary id (before the server
//! has confirmed them) or the id the server assigned.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Identifier of a cached entity
///
/// Temporary ids live in their own variant, so they can never be confused
/// with a server id no matter what values the server hands out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EntityId {
    /// Assigned by the backend (Laravel ids arrive as numbers or strings)
    Server(String),
    /// Client placeholder until the create request succeeds
    Temp(u64),
}

impl EntityId {
    pub fn server(id: impl Into<String>) -> Self {
        EntityId::Server(id.into())
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, EntityId::Temp(_))
    }

    /// Server id usable in a request path; `None` while still temporary
    pub fn as_server(&self) -> Option<&str> {
        match self {
            EntityId::Server(id) => Some(id),
            EntityId::Temp(_) => None,
        }
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Server(id) => write!(f, "{}", id),
            EntityId::Temp(n) => write!(f, "temp-{}", n),
        }
    }
}

impl Serialize for EntityId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for EntityId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Num(i64),
            Str(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Num(n) => EntityId::Server(n.to_string()),
            RawId::Str(s) => EntityId::Server(s),
        })
    }
}

/// Stable handle to a cache entry
///
/// Unlike the entity id, the key survives reconciliation, so actions
/// started against a pending entity still find it after the swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryKey(pub(crate) u64);

impl EntryKey {
    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Monotonic source of temporary ids
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TempIdGenerator {
    next: u64,
}

impl TempIdGenerator {
    pub fn next_id(&mut self) -> EntityId {
        self.next += 1;
        EntityId::Temp(self.next)
    }
}

/// Core trait for cached entities
pub trait Entity: Clone {
    fn id(&self) -> &EntityId;

    fn set_id(&mut self, id: EntityId);
}
