use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    channels::ChannelType,
    snowflake::{is_snowflake, snowflake_timestamp},
    ApiError,
};

/// A thread as held by the cache. Every holder sees the same instance.
pub type SharedThread = Arc<RwLock<ThreadChannel>>;

/// Minutes of inactivity after which a thread stops showing in the active list.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u32", into = "u32")]
pub enum AutoArchiveDuration {
    OneHour,
    OneDay,
    ThreeDays,
    OneWeek,
}

impl From<AutoArchiveDuration> for u32 {
    fn from(value: AutoArchiveDuration) -> Self {
        match value {
            AutoArchiveDuration::OneHour => 60,
            AutoArchiveDuration::OneDay => 1440,
            AutoArchiveDuration::ThreeDays => 4320,
            AutoArchiveDuration::OneWeek => 10080,
        }
    }
}

impl TryFrom<u32> for AutoArchiveDuration {
    type Error = ApiError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            60 => Ok(AutoArchiveDuration::OneHour),
            1440 => Ok(AutoArchiveDuration::OneDay),
            4320 => Ok(AutoArchiveDuration::ThreeDays),
            10080 => Ok(AutoArchiveDuration::OneWeek),
            other => Err(ApiError::invalid_argument(format!(
                "auto archive duration must be 60, 1440, 4320 or 10080 minutes, got {other}"
            ))),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThreadMetadata {
    pub archived: bool,
    pub auto_archive_duration: AutoArchiveDuration,
    /// Last time the archived state changed.
    pub archive_timestamp: DateTime<Utc>,
    pub locked: bool,
    /// Whether non-moderators can add members. Private threads only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invitable: Option<bool>,
    /// Only set for threads created after 2022-01-09.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_timestamp: Option<DateTime<Utc>>,
}

/// A user's membership of a thread.
///
/// The service sends the thread's own identifier as `id`.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThreadMember {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub join_timestamp: DateTime<Utc>,
    #[serde(default)]
    pub flags: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ThreadChannel {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    #[serde(default)]
    pub guild_id: Option<String>,
    /// The channel the thread was created in.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub owner_id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Slow mode interval in seconds.
    #[serde(default)]
    pub rate_limit_per_user: Option<u32>,
    #[serde(default)]
    pub message_count: Option<u32>,
    #[serde(default)]
    pub member_count: Option<u32>,
    #[serde(default)]
    pub last_message_id: Option<String>,
    #[serde(default)]
    pub thread_metadata: Option<ThreadMetadata>,
    /// Memberships attached from list responses, keyed by user id.
    #[serde(skip)]
    pub members: IndexMap<String, ThreadMember>,
}

impl ThreadChannel {
    pub fn is_archived(&self) -> bool {
        self.thread_metadata
            .as_ref()
            .is_some_and(|metadata| metadata.archived)
    }

    /// When the thread was archived, if it currently is.
    pub fn archived_at(&self) -> Option<DateTime<Utc>> {
        self.thread_metadata
            .as_ref()
            .filter(|metadata| metadata.archived)
            .map(|metadata| metadata.archive_timestamp)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.thread_metadata
            .as_ref()
            .and_then(|metadata| metadata.create_timestamp)
            .or_else(|| snowflake_timestamp(&self.id))
    }

    pub fn invitable(&self) -> Option<bool> {
        if self.kind != ChannelType::PrivateThread {
            return None;
        }
        self.thread_metadata
            .as_ref()
            .and_then(|metadata| metadata.invitable)
    }

    /// Stores a membership keyed by user identifier.
    ///
    /// Records without a user identifier describe the current user, so they
    /// share the `@me` key and a newer one replaces the older.
    pub(crate) fn attach_member(&mut self, member: ThreadMember) {
        let key = member.user_id.clone().unwrap_or_else(|| "@me".to_string());
        self.members.insert(key, member);
    }

    /// Replaces every field with a newer observation, keeping memberships.
    pub(crate) fn patch(&mut self, newer: ThreadChannel) {
        let mut members = std::mem::take(&mut self.members);
        for (user_id, member) in newer.members.iter() {
            members.insert(user_id.clone(), member.clone());
        }
        *self = newer;
        self.members = members;
    }
}

/// A thread or the identifier of one.
#[derive(Debug, Clone)]
pub enum ThreadResolvable {
    Thread(SharedThread),
    Id(String),
}

impl ThreadResolvable {
    pub fn resolve_id(&self) -> Option<String> {
        match self {
            ThreadResolvable::Thread(thread) => Some(thread.read().id.clone()),
            ThreadResolvable::Id(id) if is_snowflake(id) => Some(id.clone()),
            ThreadResolvable::Id(_) => None,
        }
    }
}

impl From<SharedThread> for ThreadResolvable {
    fn from(value: SharedThread) -> Self {
        ThreadResolvable::Thread(value)
    }
}

impl From<&SharedThread> for ThreadResolvable {
    fn from(value: &SharedThread) -> Self {
        ThreadResolvable::Thread(Arc::clone(value))
    }
}

impl From<&str> for ThreadResolvable {
    fn from(value: &str) -> Self {
        ThreadResolvable::Id(value.to_string())
    }
}

impl From<String> for ThreadResolvable {
    fn from(value: String) -> Self {
        ThreadResolvable::Id(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn archived_thread() -> ThreadChannel {
        serde_json::from_value(json!({
            "id": "222222222222222222",
            "type": 12,
            "guild_id": "100000000000000000",
            "parent_id": "300000000000000000",
            "name": "old plans",
            "thread_metadata": {
                "archived": true,
                "auto_archive_duration": 1440,
                "archive_timestamp": "2023-01-01T00:00:00.000Z",
                "locked": false,
                "invitable": true
            }
        }))
        .unwrap()
    }

    #[test]
    fn archived_at_only_while_archived() {
        let mut thread = archived_thread();
        assert_eq!(
            thread.archived_at().unwrap().to_rfc3339(),
            "2023-01-01T00:00:00+00:00"
        );
        thread.thread_metadata.as_mut().unwrap().archived = false;
        assert!(thread.archived_at().is_none());
        assert!(!thread.is_archived());
    }

    #[test]
    fn invitable_is_private_only() {
        let mut thread = archived_thread();
        assert_eq!(thread.invitable(), Some(true));
        thread.kind = ChannelType::PublicThread;
        assert_eq!(thread.invitable(), None);
    }

    #[test]
    fn created_at_falls_back_to_identifier() {
        let thread = archived_thread();
        assert_eq!(thread.created_at(), snowflake_timestamp("222222222222222222"));
    }

    #[test]
    fn patch_keeps_members() {
        let mut thread = archived_thread();
        thread.attach_member(ThreadMember {
            id: Some(thread.id.clone()),
            user_id: Some("500000000000000000".into()),
            join_timestamp: Utc::now(),
            flags: 0,
        });
        let mut newer = archived_thread();
        newer.name = "renamed".into();
        thread.patch(newer);
        assert_eq!(thread.name, "renamed");
        assert!(thread.members.contains_key("500000000000000000"));
    }

    #[test]
    fn current_user_membership_is_replaced() {
        let mut thread = archived_thread();
        for flags in [1, 2] {
            thread.attach_member(ThreadMember {
                id: Some(thread.id.clone()),
                user_id: None,
                join_timestamp: Utc::now(),
                flags,
            });
        }
        assert_eq!(thread.members.len(), 1);
        assert_eq!(thread.members["@me"].flags, 2);
    }

    #[test]
    fn resolvable_ids() {
        let shared: SharedThread = Arc::new(RwLock::new(archived_thread()));
        assert_eq!(
            ThreadResolvable::from(&shared).resolve_id().as_deref(),
            Some("222222222222222222")
        );
        assert_eq!(ThreadResolvable::from("nope").resolve_id(), None);
    }

    #[test]
    fn auto_archive_duration_rejects_other_values() {
        assert!(AutoArchiveDuration::try_from(30).is_err());
        assert_eq!(u32::from(AutoArchiveDuration::OneWeek), 10080);
    }
}
