//! Parent channels and the messages threads can be started from.

use serde::{Deserialize, Serialize};

use crate::{snowflake::is_snowflake, threads::AutoArchiveDuration, ApiError};

#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(try_from = "u8", into = "u8")]
pub enum ChannelType {
    GuildText,
    Dm,
    GuildVoice,
    GroupDm,
    GuildCategory,
    GuildAnnouncement,
    AnnouncementThread,
    PublicThread,
    PrivateThread,
    GuildStageVoice,
    GuildDirectory,
    GuildForum,
    GuildMedia,
}

impl ChannelType {
    pub fn is_thread(self) -> bool {
        matches!(
            self,
            ChannelType::AnnouncementThread | ChannelType::PublicThread | ChannelType::PrivateThread
        )
    }
}

impl From<ChannelType> for u8 {
    fn from(value: ChannelType) -> Self {
        match value {
            ChannelType::GuildText => 0,
            ChannelType::Dm => 1,
            ChannelType::GuildVoice => 2,
            ChannelType::GroupDm => 3,
            ChannelType::GuildCategory => 4,
            ChannelType::GuildAnnouncement => 5,
            ChannelType::AnnouncementThread => 10,
            ChannelType::PublicThread => 11,
            ChannelType::PrivateThread => 12,
            ChannelType::GuildStageVoice => 13,
            ChannelType::GuildDirectory => 14,
            ChannelType::GuildForum => 15,
            ChannelType::GuildMedia => 16,
        }
    }
}

impl TryFrom<u8> for ChannelType {
    type Error = ApiError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => ChannelType::GuildText,
            1 => ChannelType::Dm,
            2 => ChannelType::GuildVoice,
            3 => ChannelType::GroupDm,
            4 => ChannelType::GuildCategory,
            5 => ChannelType::GuildAnnouncement,
            10 => ChannelType::AnnouncementThread,
            11 => ChannelType::PublicThread,
            12 => ChannelType::PrivateThread,
            13 => ChannelType::GuildStageVoice,
            14 => ChannelType::GuildDirectory,
            15 => ChannelType::GuildForum,
            16 => ChannelType::GuildMedia,
            other => {
                return Err(ApiError::invalid_argument(format!(
                    "unknown channel type {other}"
                )))
            }
        })
    }
}

/// The channel a [`crate::threads::ThreadManager`] is bound to.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ParentChannel {
    pub id: String,
    /// Absent for channels outside a guild.
    #[serde(default)]
    pub guild_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: ChannelType,
    /// Applied to new threads when the caller does not pick a duration.
    #[serde(default)]
    pub default_auto_archive_duration: Option<AutoArchiveDuration>,
}

impl ParentChannel {
    pub fn new(id: impl Into<String>, guild_id: impl Into<String>, kind: ChannelType) -> Self {
        Self {
            id: id.into(),
            guild_id: Some(guild_id.into()),
            kind,
            default_auto_archive_duration: None,
        }
    }

    pub fn is_announcement(&self) -> bool {
        self.kind == ChannelType::GuildAnnouncement
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: String,
    pub channel_id: String,
}

/// A message or the identifier of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageResolvable {
    Message(Message),
    Id(String),
}

impl MessageResolvable {
    pub fn resolve_id(&self) -> Option<String> {
        match self {
            MessageResolvable::Message(message) => Some(message.id.clone()),
            MessageResolvable::Id(id) if is_snowflake(id) => Some(id.clone()),
            MessageResolvable::Id(_) => None,
        }
    }
}

impl From<Message> for MessageResolvable {
    fn from(value: Message) -> Self {
        MessageResolvable::Message(value)
    }
}

impl From<&str> for MessageResolvable {
    fn from(value: &str) -> Self {
        MessageResolvable::Id(value.to_string())
    }
}

impl From<String> for MessageResolvable {
    fn from(value: String) -> Self {
        MessageResolvable::Id(value)
    }
}
