use derive_builder::Builder;
use serde::Serialize;

use crate::{
    channels::{ChannelType, MessageResolvable, ParentChannel},
    ApiError, ApiResponseOrError,
};

use super::AutoArchiveDuration;

#[derive(Builder, Debug, Clone)]
#[builder(derive(Debug))]
#[builder(pattern = "owned")]
#[builder(name = "CreateThreadBuilder")]
#[builder(setter(strip_option, into))]
pub struct CreateThreadRequest {
    /// 1-100 characters.
    pub name: String,
    /// Defaults to the parent's default auto archive duration.
    #[builder(default)]
    pub auto_archive_duration: Option<AutoArchiveDuration>,
    /// Starts the thread from this message. The service then derives the
    /// thread type from the parent, so `kind` is ignored.
    #[builder(default)]
    pub start_message: Option<MessageResolvable>,
    /// One of the thread channel types. Defaults to a public thread.
    #[builder(default)]
    pub kind: Option<ChannelType>,
    /// Whether non-moderators can add other members. Private threads only.
    #[builder(default)]
    pub invitable: Option<bool>,
    /// Slow mode interval in seconds.
    #[builder(default)]
    pub rate_limit_per_user: Option<u32>,
    /// Recorded in the guild's audit log.
    #[builder(default)]
    pub reason: Option<String>,
}

impl CreateThreadRequest {
    pub fn builder(name: impl Into<String>) -> CreateThreadBuilder {
        CreateThreadBuilder::create_empty().name(name)
    }
}

impl From<CreateThreadBuilderError> for ApiError {
    fn from(value: CreateThreadBuilderError) -> Self {
        ApiError::invalid_argument(value.to_string())
    }
}

/// JSON body of both creation routes.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CreateThreadBody {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_archive_duration: Option<AutoArchiveDuration>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<ChannelType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invitable: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit_per_user: Option<u32>,
}

/// A validated creation request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedCreate {
    pub route: String,
    pub body: CreateThreadBody,
    pub reason: Option<String>,
}

/// Decides the thread type to request.
///
/// | start message | announcement parent | sent type               |
/// |---------------|---------------------|-------------------------|
/// | yes           | any                 | none, service derives it |
/// | no            | yes                 | announcement thread     |
/// | no            | no                  | `requested` or public   |
pub fn resolve_thread_kind(
    has_start_message: bool,
    parent: &ParentChannel,
    requested: Option<ChannelType>,
) -> Option<ChannelType> {
    match (has_start_message, parent.is_announcement()) {
        (true, _) => None,
        (false, true) => Some(ChannelType::AnnouncementThread),
        (false, false) => Some(requested.unwrap_or(ChannelType::PublicThread)),
    }
}

impl PreparedCreate {
    /// Validates `request` and picks the route and body. Makes no network call.
    pub fn new(parent: &ParentChannel, request: CreateThreadRequest) -> ApiResponseOrError<Self> {
        if let Some(kind) = request.kind {
            if !kind.is_thread() {
                return Err(ApiError::invalid_argument(format!(
                    "kind must be a thread channel type, got {kind:?}"
                )));
            }
        }

        let start_message_id = match &request.start_message {
            Some(message) => Some(message.resolve_id().ok_or_else(|| {
                ApiError::invalid_argument("start message could not be resolved to an identifier")
            })?),
            None => None,
        };

        let kind = resolve_thread_kind(start_message_id.is_some(), parent, request.kind);
        let invitable = match kind {
            Some(ChannelType::PrivateThread) => request.invitable,
            _ => None,
        };

        let route = match &start_message_id {
            Some(message_id) => format!("channels/{}/messages/{message_id}/threads", parent.id),
            None => format!("channels/{}/threads", parent.id),
        };

        Ok(Self {
            route,
            body: CreateThreadBody {
                name: request.name,
                auto_archive_duration: request
                    .auto_archive_duration
                    .or(parent.default_auto_archive_duration),
                kind,
                invitable,
                rate_limit_per_user: request.rate_limit_per_user,
            },
            reason: request.reason,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_parent() -> ParentChannel {
        ParentChannel::new("300000000000000000", "100000000000000000", ChannelType::GuildText)
    }

    fn announcement_parent() -> ParentChannel {
        ParentChannel::new(
            "300000000000000001",
            "100000000000000000",
            ChannelType::GuildAnnouncement,
        )
    }

    fn prepare(
        parent: &ParentChannel,
        builder: CreateThreadBuilder,
    ) -> ApiResponseOrError<PreparedCreate> {
        PreparedCreate::new(parent, builder.build().unwrap())
    }

    #[test]
    fn defaults_to_public_thread() {
        let prepared = prepare(&text_parent(), CreateThreadRequest::builder("plans")).unwrap();
        assert_eq!(prepared.route, "channels/300000000000000000/threads");
        assert_eq!(prepared.body.kind, Some(ChannelType::PublicThread));
        assert_eq!(prepared.body.auto_archive_duration, None);
    }

    #[test]
    fn start_message_overrides_kind() {
        let prepared = prepare(
            &text_parent(),
            CreateThreadRequest::builder("plans")
                .start_message("400000000000000000")
                .kind(ChannelType::PrivateThread)
                .invitable(false),
        )
        .unwrap();
        assert_eq!(
            prepared.route,
            "channels/300000000000000000/messages/400000000000000000/threads"
        );
        assert_eq!(prepared.body.kind, None);
        assert_eq!(prepared.body.invitable, None);
        let body = serde_json::to_value(&prepared.body).unwrap();
        assert!(body.get("type").is_none());
    }

    #[test]
    fn announcement_parent_forces_announcement_thread() {
        for kind in [None, Some(ChannelType::PublicThread), Some(ChannelType::PrivateThread)] {
            let mut builder = CreateThreadRequest::builder("news");
            if let Some(kind) = kind {
                builder = builder.kind(kind);
            }
            let prepared = prepare(&announcement_parent(), builder).unwrap();
            assert_eq!(prepared.body.kind, Some(ChannelType::AnnouncementThread));
        }
    }

    #[test]
    fn invitable_only_for_private_threads() {
        let prepared = prepare(
            &text_parent(),
            CreateThreadRequest::builder("secret")
                .kind(ChannelType::PrivateThread)
                .invitable(false),
        )
        .unwrap();
        assert_eq!(prepared.body.invitable, Some(false));

        let prepared = prepare(
            &text_parent(),
            CreateThreadRequest::builder("open").invitable(false),
        )
        .unwrap();
        assert_eq!(prepared.body.invitable, None);
    }

    #[test]
    fn missing_name_is_invalid_argument() {
        let error: ApiError = CreateThreadBuilder::default().build().unwrap_err().into();
        assert!(error.is_invalid_argument());
    }

    #[test]
    fn rejects_non_thread_kind() {
        let builder = CreateThreadRequest::builder("x").kind(ChannelType::GuildVoice);
        let error = prepare(&text_parent(), builder).unwrap_err();
        assert!(error.is_invalid_argument());
    }

    #[test]
    fn rejects_unresolvable_start_message() {
        let builder = CreateThreadRequest::builder("x").start_message("hello");
        let error = prepare(&text_parent(), builder).unwrap_err();
        assert!(error.is_invalid_argument());
    }

    #[test]
    fn auto_archive_falls_back_to_parent_default() {
        let mut parent = text_parent();
        parent.default_auto_archive_duration = Some(AutoArchiveDuration::OneDay);
        let prepared = prepare(&parent, CreateThreadRequest::builder("x")).unwrap();
        assert_eq!(prepared.body.auto_archive_duration, Some(AutoArchiveDuration::OneDay));

        let prepared = prepare(
            &parent,
            CreateThreadRequest::builder("x").auto_archive_duration(AutoArchiveDuration::OneWeek),
        )
        .unwrap();
        assert_eq!(prepared.body.auto_archive_duration, Some(AutoArchiveDuration::OneWeek));
    }

    #[test]
    fn body_uses_wire_names() {
        let prepared = prepare(
            &text_parent(),
            CreateThreadRequest::builder("slow")
                .rate_limit_per_user(30u32)
                .auto_archive_duration(AutoArchiveDuration::OneHour),
        )
        .unwrap();
        assert_eq!(
            serde_json::to_value(&prepared.body).unwrap(),
            serde_json::json!({
                "name": "slow",
                "auto_archive_duration": 60,
                "type": 11,
                "rate_limit_per_user": 30
            })
        );
    }
}
