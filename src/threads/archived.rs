//! Archived thread listings and their pagination cursors.
//!
//! The service has two archive listings. The joined private listing pages by
//! thread identifier; the per-kind channel listing pages by archive time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use derive_builder::Builder;
use std::sync::Arc;

use crate::{cache::ThreadCache, snowflake::is_snowflake, ApiError, ApiResponseOrError};

use super::SharedThread;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ArchivedKind {
    #[default]
    Public,
    Private,
}

impl ArchivedKind {
    fn as_str(self) -> &'static str {
        match self {
            ArchivedKind::Public => "public",
            ArchivedKind::Private => "private",
        }
    }
}

/// The value a page must end before.
#[derive(Debug, Clone)]
pub enum ArchivedBefore {
    Thread(SharedThread),
    Id(String),
    Date(DateTime<Utc>),
    /// Parsed as a date when the request is built.
    Text(String),
}

impl From<&str> for ArchivedBefore {
    fn from(value: &str) -> Self {
        if is_snowflake(value) {
            ArchivedBefore::Id(value.to_string())
        } else {
            ArchivedBefore::Text(value.to_string())
        }
    }
}

impl From<String> for ArchivedBefore {
    fn from(value: String) -> Self {
        ArchivedBefore::from(value.as_str())
    }
}

impl From<DateTime<Utc>> for ArchivedBefore {
    fn from(value: DateTime<Utc>) -> Self {
        ArchivedBefore::Date(value)
    }
}

impl From<SharedThread> for ArchivedBefore {
    fn from(value: SharedThread) -> Self {
        ArchivedBefore::Thread(value)
    }
}

impl From<&SharedThread> for ArchivedBefore {
    fn from(value: &SharedThread) -> Self {
        ArchivedBefore::Thread(Arc::clone(value))
    }
}

#[derive(Builder, Debug, Clone, Default)]
#[builder(derive(Debug))]
#[builder(pattern = "owned")]
#[builder(name = "FetchArchivedThreadsBuilder")]
#[builder(setter(strip_option, into))]
pub struct FetchArchivedThreadOptions {
    #[builder(default)]
    pub kind: ArchivedKind,
    /// Lists every private thread instead of only joined ones. Needs the
    /// manage threads permission.
    #[builder(default)]
    pub fetch_all: bool,
    #[builder(default)]
    pub before: Option<ArchivedBefore>,
    #[builder(default)]
    pub limit: Option<u32>,
}

impl FetchArchivedThreadOptions {
    pub fn builder() -> FetchArchivedThreadsBuilder {
        FetchArchivedThreadsBuilder::create_empty()
    }
}

impl From<FetchArchivedThreadsBuilderError> for ApiError {
    fn from(value: FetchArchivedThreadsBuilderError) -> Self {
        ApiError::invalid_argument(value.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveEndpoint {
    /// Private threads the current user has joined, ordered by identifier.
    Joined,
    /// All archived threads of a kind, ordered by archive time.
    Channel(ArchivedKind),
}

impl ArchiveEndpoint {
    pub fn select(kind: ArchivedKind, fetch_all: bool) -> Self {
        match (kind, fetch_all) {
            (ArchivedKind::Private, false) => ArchiveEndpoint::Joined,
            (kind, _) => ArchiveEndpoint::Channel(kind),
        }
    }

    pub fn route(self, channel_id: &str) -> String {
        match self {
            ArchiveEndpoint::Joined => {
                format!("channels/{channel_id}/users/@me/threads/archived/private")
            }
            ArchiveEndpoint::Channel(kind) => {
                format!("channels/{channel_id}/threads/archived/{}", kind.as_str())
            }
        }
    }
}

/// Endpoint and query of one archived listing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchivedQuery {
    pub endpoint: ArchiveEndpoint,
    pub before: Option<String>,
    pub limit: Option<u32>,
}

impl ArchivedQuery {
    /// Picks the endpoint and encodes the cursor the endpoint accepts.
    ///
    /// An identifier on the timestamp-ordered listing is sent as the thread's
    /// archive time, and omitted when that is unknown. A date on the
    /// identifier-ordered listing is omitted.
    pub fn build(
        options: &FetchArchivedThreadOptions,
        cache: &ThreadCache,
    ) -> ApiResponseOrError<Self> {
        let endpoint = ArchiveEndpoint::select(options.kind, options.fetch_all);
        let before = match &options.before {
            None => None,
            Some(before) => encode_cursor(before, endpoint, cache)?,
        };
        Ok(Self {
            endpoint,
            before,
            limit: options.limit,
        })
    }

    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(before) = &self.before {
            query.push(("before", before.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

fn encode_cursor(
    before: &ArchivedBefore,
    endpoint: ArchiveEndpoint,
    cache: &ThreadCache,
) -> ApiResponseOrError<Option<String>> {
    let (id, archived_at) = match before {
        ArchivedBefore::Thread(thread) => {
            let thread = thread.read();
            (thread.id.clone(), thread.archived_at())
        }
        ArchivedBefore::Id(id) if is_snowflake(id) => {
            let archived_at = cache.get(id).and_then(|thread| thread.read().archived_at());
            (id.clone(), archived_at)
        }
        ArchivedBefore::Id(id) | ArchivedBefore::Text(id) => {
            let date = parse_date(id).ok_or_else(|| {
                ApiError::invalid_argument(format!(
                    "`before` must be a date or a thread identifier, got {id:?}"
                ))
            })?;
            return Ok(date_cursor(date, endpoint));
        }
        ArchivedBefore::Date(date) => return Ok(date_cursor(*date, endpoint)),
    };

    Ok(match endpoint {
        ArchiveEndpoint::Joined => Some(id),
        ArchiveEndpoint::Channel(_) => {
            if archived_at.is_none() {
                log::debug!("no archive timestamp known for thread {id}, sending no cursor");
            }
            archived_at.map(iso_timestamp)
        }
    })
}

fn date_cursor(date: DateTime<Utc>, endpoint: ArchiveEndpoint) -> Option<String> {
    match endpoint {
        ArchiveEndpoint::Joined => {
            log::debug!("dropping date cursor on the joined private listing");
            None
        }
        ArchiveEndpoint::Channel(_) => Some(iso_timestamp(date)),
    }
}

fn iso_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = DateTime::parse_from_rfc2822(value) {
        return Some(date.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(date.and_utc());
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|date| date.and_utc())
}
