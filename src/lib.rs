//! Client-side management of Discord channel threads.
//!
//! A [`threads::ThreadManager`] is bound to one parent channel and keeps the
//! threads it observes in a [`cache::ThreadCache`] that can be shared between
//! managers of different channels.

use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

pub mod actions;
pub mod cache;
pub mod channels;
pub mod client;
pub mod snowflake;
pub mod threads;

pub const DEFAULT_BASE_URL: &str = "https://discord.com/api/v10/";

/// Header carrying the audit log reason of a write.
pub const AUDIT_LOG_REASON: &str = "X-Audit-Log-Reason";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A caller-supplied value was rejected before or while building a request.
    InvalidArgument,
    /// The service answered with a non-success status.
    Api,
    /// The request never produced a response.
    Transport,
    /// The response body did not have the expected shape.
    Decode,
}

#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
    pub kind: ErrorKind,
    /// HTTP status, when the service answered.
    pub status: Option<u16>,
    /// The service's own JSON error code, e.g. `50001` for missing access.
    pub code: Option<u64>,
}

impl ApiError {
    pub fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
            status: None,
            code: None,
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(message, ErrorKind::InvalidArgument)
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.kind == ErrorKind::InvalidArgument
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.status, self.code) {
            (Some(status), Some(code)) => {
                write!(f, "{} (status {status}, code {code})", self.message)
            }
            (Some(status), None) => write!(f, "{} (status {status})", self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(value: reqwest::Error) -> Self {
        let mut error = ApiError::new(value.to_string(), ErrorKind::Transport);
        error.status = value.status().map(|status| status.as_u16());
        error
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::new(value.to_string(), ErrorKind::Decode)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ApiError {
    fn from(value: reqwest::header::InvalidHeaderValue) -> Self {
        ApiError::invalid_argument(value.to_string())
    }
}

/// Error body returned by the service on non-success statuses.
#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ErrorBody {
    pub code: Option<u64>,
    pub message: String,
}

pub type ApiResponseOrError<T> = Result<T, ApiError>;

#[derive(Clone, Eq, PartialEq)]
pub struct Credentials {
    token: String,
    base_url: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Credentials({})", self.base_url)
    }
}

impl Credentials {
    /// Creates credentials from a bot token and a base URL.
    ///
    /// A trailing slash is appended to the base URL if missing so that routes
    /// can be concatenated directly.
    pub fn new(token: impl Into<String>, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self {
            token: token.into(),
            base_url,
        }
    }

    /// Reads `DISCORD_TOKEN` and the optional `DISCORD_BASE_URL`, loading a
    /// `.env` file first if one exists.
    ///
    /// ## Examples
    ///
    /// ```no_run
    /// use guild_threads::Credentials;
    ///
    /// let credentials = Credentials::from_env().unwrap();
    /// ```
    pub fn from_env() -> ApiResponseOrError<Self> {
        dotenv().ok();
        let token = env::var("DISCORD_TOKEN").map_err(|_| {
            ApiError::invalid_argument("environment variable `DISCORD_TOKEN` should be defined")
        })?;
        let base_url =
            env::var("DISCORD_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Ok(Self::new(token, base_url))
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
