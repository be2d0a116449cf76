use std::time::Duration;

use {
    chrono::{DateTime, Utc},
    serde::Serialize,
    uuid::Uuid,
};

use crate::{channel::Channel, msg::MsgId};

/// Audit record of one HTTP exchange with a provider.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelLog {
    pub description: String,
    pub channel_uuid: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub msg_id: Option<MsgId>,
    pub method: String,
    pub url: String,
    /// Request snapshot: header lines (credentials redacted) followed by
    /// the body.
    pub request: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    pub response: String,
    pub elapsed_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub created_on: DateTime<Utc>,
}

impl ChannelLog {
    pub fn new(description: impl Into<String>, channel: &Channel, msg_id: Option<MsgId>) -> Self {
        Self {
            description: description.into(),
            channel_uuid: channel.uuid,
            msg_id,
            method: String::new(),
            url: String::new(),
            request: String::new(),
            status_code: None,
            response: String::new(),
            elapsed_ms: 0,
            error: None,
            created_on: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_request(
        mut self,
        method: impl Into<String>,
        url: impl Into<String>,
        request: impl Into<String>,
    ) -> Self {
        self.method = method.into();
        self.url = url.into();
        self.request = request.into();
        self
    }

    #[must_use]
    pub fn with_response(mut self, status_code: Option<u16>, response: impl Into<String>) -> Self {
        self.status_code = status_code;
        self.response = response.into();
        self
    }

    #[must_use]
    pub fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Record an error, prefixed with a short description of what failed.
    #[must_use]
    pub fn with_error(mut self, description: &str, error: impl std::fmt::Display) -> Self {
        self.error = Some(format!("{description}: {error}"));
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
