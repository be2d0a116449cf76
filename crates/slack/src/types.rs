//! Slack Events API and Web API payloads.

use serde::{Deserialize, Serialize};

// ── Events API ──────────────────────────────────────────────────────────────

/// Top-level request Slack posts to the events endpoint.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Envelope {
    UrlVerification {
        #[serde(default)]
        token: String,
        challenge: String,
    },
    EventCallback(EventCallback),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct EventCallback {
    #[serde(default)]
    pub event_id: String,
    pub event_time: i64,
    pub event: Event,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Message(MessageEvent),
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub channel_type: ConversationKind,
    #[serde(default)]
    pub files: Vec<File>,
    #[serde(default)]
    pub bot_id: Option<String>,
    /// Set on system messages (`message_changed`, `channel_join`, ...) and
    /// on `file_share` uploads.
    #[serde(default)]
    pub subtype: Option<String>,
}

/// Where a message was posted.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    Channel,
    Im,
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct File {
    pub id: String,
    #[serde(default)]
    pub url_private_download: String,
    #[serde(default)]
    pub permalink_public: String,
}

// ── Web API ─────────────────────────────────────────────────────────────────

/// Fields every Web API response carries.
#[derive(Debug, Deserialize)]
pub struct ApiResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct FileResponse {
    pub ok: bool,
    #[serde(default)]
    pub file: Option<File>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfoResponse {
    pub ok: bool,
    #[serde(default)]
    pub user: Option<UserInfo>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub real_name: String,
}

#[derive(Debug, Serialize)]
pub struct PostMessage<'a> {
    pub channel: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SharePublicUrl<'a> {
    pub file: &'a str,
}
