//! FreshChat wire payloads.

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
};

// ── Inbound ─────────────────────────────────────────────────────────────────

/// Webhook envelope. Only `message_create` style events carry a message.
#[derive(Debug, Deserialize)]
pub struct Webhook {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub data: WebhookData,
}

#[derive(Debug, Default, Deserialize)]
pub struct WebhookData {
    #[serde(default)]
    pub message: Option<WebhookMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookMessage {
    #[serde(default)]
    pub message_parts: Vec<MessagePart>,
    #[serde(default)]
    pub actor_id: String,
    #[serde(default)]
    pub actor_type: ActorType,
    #[serde(default)]
    pub channel_id: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorType {
    #[default]
    User,
    Agent,
    System,
    #[serde(other)]
    Unknown,
}

/// One element of `message_parts`. Each part is an object keyed by its
/// kind; kinds other than text and image are kept raw so they can be
/// reported and skipped.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum MessagePart {
    Known(KnownPart),
    Unsupported(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownPart {
    Text { content: String },
    Image { url: String },
}

// ── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ConversationRequest<'a> {
    pub messages: Vec<OutgoingMessage<'a>>,
    pub channel_id: &'a str,
    pub users: Vec<User<'a>>,
}

#[derive(Debug, Serialize)]
pub struct OutgoingMessage<'a> {
    pub message_parts: Vec<KnownPart>,
    pub actor_id: &'a str,
    pub actor_type: &'static str,
}

#[derive(Debug, Serialize)]
pub struct User<'a> {
    pub id: &'a str,
}
