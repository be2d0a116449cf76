//! Zenvia WhatsApp (API v2) payloads.

use serde::{Deserialize, Serialize};

// ── Inbound ─────────────────────────────────────────────────────────────────

/// Subscription callback, discriminated by its `type`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Webhook {
    #[serde(alias = "message")]
    Message(MessageEvent),
    #[serde(alias = "message_status")]
    MessageStatus(StatusEvent),
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub id: String,
    pub timestamp: String,
    pub message: Message,
    #[serde(default)]
    pub visitor: Visitor,
}

#[derive(Debug, Deserialize)]
pub struct Message {
    pub id: String,
    pub from: String,
    pub to: String,
    pub direction: Direction,
    pub contents: Vec<ContentPart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    #[serde(alias = "in")]
    In,
    #[serde(alias = "out")]
    Out,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Default, Deserialize)]
pub struct Visitor {
    #[serde(default)]
    pub name: String,
}

/// A content entry; types this channel does not handle keep their name so
/// they can be reported.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentPart {
    Known(Content),
    Unsupported {
        #[serde(rename = "type")]
        kind: String,
    },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Content {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    File {
        file_url: String,
        #[serde(default)]
        file_mime_type: String,
    },
    Location {
        latitude: f64,
        longitude: f64,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEvent {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub message_id: String,
    pub message_status: MessageStatus,
}

#[derive(Debug, Deserialize)]
pub struct MessageStatus {
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub code: String,
}

// ── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub contents: Vec<OutgoingContent<'a>>,
}

#[derive(Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutgoingContent<'a> {
    Text {
        text: &'a str,
    },
    #[serde(rename_all = "camelCase")]
    File {
        file_url: &'a str,
        #[serde(skip_serializing_if = "is_blank")]
        file_mime_type: &'a str,
    },
}

fn is_blank(value: &&str) -> bool {
    value.is_empty()
}

#[derive(Debug, Default, Deserialize)]
pub struct SendResponse {
    #[serde(default)]
    pub id: String,
}
