use std::{fmt, sync::Arc};

use {
    chrono::{DateTime, Utc},
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

use crate::{
    channel::{Channel, ChannelType},
    urn::Urn,
};

/// Gateway-assigned identifier of an outgoing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MsgId(pub u64);

impl fmt::Display for MsgId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A canonical inbound message produced by an adapter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Msg {
    pub uuid: Uuid,
    pub channel_uuid: Uuid,
    pub channel_type: ChannelType,
    pub urn: Urn,
    pub text: String,
    pub attachments: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    pub received_on: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<String>,
}

impl Msg {
    /// New inbound message received now; adapters override the timestamp
    /// with the provider's own when they have one.
    pub fn incoming(channel: &Channel, urn: Urn, text: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            channel_uuid: channel.uuid,
            channel_type: channel.channel_type.clone(),
            urn,
            text: text.into(),
            attachments: Vec::new(),
            external_id: None,
            received_on: Utc::now(),
            contact_name: None,
        }
    }

    #[must_use]
    pub fn with_received_on(mut self, received_on: DateTime<Utc>) -> Self {
        self.received_on = received_on;
        self
    }

    #[must_use]
    pub fn with_external_id(mut self, external_id: impl Into<String>) -> Self {
        let id = external_id.into();
        self.external_id = (!id.is_empty()).then_some(id);
        self
    }

    #[must_use]
    pub fn with_contact_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.contact_name = (!name.is_empty()).then_some(name);
        self
    }

    #[must_use]
    pub fn with_attachment(mut self, url: impl Into<String>) -> Self {
        self.attachments.push(url.into());
        self
    }
}

/// A message the gateway wants delivered through an adapter.
#[derive(Debug, Clone)]
pub struct OutgoingMsg {
    pub id: MsgId,
    pub channel: Arc<Channel>,
    pub urn: Urn,
    pub text: String,
    /// Either bare URLs or `mime/type:url` pairs.
    pub attachments: Vec<String>,
}

impl OutgoingMsg {
    pub fn new(id: MsgId, channel: Arc<Channel>, urn: Urn, text: impl Into<String>) -> Self {
        Self {
            id,
            channel,
            urn,
            text: text.into(),
            attachments: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_attachment(mut self, attachment: impl Into<String>) -> Self {
        self.attachments.push(attachment.into());
        self
    }

    /// Text followed by every attachment URL, one per line.
    pub fn text_and_attachments(&self) -> String {
        let mut out = self.text.clone();
        for attachment in &self.attachments {
            let (_, url) = split_attachment(attachment);
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(url);
        }
        out
    }
}

/// Split an attachment into its optional content type and URL.
///
/// `image/jpeg:https://x/y.jpg` yields `(Some("image/jpeg"), "https://x/y.jpg")`;
/// a bare URL yields `(None, url)`.
pub fn split_attachment(attachment: &str) -> (Option<&str>, &str) {
    match attachment.split_once(':') {
        Some((mime, url)) if mime.contains('/') => (Some(mime), url),
        _ => (None, attachment),
    }
}

/// `geo:` URL for a shared location.
pub fn geo_url(latitude: f64, longitude: f64) -> String {
    format!("geo:{latitude:.6},{longitude:.6}")
}
