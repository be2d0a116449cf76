//! FreshChat webhook normalization.

use {
    chrono::Utc,
    switchboard_channels::{
        Channel, InboundOutcome, Msg, ReplayBody, Result, Urn, urn::FRESHCHAT_SCHEME,
    },
    tracing::{debug, warn},
};

use crate::types::{ActorType, KnownPart, MessagePart, Webhook};

/// Turn one verified webhook body into at most one message.
///
/// The last text part becomes the message text and the last image part its
/// attachment.
pub fn receive_message(channel: &Channel, body: &ReplayBody) -> Result<InboundOutcome> {
    let webhook: Webhook = body.json()?;

    let Some(message) = webhook.data.message else {
        return Ok(InboundOutcome::ignored("Ignoring request, no message"));
    };
    if message.actor_id.is_empty() {
        return Ok(InboundOutcome::ignored("Ignoring request, no message"));
    }
    if message.actor_type == ActorType::Agent {
        return Ok(InboundOutcome::ignored("Ignoring request, Agent Message"));
    }

    let urn = Urn::new(
        FRESHCHAT_SCHEME,
        format!("{}/{}", message.channel_id, message.actor_id),
    )?;

    let mut text = String::new();
    let mut media_url = None;
    for part in message.message_parts {
        match part {
            MessagePart::Known(KnownPart::Text { content }) => text = content,
            MessagePart::Known(KnownPart::Image { url }) => media_url = Some(url),
            MessagePart::Unsupported(raw) => {
                warn!(channel_uuid = %channel.uuid, part = %raw, "unsupported FreshChat message part");
            },
        }
    }

    let media_url = media_url.filter(|u| !u.is_empty());
    if text.is_empty() && media_url.is_none() {
        return Ok(InboundOutcome::ignored("Ignoring request, no message content"));
    }

    let mut msg = Msg::incoming(channel, urn, text)
        .with_external_id(message.id)
        .with_received_on(message.created_time.unwrap_or_else(Utc::now));
    if let Some(url) = media_url {
        msg = msg.with_attachment(url);
    }

    debug!(channel_uuid = %channel.uuid, action = %webhook.action, urn = %msg.urn, "received FreshChat message");
    Ok(InboundOutcome::msgs(vec![msg]))
}
