//! Zenvia WhatsApp webhook normalization.

use {
    chrono::{DateTime, NaiveDateTime, Utc},
    switchboard_channels::{
        Channel, Error, InboundOutcome, Msg, MsgStatus, ReplayBody, Result, Urn,
        msg::geo_url,
        plugin::require,
    },
    tracing::{debug, warn},
};

use crate::{
    plugin::STATUS_TABLE,
    types::{Content, ContentPart, Direction, Webhook},
};

/// Layout of callback timestamps, e.g. `2017-05-03T06:04:45Z`.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Fan one inbound message event out into one message per content.
pub fn receive_message(channel: &Channel, body: &ReplayBody) -> Result<InboundOutcome> {
    let event = match body.json::<Webhook>()? {
        Webhook::Message(event) => event,
        Webhook::MessageStatus(_) | Webhook::Unsupported => {
            return Ok(InboundOutcome::ignored("Ignoring request, not a message event"));
        },
    };

    let received_on = parse_timestamp(require("timestamp", &event.timestamp)?)?;
    let message = event.message;
    require("message.id", &message.id)?;
    require("message.to", &message.to)?;

    if message.direction != Direction::In {
        return Ok(InboundOutcome::ignored("ignoring request, not incoming messages"));
    }

    let urn = Urn::whatsapp(require("message.from", &message.from)?)?;
    let contact_name = event.visitor.name;

    let mut msgs = Vec::with_capacity(message.contents.len());
    for part in message.contents {
        let (text, attachment) = match part {
            ContentPart::Known(Content::Text { text }) => (text, None),
            ContentPart::Known(Content::File { file_url, .. }) => (String::new(), Some(file_url)),
            ContentPart::Known(Content::Location {
                latitude,
                longitude,
            }) => (String::new(), Some(geo_url(latitude, longitude))),
            ContentPart::Unsupported { kind } => {
                warn!(channel_uuid = %channel.uuid, content_type = %kind, "unsupported message type");
                continue;
            },
        };

        let attachment = attachment.filter(|u| !u.is_empty());
        if text.is_empty() && attachment.is_none() {
            debug!(channel_uuid = %channel.uuid, "skipping empty content");
            continue;
        }

        let mut msg = Msg::incoming(channel, urn.clone(), text)
            .with_external_id(message.id.clone())
            .with_received_on(received_on)
            .with_contact_name(contact_name.clone());
        if let Some(url) = attachment {
            msg = msg.with_attachment(url);
        }
        msgs.push(msg);
    }

    if msgs.is_empty() {
        return Ok(InboundOutcome::ignored("Ignoring request, no supported content"));
    }
    debug!(channel_uuid = %channel.uuid, %urn, msgs = msgs.len(), "received Zenvia WhatsApp message");
    Ok(InboundOutcome::msgs(msgs))
}

pub fn receive_status(channel: &Channel, body: &ReplayBody) -> Result<InboundOutcome> {
    let event = match body.json::<Webhook>()? {
        Webhook::MessageStatus(event) => event,
        Webhook::Message(_) | Webhook::Unsupported => {
            return Ok(InboundOutcome::ignored("Ignoring request, not a status event"));
        },
    };

    let message_id = require("messageId", &event.message_id)?;
    let value = STATUS_TABLE.map(&event.message_status.code.to_ascii_uppercase());
    Ok(InboundOutcome::status(MsgStatus::for_external_id(
        channel, message_id, value,
    )))
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|_| Error::validation(format!("invalid date format: {raw}")))
}
