use {
    switchboard_channels::{
        Error, OutgoingMsg, PartFailurePolicy, Result, SendAttempt, SendOutcome,
        http::{json_headers, send_logged},
        msg::split_attachment,
        split_text,
    },
    tracing::debug,
};

use crate::{
    config::ZenviaWhatsAppConfig,
    plugin::{MAX_MSG_LENGTH, ZenviaWhatsAppHandler},
    types::{OutgoingContent, SendRequest, SendResponse},
};

/// Contents of one send: every attachment as a file, then the text parts.
pub(crate) fn build_contents<'a>(
    attachments: &'a [String],
    text_parts: &'a [String],
) -> Vec<OutgoingContent<'a>> {
    let files = attachments.iter().map(|attachment| {
        let (mime, url) = split_attachment(attachment);
        OutgoingContent::File {
            file_url: url,
            file_mime_type: mime.unwrap_or_default(),
        }
    });
    let texts = text_parts
        .iter()
        .map(|text| OutgoingContent::Text {
            text: text.as_str(),
        });
    files.chain(texts).collect()
}

pub(crate) async fn send(handler: &ZenviaWhatsAppHandler, msg: &OutgoingMsg) -> Result<SendOutcome> {
    let config = ZenviaWhatsAppConfig::from_channel(&msg.channel)?;
    let policy = PartFailurePolicy::for_channel(&msg.channel, PartFailurePolicy::default());

    let text_parts = split_text(&msg.text, MAX_MSG_LENGTH);
    let payload = SendRequest {
        from: msg.channel.address.trim_start_matches('+'),
        to: msg.urn.path().trim_start_matches('+'),
        contents: build_contents(&msg.attachments, &text_parts),
    };
    debug!(msg_id = %msg.id, contents = payload.contents.len(), "sending Zenvia WhatsApp message");

    let request = json_headers(handler.http.post(&handler.send_url))
        .header("X-API-TOKEN", config.api_key())
        .json(&payload);
    let (result, log) =
        send_logged(&handler.http, request, "Message Sent", &msg.channel, Some(msg.id)).await;

    let mut attempt = SendAttempt::new(msg, policy);
    let external_id = result.and_then(|response| {
        let body: SendResponse = response.json()?;
        match body.id.as_str() {
            "" => Err(Error::provider("unable to get id from body")),
            _ => Ok(body.id),
        }
    });
    match external_id {
        Ok(id) => {
            attempt.status_mut().set_external_id(id);
            attempt.record(Ok(()), log);
        },
        Err(e) => {
            attempt.record(Err(e), log);
        },
    }
    Ok(attempt.finish())
}
