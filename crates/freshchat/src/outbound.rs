use {
    switchboard_channels::{
        Error, OutgoingMsg, PartFailurePolicy, Result, SendAttempt, SendOutcome,
        http::{json_headers, send_logged},
        msg::split_attachment,
    },
    tracing::debug,
};

use crate::{
    config::FreshChatConfig,
    plugin::FreshChatHandler,
    types::{ConversationRequest, KnownPart, OutgoingMessage, User},
};

/// Post the text and first attachment as one agent message.
pub(crate) async fn send(handler: &FreshChatHandler, msg: &OutgoingMsg) -> Result<SendOutcome> {
    let config = FreshChatConfig::from_channel(&msg.channel)?;

    let (channel_id, user_id) = msg
        .urn
        .path()
        .split_once('/')
        .filter(|(c, u)| !c.is_empty() && !u.is_empty())
        .ok_or_else(|| {
            Error::validation(format!(
                "FreshChat URN path must be channel_id/user_id, got '{}'",
                msg.urn.path()
            ))
        })?;

    let mut parts = Vec::new();
    if !msg.text.is_empty() {
        parts.push(KnownPart::Text {
            content: msg.text.clone(),
        });
    }
    if let Some(attachment) = msg.attachments.first() {
        let (_, url) = split_attachment(attachment);
        parts.push(KnownPart::Image {
            url: url.to_string(),
        });
    }

    let payload = ConversationRequest {
        messages: vec![OutgoingMessage {
            message_parts: parts,
            actor_id: &config.agent_id,
            actor_type: "agent",
        }],
        channel_id,
        users: vec![User { id: user_id }],
    };

    let url = format!("{}/conversations", handler.api_url.trim_end_matches('/'));
    let request = json_headers(handler.http.post(&url))
        .bearer_auth(config.auth_token())
        .json(&payload);

    debug!(msg_id = %msg.id, %channel_id, "sending FreshChat message");
    let (result, log) =
        send_logged(&handler.http, request, "Message Sent", &msg.channel, Some(msg.id)).await;

    let policy = PartFailurePolicy::for_channel(&msg.channel, PartFailurePolicy::default());
    let mut attempt = SendAttempt::new(msg, policy);
    attempt.record(result.map(|_| ()), log);
    Ok(attempt.finish())
}
