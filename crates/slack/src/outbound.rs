use {
    reqwest::multipart::{Form, Part},
    switchboard_channels::{
        ChannelLog, Error, OutgoingMsg, PartFailurePolicy, Result, SendAttempt, SendOutcome,
        http::{HttpResponse, json_headers, send_logged},
        msg::split_attachment,
    },
    tracing::debug,
};

use crate::{
    config::SlackConfig,
    plugin::SlackHandler,
    types::{ApiResponse, PostMessage},
};

/// Post the text, then download and re-upload every attachment.
pub(crate) async fn send(handler: &SlackHandler, msg: &OutgoingMsg) -> Result<SendOutcome> {
    let config = SlackConfig::from_channel(&msg.channel)?;
    let bot_token = config.require_bot_token(&msg.channel)?;
    let policy = PartFailurePolicy::for_channel(&msg.channel, PartFailurePolicy::default());
    let conversation = msg.urn.path();

    let mut attempt = SendAttempt::new(msg, policy);

    if !msg.text.is_empty() {
        let request = json_headers(handler.http.post(handler.api_url("chat.postMessage")))
            .bearer_auth(bot_token)
            .json(&PostMessage {
                channel: conversation,
                text: &msg.text,
            });
        let (result, log) =
            send_logged(&handler.http, request, "Message Sent", &msg.channel, Some(msg.id)).await;
        if !attempt.record(result.and_then(|r| check_ok(&r)), log) {
            return Ok(attempt.finish());
        }
    }

    for attachment in &msg.attachments {
        let (_, url) = split_attachment(attachment);
        let filename = match file_name(url) {
            Ok(name) => name,
            Err(e) => {
                let log = ChannelLog::new("Fetching media", &msg.channel, Some(msg.id));
                if attempt.record(Err(e), log) {
                    continue;
                }
                break;
            },
        };

        let request = handler.http.get(url);
        let (download, log) =
            send_logged(&handler.http, request, "Fetching media", &msg.channel, Some(msg.id)).await;
        let media = match download {
            Ok(media) => {
                attempt.record(Ok(()), log);
                media
            },
            Err(e) => {
                if attempt.record(Err(e), log) {
                    continue;
                }
                break;
            },
        };

        debug!(msg_id = %msg.id, %filename, size = media.body.len(), "uploading file to Slack");
        let form = Form::new()
            .part("file", Part::bytes(media.body.to_vec()).file_name(filename.clone()))
            .text("filename", filename)
            .text("channels", conversation.to_string());
        let request = handler
            .http
            .post(handler.api_url("files.upload"))
            .bearer_auth(bot_token)
            .multipart(form);
        let (result, log) = send_logged(
            &handler.http,
            request,
            "Uploading file to Slack",
            &msg.channel,
            Some(msg.id),
        )
        .await;
        if !attempt.record(result.and_then(|r| check_ok(&r)), log) {
            break;
        }
    }

    Ok(attempt.finish())
}

/// Web API calls answer 200 even on failure; `ok` tells the truth.
fn check_ok(response: &HttpResponse) -> Result<()> {
    let api: ApiResponse = response.json()?;
    if api.ok {
        return Ok(());
    }
    Err(Error::provider(format!(
        "slack error: {}",
        api.error.as_deref().unwrap_or("unknown error")
    )))
}

/// Last path segment of an attachment URL.
fn file_name(raw: &str) -> Result<String> {
    let url = url::Url::parse(raw)
        .map_err(|e| Error::validation(format!("invalid attachment URL '{raw}': {e}")))?;
    url.path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::validation(format!("attachment URL '{raw}' has no file name")))
}
