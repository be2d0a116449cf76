//! Slack Events API normalization.

use {
    chrono::DateTime,
    switchboard_channels::{
        Backend, Channel, ChannelLog, Error, InboundOutcome, Msg, ReplayBody, Result, Urn,
        http::{json_headers, send_logged},
        urn::SLACK_SCHEME,
    },
    tracing::{debug, warn},
};

use crate::{
    config::SlackConfig,
    plugin::SlackHandler,
    types::{
        ConversationKind, Envelope, Event, File, FileResponse, SharePublicUrl, UserInfoResponse,
    },
};

const ERR_ALREADY_PUBLIC: &str = "already_public";
const ERR_PUBLIC_VIDEO_NOT_ALLOWED: &str = "public_video_not_allowed";
const SUBTYPE_FILE_SHARE: &str = "file_share";

pub(crate) async fn receive_event(
    handler: &SlackHandler,
    backend: &dyn Backend,
    channel: &Channel,
    body: &ReplayBody,
) -> Result<InboundOutcome> {
    let envelope: Envelope = body.json()?;
    let config = SlackConfig::from_channel(channel)?;

    let callback = match envelope {
        Envelope::UrlVerification { token, challenge } => {
            let expected = config.verification_token();
            if expected.is_empty() || token != expected {
                return Err(Error::authentication(format!(
                    "wrong verification token for channel {}",
                    channel.uuid
                )));
            }
            return Ok(InboundOutcome::Challenge(challenge));
        },
        Envelope::EventCallback(callback) => callback,
        Envelope::Unsupported => return Ok(InboundOutcome::ignored("Ignoring request, no message")),
    };

    let Event::Message(event) = callback.event else {
        return Ok(InboundOutcome::ignored("Ignoring request, no message"));
    };
    if event.bot_id.as_deref().is_some_and(|id| !id.is_empty()) {
        return Ok(InboundOutcome::ignored("Ignoring request, bot message"));
    }
    if let Some(subtype) = event.subtype.as_deref().filter(|s| *s != SUBTYPE_FILE_SHARE) {
        debug!(channel_uuid = %channel.uuid, subtype, "ignoring Slack message subtype");
        return Ok(InboundOutcome::ignored(format!("Ignoring request, {subtype} message")));
    }
    if event.text.is_empty() && event.files.is_empty() {
        return Ok(InboundOutcome::ignored("Ignoring request, no message content"));
    }

    let received_on = DateTime::from_timestamp(callback.event_time, 0).ok_or_else(|| {
        Error::validation(format!("invalid event_time: {}", callback.event_time))
    })?;

    let mut logs = Vec::new();
    let (path, contact_name) = match event.channel_type {
        ConversationKind::Channel => (event.channel.as_str(), String::new()),
        ConversationKind::Im => {
            let name = lookup_user_name(handler, &config, channel, &event.user, &mut logs).await;
            flush_logs(backend, &mut logs).await?;
            (event.user.as_str(), name?)
        },
        ConversationKind::Other => {
            return Ok(InboundOutcome::ignored("Ignoring request, unsupported conversation type"));
        },
    };
    let urn = Urn::new(SLACK_SCHEME, path)?.with_display(contact_name.clone());

    let mut msg = Msg::incoming(channel, urn, event.text)
        .with_received_on(received_on)
        .with_external_id(callback.event_id)
        .with_contact_name(contact_name);

    for file in &event.files {
        match resolve_file(handler, &config, channel, file, &mut logs).await {
            Ok(url) => msg = msg.with_attachment(url),
            Err(e) => {
                warn!(channel_uuid = %channel.uuid, file_id = %file.id, error = %e, "skipping Slack file");
            },
        }
    }
    flush_logs(backend, &mut logs).await?;

    if msg.text.is_empty() && msg.attachments.is_empty() {
        return Ok(InboundOutcome::ignored("Ignoring request, no resolvable content"));
    }

    debug!(channel_uuid = %channel.uuid, urn = %msg.urn, attachments = msg.attachments.len(), "received Slack message");
    Ok(InboundOutcome::msgs(vec![msg]))
}

async fn flush_logs(backend: &dyn Backend, logs: &mut Vec<ChannelLog>) -> Result<()> {
    if logs.is_empty() {
        return Ok(());
    }
    backend.write_channel_logs(logs).await?;
    logs.clear();
    Ok(())
}

/// Real name of a user, from `users.info`.
async fn lookup_user_name(
    handler: &SlackHandler,
    config: &SlackConfig,
    channel: &Channel,
    user: &str,
    logs: &mut Vec<ChannelLog>,
) -> Result<String> {
    let request = handler
        .http
        .get(handler.api_url("users.info"))
        .query(&[("user", user)])
        .bearer_auth(config.bot_token());
    let (result, log) = send_logged(&handler.http, request, "Get User info", channel, None).await;
    logs.push(log);

    let info: UserInfoResponse = result?.json()?;
    if !info.ok {
        let err = Error::provider(format!(
            "users.info failed: {}",
            info.error.as_deref().unwrap_or("unknown error")
        ));
        if let Some(log) = logs.pop() {
            logs.push(log.with_error("Request User Info Error", &err));
        }
        return Err(err);
    }
    Ok(info.user.map(|u| u.real_name).unwrap_or_default())
}

/// Make a shared file publicly reachable and return its download URL.
async fn resolve_file(
    handler: &SlackHandler,
    config: &SlackConfig,
    channel: &Channel,
    file: &File,
    logs: &mut Vec<ChannelLog>,
) -> Result<String> {
    let request = json_headers(handler.http.post(handler.api_url("files.sharedPublicURL")))
        .bearer_auth(config.user_token())
        .json(&SharePublicUrl { file: &file.id });
    let (result, log) = send_logged(&handler.http, request, "File Resolving", channel, None).await;
    logs.push(log);

    let response: FileResponse = result?.json()?;
    let shared = match (response.ok, response.error.as_deref()) {
        (true, _) => response.file.unwrap_or_else(|| file.clone()),
        (false, Some(ERR_ALREADY_PUBLIC)) => file.clone(),
        (false, Some(ERR_PUBLIC_VIDEO_NOT_ALLOWED)) => {
            return Err(Error::provider(format!(
                "public sharing of videos is not available for a free instance of Slack, file id: {}",
                file.id
            )));
        },
        (false, error) => {
            return Err(Error::provider(format!(
                "couldn't resolve file for file id: {}, error: {}",
                file.id,
                error.unwrap_or("unknown error")
            )));
        },
    };

    Ok(public_download_url(&shared))
}

/// The public secret is the last `-` separated segment of the public
/// permalink.
fn public_download_url(file: &File) -> String {
    let secret = file.permalink_public.rsplit('-').next().unwrap_or_default();
    format!("{}?pub_secret={secret}", file.url_private_download)
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        rstest::rstest,
        switchboard_channels::{
            ChannelType, ErrorKind, MemoryBackend,
            channel::{CONFIG_BOT_TOKEN, CONFIG_USER_TOKEN, CONFIG_VERIFICATION_TOKEN},
            plugin::Event as ChannelEvent,
        },
    };

    fn channel() -> Channel {
        Channel::new(ChannelType::from_static("SL"), "slack")
            .with_config(CONFIG_BOT_TOKEN, "xoxb-bot")
            .with_config(CONFIG_USER_TOKEN, "xoxp-user")
            .with_config(CONFIG_VERIFICATION_TOKEN, "verify-me")
    }

    fn handler(server: &mockito::Server) -> SlackHandler {
        SlackHandler::new(reqwest::Client::new()).with_api_url(server.url())
    }

    fn message(channel_type: &str, files: serde_json::Value) -> ReplayBody {
        ReplayBody::new(
            serde_json::json!({
                "token": "verify-me",
                "team_id": "T0",
                "type": "event_callback",
                "event": {
                    "type": "message",
                    "channel": "C0123",
                    "user": "U0123",
                    "text": "Hello World",
                    "ts": "1654545429.462029",
                    "channel_type": channel_type,
                    "files": files
                },
                "event_id": "Ev03KA1DEADB",
                "event_time": 1654545429
            })
            .to_string(),
        )
    }

    fn single_msg(outcome: InboundOutcome) -> Msg {
        let InboundOutcome::Events(mut events) = outcome else {
            panic!("expected events");
        };
        assert_eq!(events.len(), 1);
        match events.remove(0) {
            ChannelEvent::Msg(msg) => msg,
            ChannelEvent::Status(_) => panic!("expected a message"),
        }
    }

    #[tokio::test]
    async fn url_verification_answers_challenge() {
        let server = mockito::Server::new_async().await;
        let backend = MemoryBackend::new();
        let body = ReplayBody::new(
            r#"{"token":"verify-me","challenge":"3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P","type":"url_verification"}"#,
        );

        let outcome = receive_event(&handler(&server), &backend, &channel(), &body)
            .await
            .unwrap();
        assert!(matches!(
            outcome,
            InboundOutcome::Challenge(ref c) if c == "3eZbrw1aBm2rZgRNFdxV2595E9CY3gmdALWMmHkvFXO7tYXAYM8P"
        ));
    }

    #[tokio::test]
    async fn url_verification_rejects_wrong_token() {
        let server = mockito::Server::new_async().await;
        let backend = MemoryBackend::new();
        let body = ReplayBody::new(r#"{"token":"nope","challenge":"abc","type":"url_verification"}"#);

        let err = receive_event(&handler(&server), &backend, &channel(), &body)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
    }

    #[rstest]
    #[case::bot_message(r#"{"type":"event_callback","event_time":1654545429,"event":{"type":"message","channel":"C1","channel_type":"channel","text":"hi","bot_id":"B01"}}"#)]
    #[case::reaction(r#"{"type":"event_callback","event_time":1654545429,"event":{"type":"reaction_added","user":"U1"}}"#)]
    #[case::app_rate_limited(r#"{"type":"app_rate_limited","team_id":"T0"}"#)]
    #[case::deleted(r#"{"type":"event_callback","event_time":1654545429,"event":{"type":"message","subtype":"message_deleted","channel":"C1","channel_type":"channel"}}"#)]
    #[case::channel_join(r#"{"type":"event_callback","event_time":1654545429,"event":{"type":"message","subtype":"channel_join","channel":"C1","user":"U1","channel_type":"channel","text":"<@U1> has joined the channel"}}"#)]
    #[case::no_content(r#"{"type":"event_callback","event_time":1654545429,"event":{"type":"message","channel":"C1","user":"U1","channel_type":"channel","text":""}}"#)]
    #[tokio::test]
    async fn non_user_messages_are_ignored(#[case] raw: &str) {
        let server = mockito::Server::new_async().await;
        let backend = MemoryBackend::new();
        let outcome = receive_event(&handler(&server), &backend, &channel(), &ReplayBody::new(raw.to_string()))
            .await
            .unwrap();
        assert!(matches!(outcome, InboundOutcome::Ignored(_)));
    }

    #[tokio::test]
    async fn channel_message_resolves_files() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/files.sharedPublicURL")
            .match_header("authorization", "Bearer xoxp-user")
            .with_status(200)
            .with_body(
                serde_json::json!({
                    "ok": true,
                    "file": {
                        "id": "F1",
                        "url_private_download": "https://files.slack.com/files-pri/T0-F1/download/photo.jpg",
                        "permalink_public": "https://slack-files.com/T0-F1-3a4b5c"
                    }
                })
                .to_string(),
            )
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let body = message("channel", serde_json::json!([{"id": "F1"}]));
        let msg = single_msg(
            receive_event(&handler(&server), &backend, &channel(), &body)
                .await
                .unwrap(),
        );

        assert_eq!(msg.urn.to_string(), "slack:C0123");
        assert_eq!(msg.text, "Hello World");
        assert_eq!(msg.external_id.as_deref(), Some("Ev03KA1DEADB"));
        assert_eq!(msg.received_on.timestamp(), 1_654_545_429);
        assert_eq!(msg.attachments, vec![
            "https://files.slack.com/files-pri/T0-F1/download/photo.jpg?pub_secret=3a4b5c".to_string()
        ]);
        assert_eq!(backend.channel_logs().await.len(), 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn already_public_file_uses_event_data() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/files.sharedPublicURL")
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"already_public"}"#)
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let files = serde_json::json!([{
            "id": "F2",
            "url_private_download": "https://files.slack.com/download/doc.pdf",
            "permalink_public": "https://slack-files.com/T0-F2-ffee"
        }]);
        let msg = single_msg(
            receive_event(&handler(&server), &backend, &channel(), &message("channel", files))
                .await
                .unwrap(),
        );
        assert_eq!(msg.attachments, vec![
            "https://files.slack.com/download/doc.pdf?pub_secret=ffee".to_string()
        ]);
    }

    #[tokio::test]
    async fn unshareable_video_is_skipped() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/files.sharedPublicURL")
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"public_video_not_allowed"}"#)
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let body = message("channel", serde_json::json!([{"id": "F3"}]));
        let msg = single_msg(
            receive_event(&handler(&server), &backend, &channel(), &body)
                .await
                .unwrap(),
        );
        assert!(msg.attachments.is_empty());
        assert_eq!(backend.channel_logs().await.len(), 1);
    }

    #[tokio::test]
    async fn file_share_without_text_or_resolvable_file_is_ignored() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/files.sharedPublicURL")
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"public_video_not_allowed"}"#)
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let body = ReplayBody::new(
            serde_json::json!({
                "type": "event_callback",
                "event_time": 1654545429,
                "event": {
                    "type": "message",
                    "subtype": "file_share",
                    "channel": "C0123",
                    "user": "U0123",
                    "text": "",
                    "channel_type": "channel",
                    "files": [{"id": "F9"}]
                }
            })
            .to_string(),
        );
        let outcome = receive_event(&handler(&server), &backend, &channel(), &body)
            .await
            .unwrap();
        assert!(matches!(outcome, InboundOutcome::Ignored(_)));
        assert_eq!(backend.channel_logs().await.len(), 1);
    }

    #[tokio::test]
    async fn file_share_subtype_is_received() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/files.sharedPublicURL")
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"already_public"}"#)
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let body = ReplayBody::new(
            serde_json::json!({
                "type": "event_callback",
                "event_time": 1654545429,
                "event": {
                    "type": "message",
                    "subtype": "file_share",
                    "channel": "C0123",
                    "user": "U0123",
                    "channel_type": "channel",
                    "files": [{
                        "id": "F4",
                        "url_private_download": "https://files.slack.com/download/a.png",
                        "permalink_public": "https://slack-files.com/T0-F4-abcd"
                    }]
                }
            })
            .to_string(),
        );
        let msg = single_msg(
            receive_event(&handler(&server), &backend, &channel(), &body)
                .await
                .unwrap(),
        );
        assert!(msg.text.is_empty());
        assert_eq!(msg.attachments, vec![
            "https://files.slack.com/download/a.png?pub_secret=abcd".to_string()
        ]);
    }

    #[tokio::test]
    async fn direct_message_looks_up_user_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/users.info")
            .match_query(mockito::Matcher::UrlEncoded("user".into(), "U0123".into()))
            .match_header("authorization", "Bearer xoxb-bot")
            .with_status(200)
            .with_body(r#"{"ok":true,"user":{"id":"U0123","real_name":"Ada Lovelace"}}"#)
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let msg = single_msg(
            receive_event(&handler(&server), &backend, &channel(), &message("im", serde_json::json!([])))
                .await
                .unwrap(),
        );

        assert_eq!(msg.urn.to_string(), "slack:U0123");
        assert_eq!(msg.urn.display(), Some("Ada Lovelace"));
        assert_eq!(msg.contact_name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(backend.channel_logs().await[0].description, "Get User info");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn failed_user_lookup_rejects_request() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/users.info")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"ok":false,"error":"user_not_found"}"#)
            .create_async()
            .await;

        let backend = MemoryBackend::new();
        let err = receive_event(&handler(&server), &backend, &channel(), &message("im", serde_json::json!([])))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);

        let logs = backend.channel_logs().await;
        assert_eq!(logs.len(), 1);
        assert!(logs[0].is_error());
    }
}
