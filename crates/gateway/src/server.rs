use {
    axum::{
        Json, Router,
        body::Bytes,
        extract::{Path, State},
        http::HeaderMap,
        response::{IntoResponse, Response},
        routing::{get, post},
    },
    switchboard_channels::{ChannelType, InboundRequest, ReplayBody},
    tracing::{debug, error},
    uuid::Uuid,
};

use crate::{
    ack::{error_response, not_found, outcome_response},
    state::AppState,
};

/// Build the webhook router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/c/{channel_type}/{uuid}/{action}", post(receive_handler))
        .with_state(state)
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let channel_types: Vec<String> = state
        .registry
        .list()
        .into_iter()
        .map(|(code, _)| code.to_string())
        .collect();
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "channel_types": channel_types,
    }))
}

async fn receive_handler(
    State(state): State<AppState>,
    Path((channel_type, uuid, action)): Path<(String, String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let Ok(channel_type) = ChannelType::parse(&channel_type) else {
        return not_found(format!("unknown channel type '{channel_type}'"));
    };
    let Some(handler) = state.registry.get(&channel_type) else {
        return not_found(format!("unknown channel type '{channel_type}'"));
    };
    if !handler.routes().iter().any(|r| r.action == action) {
        return not_found(format!("unknown action '{action}' for {channel_type} channels"));
    }
    let Ok(uuid) = Uuid::parse_str(&uuid) else {
        return not_found(format!("invalid channel uuid '{uuid}'"));
    };

    let channel = match state.channels.get(&channel_type, uuid).await {
        Ok(Some(channel)) => channel,
        Ok(None) => return not_found(format!("no {channel_type} channel with uuid {uuid}")),
        Err(e) => {
            error!(%channel_type, channel_uuid = %uuid, error = %e, "channel lookup failed");
            return error_response(&e);
        },
    };

    debug!(%channel_type, channel_uuid = %uuid, action = %action, bytes = body.len(), "webhook received");
    let request = InboundRequest::new(action, ReplayBody::new(body)).with_headers(headers);

    match state
        .registry
        .receive(state.backend.as_ref(), &channel, &request)
        .await
    {
        Ok(outcome) => outcome_response(outcome),
        Err(e) => error_response(&e),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        axum::{body::Body, http::Request},
        http::{StatusCode, header},
        std::sync::Arc,
        switchboard_channels::{
            Backend, Channel, ChannelRegistry, ChannelStore, MemoryBackend, MsgId, MsgStatusValue,
            OutgoingMsg, StaticChannelStore, Urn,
            channel::{CONFIG_PASSWORD, CONFIG_USERNAME, CONFIG_VERIFICATION_TOKEN},
        },
        switchboard_freshchat::FreshChatHandler,
        switchboard_slack::SlackHandler,
        switchboard_zenvia::ZenviaHandler,
        tower::ServiceExt,
    };

    const ZV_UUID: &str = "8eb23e93-5ecb-45ba-b726-3b064e0c56ab";
    const SL_UUID: &str = "5c2ab2a3-3f5c-4a4e-8a3b-9d0c0d3f1e11";
    const FC_UUID: &str = "0f5a5b8e-3c9e-4c1a-a2a7-8b52a3b8f6d2";

    struct Fixture {
        state: AppState,
        backend: Arc<MemoryBackend>,
    }

    fn fixture(zenvia_url: Option<String>) -> Fixture {
        let http = reqwest::Client::new();
        let zenvia = match zenvia_url {
            Some(url) => ZenviaHandler::new(http.clone()).with_send_url(url),
            None => ZenviaHandler::new(http.clone()),
        };
        let registry = ChannelRegistry::builder()
            .register(zenvia)
            .register(SlackHandler::new(http.clone()))
            .register(FreshChatHandler::new(http))
            .build()
            .unwrap();

        let channels = StaticChannelStore::new([
            Channel::new(ChannelType::from_static("ZV"), "Zenvia")
                .with_uuid(Uuid::parse_str(ZV_UUID).unwrap())
                .with_address("2020")
                .with_config(CONFIG_USERNAME, "zv-user")
                .with_config(CONFIG_PASSWORD, "zv-pass"),
            Channel::new(ChannelType::from_static("SL"), "Slack")
                .with_uuid(Uuid::parse_str(SL_UUID).unwrap())
                .with_config(CONFIG_VERIFICATION_TOKEN, "verify-me"),
            Channel::new(ChannelType::from_static("FC"), "FreshChat")
                .with_uuid(Uuid::parse_str(FC_UUID).unwrap())
                .with_config(CONFIG_PASSWORD, "not-a-key"),
        ]);

        let backend = Arc::new(MemoryBackend::new());
        let state = AppState::new(
            Arc::new(registry),
            Arc::new(channels) as Arc<dyn ChannelStore>,
            Arc::clone(&backend) as Arc<dyn Backend>,
        );
        Fixture { state, backend }
    }

    fn post(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    async fn call(state: &AppState, request: Request<Body>) -> (StatusCode, String) {
        let response = build_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    fn mo_body(text: &str) -> String {
        serde_json::json!({
            "callbackMoRequest": {
                "id": "20690090",
                "mobile": "555191951711",
                "shortCode": "40001",
                "account": "zenvia.envio",
                "body": text,
                "received": "2017-05-03T06:04:45.123-03:00",
                "correlatedMessageSmsId": "hs765939061"
            }
        })
        .to_string()
    }

    #[tokio::test]
    async fn zenvia_message_is_stored_and_acknowledged() {
        let fx = fixture(None);
        let (status, body) = call(&fx.state, post(&format!("/c/zv/{ZV_UUID}/receive"), &mo_body("hello"))).await;

        assert_eq!(status, StatusCode::OK);
        let ack: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(ack["message"], "Message Accepted");
        assert_eq!(ack["data"][0]["type"], "msg");
        assert_eq!(ack["data"][0]["text"], "hello");

        let msgs = fx.backend.msgs().await;
        assert_eq!(msgs.len(), 1);
        assert_eq!(msgs[0].external_id.as_deref(), Some("hs765939061"));
    }

    #[tokio::test]
    async fn zenvia_status_route_is_mounted() {
        let fx = fixture(None);
        let body = serde_json::json!({
            "callbackMtRequest": {"status": "03", "id": "hs765939216"}
        })
        .to_string();
        let (status, body) = call(&fx.state, post(&format!("/c/ZV/{ZV_UUID}/status"), &body)).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Status Update Accepted"));
        let statuses = fx.backend.statuses().await;
        assert_eq!(statuses[0].status(), MsgStatusValue::Delivered);
    }

    #[tokio::test]
    async fn empty_message_is_acknowledged_as_ignored() {
        let fx = fixture(None);
        let (status, body) = call(&fx.state, post(&format!("/c/zv/{ZV_UUID}/receive"), &mo_body(""))).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"Ignored\""));
        assert!(fx.backend.msgs().await.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_bad_request() {
        let fx = fixture(None);
        let (status, body) = call(&fx.state, post(&format!("/c/zv/{ZV_UUID}/receive"), "not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("\"error\""));
    }

    #[tokio::test]
    async fn unknown_routes_are_not_found() {
        let fx = fixture(None);
        for uri in [
            format!("/c/XX/{ZV_UUID}/receive"),
            format!("/c/zenvia/{ZV_UUID}/receive"),
            format!("/c/ZV/{ZV_UUID}/stop"),
            "/c/ZV/not-a-uuid/receive".to_string(),
            format!("/c/ZV/{SL_UUID}/receive"),
        ] {
            let (status, _) = call(&fx.state, post(&uri, &mo_body("hi"))).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn slack_challenge_is_plain_text() {
        let fx = fixture(None);
        let body = r#"{"token":"verify-me","challenge":"c-123","type":"url_verification"}"#;
        let response = build_router(fx.state.clone())
            .oneshot(post(&format!("/c/SL/{SL_UUID}/receive"), body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers()[header::CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("text/plain"));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"c-123");
    }

    #[tokio::test]
    async fn unsigned_freshchat_webhook_is_unauthorized() {
        let fx = fixture(None);
        let (status, _) = call(&fx.state, post(&format!("/c/FC/{FC_UUID}/receive"), "{}")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn backend_failure_is_server_error() {
        let fx = fixture(None);
        fx.backend.set_fail_writes(true);
        let (status, body) = call(&fx.state, post(&format!("/c/ZV/{ZV_UUID}/receive"), &mo_body("hi"))).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains("failed to store request"));
    }

    #[tokio::test]
    async fn health_lists_channel_types() {
        let fx = fixture(None);
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let (status, body) = call(&fx.state, request).await;
        assert_eq!(status, StatusCode::OK);
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["channel_types"], serde_json::json!(["FC", "SL", "ZV"]));
    }

    #[tokio::test]
    async fn send_stores_resulting_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/services")
            .with_status(200)
            .with_body(r#"{"sendSmsResponse":{"statusCode":"00","statusDescription":"Ok"}}"#)
            .expect(1)
            .create_async()
            .await;
        let fx = fixture(Some(format!("{}/services", server.url())));

        let channel = fx
            .state
            .channels
            .get(&ChannelType::from_static("ZV"), Uuid::parse_str(ZV_UUID).unwrap())
            .await
            .unwrap()
            .unwrap();
        let msg = OutgoingMsg::new(MsgId(42), channel, Urn::tel("+5551999").unwrap(), "Hello");

        let outcome = fx.state.send(&msg).await.unwrap();
        assert!(outcome.is_wired());
        mock.assert_async().await;

        let statuses = fx.backend.statuses().await;
        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].status(), MsgStatusValue::Wired);
    }
}
