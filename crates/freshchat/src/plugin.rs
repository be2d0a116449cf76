use {
    async_trait::async_trait,
    switchboard_channels::{
        Backend, Channel, ChannelHandler, ChannelType, InboundOutcome, InboundRequest,
        OutgoingMsg, Result, SendOutcome, SignatureVerifier,
        channel::CONFIG_PASSWORD,
        plugin::{ACTION_RECEIVE, unknown_action},
    },
};

use crate::{inbound, outbound};

pub const CHANNEL_TYPE: ChannelType = ChannelType::from_static("FC");

pub const DEFAULT_API_URL: &str = "https://api.freshchat.com/v2";

/// Header carrying the base64 RSA signature of the raw body.
pub const SIGNATURE_HEADER: &str = "X-FreshChat-Signature";

/// FreshChat channel handler.
pub struct FreshChatHandler {
    pub(crate) http: reqwest::Client,
    pub(crate) api_url: String,
    verifier: SignatureVerifier,
}

impl FreshChatHandler {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
            verifier: SignatureVerifier::new(CONFIG_PASSWORD),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Accept unsigned webhooks.
    #[must_use]
    pub fn without_signature_validation(mut self) -> Self {
        self.verifier = SignatureVerifier::disabled();
        self
    }
}

#[async_trait]
impl ChannelHandler for FreshChatHandler {
    fn channel_type(&self) -> ChannelType {
        CHANNEL_TYPE
    }

    fn name(&self) -> &str {
        "FreshChat"
    }

    async fn handle_request(
        &self,
        _backend: &dyn Backend,
        channel: &Channel,
        request: &InboundRequest,
    ) -> Result<InboundOutcome> {
        if request.action != ACTION_RECEIVE {
            return Err(unknown_action(&CHANNEL_TYPE, &request.action));
        }
        self.verifier
            .verify(channel, &request.body, request.header(SIGNATURE_HEADER))?;
        inbound::receive_message(channel, &request.body)
    }

    async fn send_msg(&self, msg: &OutgoingMsg) -> Result<SendOutcome> {
        outbound::send(self, msg).await
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {
        super::*,
        base64::Engine,
        http::HeaderMap,
        rsa::{Pkcs1v15Sign, RsaPrivateKey, pkcs8::DecodePrivateKey},
        sha2::{Digest, Sha256},
        switchboard_channels::{ErrorKind, MemoryBackend, ReplayBody},
    };

    const PRIVATE_KEY: &str = include_str!("../../channels/testdata/rsa_private.pem");
    const PUBLIC_KEY: &str = include_str!("../../channels/testdata/rsa_public.pem");

    const BODY: &str = r#"{"actor":{"actor_type":"user","actor_id":"882f3926"},"action":"message_create","data":{"message":{"message_parts":[{"text":{"content":"Test 2"}}],"actor_id":"882f3926","id":"7a454fde","channel_id":"c8fddfaf","actor_type":"user","created_time":"2019-06-21T17:43:20.866Z"}}}"#;

    fn sign(body: &str) -> String {
        let key = RsaPrivateKey::from_pkcs8_pem(PRIVATE_KEY).unwrap();
        let digest = Sha256::digest(body.as_bytes());
        let signature = key.sign(Pkcs1v15Sign::new::<Sha256>(), &digest).unwrap();
        base64::engine::general_purpose::STANDARD.encode(signature)
    }

    fn channel() -> Channel {
        Channel::new(CHANNEL_TYPE, "freshchat").with_config(CONFIG_PASSWORD, PUBLIC_KEY)
    }

    fn request(signature: Option<&str>) -> InboundRequest {
        let mut headers = HeaderMap::new();
        if let Some(signature) = signature {
            headers.insert(SIGNATURE_HEADER, signature.parse().unwrap());
        }
        InboundRequest::new(ACTION_RECEIVE, ReplayBody::new(BODY)).with_headers(headers)
    }

    #[tokio::test]
    async fn signed_webhook_is_accepted() {
        let handler = FreshChatHandler::new(reqwest::Client::new());
        let backend = MemoryBackend::new();
        let outcome = handler
            .handle_request(&backend, &channel(), &request(Some(&sign(BODY))))
            .await
            .unwrap();
        assert!(matches!(outcome, InboundOutcome::Events(ref e) if e.len() == 1));
    }

    #[tokio::test]
    async fn tampered_or_missing_signature_is_rejected() {
        let handler = FreshChatHandler::new(reqwest::Client::new());
        let backend = MemoryBackend::new();

        let other = sign(r#"{"data":{}}"#);
        for request in [request(Some(&other)), request(None), request(Some("%%%"))] {
            let err = handler
                .handle_request(&backend, &channel(), &request)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authentication);
        }
    }

    #[tokio::test]
    async fn disabled_verification_skips_signature() {
        let handler = FreshChatHandler::new(reqwest::Client::new()).without_signature_validation();
        let backend = MemoryBackend::new();
        let channel = Channel::new(CHANNEL_TYPE, "freshchat");
        assert!(
            handler
                .handle_request(&backend, &channel, &request(None))
                .await
                .is_ok()
        );
    }
}
