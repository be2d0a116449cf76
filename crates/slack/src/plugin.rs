use {
    async_trait::async_trait,
    switchboard_channels::{
        Backend, Channel, ChannelHandler, ChannelType, InboundOutcome, InboundRequest,
        OutgoingMsg, Result, SendOutcome,
        plugin::{ACTION_RECEIVE, unknown_action},
    },
};

use crate::{inbound, outbound};

pub const CHANNEL_TYPE: ChannelType = ChannelType::from_static("SL");

pub const DEFAULT_API_URL: &str = "https://slack.com/api";

/// Slack channel handler.
pub struct SlackHandler {
    pub(crate) http: reqwest::Client,
    api_url: String,
}

impl SlackHandler {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            api_url: DEFAULT_API_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Full URL of a Web API method.
    pub(crate) fn api_url(&self, method: &str) -> String {
        format!("{}/{method}", self.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChannelHandler for SlackHandler {
    fn channel_type(&self) -> ChannelType {
        CHANNEL_TYPE
    }

    fn name(&self) -> &str {
        "Slack"
    }

    async fn handle_request(
        &self,
        backend: &dyn Backend,
        channel: &Channel,
        request: &InboundRequest,
    ) -> Result<InboundOutcome> {
        if request.action != ACTION_RECEIVE {
            return Err(unknown_action(&CHANNEL_TYPE, &request.action));
        }
        inbound::receive_event(self, backend, channel, &request.body).await
    }

    async fn send_msg(&self, msg: &OutgoingMsg) -> Result<SendOutcome> {
        outbound::send(self, msg).await
    }
}
