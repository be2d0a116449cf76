use {
    async_trait::async_trait,
    switchboard_channels::{
        Backend, Channel, ChannelHandler, ChannelType, InboundOutcome, InboundRequest,
        MsgStatusValue, OutgoingMsg, Result, Route, SendOutcome, StatusTable,
        plugin::{ACTION_RECEIVE, ACTION_STATUS, unknown_action},
    },
};

use crate::{inbound, outbound};

pub const CHANNEL_TYPE: ChannelType = ChannelType::from_static("ZV");

pub const DEFAULT_SEND_URL: &str = "https://api-rest.zenvia360.com.br/services";

/// Longest SMS part Zenvia accepts.
pub const MAX_MSG_LENGTH: usize = 150;

pub const STATUS_TABLE: StatusTable = StatusTable::new(&[
    ("00", MsgStatusValue::Sent),
    ("01", MsgStatusValue::Sent),
    ("02", MsgStatusValue::Sent),
    ("03", MsgStatusValue::Delivered),
    ("04", MsgStatusValue::Errored),
    ("05", MsgStatusValue::Errored),
    ("06", MsgStatusValue::Errored),
    ("07", MsgStatusValue::Errored),
    ("08", MsgStatusValue::Errored),
    ("09", MsgStatusValue::Errored),
    ("10", MsgStatusValue::Errored),
]);

/// Zenvia SMS channel handler.
pub struct ZenviaHandler {
    pub(crate) http: reqwest::Client,
    pub(crate) send_url: String,
}

impl ZenviaHandler {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            send_url: DEFAULT_SEND_URL.to_string(),
        }
    }

    /// Point outbound calls at another endpoint.
    #[must_use]
    pub fn with_send_url(mut self, url: impl Into<String>) -> Self {
        self.send_url = url.into();
        self
    }
}

#[async_trait]
impl ChannelHandler for ZenviaHandler {
    fn channel_type(&self) -> ChannelType {
        CHANNEL_TYPE
    }

    fn name(&self) -> &str {
        "Zenvia"
    }

    fn routes(&self) -> Vec<Route> {
        vec![Route::post(ACTION_RECEIVE), Route::post(ACTION_STATUS)]
    }

    async fn handle_request(
        &self,
        _backend: &dyn Backend,
        channel: &Channel,
        request: &InboundRequest,
    ) -> Result<InboundOutcome> {
        match request.action.as_str() {
            ACTION_RECEIVE => inbound::receive_message(channel, &request.body),
            ACTION_STATUS => inbound::receive_status(channel, &request.body),
            other => Err(unknown_action(&CHANNEL_TYPE, other)),
        }
    }

    async fn send_msg(&self, msg: &OutgoingMsg) -> Result<SendOutcome> {
        outbound::send(self, msg).await
    }
}
