use {
    async_trait::async_trait,
    switchboard_channels::{
        Backend, Channel, ChannelHandler, ChannelType, InboundOutcome, InboundRequest,
        MsgStatusValue, OutgoingMsg, Result, Route, SendOutcome, StatusTable,
        plugin::{ACTION_RECEIVE, ACTION_STATUS, unknown_action},
    },
};

use crate::{inbound, outbound};

pub const CHANNEL_TYPE: ChannelType = ChannelType::from_static("ZVW");

pub const DEFAULT_SEND_URL: &str = "https://api.zenvia.com/v2/channels/whatsapp/messages";

/// Longest text content Zenvia WhatsApp accepts.
pub const MAX_MSG_LENGTH: usize = 1152;

/// Looked up with upper-cased codes.
pub const STATUS_TABLE: StatusTable = StatusTable::new(&[
    ("REJECTED", MsgStatusValue::Failed),
    ("NOT_DELIVERED", MsgStatusValue::Failed),
    ("SENT", MsgStatusValue::Sent),
    ("DELIVERED", MsgStatusValue::Delivered),
    ("READ", MsgStatusValue::Delivered),
]);

/// Zenvia WhatsApp channel handler.
pub struct ZenviaWhatsAppHandler {
    pub(crate) http: reqwest::Client,
    pub(crate) send_url: String,
}

impl ZenviaWhatsAppHandler {
    pub fn new(http: reqwest::Client) -> Self {
        Self {
            http,
            send_url: DEFAULT_SEND_URL.to_string(),
        }
    }

    #[must_use]
    pub fn with_send_url(mut self, url: impl Into<String>) -> Self {
        self.send_url = url.into();
        self
    }
}

#[async_trait]
impl ChannelHandler for ZenviaWhatsAppHandler {
    fn channel_type(&self) -> ChannelType {
        CHANNEL_TYPE
    }

    fn name(&self) -> &str {
        "Zenvia WhatsApp"
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
