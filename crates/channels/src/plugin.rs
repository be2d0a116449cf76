use {async_trait::async_trait, http::HeaderMap, serde::Serialize, tracing::warn};

use crate::{
    Error, Result,
    backend::Backend,
    body::ReplayBody,
    channel::{CONFIG_PART_FAILURE_POLICY, Channel, ChannelType},
    log::ChannelLog,
    msg::{Msg, OutgoingMsg},
    status::{MsgStatus, MsgStatusValue},
};

// ── Routes ──────────────────────────────────────────────────────────────────

/// Action name of the message webhook route.
pub const ACTION_RECEIVE: &str = "receive";
/// Action name of the delivery status webhook route.
pub const ACTION_STATUS: &str = "status";

/// One HTTP route an adapter wants mounted for each of its channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: http::Method,
    pub action: &'static str,
}

impl Route {
    #[must_use]
    pub fn post(action: &'static str) -> Self {
        Self {
            method: http::Method::POST,
            action,
        }
    }
}

// ── Inbound ─────────────────────────────────────────────────────────────────

/// An inbound webhook call, body already buffered.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub action: String,
    pub headers: HeaderMap,
    pub body: ReplayBody,
}

impl InboundRequest {
    pub fn new(action: impl Into<String>, body: ReplayBody) -> Self {
        Self {
            action: action.into(),
            headers: HeaderMap::new(),
            body,
        }
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Something an inbound request produced for the backend to persist.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Msg(Msg),
    Status(MsgStatus),
}

/// Terminal outcome of an inbound request that was not rejected.
#[derive(Debug, Clone)]
pub enum InboundOutcome {
    /// Zero or more events to persist before acknowledging.
    Events(Vec<Event>),
    /// The request was understood but deliberately produced nothing.
    Ignored(String),
    /// Handshake: reply with this plain-text body and persist nothing.
    Challenge(String),
}

impl InboundOutcome {
    pub fn ignored(reason: impl Into<String>) -> Self {
        Self::Ignored(reason.into())
    }

    pub fn msgs(msgs: Vec<Msg>) -> Self {
        Self::Events(msgs.into_iter().map(Event::Msg).collect())
    }

    pub fn status(status: MsgStatus) -> Self {
        Self::Events(vec![Event::Status(status)])
    }
}

// ── Outbound ────────────────────────────────────────────────────────────────

/// What to do when one part of a multi-part send fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartFailurePolicy {
    /// Stop at the first failed part.
    #[default]
    #[serde(alias = "abort")]
    AbortOnFirstFailure,
    /// Attempt every part and report the first failure.
    BestEffort,
}

impl PartFailurePolicy {
    /// Policy configured on the channel, falling back to `default`.
    pub fn for_channel(channel: &Channel, default: Self) -> Self {
        let Some(raw) = channel.config.get(CONFIG_PART_FAILURE_POLICY) else {
            return default;
        };
        match serde_json::from_value::<Self>(raw.clone()) {
            Ok(policy) => policy,
            Err(e) => {
                warn!(
                    channel_uuid = %channel.uuid,
                    error = %e,
                    "invalid part failure policy, using adapter default"
                );
                default
            },
        }
    }

    pub fn continues_after_failure(self) -> bool {
        matches!(self, Self::BestEffort)
    }
}

/// Result of a send attempt that reached the network.
#[derive(Debug)]
pub struct SendOutcome {
    pub status: MsgStatus,
    /// Why the status is not `wired`, if it is not.
    pub error: Option<Error>,
}

impl SendOutcome {
    /// Promote the status to `wired` when no part failed.
    pub fn finish(mut status: MsgStatus, error: Option<Error>) -> Self {
        if error.is_none() {
            status.set_status(MsgStatusValue::Wired);
        }
        Self { status, error }
    }

    pub fn is_wired(&self) -> bool {
        self.status.status() == MsgStatusValue::Wired
    }
}

/// Folds the per-part results of one send into a single [`SendOutcome`].
#[derive(Debug)]
pub struct SendAttempt {
    status: MsgStatus,
    policy: PartFailurePolicy,
    parts: usize,
    error: Option<Error>,
}

impl SendAttempt {
    /// Start an attempt whose status is `errored` until proven otherwise.
    pub fn new(msg: &OutgoingMsg, policy: PartFailurePolicy) -> Self {
        Self {
            status: MsgStatus::for_msg_id(&msg.channel, msg.id, MsgStatusValue::Errored),
            policy,
            parts: 0,
            error: None,
        }
    }

    pub fn status_mut(&mut self) -> &mut MsgStatus {
        &mut self.status
    }

    /// Record one part and its log. Returns whether the next part should
    /// be attempted.
    pub fn record(&mut self, result: Result<()>, mut log: ChannelLog) -> bool {
        self.parts += 1;
        match result {
            Ok(()) => {
                self.status.add_log(log);
                true
            },
            Err(e) => {
                if !log.is_error() {
                    log = log.with_error("Message Send Error", &e);
                }
                self.status.add_log(log);
                self.error.get_or_insert(e);
                self.policy.continues_after_failure()
            },
        }
    }

    /// An attempt with no parts never counts as delivered.
    pub fn finish(mut self) -> SendOutcome {
        if self.parts == 0 && self.error.is_none() {
            self.error = Some(Error::validation("message has no content to send"));
        }
        SendOutcome::finish(self.status, self.error)
    }
}

// ── Adapter contract ────────────────────────────────────────────────────────

/// One provider integration. Each messaging platform implements this once;
/// the registry selects implementations by [`ChannelType`].
#[async_trait]
pub trait ChannelHandler: Send + Sync {
    /// Provider code (e.g. `FC`, `ZV`).
    fn channel_type(&self) -> ChannelType;

    /// Human-readable provider name.
    fn name(&self) -> &str;

    /// Routes to mount for every channel of this type.
    fn routes(&self) -> Vec<Route> {
        vec![Route::post(ACTION_RECEIVE)]
    }

    /// Decode, authenticate and normalize one webhook call.
    ///
    /// `backend` is available for auxiliary writes such as the channel logs
    /// of lookups made while normalizing; the returned events are persisted
    /// by the caller.
    async fn handle_request(
        &self,
        backend: &dyn Backend,
        channel: &Channel,
        request: &InboundRequest,
    ) -> Result<InboundOutcome>;

    /// Deliver a message. `Err` means nothing was attempted (missing
    /// credentials); delivery failures come back inside the outcome.
    async fn send_msg(&self, msg: &OutgoingMsg) -> Result<SendOutcome>;
}

/// Reject a request for an action the adapter does not serve.
pub fn unknown_action(channel_type: &ChannelType, action: &str) -> Error {
    Error::validation(format!("unknown action '{action}' for {channel_type} channels"))
}

/// Return `value` unless it is blank, in which case the payload is invalid.
pub fn require<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    if value.trim().is_empty() {
        return Err(Error::validation(format!("missing required field '{field}'")));
    }
    Ok(value)
}
