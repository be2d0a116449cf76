use {
    serde::{Deserialize, Serialize},
    uuid::Uuid,
};

use crate::{channel::Channel, log::ChannelLog, msg::MsgId};

/// Canonical delivery state of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MsgStatusValue {
    Wired,
    Sent,
    Delivered,
    Failed,
    Errored,
}

impl MsgStatusValue {
    fn rank(self) -> u8 {
        match self {
            Self::Errored => 0,
            Self::Wired => 1,
            Self::Sent => 2,
            Self::Delivered => 3,
            Self::Failed => 4,
        }
    }

    /// Whether a stored status may be replaced by `next`.
    ///
    /// Progress only moves forward (`wired → sent → delivered`); `failed`
    /// is terminal and `errored` may always be retried into anything.
    #[must_use]
    pub fn can_advance_to(self, next: Self) -> bool {
        match (self, next) {
            (Self::Failed, _) => false,
            (Self::Errored, _) | (_, Self::Failed) => true,
            (current, next) => next.rank() >= current.rank(),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wired => "wired",
            Self::Sent => "sent",
            Self::Delivered => "delivered",
            Self::Failed => "failed",
            Self::Errored => "errored",
        }
    }
}

/// How a status refers back to its message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "by", content = "id", rename_all = "snake_case")]
pub enum StatusKey {
    /// Gateway message id, known at send time.
    MsgId(MsgId),
    /// Provider message id, the only thing a status webhook carries.
    ExternalId(String),
}

/// Delivery status of one outgoing message, with the audit trail of the
/// HTTP exchanges that produced it.
#[derive(Debug, Clone, Serialize)]
pub struct MsgStatus {
    pub channel_uuid: Uuid,
    pub key: StatusKey,
    status: MsgStatusValue,
    external_id: Option<String>,
    logs: Vec<ChannelLog>,
}

impl MsgStatus {
    pub fn for_msg_id(channel: &Channel, id: MsgId, status: MsgStatusValue) -> Self {
        Self {
            channel_uuid: channel.uuid,
            key: StatusKey::MsgId(id),
            status,
            external_id: None,
            logs: Vec::new(),
        }
    }

    pub fn for_external_id(
        channel: &Channel,
        external_id: impl Into<String>,
        status: MsgStatusValue,
    ) -> Self {
        let external_id = external_id.into();
        Self {
            channel_uuid: channel.uuid,
            key: StatusKey::ExternalId(external_id.clone()),
            status,
            external_id: Some(external_id),
            logs: Vec::new(),
        }
    }

    pub fn status(&self) -> MsgStatusValue {
        self.status
    }

    pub fn set_status(&mut self, status: MsgStatusValue) {
        self.status = status;
    }

    pub fn external_id(&self) -> Option<&str> {
        self.external_id.as_deref()
    }

    pub fn set_external_id(&mut self, external_id: impl Into<String>) {
        self.external_id = Some(external_id.into());
    }

    pub fn add_log(&mut self, log: ChannelLog) {
        self.logs.push(log);
    }

    pub fn logs(&self) -> &[ChannelLog] {
        &self.logs
    }
}

/// Fixed mapping from a provider's status vocabulary to the canonical enum.
///
/// Codes missing from the table resolve to [`MsgStatusValue::Errored`] so an
/// unknown code can never read as success.
#[derive(Debug, Clone, Copy)]
pub struct StatusTable {
    entries: &'static [(&'static str, MsgStatusValue)],
}

impl StatusTable {
    #[must_use]
    pub const fn new(entries: &'static [(&'static str, MsgStatusValue)]) -> Self {
        Self { entries }
    }

    /// Exact-match lookup.
    pub fn lookup(&self, code: &str) -> Option<MsgStatusValue> {
        self.entries
            .iter()
            .find(|(known, _)| *known == code)
            .map(|(_, status)| *status)
    }

    pub fn map(&self, code: &str) -> MsgStatusValue {
        self.lookup(code).unwrap_or(MsgStatusValue::Errored)
    }
}
