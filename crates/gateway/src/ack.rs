use {
    axum::{
        Json,
        http::{StatusCode, header},
        response::{IntoResponse, Response},
    },
    chrono::{DateTime, Utc},
    serde::Serialize,
    switchboard_channels::{Error, ErrorKind, Event, InboundOutcome, StatusKey},
    uuid::Uuid,
};

/// Acknowledgment body returned to the provider.
#[derive(Debug, Serialize)]
pub struct Ack {
    pub message: String,
    pub data: Vec<AckData>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AckData {
    Msg {
        channel_uuid: Uuid,
        msg_uuid: Uuid,
        urn: String,
        text: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        attachments: Vec<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        external_id: Option<String>,
        received_on: DateTime<Utc>,
    },
    Status {
        channel_uuid: Uuid,
        status: &'static str,
        #[serde(skip_serializing_if = "Option::is_none")]
        msg_id: Option<u64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        external_id: Option<String>,
    },
    Info {
        info: String,
    },
    Error {
        error: String,
    },
}

impl AckData {
    fn from_event(event: &Event) -> Self {
        match event {
            Event::Msg(msg) => Self::Msg {
                channel_uuid: msg.channel_uuid,
                msg_uuid: msg.uuid,
                urn: msg.urn.to_string(),
                text: msg.text.clone(),
                attachments: msg.attachments.clone(),
                external_id: msg.external_id.clone(),
                received_on: msg.received_on,
            },
            Event::Status(status) => Self::Status {
                channel_uuid: status.channel_uuid,
                status: status.status().as_str(),
                msg_id: match &status.key {
                    StatusKey::MsgId(id) => Some(id.0),
                    StatusKey::ExternalId(_) => None,
                },
                external_id: status.external_id().map(str::to_owned),
            },
        }
    }
}

impl Ack {
    pub fn new(message: impl Into<String>, data: Vec<AckData>) -> Self {
        Self {
            message: message.into(),
            data,
        }
    }

    pub fn for_events(events: &[Event]) -> Self {
        let msgs = events.iter().filter(|e| matches!(e, Event::Msg(_))).count();
        let message = match (msgs, events.len()) {
            (_, 0) => "No Events",
            (1, 1) => "Message Accepted",
            (n, total) if n == total => "Messages Accepted",
            (0, _) => "Status Update Accepted",
            _ => "Events Accepted",
        };
        Self::new(message, events.iter().map(AckData::from_event).collect())
    }

    pub fn ignored(reason: impl Into<String>) -> Self {
        Self::new("Ignored", vec![AckData::Info {
            info: reason.into(),
        }])
    }

    pub fn error(error: impl std::fmt::Display) -> Self {
        Self::new("Error", vec![AckData::Error {
            error: error.to_string(),
        }])
    }
}

/// HTTP status used to reject a request that failed with `kind`.
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
        ErrorKind::Network | ErrorKind::Provider => StatusCode::BAD_GATEWAY,
        ErrorKind::Config | ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Render a successful inbound outcome.
pub fn outcome_response(outcome: InboundOutcome) -> Response {
    match outcome {
        InboundOutcome::Events(events) => Json(Ack::for_events(&events)).into_response(),
        InboundOutcome::Ignored(reason) => Json(Ack::ignored(reason)).into_response(),
        InboundOutcome::Challenge(challenge) => (
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            challenge,
        )
            .into_response(),
    }
}

/// Render a rejected inbound request. Backend failures are not described
/// to the caller.
pub fn error_response(error: &Error) -> Response {
    let kind = error.kind();
    let ack = match kind {
        ErrorKind::Backend => Ack::error("failed to store request"),
        _ => Ack::error(error),
    };
    (status_for(kind), Json(ack)).into_response()
}

/// 404 for routes that do not resolve to a configured channel.
pub fn not_found(reason: impl std::fmt::Display) -> Response {
    (StatusCode::NOT_FOUND, Json(Ack::error(reason))).into_response()
}
