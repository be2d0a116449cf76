//! Zenvia SMS wire payloads.

use serde::{Deserialize, Serialize};

// ── Inbound ─────────────────────────────────────────────────────────────────

/// Mobile-originated SMS callback.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoCallback {
    pub callback_mo_request: MoRequest,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoRequest {
    pub id: String,
    pub mobile: String,
    #[serde(default)]
    pub body: String,
    pub received: String,
    pub correlated_message_sms_id: String,
}

/// Delivery status callback for a previously sent SMS.
#[derive(Debug, Deserialize)]
pub struct MtCallback {
    #[serde(rename = "callbackMtRequest", alias = "CallbackMTRequest")]
    pub callback_mt_request: MtRequest,
}

#[derive(Debug, Deserialize)]
pub struct MtRequest {
    pub status: String,
    pub id: String,
}

// ── Outbound ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsEnvelope<'a> {
    pub send_sms_request: SendSmsRequest<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsRequest<'a> {
    pub from: &'a str,
    pub to: &'a str,
    pub schedule: &'a str,
    pub msg: &'a str,
    pub callback_option: &'a str,
    pub id: String,
    pub aggregate_id: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponseEnvelope {
    #[serde(default)]
    pub send_sms_response: SendSmsResponse,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendSmsResponse {
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub status_description: String,
}
