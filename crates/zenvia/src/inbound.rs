//! Zenvia SMS webhook normalization.

use {
    chrono::{DateTime, Utc},
    switchboard_channels::{
        Channel, Error, InboundOutcome, Msg, MsgStatus, ReplayBody, Result, Urn,
        plugin::require,
    },
    tracing::debug,
};

use crate::{
    plugin::STATUS_TABLE,
    types::{MoCallback, MtCallback},
};

/// Timestamp layout of MO callbacks, e.g. `2017-05-03T06:04:45.345-03:00`.
const RECEIVED_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3f%:z";

pub fn receive_message(channel: &Channel, body: &ReplayBody) -> Result<InboundOutcome> {
    let callback: MoCallback = body.json()?;
    let mo = callback.callback_mo_request;

    require("id", &mo.id)?;
    let mobile = require("mobile", &mo.mobile)?;
    let external_id = require("correlatedMessageSmsId", &mo.correlated_message_sms_id)?;
    let received_on = parse_received(require("received", &mo.received)?)?;

    if mo.body.is_empty() {
        return Ok(InboundOutcome::ignored("no message content"));
    }

    let urn = Urn::tel_for_country(mobile, channel.country.as_deref())?;
    debug!(channel_uuid = %channel.uuid, %urn, "received Zenvia SMS");

    let msg = Msg::incoming(channel, urn, mo.body)
        .with_external_id(external_id)
        .with_received_on(received_on);
    Ok(InboundOutcome::msgs(vec![msg]))
}

pub fn receive_status(channel: &Channel, body: &ReplayBody) -> Result<InboundOutcome> {
    let callback: MtCallback = body.json()?;
    let mt = callback.callback_mt_request;

    let code = require("status", &mt.status)?;
    let id = require("id", &mt.id)?;

    let status = MsgStatus::for_external_id(channel, id, STATUS_TABLE.map(code));
    Ok(InboundOutcome::status(status))
}

fn parse_received(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_str(raw, RECEIVED_FORMAT)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|_| Error::validation(format!("invalid date format: {raw}")))
}
