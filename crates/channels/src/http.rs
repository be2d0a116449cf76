//! Outbound HTTP exchanges with providers, each captured as a [`ChannelLog`].

use std::time::Instant;

use {
    bytes::Bytes,
    http::{HeaderMap, StatusCode, header},
    serde::de::DeserializeOwned,
    tracing::{debug, warn},
};

use crate::{Error, Result, channel::Channel, log::ChannelLog, msg::MsgId};

/// Headers whose values never reach a channel log.
const REDACTED_HEADERS: &[&str] = &["authorization", "x-api-token", "cookie"];

/// A successful (2xx) provider response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl HttpResponse {
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            Error::provider(format!("unable to parse provider response: {e}"))
        })
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Issue one request and record it.
///
/// Transport failures become [`Error::Network`]; non-2xx responses become
/// [`Error::Provider`]. Either way the returned log carries the exchange and
/// the error, ready to be appended to a status.
pub async fn send_logged(
    client: &reqwest::Client,
    request: reqwest::RequestBuilder,
    description: &str,
    channel: &Channel,
    msg_id: Option<MsgId>,
) -> (Result<HttpResponse>, ChannelLog) {
    let log = ChannelLog::new(description, channel, msg_id);

    let request = match request.build() {
        Ok(request) => request,
        Err(e) => {
            let err = Error::network("error building request", e);
            let log = log.with_error(description, &err);
            return (Err(err), log);
        },
    };

    let snapshot = request_snapshot(&request);
    let mut log = log.with_request(request.method().as_str(), request.url().as_str(), snapshot);
    let url = request.url().clone();

    let started = Instant::now();
    let response = client.execute(request).await;
    log = log.with_elapsed(started.elapsed());

    let response = match response {
        Ok(response) => response,
        Err(e) => {
            warn!(channel_uuid = %channel.uuid, %url, error = %e, "provider request failed");
            let err = Error::network(format!("request to {url} failed"), e);
            let log = log.with_error(description, &err);
            return (Err(err), log);
        },
    };

    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(e) => {
            let err = Error::network(format!("reading response from {url}"), e);
            let log = log
                .with_response(Some(status.as_u16()), String::new())
                .with_error(description, &err);
            return (Err(err), log);
        },
    };

    log = log.with_response(Some(status.as_u16()), String::from_utf8_lossy(&body));
    debug!(channel_uuid = %channel.uuid, %url, status = status.as_u16(), "provider responded");

    if !status.is_success() {
        let err = Error::provider(format!("received HTTP {status} from {url}"));
        let log = log.with_error(description, &err);
        return (Err(err), log);
    }

    (Ok(HttpResponse { status, body }), log)
}

fn request_snapshot(request: &reqwest::Request) -> String {
    let mut out = format!("{} {}\n", request.method(), request.url());
    out.push_str(&headers_snapshot(request.headers()));
    out.push('\n');
    match request.body().map(|b| b.as_bytes()) {
        Some(Some(bytes)) => out.push_str(&String::from_utf8_lossy(bytes)),
        Some(None) => out.push_str("<streamed body>"),
        None => {},
    }
    out
}

fn headers_snapshot(headers: &HeaderMap) -> String {
    let mut out = String::new();
    for (name, value) in headers {
        let value = if REDACTED_HEADERS.contains(&name.as_str()) {
            "[REDACTED]"
        } else {
            value.to_str().unwrap_or("<binary>")
        };
        out.push_str(name.as_str());
        out.push_str(": ");
        out.push_str(value);
        out.push('\n');
    }
    out
}

/// `Content-Type` value for JSON bodies, as providers expect it spelled.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Attach the JSON content headers most providers require.
pub fn json_headers(request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    request
        .header(header::CONTENT_TYPE, JSON_CONTENT_TYPE)
        .header(header::ACCEPT, JSON_CONTENT_TYPE)
}
