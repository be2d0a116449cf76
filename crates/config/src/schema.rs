//! Configuration schema types.

use std::collections::HashSet;

use {
    serde::{Deserialize, Serialize},
    switchboard_channels::{Channel, ChannelType},
    uuid::Uuid,
};

use crate::error::{Error, Result};

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SwitchboardConfig {
    pub server: ServerConfig,
    pub http: HttpConfig,
    pub channels: Vec<ChannelConfig>,
}

/// Webhook listener settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Emit JSON log lines instead of the human formatter.
    pub json_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".into(),
            port: 8080,
            json_logs: false,
        }
    }
}

/// Settings for the shared outbound HTTP client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout applied to every provider call.
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("switchboard/", env!("CARGO_PKG_VERSION")).into(),
        }
    }
}

/// One `[[channels]]` entry.
///
/// ```toml
/// [[channels]]
/// uuid = "8eb23e93-5ecb-45ba-b726-3b064e0c56ab"
/// type = "ZV"
/// name = "Support SMS"
/// address = "2020"
/// country = "BR"
///
/// [channels.config]
/// username = "zv-user"
/// password = "${ZENVIA_PASSWORD}"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub uuid: Uuid,
    #[serde(rename = "type")]
    pub channel_type: String,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl ChannelConfig {
    /// Convert to the canonical channel. The type code is normalized to
    /// upper case and must be 2 or 3 letters.
    pub fn into_channel(self) -> Result<Channel> {
        let channel_type = ChannelType::parse(&self.channel_type)
            .map_err(|e| Error::invalid(format!("channel '{}': {e}", self.name)))?;
        let mut channel = Channel::new(channel_type, self.name)
            .with_uuid(self.uuid)
            .with_address(self.address);
        if let Some(country) = self.country.filter(|c| !c.trim().is_empty()) {
            channel = channel.with_country(country.trim().to_ascii_uppercase());
        }
        channel.config = self.config;
        Ok(channel)
    }
}

impl SwitchboardConfig {
    /// Reject configurations the gateway cannot serve.
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(Error::invalid("server.port must not be 0"));
        }
        if self.http.timeout_secs == 0 {
            return Err(Error::invalid("http.timeout_secs must not be 0"));
        }

        let mut seen = HashSet::with_capacity(self.channels.len());
        for entry in &self.channels {
            if entry.name.trim().is_empty() {
                return Err(Error::invalid(format!("channel {} has no name", entry.uuid)));
            }
            ChannelType::parse(&entry.channel_type)
                .map_err(|e| Error::invalid(format!("channel '{}': {e}", entry.name)))?;
            if !seen.insert(entry.uuid) {
                return Err(Error::invalid(format!(
                    "channel uuid {} is configured more than once",
                    entry.uuid
                )));
            }
        }
        Ok(())
    }

    /// Validate, then convert every channel entry.
    pub fn channels(&self) -> Result<Vec<Channel>> {
        self.validate()?;
        self.channels
            .iter()
            .cloned()
            .map(ChannelConfig::into_channel)
            .collect()
    }
}
