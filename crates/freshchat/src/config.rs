use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    switchboard_channels::{
        Channel, Error, Result,
        channel::{CONFIG_AUTH_TOKEN, CONFIG_USERNAME},
    },
};

/// Send credentials of one FreshChat account.
///
/// The webhook public key is stored under `password` and read directly by
/// the signature verifier, so it does not appear here.
#[derive(Clone, Deserialize)]
pub struct FreshChatConfig {
    /// Agent id replies are sent as.
    #[serde(default, rename = "username")]
    pub agent_id: String,
    #[serde(default)]
    pub auth_token: Option<Secret<String>>,
}

impl std::fmt::Debug for FreshChatConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FreshChatConfig")
            .field("agent_id", &self.agent_id)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl FreshChatConfig {
    pub fn from_channel(channel: &Channel) -> Result<Self> {
        let config: Self = channel.typed_config()?;
        if config.agent_id.is_empty() {
            return Err(Error::config(format!(
                "missing '{CONFIG_USERNAME}' (agent id) config for {} channel",
                channel.channel_type
            )));
        }
        if config.auth_token().is_empty() {
            return Err(Error::config(format!(
                "missing '{CONFIG_AUTH_TOKEN}' config for {} channel",
                channel.channel_type
            )));
        }
        Ok(config)
    }

    pub fn auth_token(&self) -> &str {
        self.auth_token
            .as_ref()
            .map(|t| t.expose_secret().as_str())
            .unwrap_or_default()
    }
}
