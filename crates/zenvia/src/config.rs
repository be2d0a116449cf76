use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    switchboard_channels::{
        Channel, Error, Result,
        channel::{CONFIG_PASSWORD, CONFIG_USERNAME},
    },
};

/// Credentials of one Zenvia SMS account, read from channel config.
#[derive(Clone, Deserialize)]
pub struct ZenviaConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

impl std::fmt::Debug for ZenviaConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZenviaConfig")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ZenviaConfig {
    /// Resolve and check the credentials needed to send.
    pub fn from_channel(channel: &Channel) -> Result<Self> {
        let config: Self = channel.typed_config()?;
        if config.username.is_empty() {
            return Err(Error::config(format!(
                "no {CONFIG_USERNAME} set for {} channel",
                channel.channel_type
            )));
        }
        if config.password().is_empty() {
            return Err(Error::config(format!(
                "no {CONFIG_PASSWORD} set for {} channel",
                channel.channel_type
            )));
        }
        Ok(config)
    }

    pub fn password(&self) -> &str {
        self.password
            .as_ref()
            .map(|p| p.expose_secret().as_str())
            .unwrap_or_default()
    }
}
