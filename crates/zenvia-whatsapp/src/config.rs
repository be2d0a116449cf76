use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    switchboard_channels::{Channel, Error, Result, channel::CONFIG_API_KEY},
};

#[derive(Clone, Deserialize)]
pub struct ZenviaWhatsAppConfig {
    #[serde(default)]
    pub api_key: Option<Secret<String>>,
}

impl std::fmt::Debug for ZenviaWhatsAppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZenviaWhatsAppConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ZenviaWhatsAppConfig {
    pub fn from_channel(channel: &Channel) -> Result<Self> {
        let config: Self = channel.typed_config()?;
        if config.api_key().is_empty() {
            return Err(Error::config(format!(
                "no {CONFIG_API_KEY} set for {} channel",
                channel.channel_type
            )));
        }
        Ok(config)
    }

    pub fn api_key(&self) -> &str {
        self.api_key
            .as_ref()
            .map(|k| k.expose_secret().as_str())
            .unwrap_or_default()
    }
}
