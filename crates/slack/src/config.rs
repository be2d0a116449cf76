use {
    secrecy::{ExposeSecret, Secret},
    serde::Deserialize,
    switchboard_channels::{Channel, Error, Result, channel::CONFIG_BOT_TOKEN},
};

/// Tokens of one Slack app installation.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct SlackConfig {
    /// Bot token (`xoxb-...`) used to post messages and look up users.
    pub bot_token: Option<Secret<String>>,
    /// User token (`xoxp-...`) allowed to share files publicly.
    pub user_token: Option<Secret<String>>,
    /// Token Slack echoes in `url_verification` requests.
    pub verification_token: Option<Secret<String>>,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |s: &Option<Secret<String>>| s.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("SlackConfig")
            .field("bot_token", &redact(&self.bot_token))
            .field("user_token", &redact(&self.user_token))
            .field("verification_token", &redact(&self.verification_token))
            .finish()
    }
}

fn expose(secret: &Option<Secret<String>>) -> &str {
    secret
        .as_ref()
        .map(|s| s.expose_secret().as_str())
        .unwrap_or_default()
}

impl SlackConfig {
    pub fn from_channel(channel: &Channel) -> Result<Self> {
        channel.typed_config()
    }

    pub fn bot_token(&self) -> &str {
        expose(&self.bot_token)
    }

    pub fn user_token(&self) -> &str {
        expose(&self.user_token)
    }

    pub fn verification_token(&self) -> &str {
        expose(&self.verification_token)
    }

    /// Bot token, required before any send.
    pub fn require_bot_token(&self, channel: &Channel) -> Result<&str> {
        match self.bot_token() {
            "" => Err(Error::config(format!(
                "missing {CONFIG_BOT_TOKEN} for {} channel",
                channel.channel_type
            ))),
            token => Ok(token),
        }
    }
}
