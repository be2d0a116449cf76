use std::{borrow::Cow, fmt, str::FromStr};

use {
    serde::{Deserialize, Deserializer, Serialize, Serializer, de::DeserializeOwned},
    uuid::Uuid,
};

use crate::{Error, Result};

// ── Well-known configuration keys ───────────────────────────────────────────

pub const CONFIG_USERNAME: &str = "username";
pub const CONFIG_PASSWORD: &str = "password";
pub const CONFIG_AUTH_TOKEN: &str = "auth_token";
pub const CONFIG_API_KEY: &str = "api_key";
pub const CONFIG_BOT_TOKEN: &str = "bot_token";
pub const CONFIG_USER_TOKEN: &str = "user_token";
pub const CONFIG_VERIFICATION_TOKEN: &str = "verification_token";
pub const CONFIG_PART_FAILURE_POLICY: &str = "part_failure_policy";

/// Short provider code such as `FC` or `ZVW`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelType(Cow<'static, str>);

impl ChannelType {
    /// Build a channel type from a compile-time constant. The code is not
    /// validated here; adapters declare their codes as constants and the
    /// registry checks them when it is built.
    #[must_use]
    pub const fn from_static(code: &'static str) -> Self {
        Self(Cow::Borrowed(code))
    }

    /// Parse a code case-insensitively. Codes are 2 or 3 ASCII letters.
    pub fn parse(code: &str) -> Result<Self> {
        let upper = code.trim().to_ascii_uppercase();
        if is_valid_code(&upper) {
            Ok(Self(Cow::Owned(upper)))
        } else {
            Err(Error::validation(format!("invalid channel type code '{code}'")))
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        is_valid_code(&self.0)
    }
}

fn is_valid_code(code: &str) -> bool {
    (2..=3).contains(&code.len()) && code.bytes().all(|b| b.is_ascii_uppercase())
}

impl fmt::Display for ChannelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ChannelType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ChannelType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for ChannelType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// One configured provider integration.
///
/// Loaded by the configuration store and shared read-only with adapters for
/// the lifetime of a request.
#[derive(Clone, Serialize, Deserialize)]
pub struct Channel {
    pub uuid: Uuid,
    pub channel_type: ChannelType,
    pub name: String,
    /// Address or identity on the provider side (short code, phone number,
    /// workspace id).
    #[serde(default)]
    pub address: String,
    /// ISO country code, used when normalizing phone numbers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// Provider credentials and options.
    #[serde(default)]
    pub config: serde_json::Map<String, serde_json::Value>,
}

impl fmt::Debug for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.config.keys().map(String::as_str).collect();
        f.debug_struct("Channel")
            .field("uuid", &self.uuid)
            .field("channel_type", &self.channel_type)
            .field("name", &self.name)
            .field("address", &self.address)
            .field("country", &self.country)
            .field("config_keys", &keys)
            .finish()
    }
}

impl Channel {
    pub fn new(channel_type: ChannelType, name: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::new_v4(),
            channel_type,
            name: name.into(),
            address: String::new(),
            country: None,
            config: serde_json::Map::new(),
        }
    }

    #[must_use]
    pub fn with_uuid(mut self, uuid: Uuid) -> Self {
        self.uuid = uuid;
        self
    }

    #[must_use]
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_config(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.config.insert(key.into(), value.into());
        self
    }

    /// Non-empty string value for `key`, if any.
    pub fn string_config(&self, key: &str) -> Option<&str> {
        self.config
            .get(key)
            .and_then(serde_json::Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Deserialize the configuration mapping into a provider-specific
    /// struct. Shape mismatches are configuration errors.
    pub fn typed_config<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_value(serde_json::Value::Object(self.config.clone())).map_err(|e| {
            Error::config(format!(
                "invalid config for {} channel {}: {e}",
                self.channel_type, self.uuid
            ))
        })
    }
}
