//! Gateway configuration: listener, outbound HTTP client and channels.
//!
//! Config files: `switchboard.toml`, `switchboard.yaml`, `switchboard.yml`
//! or `switchboard.json`, searched in `./` then the user config directory.
//! `${ENV_VAR}` references are expanded before parsing, so credentials can
//! stay out of the file.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{Error, Result},
    loader::{CONFIG_PATH_ENV, config_dir, discover_and_load, find_config_in, load_config},
    schema::{ChannelConfig, HttpConfig, ServerConfig, SwitchboardConfig},
};
