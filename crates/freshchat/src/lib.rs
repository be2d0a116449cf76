//! FreshChat channel for switchboard.
//!
//! Inbound webhooks are RSA-signed by FreshChat and verified against the
//! public key stored in the channel config before anything is decoded.
//! Replies are posted to the conversations API as the configured agent.

pub mod config;
pub mod inbound;
pub mod outbound;
pub mod plugin;
pub mod types;

pub use {config::FreshChatConfig, plugin::FreshChatHandler};
