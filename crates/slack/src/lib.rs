//! Slack channel for switchboard.
//!
//! Receives messages through the Events API (including the
//! `url_verification` handshake) and sends with `chat.postMessage`,
//! uploading attachments through `files.upload`.

pub mod config;
pub mod inbound;
pub mod outbound;
pub mod plugin;
pub mod types;

pub use {config::SlackConfig, plugin::SlackHandler};
