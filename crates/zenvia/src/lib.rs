//! Zenvia SMS channel for switchboard.
//!
//! Receives mobile-originated SMS and delivery callbacks, and sends SMS
//! through the Zenvia REST API in 150-character parts.

pub mod config;
pub mod inbound;
pub mod outbound;
pub mod plugin;
pub mod types;

pub use {config::ZenviaConfig, plugin::ZenviaHandler};
