//! Zenvia WhatsApp channel for switchboard.
//!
//! One inbound webhook may carry several contents; each becomes its own
//! message. Outbound messages go out as a single request whose contents are
//! the attachments followed by the text in 1152-character parts.

pub mod config;
pub mod inbound;
pub mod outbound;
pub mod plugin;
pub mod types;

pub use {config::ZenviaWhatsAppConfig, plugin::ZenviaWhatsAppHandler};
