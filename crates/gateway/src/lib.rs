//! HTTP front of the switchboard: mounts every registered channel adapter
//! under `/c/{type}/{uuid}/{action}`, persists what they produce and
//! answers providers with a JSON acknowledgment.

pub mod ack;
pub mod bootstrap;
pub mod server;
pub mod state;
pub mod telemetry;

pub use {
    ack::{Ack, AckData},
    bootstrap::{build_state, default_registry, http_client, serve, serve_listener},
    server::build_router,
    state::AppState,
};
