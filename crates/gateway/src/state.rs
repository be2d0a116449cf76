use std::sync::Arc;

use {
    switchboard_channels::{Backend, ChannelRegistry, ChannelStore, OutgoingMsg, Result, SendOutcome},
    tracing::warn,
};

/// Shared state for every request. All members are read-only handles.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ChannelRegistry>,
    pub channels: Arc<dyn ChannelStore>,
    pub backend: Arc<dyn Backend>,
}

impl AppState {
    pub fn new(
        registry: Arc<ChannelRegistry>,
        channels: Arc<dyn ChannelStore>,
        backend: Arc<dyn Backend>,
    ) -> Self {
        Self {
            registry,
            channels,
            backend,
        }
    }

    /// Send one outgoing message and store the resulting status, whether
    /// or not delivery succeeded.
    pub async fn send(&self, msg: &OutgoingMsg) -> Result<SendOutcome> {
        let outcome = self.registry.send(msg).await?;
        if let Err(e) = self.backend.write_msg_status(&outcome.status).await {
            warn!(msg_id = %msg.id, error = %e, "failed to store send status");
            return Err(e);
        }
        Ok(outcome)
    }
}
