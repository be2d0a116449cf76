use std::{collections::HashMap, sync::Arc};

use tracing::{debug, info, warn};

use crate::{
    Error, Result,
    backend::Backend,
    channel::{Channel, ChannelType},
    msg::{Msg, OutgoingMsg},
    plugin::{ChannelHandler, Event, InboundOutcome, InboundRequest, Route, SendOutcome},
};

/// Registry of all loaded channel handlers.
///
/// Built once at startup from an explicit list and read-only afterwards;
/// share it behind an `Arc`.
pub struct ChannelRegistry {
    handlers: HashMap<ChannelType, Arc<dyn ChannelHandler>>,
}

/// Collects handlers before the registry is frozen.
#[derive(Default)]
pub struct ChannelRegistryBuilder {
    handlers: Vec<Arc<dyn ChannelHandler>>,
}

impl ChannelRegistryBuilder {
    #[must_use]
    pub fn register(mut self, handler: impl ChannelHandler + 'static) -> Self {
        self.handlers.push(Arc::new(handler));
        self
    }

    #[must_use]
    pub fn register_arc(mut self, handler: Arc<dyn ChannelHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Freeze the registry. Invalid or duplicate channel-type codes are
    /// configuration errors.
    pub fn build(self) -> Result<ChannelRegistry> {
        let mut handlers = HashMap::with_capacity(self.handlers.len());
        for handler in self.handlers {
            let channel_type = handler.channel_type();
            if !channel_type.is_valid() {
                return Err(Error::config(format!(
                    "handler '{}' declares invalid channel type '{channel_type}'",
                    handler.name()
                )));
            }
            if handlers.contains_key(&channel_type) {
                return Err(Error::config(format!(
                    "channel type {channel_type} registered twice"
                )));
            }
            info!(%channel_type, name = handler.name(), "registered channel handler");
            handlers.insert(channel_type, handler);
        }
        Ok(ChannelRegistry { handlers })
    }
}

impl ChannelRegistry {
    pub fn builder() -> ChannelRegistryBuilder {
        ChannelRegistryBuilder::default()
    }

    pub fn get(&self, channel_type: &ChannelType) -> Option<&dyn ChannelHandler> {
        self.handlers.get(channel_type).map(|h| h.as_ref())
    }

    /// Registered `(code, name)` pairs, ordered by code.
    pub fn list(&self) -> Vec<(ChannelType, &str)> {
        let mut out: Vec<_> = self
            .handlers
            .iter()
            .map(|(code, h)| (code.clone(), h.name()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }

    /// Every route the server must mount, ordered by channel type.
    pub fn routes(&self) -> Vec<(ChannelType, Route)> {
        let mut out = Vec::new();
        for (code, _) in self.list() {
            if let Some(handler) = self.handlers.get(&code) {
                out.extend(handler.routes().into_iter().map(|r| (code.clone(), r)));
            }
        }
        out
    }

    fn handler_for(&self, channel_type: &ChannelType) -> Result<&dyn ChannelHandler> {
        self.get(channel_type).ok_or_else(|| {
            Error::config(format!("no handler registered for channel type {channel_type}"))
        })
    }

    /// Handle one inbound request end to end: dispatch to the adapter, then
    /// persist whatever it produced. Returns only after persistence
    /// succeeded, so the caller may acknowledge.
    pub async fn receive(
        &self,
        backend: &dyn Backend,
        channel: &Channel,
        request: &InboundRequest,
    ) -> Result<InboundOutcome> {
        let handler = self.handler_for(&channel.channel_type)?;
        let routed = handler
            .routes()
            .iter()
            .any(|r| r.action == request.action);
        if !routed {
            return Err(crate::plugin::unknown_action(
                &channel.channel_type,
                &request.action,
            ));
        }

        let outcome = handler
            .handle_request(backend, channel, request)
            .await
            .inspect_err(|e| {
                warn!(
                    channel_type = %channel.channel_type,
                    channel_uuid = %channel.uuid,
                    action = %request.action,
                    error = %e,
                    "inbound request rejected"
                );
            })?;

        match &outcome {
            InboundOutcome::Events(events) => {
                let msgs: Vec<Msg> = events
                    .iter()
                    .filter_map(|e| match e {
                        Event::Msg(msg) => Some(msg.clone()),
                        Event::Status(_) => None,
                    })
                    .collect();
                if !msgs.is_empty() {
                    backend.write_msgs(&msgs).await?;
                }
                for event in events {
                    if let Event::Status(status) = event {
                        backend.write_msg_status(status).await?;
                    }
                }
                debug!(
                    channel_uuid = %channel.uuid,
                    action = %request.action,
                    events = events.len(),
                    "inbound request handled"
                );
            },
            InboundOutcome::Ignored(reason) => {
                info!(channel_uuid = %channel.uuid, action = %request.action, reason = %reason, "inbound request ignored");
            },
            InboundOutcome::Challenge(_) => {
                debug!(channel_uuid = %channel.uuid, "answered verification challenge");
            },
        }

        Ok(outcome)
    }

    /// Send one outgoing message through the adapter for its channel type.
    pub async fn send(&self, msg: &OutgoingMsg) -> Result<SendOutcome> {
        let handler = self.handler_for(&msg.channel.channel_type)?;
        let outcome = handler.send_msg(msg).await?;
        match &outcome.error {
            None => info!(
                channel_uuid = %msg.channel.uuid,
                msg_id = %msg.id,
                status = outcome.status.status().as_str(),
                "message sent"
            ),
            Some(e) => warn!(
                channel_uuid = %msg.channel.uuid,
                msg_id = %msg.id,
                status = outcome.status.status().as_str(),
                error = %e,
                "message send failed"
            ),
        }
        Ok(outcome)
    }
}
