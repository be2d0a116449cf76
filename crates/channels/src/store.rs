use std::{collections::HashMap, sync::Arc};

use {async_trait::async_trait, uuid::Uuid};

use crate::{
    Result,
    channel::{Channel, ChannelType},
};

/// Read access to configured channels.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    async fn get(&self, channel_type: &ChannelType, uuid: Uuid) -> Result<Option<Arc<Channel>>>;
    async fn list(&self) -> Result<Vec<Arc<Channel>>>;
}

/// Channel store over a fixed set of channels, loaded once at startup.
#[derive(Debug, Default, Clone)]
pub struct StaticChannelStore {
    channels: HashMap<Uuid, Arc<Channel>>,
}

impl StaticChannelStore {
    pub fn new(channels: impl IntoIterator<Item = Channel>) -> Self {
        Self {
            channels: channels
                .into_iter()
                .map(|c| (c.uuid, Arc::new(c)))
                .collect(),
        }
    }
}

#[async_trait]
impl ChannelStore for StaticChannelStore {
    /// A channel is only found under its own type, so a uuid cannot be
    /// replayed against another adapter's routes.
    async fn get(&self, channel_type: &ChannelType, uuid: Uuid) -> Result<Option<Arc<Channel>>> {
        Ok(self
            .channels
            .get(&uuid)
            .filter(|c| &c.channel_type == channel_type)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<Arc<Channel>>> {
        let mut channels: Vec<_> = self.channels.values().cloned().collect();
        channels.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(channels)
    }
}
