use std::sync::atomic::{AtomicBool, Ordering};

use {async_trait::async_trait, tokio::sync::RwLock, tracing::debug};

use crate::{
    Error, Result,
    log::ChannelLog,
    msg::Msg,
    status::MsgStatus,
};

/// Persistence collaborator. The gateway provides the concrete
/// implementation; adapters only hand it finished values.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn write_msg(&self, msg: &Msg) -> Result<()>;
    /// Store every message one inbound request produced. Either all of them
    /// are stored or none are, so a provider retrying after a failure never
    /// duplicates the messages that made it.
    async fn write_msgs(&self, msgs: &[Msg]) -> Result<()>;
    async fn write_msg_status(&self, status: &MsgStatus) -> Result<()>;
    async fn write_channel_logs(&self, logs: &[ChannelLog]) -> Result<()>;
}

/// Backend that keeps everything in memory. Used by tests and local runs.
#[derive(Default)]
pub struct MemoryBackend {
    msgs: RwLock<Vec<Msg>>,
    statuses: RwLock<Vec<MsgStatus>>,
    logs: RwLock<Vec<ChannelLog>>,
    fail_writes: AtomicBool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent write fail, to exercise persistence errors.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub async fn msgs(&self) -> Vec<Msg> {
        self.msgs.read().await.clone()
    }

    pub async fn statuses(&self) -> Vec<MsgStatus> {
        self.statuses.read().await.clone()
    }

    pub async fn channel_logs(&self) -> Vec<ChannelLog> {
        self.logs.read().await.clone()
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::backend(
                "memory backend",
                std::io::Error::other("writes disabled"),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn write_msg(&self, msg: &Msg) -> Result<()> {
        self.check_writable()?;
        debug!(msg_uuid = %msg.uuid, urn = %msg.urn, "storing inbound message");
        self.msgs.write().await.push(msg.clone());
        Ok(())
    }

    async fn write_msgs(&self, msgs: &[Msg]) -> Result<()> {
        self.check_writable()?;
        debug!(count = msgs.len(), "storing inbound messages");
        self.msgs.write().await.extend_from_slice(msgs);
        Ok(())
    }

    /// Later updates for the same key replace the stored status only when
    /// they move it forward.
    async fn write_msg_status(&self, status: &MsgStatus) -> Result<()> {
        self.check_writable()?;
        let mut statuses = self.statuses.write().await;
        let existing = statuses
            .iter_mut()
            .find(|s| s.channel_uuid == status.channel_uuid && s.key == status.key);
        match existing {
            Some(current) if current.status().can_advance_to(status.status()) => {
                *current = status.clone();
            },
            Some(current) => {
                debug!(
                    current = current.status().as_str(),
                    update = status.status().as_str(),
                    "ignoring status regression"
                );
            },
            None => statuses.push(status.clone()),
        }
        Ok(())
    }

    async fn write_channel_logs(&self, logs: &[ChannelLog]) -> Result<()> {
        self.check_writable()?;
        self.logs.write().await.extend_from_slice(logs);
        Ok(())
    }
}
