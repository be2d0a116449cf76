//! Channel adapter layer.
//!
//! Each messaging provider implements [`ChannelHandler`] to turn its
//! webhooks into canonical [`Msg`] and [`MsgStatus`] values and to deliver
//! [`OutgoingMsg`]s through its HTTP API. The [`ChannelRegistry`] maps
//! channel-type codes to handlers.

pub mod backend;
pub mod body;
pub mod channel;
pub mod error;
pub mod http;
pub mod log;
pub mod msg;
pub mod plugin;
pub mod registry;
pub mod signature;
pub mod split;
pub mod status;
pub mod store;
pub mod urn;

pub use {
    backend::{Backend, MemoryBackend},
    body::ReplayBody,
    channel::{Channel, ChannelType},
    error::{Error, ErrorKind, Result},
    log::ChannelLog,
    msg::{Msg, MsgId, OutgoingMsg},
    plugin::{
        ChannelHandler, Event, InboundOutcome, InboundRequest, PartFailurePolicy, Route,
        SendAttempt, SendOutcome,
    },
    registry::{ChannelRegistry, ChannelRegistryBuilder},
    signature::SignatureVerifier,
    split::split_text,
    status::{MsgStatus, MsgStatusValue, StatusKey, StatusTable},
    store::{ChannelStore, StaticChannelStore},
    urn::Urn,
};
