use std::error::Error as StdError;

/// Crate-wide result type for channel operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], used at the HTTP boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Authentication,
    Config,
    Network,
    Provider,
    Backend,
}

/// Typed channel errors shared by every adapter.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Webhook payload is malformed or misses a required field.
    #[error("invalid request: {message}")]
    Validation { message: String },

    /// Webhook signature or verification token did not check out.
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// A channel credential required for sending is missing.
    #[error("channel misconfigured: {message}")]
    Config { message: String },

    /// Transport-level failure talking to the provider.
    #[error("{context}: {source}")]
    Network {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// Provider accepted the call but reported a failure in its payload.
    #[error("provider error: {message}")]
    Provider { message: String },

    /// The persistence collaborator failed.
    #[error("backend error: {context}: {source}")]
    Backend {
        context: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    /// JSON (de)serialization failed.
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

impl Error {
    #[must_use]
    pub fn validation(message: impl std::fmt::Display) -> Self {
        Self::Validation {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn authentication(message: impl std::fmt::Display) -> Self {
        Self::Authentication {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn config(message: impl std::fmt::Display) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn provider(message: impl std::fmt::Display) -> Self {
        Self::Provider {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub fn network(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            context: context.into(),
            source: Box::new(source),
        }
    }

    #[must_use]
    pub fn backend(
        context: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self::Backend {
            context: context.into(),
            source: Box::new(source),
        }
    }

    /// Classify the error. JSON failures only surface while decoding
    /// webhook bodies, so they count as validation errors.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } | Self::SerdeJson(_) => ErrorKind::Validation,
            Self::Authentication { .. } => ErrorKind::Authentication,
            Self::Config { .. } => ErrorKind::Config,
            Self::Network { .. } => ErrorKind::Network,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::Backend { .. } => ErrorKind::Backend,
        }
    }
}
