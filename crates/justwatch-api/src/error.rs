//! `JustWatchError` - failure taxonomy for API calls.

use thiserror::Error;

use crate::transport::TransportFailure;

/// Errors returned by `JustWatchClient` requests.
#[derive(Debug, Error)]
#[allow(clippy::module_name_repetitions)]
pub enum JustWatchError {
    /// A search option key outside the canonical filter set.
    #[error("invalid option '{key}'")]
    InvalidOption {
        /// The rejected key.
        key: String,
    },

    /// Search options that are neither an object nor a bare query string.
    #[error("search options must be an object or a string, got {found}")]
    InvalidOptions {
        /// JSON text of the rejected value.
        found: String,
    },

    /// Request parameters could not be serialized.
    #[error("failed to encode request parameters: {0}")]
    Encode(#[source] serde_json::Error),

    /// The transport reported a network-level error.
    #[error(transparent)]
    Transport(#[from] TransportFailure),

    /// The server answered without a decodable body.
    #[error("request failed with status {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// HTTP status message.
        message: String,
    },

    /// The decoded body carried an `error` field.
    #[error("{0}")]
    Api(String),
}

/// Coarse classification of a [`JustWatchError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Rejected locally before any network activity.
    Validation,
    /// Network failure or undecodable response.
    Transport,
    /// The API reported an error in its payload.
    Api,
}

impl JustWatchError {
    /// Returns the coarse classification of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOption { .. } | Self::InvalidOptions { .. } | Self::Encode(_) => {
                ErrorKind::Validation
            }
            Self::Transport(_) | Self::Status { .. } => ErrorKind::Transport,
            Self::Api(_) => ErrorKind::Api,
        }
    }
}
