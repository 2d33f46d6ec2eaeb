// ABOUTME: Top-level resolution error type for eikona.
// ABOUTME: Uses thiserror for ergonomic error handling.

use crate::client::PullError;
use crate::config::ConfigError;
use crate::types::ParseImageRefError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("invalid image reference: {0}")]
    InvalidReference(#[from] ParseImageRefError),

    #[error("failed to pull image {image}; check output of `docker pull {image}`")]
    PullFailed {
        image: String,
        #[source]
        source: PullError,
    },

    #[error("retries exhausted pulling image {image}; check output of `docker pull {image}`")]
    RetriesExhausted {
        image: String,
        #[source]
        source: Option<PullError>,
    },

    /// Daemon failure outside a pull attempt, e.g. connecting to the socket.
    #[error(transparent)]
    Client(#[from] PullError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, ResolveError>;
