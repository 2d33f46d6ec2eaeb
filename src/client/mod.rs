// ABOUTME: Registry/daemon client boundary for image pulls.
// ABOUTME: Defines the RegistryClient trait and the PullError taxonomy.

mod bollard;

pub use self::bollard::BollardClient;

use crate::types::ImageRef;
use async_trait::async_trait;

/// Daemon-side image operations consumed by the resolver.
///
/// Implementations issue the actual pull and presence check; the resolver owns
/// retry, fallback, and caching. The trait is deliberately open so tests and
/// downstream users can plug in their own client.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Pull `repository:tag` for the given platform and wait for the pull
    /// stream to complete. `platform = None` means the daemon default.
    async fn pull(
        &self,
        repository: &str,
        tag: &str,
        platform: Option<&str>,
    ) -> Result<(), PullError>;

    /// Check whether an image is available locally.
    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, PullError>;
}

/// Errors from a single pull attempt, classified for retry handling.
#[derive(Debug, thiserror::Error)]
pub enum PullError {
    /// Timeout/connection class failure. Retried within the deadline.
    #[error("transient failure pulling {image}: {message}")]
    Transient { image: String, message: String },

    /// The registry has no manifest for the requested platform. May trigger
    /// one fallback attempt with the configured retry platform.
    #[error("no matching manifest for {image}: {message}")]
    ManifestMismatch { image: String, message: String },

    /// Any other daemon/registry failure (auth, not-found, disk). Fatal.
    #[error("failed to pull {image}: {message}")]
    Client { image: String, message: String },

    /// Presence check against the daemon failed.
    #[error("failed to inspect {image}: {message}")]
    Inspect { image: String, message: String },

    /// Could not reach the daemon at all.
    #[error("failed to connect to daemon at {socket}: {message}")]
    Connection { socket: String, message: String },
}

impl PullError {
    pub fn is_transient(&self) -> bool {
        matches!(self, PullError::Transient { .. })
    }
}
