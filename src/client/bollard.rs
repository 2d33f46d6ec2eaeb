// ABOUTME: Bollard-based registry client implementation.
// ABOUTME: Talks to Docker or Podman through the Docker-compatible API.

use crate::client::{PullError, RegistryClient};
use crate::types::ImageRef;
use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::CreateImageOptions;
use futures::StreamExt;

/// Error message fragment the daemon emits when a registry has no manifest
/// for the requested platform.
const NO_MATCHING_MANIFEST: &str = "no matching manifest";

// =============================================================================
// Error Classification
// =============================================================================

fn classify_pull_error(e: bollard::errors::Error, image_name: &str) -> PullError {
    match e {
        bollard::errors::Error::DockerResponseServerError {
            status_code,
            message,
        } => {
            if message.contains(NO_MATCHING_MANIFEST) {
                PullError::ManifestMismatch {
                    image: image_name.to_string(),
                    message,
                }
            } else if status_code >= 500 {
                // Daemon-internal errors are usually timeout/connection
                // trouble talking to the registry.
                PullError::Transient {
                    image: image_name.to_string(),
                    message,
                }
            } else {
                PullError::Client {
                    image: image_name.to_string(),
                    message,
                }
            }
        }
        bollard::errors::Error::RequestTimeoutError => PullError::Transient {
            image: image_name.to_string(),
            message: "request timed out".to_string(),
        },
        bollard::errors::Error::IOError { err } => PullError::Transient {
            image: image_name.to_string(),
            message: err.to_string(),
        },
        e => {
            let message = e.to_string();
            if message.contains(NO_MATCHING_MANIFEST) {
                PullError::ManifestMismatch {
                    image: image_name.to_string(),
                    message,
                }
            } else {
                PullError::Client {
                    image: image_name.to_string(),
                    message,
                }
            }
        }
    }
}

// =============================================================================
// BollardClient
// =============================================================================

/// Registry client backed by a bollard Docker connection.
///
/// Works against Docker and Podman via the Docker-compatible API.
pub struct BollardClient {
    client: Docker,
}

impl BollardClient {
    /// Create a new BollardClient from an existing Docker connection.
    pub fn new(client: Docker) -> Self {
        Self { client }
    }

    /// Connect to a daemon listening on a unix socket.
    pub fn connect_unix(socket_path: &str) -> Result<Self, PullError> {
        let client = Docker::connect_with_unix(socket_path, 120, bollard::API_DEFAULT_VERSION)
            .map_err(|e| PullError::Connection {
                socket: socket_path.to_string(),
                message: e.to_string(),
            })?;
        Ok(Self::new(client))
    }
}

#[async_trait]
impl RegistryClient for BollardClient {
    async fn pull(
        &self,
        repository: &str,
        tag: &str,
        platform: Option<&str>,
    ) -> Result<(), PullError> {
        let image_name = format!("{}:{}", repository, tag);

        let opts = CreateImageOptions {
            from_image: Some(repository.to_string()),
            tag: Some(tag.to_string()),
            platform: platform.map(str::to_string).unwrap_or_default(),
            ..Default::default()
        };

        // Pull returns a stream of progress updates - consume it
        let mut stream = self.client.create_image(Some(opts), None, None);
        while let Some(result) = stream.next().await {
            result.map_err(|e| classify_pull_error(e, &image_name))?;
        }

        Ok(())
    }

    async fn image_exists(&self, reference: &ImageRef) -> Result<bool, PullError> {
        let image_name = reference.canonical_name();

        match self.client.inspect_image(&image_name).await {
            Ok(_) => Ok(true),
            Err(bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            }) => Ok(false),
            Err(e) => Err(PullError::Inspect {
                image: image_name,
                message: e.to_string(),
            }),
        }
    }
}
