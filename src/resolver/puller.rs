// ABOUTME: Core image resolution: policy check, deadline retry loop,
// ABOUTME: platform-mismatch fallback, and the RemoteImage lazy wrapper.

use crate::client::{PullError, RegistryClient};
use crate::config::ResolverConfig;
use crate::error::ResolveError;
use crate::resolver::cache::LocalImageCache;
use crate::resolver::lazy::Lazy;
use crate::resolver::substitute::{Identity, NameSubstitutor};
use crate::types::ImageRef;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

enum PullLoopFailure {
    /// Deadline passed without a successful pull; carries the last transient
    /// failure if any attempt was made.
    Exhausted(Option<PullError>),
    /// Registry has no manifest for the attempted platform.
    Mismatch(PullError),
    /// Non-retryable daemon/registry failure.
    Fatal(PullError),
}

/// Resolves a logical image reference to a concrete, locally-available image.
///
/// Applies the name substitutor, consults the pull policy, and when a pull is
/// needed runs a wall-clock-bounded retry loop against the daemon, falling
/// back to a configured alternate platform when the registry publishes no
/// manifest for the requested one.
pub struct ImageResolver {
    client: Arc<dyn RegistryClient>,
    cache: Arc<LocalImageCache>,
    substitutor: Arc<dyn NameSubstitutor>,
    config: ResolverConfig,
}

impl ImageResolver {
    pub fn new(client: Arc<dyn RegistryClient>, config: ResolverConfig) -> Self {
        Self {
            client,
            cache: Arc::new(LocalImageCache::new()),
            substitutor: Arc::new(Identity),
            config,
        }
    }

    /// Replace the default identity substitutor.
    pub fn with_substitutor(mut self, substitutor: Arc<dyn NameSubstitutor>) -> Self {
        self.substitutor = substitutor;
        self
    }

    /// Share a presence cache across resolvers. The cache is meant to live
    /// for the whole process.
    pub fn with_cache(mut self, cache: Arc<LocalImageCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn cache(&self) -> &Arc<LocalImageCache> {
        &self.cache
    }

    /// Resolve `reference` to its canonical name, pulling it if the policy
    /// requires. Returns the canonical name of the *effective* (substituted)
    /// reference.
    pub async fn resolve(&self, reference: &ImageRef) -> Result<String, ResolveError> {
        let effective = self.substitutor.apply(reference);
        if effective != *reference {
            debug!(requested = %reference, effective = %effective, "substituted image name");
        }

        // Policy decision happens before any pull; only if-absent needs the
        // (memoized) presence check, so always/never stay network-free here.
        let present = if self.config.pull_policy.consults_local_images() {
            self.cache
                .is_present(self.client.as_ref(), &effective)
                .await
                .map_err(|source| ResolveError::PullFailed {
                    image: effective.canonical_name(),
                    source,
                })?
        } else {
            false
        };

        if !self.config.pull_policy.should_pull(present) {
            return Ok(effective.canonical_name());
        }

        info!(
            image = %effective,
            "pulling image; this may take some time but only needs to be done once"
        );

        // Platform candidates: the configured override first, then at most
        // one switch to the retry platform. The "differs from the platform
        // just attempted" guard bounds the loop.
        let mut platform = self.config.platform.clone();
        loop {
            let attempt = self.pull_with_deadline(&effective, platform.as_deref()).await;
            match attempt {
                Ok(name) => return Ok(name),
                Err(PullLoopFailure::Mismatch(source)) => {
                    match self.config.platform_retry.as_deref() {
                        Some(retry) if platform.as_deref() != Some(retry) => {
                            info!(
                                image = %effective,
                                platform = retry,
                                "no matching manifest; retrying pull with fallback platform"
                            );
                            platform = Some(retry.to_string());
                        }
                        _ => {
                            return Err(ResolveError::PullFailed {
                                image: effective.canonical_name(),
                                source,
                            });
                        }
                    }
                }
                Err(PullLoopFailure::Fatal(source)) => {
                    return Err(ResolveError::PullFailed {
                        image: effective.canonical_name(),
                        source,
                    });
                }
                Err(PullLoopFailure::Exhausted(last_failure)) => {
                    return Err(ResolveError::RetriesExhausted {
                        image: effective.canonical_name(),
                        source: last_failure,
                    });
                }
            }
        }
    }

    /// Retry pulls until success or the wall-clock deadline passes. Transient
    /// failures re-enter the loop immediately; attempt latency is the only
    /// backoff.
    async fn pull_with_deadline(
        &self,
        image: &ImageRef,
        platform: Option<&str>,
    ) -> Result<String, PullLoopFailure> {
        let deadline = Instant::now() + self.config.pull_timeout;
        let mut last_failure = None;

        while Instant::now() < deadline {
            match self
                .client
                .pull(&image.unversioned_part(), image.version_part(), platform)
                .await
            {
                Ok(()) => {
                    self.cache.refresh(image);
                    return Ok(image.canonical_name());
                }
                Err(e) if e.is_transient() => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    warn!(
                        image = %image,
                        remaining_secs = remaining.as_secs(),
                        "retrying pull after transient failure: {e}"
                    );
                    last_failure = Some(e);
                }
                Err(e @ PullError::ManifestMismatch { .. }) => {
                    return Err(PullLoopFailure::Mismatch(e));
                }
                Err(e) => return Err(PullLoopFailure::Fatal(e)),
            }
        }

        error!(image = %image, "failed to pull image; check output of `docker pull {image}`");
        Err(PullLoopFailure::Exhausted(last_failure))
    }
}

/// An image reference bound to a resolver, resolved at most once.
///
/// Wraps the whole resolution (name substitution, policy, pull) in a
/// [`Lazy`], so any number of callers share a single pull attempt sequence
/// and its outcome.
pub struct RemoteImage {
    name: Lazy<String, ResolveError>,
}

impl RemoteImage {
    pub fn new(resolver: Arc<ImageResolver>, reference: ImageRef) -> Self {
        Self {
            name: Lazy::new(async move { resolver.resolve(&reference).await }),
        }
    }

    /// Build from an async reference producer, e.g. a build step that yields
    /// the image name once it finishes.
    pub fn from_future<F>(resolver: Arc<ImageResolver>, reference: F) -> Self
    where
        F: Future<Output = Result<ImageRef, ResolveError>> + Send + 'static,
    {
        Self {
            name: Lazy::new(async move {
                let reference = reference.await?;
                resolver.resolve(&reference).await
            }),
        }
    }

    /// Canonical name of the resolved, locally-available image. First call
    /// performs the resolution; later or concurrent calls share its outcome.
    pub async fn resolved_name(&self) -> Result<String, Arc<ResolveError>> {
        self.name.get().await
    }

    pub fn is_resolved(&self) -> bool {
        self.name.is_resolved()
    }
}
