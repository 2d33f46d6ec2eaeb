// ABOUTME: Scriptable RegistryClient mock for resolver tests.
// ABOUTME: Records pull invocations and replays queued responses.

use async_trait::async_trait;
use eikona::client::{PullError, RegistryClient};
use eikona::types::ImageRef;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// One recorded pull invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRecord {
    pub repository: String,
    pub tag: String,
    pub platform: Option<String>,
}

/// What the mock answers once its scripted response queue is empty.
#[derive(Debug, Clone, Copy)]
pub enum DefaultResponse {
    Succeed,
    Transient,
}

pub struct MockClient {
    exists: bool,
    latency: Duration,
    default_response: DefaultResponse,
    responses: Mutex<VecDeque<Result<(), PullError>>>,
    pulls: Mutex<Vec<PullRecord>>,
    existence_checks: AtomicUsize,
}

impl MockClient {
    /// Mock whose pulls succeed; `exists` answers the presence check.
    pub fn new(exists: bool) -> Self {
        Self {
            exists,
            latency: Duration::ZERO,
            default_response: DefaultResponse::Succeed,
            responses: Mutex::new(VecDeque::new()),
            pulls: Mutex::new(Vec::new()),
            existence_checks: AtomicUsize::new(0),
        }
    }

    /// Mock whose every pull fails transiently. Latency bounds the retry
    /// loop's iteration count against a wall-clock deadline.
    pub fn always_transient(latency: Duration) -> Self {
        Self {
            latency,
            default_response: DefaultResponse::Transient,
            ..Self::new(false)
        }
    }

    /// Queue a scripted response for the next pull.
    pub fn push_response(&self, response: Result<(), PullError>) {
        self.responses.lock().push_back(response);
    }

    pub fn pulls(&self) -> Vec<PullRecord> {
        self.pulls.lock().clone()
    }

    pub fn pull_count(&self) -> usize {
        self.pulls.lock().len()
    }

    pub fn existence_checks(&self) -> usize {
        self.existence_checks.load(Ordering::SeqCst)
    }

    pub fn transient(image: &str) -> PullError {
        PullError::Transient {
            image: image.to_string(),
            message: "connection reset by peer".to_string(),
        }
    }

    pub fn manifest_mismatch(image: &str) -> PullError {
        PullError::ManifestMismatch {
            image: image.to_string(),
            message: "no matching manifest for linux/amd64 in the manifest list entries".to_string(),
        }
    }

    pub fn client_error(image: &str) -> PullError {
        PullError::Client {
            image: image.to_string(),
            message: "pull access denied".to_string(),
        }
    }
}

#[async_trait]
impl RegistryClient for MockClient {
    async fn pull(
        &self,
        repository: &str,
        tag: &str,
        platform: Option<&str>,
    ) -> Result<(), PullError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        self.pulls.lock().push(PullRecord {
            repository: repository.to_string(),
            tag: tag.to_string(),
            platform: platform.map(str::to_string),
        });

        if let Some(response) = self.responses.lock().pop_front() {
            return response;
        }

        match self.default_response {
            DefaultResponse::Succeed => Ok(()),
            DefaultResponse::Transient => Err(Self::transient(&format!("{repository}:{tag}"))),
        }
    }

    async fn image_exists(&self, _reference: &ImageRef) -> Result<bool, PullError> {
        self.existence_checks.fetch_add(1, Ordering::SeqCst);
        Ok(self.exists)
    }
}
