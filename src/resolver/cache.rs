// ABOUTME: Process-wide cache of locally-present image names.
// ABOUTME: Memoizes daemon presence checks; refreshed after successful pulls.

use crate::client::{PullError, RegistryClient};
use crate::types::ImageRef;
use parking_lot::Mutex;
use std::collections::HashMap;

/// Memo of "this image is already local", keyed by canonical name.
///
/// Purely an optimization: entries only ever move from absent/unknown to
/// present, and a stale `false` costs at most one extra daemon check or pull
/// attempt. Nothing is ever evicted within the process lifetime.
#[derive(Debug, Default)]
pub struct LocalImageCache {
    entries: Mutex<HashMap<String, bool>>,
}

impl LocalImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the image is available locally, asking the daemon at most once
    /// per distinct reference and memoizing the answer.
    pub async fn is_present(
        &self,
        client: &dyn RegistryClient,
        reference: &ImageRef,
    ) -> Result<bool, PullError> {
        let key = reference.canonical_name();

        if let Some(present) = self.entries.lock().get(&key) {
            return Ok(*present);
        }

        let present = client.image_exists(reference).await?;

        // Concurrent checks may race here; keep any "present" already
        // recorded since presence is monotonic.
        let mut entries = self.entries.lock();
        let entry = entries.entry(key).or_insert(present);
        if present {
            *entry = true;
        }
        Ok(*entry)
    }

    /// Mark the image as present after a verified successful pull. Idempotent.
    pub fn refresh(&self, reference: &ImageRef) {
        self.entries
            .lock()
            .insert(reference.canonical_name(), true);
    }
}
