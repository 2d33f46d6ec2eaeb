// ABOUTME: Image name substitution applied before resolution.
// ABOUTME: Pluggable rewrite rules, e.g. redirecting pulls to a mirror.

use crate::types::ImageRef;

/// Rewrites a requested reference before resolution.
///
/// Must be pure: the same input always maps to the same output, with no side
/// effects. The identity substitutor is the default.
pub trait NameSubstitutor: Send + Sync {
    fn apply(&self, reference: &ImageRef) -> ImageRef;
}

/// No-op substitutor: every reference resolves as requested.
#[derive(Debug, Default)]
pub struct Identity;

impl NameSubstitutor for Identity {
    fn apply(&self, reference: &ImageRef) -> ImageRef {
        reference.clone()
    }
}

/// Redirects references without an explicit registry to a configured one,
/// typically an internal mirror. References that already name a registry are
/// left untouched.
#[derive(Debug)]
pub struct RegistryPrefix {
    registry: String,
}

impl RegistryPrefix {
    pub fn new(registry: impl Into<String>) -> Self {
        Self {
            registry: registry.into(),
        }
    }
}

impl NameSubstitutor for RegistryPrefix {
    fn apply(&self, reference: &ImageRef) -> ImageRef {
        if reference.registry().is_some() {
            return reference.clone();
        }
        reference.with_registry(&self.registry)
    }
}
