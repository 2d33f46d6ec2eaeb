// ABOUTME: Pull policy: should an image be pulled before use?
// ABOUTME: Stateless decision; presence lookups stay with the caller.

use serde::{Deserialize, Serialize};

/// When to pull an image.
///
/// The decision is pure: for `IfAbsent` the caller queries the local presence
/// cache and passes the answer in, so the policy itself never touches shared
/// state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PullPolicy {
    /// Pull on every resolution, even if the image is already local.
    Always,

    /// Pull only when the image is not available locally.
    #[default]
    IfAbsent,

    /// Never pull; resolution trusts the local daemon state.
    Never,
}

impl PullPolicy {
    /// Whether the decision depends on local image presence. When this is
    /// false the caller can skip the presence check entirely.
    pub fn consults_local_images(self) -> bool {
        matches!(self, PullPolicy::IfAbsent)
    }

    pub fn should_pull(self, present_locally: bool) -> bool {
        match self {
            PullPolicy::Always => true,
            PullPolicy::IfAbsent => !present_locally,
            PullPolicy::Never => false,
        }
    }
}
