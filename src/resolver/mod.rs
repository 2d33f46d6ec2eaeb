// ABOUTME: Image resolution pipeline: policy, presence cache, substitution,
// ABOUTME: the pull retry loop, and the compute-once RemoteImage wrapper.

mod cache;
mod lazy;
mod policy;
mod puller;
mod substitute;

pub use cache::LocalImageCache;
pub use lazy::Lazy;
pub use policy::PullPolicy;
pub use puller::{ImageResolver, RemoteImage};
pub use substitute::{Identity, NameSubstitutor, RegistryPrefix};
