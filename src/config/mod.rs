// ABOUTME: Resolver configuration, loaded from eikona.yml.
// ABOUTME: Platform override/retry, pull policy, deadline, mirror registry.

use crate::resolver::{Identity, NameSubstitutor, PullPolicy, RegistryPrefix};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILENAME: &str = "eikona.yml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Settings for image resolution. Every field has a default, so an absent
/// config file means stock behavior: no platform override, pull-if-absent,
/// two-minute retry budget, no mirror.
#[derive(Debug, Clone, Deserialize)]
pub struct ResolverConfig {
    /// Platform passed to the daemon on pull (e.g. "linux/amd64"). Absent
    /// means the daemon default.
    #[serde(default)]
    pub platform: Option<String>,

    /// Platform to retry with when the registry has no manifest for the one
    /// requested.
    #[serde(default)]
    pub platform_retry: Option<String>,

    #[serde(default)]
    pub pull_policy: PullPolicy,

    /// Wall-clock budget for the pull retry loop.
    #[serde(default = "default_pull_timeout", with = "humantime_serde")]
    pub pull_timeout: Duration,

    /// Registry that unqualified references are rewritten to before
    /// resolution (mirror redirection).
    #[serde(default)]
    pub registry_mirror: Option<String>,
}

fn default_pull_timeout() -> Duration {
    Duration::from_secs(120)
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            platform: None,
            platform_retry: None,
            pull_policy: PullPolicy::default(),
            pull_timeout: default_pull_timeout(),
            registry_mirror: None,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a YAML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let contents = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&contents)?)
    }

    /// Load from an explicit path, from `eikona.yml` in the current
    /// directory, or fall back to defaults when no file exists.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(CONFIG_FILENAME);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Name substitutor implied by this configuration: a mirror rewrite when
    /// `registry_mirror` is set, otherwise the identity.
    pub fn substitutor(&self) -> Arc<dyn NameSubstitutor> {
        match &self.registry_mirror {
            Some(registry) => Arc::new(RegistryPrefix::new(registry.clone())),
            None => Arc::new(Identity),
        }
    }
}
