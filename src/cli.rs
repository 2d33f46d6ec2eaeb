// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand, ValueEnum};
use eikona::resolver::PullPolicy;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "eikona")]
#[command(about = "Resolve container images to locally-available names, pulling when needed")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Path to the configuration file (defaults to ./eikona.yml if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Path to the Docker/Podman socket
    #[arg(long, default_value = "/var/run/docker.sock")]
    pub socket: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve an image reference, pulling it if the policy requires
    Resolve {
        /// Image reference (e.g. nginx:1.25 or ghcr.io/org/app@sha256:...)
        image: String,

        /// Platform to request from the registry (e.g. linux/amd64)
        #[arg(long)]
        platform: Option<String>,

        /// Pull policy override
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,
    },

    /// Pull an image unconditionally
    Pull {
        /// Image reference
        image: String,

        /// Platform to request from the registry
        #[arg(long)]
        platform: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PolicyArg {
    Always,
    IfAbsent,
    Never,
}

impl From<PolicyArg> for PullPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Always => PullPolicy::Always,
            PolicyArg::IfAbsent => PullPolicy::IfAbsent,
            PolicyArg::Never => PullPolicy::Never,
        }
    }
}
