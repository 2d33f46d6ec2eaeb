// ABOUTME: Entry point for the eikona CLI application.
// ABOUTME: Parses arguments and dispatches to resolution commands.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use eikona::client::BollardClient;
use eikona::config::ResolverConfig;
use eikona::error::Result;
use eikona::resolver::{ImageResolver, PullPolicy};
use eikona::types::ImageRef;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber based on verbose flag
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ResolverConfig::load_or_default(cli.config.as_deref())?;

    let (image, platform, policy) = match cli.command {
        Commands::Resolve {
            image,
            platform,
            policy,
        } => (image, platform, policy.map(PullPolicy::from)),
        Commands::Pull { image, platform } => (image, platform, Some(PullPolicy::Always)),
    };

    if let Some(platform) = platform {
        config.platform = Some(platform);
    }
    if let Some(policy) = policy {
        config.pull_policy = policy;
    }

    let reference = ImageRef::parse(&image)?;

    let client = BollardClient::connect_unix(&cli.socket)?;
    let substitutor = config.substitutor();
    let resolver = ImageResolver::new(Arc::new(client), config).with_substitutor(substitutor);

    let resolved = resolver.resolve(&reference).await?;
    println!("{resolved}");

    Ok(())
}
