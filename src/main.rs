use std::io;

use anyhow::Context;
use clap::Parser;
use mkfeed::cli::{self, Cli};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout carries only the feed.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let cli = Cli::parse();
    cli::run(&cli, io::stdin().lock(), io::stdout().lock()).context("failed to make feed")?;
    Ok(())
}
