//! Keyward CLI
//!
//! Hash, verify and inspect stored password blobs from the command line using
//! the same cost configuration as the services that store them.

mod commands;
mod config;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use keyward_hasher::HasherPool;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::{KeywardConfig, Overrides};

/// Keyward CLI — scrypt password blobs with rehash-on-login support.
#[derive(Parser, Debug)]
#[command(name = "keyward", version, about)]
struct Cli {
    /// Path to a TOML configuration file.
    #[arg(long, env = "KEYWARD_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(flatten)]
    overrides: Overrides,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hash a password into a storable blob.
    Hash(commands::hash::HashArgs),
    /// Check a password against a stored blob.
    Verify(commands::verify::VerifyArgs),
    /// Show the layout and cost parameters of a stored blob.
    Inspect(commands::inspect::InspectArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = KeywardConfig::load(cli.config.as_deref())?;
    config.apply(&cli.overrides);
    config.scrypt.validate()?;
    tracing::debug!(?config, "configuration loaded");

    let pool = HasherPool::fixed(config.scrypt, &config.pool);

    match cli.command {
        Command::Hash(args) => commands::hash::run(&pool, &args, &cli.format).await,
        Command::Verify(args) => commands::verify::run(&pool, &args, &cli.format).await,
        Command::Inspect(args) => commands::inspect::run(&pool, &args, &cli.format),
    }
}
