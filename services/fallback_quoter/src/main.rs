//! Fallback quoter entry point

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use fallback_quoter::{run, Command};
use quote_config::SimulatorConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path (defaults to config/quoter.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Environment overlay from config/environments/<name>.toml
    #[arg(short, long)]
    environment: Option<String>,

    #[command(subcommand)]
    command: Command,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = SimulatorConfig::load(args.config.as_deref(), args.environment.as_deref())?;

    // RUST_LOG wins over the configured level; logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.global.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!(version = env!("CARGO_PKG_VERSION"), pools = config.pools.len(), "Starting fallback quoter");
    config.validate()?;

    println!("{}", run(&config, &args.command)?);
    Ok(())
}
