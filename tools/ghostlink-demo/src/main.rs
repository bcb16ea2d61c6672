//! Ghostlink demo - two co-op peers in one process
//!
//! # Commands
//!
//! - `ghostlink-demo walk` - guest walks, host's ghost follows
//! - `ghostlink-demo battle` - guest joins the host's battle
//! - `ghostlink-demo disconnect` - guest hangs up mid-session
//! - `ghostlink-demo config` - print the effective configuration
//!
//! # Usage
//!
//! ```bash
//! RUST_LOG=debug ghostlink-demo walk --x 12 --change-map
//! ghostlink-demo --config ghostlink.toml battle --troop 7
//! ```

mod scenario;
mod world;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ghostlink_core::CoopConfig;

/// Ghostlink demo - two co-op peers over an in-memory transport
#[derive(Parser)]
#[command(name = "ghostlink-demo")]
#[command(about = "Run scripted co-op scenarios between two in-process peers")]
#[command(version)]
struct Cli {
    /// Path to a TOML config file (defaults apply otherwise)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Guest walks around; the host's ghost follows
    Walk(scenario::WalkArgs),

    /// Guest asks to join the host's battle
    Battle(scenario::BattleArgs),

    /// Guest hangs up mid-session
    Disconnect(scenario::DisconnectArgs),

    /// Print the effective configuration as TOML
    Config,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    // `load` validates; the defaults are always valid
    let config = match &cli.config {
        Some(path) => CoopConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => CoopConfig::default(),
    };

    match cli.command {
        Commands::Walk(args) => scenario::walk(&config, args),
        Commands::Battle(args) => scenario::battle(&config, args),
        Commands::Disconnect(args) => scenario::disconnect(&config, args),
        Commands::Config => {
            print!("{}", config.to_toml_string()?);
            Ok(())
        }
    }
}
