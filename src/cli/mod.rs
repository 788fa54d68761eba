use crate::errors::AppResult;
use clap::{Parser, Subcommand};

pub mod commands;

/// Bitcoin Stamps Decoder
#[derive(Parser)]
#[command(name = "stamp-decoder")]
#[command(about = "Recover Bitcoin Stamps artifacts from Counterparty, OLGA and SRC-721 transactions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Decode one transaction from JSON, raw hex or the Esplora API
    Decode(commands::decode::DecodeCommand),
    /// Scan blocks from an Esplora API, writing artifacts and block logs
    Scan(commands::scan::ScanCommand),
    /// Report scan progress from the block logs
    Status(commands::status::StatusCommand),
    /// Delete artifacts, block logs and the checkpoint
    Clean(commands::clean::CleanCommand),
}

pub async fn run() -> AppResult<()> {
    // RUST_LOG controls verbosity, "error" when unset
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("error")),
        )
        .try_init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decode(command) => command.run().await,
        Commands::Scan(command) => command.run().await,
        Commands::Status(command) => command.run(),
        Commands::Clean(command) => command.run(),
    }
}
