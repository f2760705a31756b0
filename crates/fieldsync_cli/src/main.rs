//! FieldSync CLI
//!
//! Command-line tools for running and inspecting sync fixtures.
//!
//! # Commands
//!
//! - `sync` - Run a sync against a remote fixture file
//! - `inspect` - Display fixture collection statistics
//!
//! A fixture is a JSON object mapping collection names to arrays of
//! documents, standing in for the remote document store.

mod commands;

use clap::{Parser, Subcommand, ValueEnum};
use fieldsync_engine::SyncDirection;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// FieldSync command-line sync tools.
#[derive(Parser)]
#[command(name = "fieldsync")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(global = true, short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Which legs of the sync to run.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum Direction {
    /// Local dirty records to the remote store only
    Push,
    /// Remote documents to the local store only
    Pull,
    /// Push, then pull
    Both,
}

impl From<Direction> for SyncDirection {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Push => SyncDirection::Push,
            Direction::Pull => SyncDirection::Pull,
            Direction::Both => SyncDirection::Bidirectional,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a sync against a remote fixture file
    Sync {
        /// Path to the remote fixture (JSON)
        fixture: PathBuf,

        /// Entity types to synchronize, in order (default: all, in
        /// dependency order)
        #[arg(short, long)]
        types: Vec<String>,

        /// Which legs to run
        #[arg(short, long, value_enum, default_value = "pull")]
        direction: Direction,

        /// Stage every record on push, not just dirty ones
        #[arg(short, long)]
        force: bool,

        /// Directory for decoded media files
        #[arg(short, long, default_value = "media")]
        media_dir: PathBuf,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Display fixture collection statistics
    Inspect {
        /// Path to the remote fixture (JSON)
        fixture: PathBuf,

        /// Output format (text, json)
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match cli.command {
        Commands::Sync {
            fixture,
            types,
            direction,
            force,
            media_dir,
            format,
        } => {
            commands::sync::run(&fixture, &types, direction.into(), force, &media_dir, &format)?;
        }
        Commands::Inspect { fixture, format } => {
            commands::inspect::run(&fixture, &format)?;
        }
        Commands::Version => {
            println!("FieldSync CLI v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
