//! speedtrail CLI - Command-line interface
//!
//! Replays recorded tracks through the live tracker and manages the
//! configuration file.

mod commands;
mod error;
mod notifier;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::replay::ReplayArgs;

#[derive(Parser)]
#[command(name = "speedtrail")]
#[command(version = speedtrail::VERSION)]
#[command(about = "Follow a location stream and alert on speeding and hard braking", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a recorded track through the tracker
    Replay {
        /// Track file (CSV: timestamp_ms,latitude,longitude[,speed_mps])
        track: PathBuf,

        /// Playback speed multiplier (0 plays without delay)
        #[arg(long, default_value = "1.0")]
        speed_factor: f64,

        /// Enable debug logging and periodic track logging
        #[arg(long)]
        debug: bool,
    },

    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Replay {
            track,
            speed_factor,
            debug,
        } => commands::replay::run(ReplayArgs {
            track,
            speed_factor,
            debug,
        }),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
