//! Command-line interface for strictly_2048.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_2048_cli::ViewMode;

/// Strictly 2048 - sliding tile puzzle in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_2048")]
#[command(about = "Play 2048 in the terminal", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a session config file (TOML)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Seed for tile spawning, overrides the config file
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// High score file (TOML). Scores stay in memory when omitted.
    #[arg(long, global = true)]
    pub scores: Option<PathBuf>,

    /// Also log every session event in the given format
    #[arg(long, global = true, value_enum)]
    pub events: Option<ViewMode>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively with line commands
    Play,

    /// Let the cycle policy play on its own
    Auto {
        /// Maximum number of turns to play
        #[arg(short, long, default_value = "1000")]
        steps: usize,
    },
}
