//! Command-line interface for xfutebol.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xfutebol::{Difficulty, GameModeType};

/// Xfutebol - turn-based football on an 8x8 board
#[derive(Parser, Debug)]
#[command(name = "xfutebol")]
#[command(about = "Session core for the xfutebol board game", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a full match between two engine bots and export the log
    Simulate {
        /// Match mode (quick-match, standard-match, golden-goal); overrides the config
        #[arg(short, long)]
        mode: Option<GameModeType>,

        /// Difficulty of the White bot
        #[arg(long, default_value = "medium")]
        white: Difficulty,

        /// Difficulty of the Black bot
        #[arg(long, default_value = "medium")]
        black: Difficulty,

        /// Path to the TOML config (defaults apply when missing)
        #[arg(short, long, default_value = "xfutebol.toml")]
        config: PathBuf,

        /// Directory for the exported log; overrides the config
        #[arg(long)]
        export_dir: Option<PathBuf>,
    },

    /// Print the kickoff board
    Board {
        /// Match mode
        #[arg(short, long, default_value = "quick-match")]
        mode: GameModeType,
    },
}
