//! Xfutebol - command line front end.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;
use xfutebol::{
    Difficulty, EngineBot, GameModeType, GameService, HaltReason, OpponentOrchestrator, Team,
    XfutebolConfig,
};

/// Upper bound on orchestrator runs in one simulation.
const MAX_RUNS: usize = 1_000;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,xfutebol=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            mode,
            white,
            black,
            config,
            export_dir,
        } => run_simulation(mode, white, black, config, export_dir).await,
        Command::Board { mode } => print_board(mode),
    }
}

/// Print a fresh board
#[instrument]
fn print_board(mode: GameModeType) -> Result<()> {
    let service = GameService::new();
    let id = service.create_session(mode);
    let board = service
        .get_board(&id)
        .context("New session has no board")?;
    println!("{}", board.render());
    Ok(())
}

/// Play both sides with engine bots until the match ends
#[instrument]
async fn run_simulation(
    mode: Option<GameModeType>,
    white: Difficulty,
    black: Difficulty,
    config: PathBuf,
    export_dir: Option<PathBuf>,
) -> Result<()> {
    let mut config = XfutebolConfig::load_or_default(&config)?;
    if let Some(mode) = mode {
        config = config.with_mode(mode);
    }
    if let Some(dir) = export_dir {
        config = config.with_export_dir(dir);
    }

    let service = GameService::with_retention(*config.log_retention());
    let id = service.create_session(*config.mode());
    info!(session_id = %id, mode = %config.mode(), %white, %black, "Simulation started");

    let mut white_side = OpponentOrchestrator::new(service.clone(), &id, Team::White, Box::new(EngineBot::new(white)))
        .with_pacing(config.pacing());
    let mut black_side = OpponentOrchestrator::new(service.clone(), &id, Team::Black, Box::new(EngineBot::new(black)))
        .with_pacing(config.pacing());

    for _ in 0..MAX_RUNS {
        if service.is_over(&id) {
            break;
        }
        let side = match service.current_turn(&id) {
            Some(Team::White) => &mut white_side,
            Some(Team::Black) => &mut black_side,
            None => break,
        };
        let report = side.resume().await;
        match report.halt() {
            HaltReason::GoalOrGameOver => {
                if let Some(board) = service.get_board(&id) {
                    println!("GOAL! White {} - {} Black", board.white_score, board.black_score);
                }
            }
            HaltReason::TurnYielded | HaltReason::GameOver => {}
            HaltReason::NoProposal | HaltReason::TooManyErrors => {
                warn!(team = %side.team(), halt = %report.halt(), "Side cannot continue, stopping");
                break;
            }
            HaltReason::SessionNotFound | HaltReason::Cancelled => break,
        }
    }

    if let Some(board) = service.get_board(&id) {
        println!("{}", board.render());
    }
    match service.winner(&id) {
        Some(team) => println!("{} wins", team),
        None if service.is_over(&id) => println!("Draw"),
        None => println!("Match stopped before the end"),
    }

    if let Some(result) = service.export_log_to_file(&id, config.export_dir()) {
        let path = result?;
        println!("Match log written to {}", path.display());
    }
    Ok(())
}
