//! Xfutebol session core.
//!
//! Owns live matches, dispatches the seven action kinds to the rule engine,
//! answers board queries, plays the automated side and keeps a match log.
//!
//! # Example
//!
//! ```
//! use xfutebol::{GameModeType, GameService, Team};
//!
//! let service = GameService::new();
//! let id = service.create_session(GameModeType::QuickMatch);
//!
//! let board = service.get_board(&id).expect("session exists");
//! assert_eq!(board.current_turn, Team::White);
//!
//! let holder = board.ball_holder().expect("kickoff holder").id.clone();
//! let to = service.get_legal_moves(&id, &holder)[0];
//! let outcome = service.execute_move(&id, &holder, to);
//! assert!(outcome.success);
//! assert_eq!(outcome.actions_remaining, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod convert;
mod dispatch;
mod error;
mod logger;
mod opponent;
mod query;
mod service;
mod store;
mod types;

pub use config::XfutebolConfig;
pub use convert::{path_to_tiles, tiles_to_path};
pub use error::{ConfigError, ConversionError, DispatchError, DispatchErrorKind, LogExportError};
pub use logger::{DEFAULT_EXPORT_RETENTION, EXPORT_PREFIX, LogEntry, LogSource, MatchLogger};
pub use opponent::{
    CancelHandle, DEFAULT_PACING, EngineBot, HaltReason, MAX_CONSECUTIVE_FAILURES,
    OpponentOrchestrator, OpponentReport, OrchestratorState, ProposalSource,
};
pub use query::board_view;
pub use service::GameService;
pub use store::{Session, SessionStore};
pub use types::{
    ActionKind, ActionOutcome, BoardView, Difficulty, GameModeType, OpponentProposal, PieceRole,
    PieceView, Position, PositionPath, SessionId, Team,
};
