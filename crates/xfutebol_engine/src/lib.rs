//! Xfutebol rule engine.
//!
//! A two-team football board game on an 8x8 grid. Each side has seven
//! pieces and two actions per turn; pieces move, pass, shoot, intercept,
//! kick, defend and push along straight lines.
//!
//! # Example
//!
//! ```
//! use xfutebol_engine::{GameMatch, GameMode, Team};
//!
//! let mut game = GameMatch::standard(GameMode::quick_match());
//! game.start(Team::White);
//!
//! let holder = game.ball_holder().expect("kickoff gives White the ball");
//! let (tile, _) = game.piece_by_id(&holder).expect("holder on board");
//! let to = game.legal_moves(tile)[0];
//! let outcome = game.perform_move(tile, to).expect("legal move");
//! assert_eq!(outcome.actions_remaining, 1);
//! ```

#![warn(missing_docs)]

mod board;
mod bot;
mod error;
mod game;
mod rules;
mod tile;
mod types;

pub use board::{Ball, Board, GOAL_COLUMNS};
pub use bot::{Bot, BotMove};
pub use error::GameError;
pub use game::{ACTIONS_PER_TURN, ActionOutcome, ActionRecord, GameMatch, GameMode, MatchStatus};
pub use rules::{DEFEND_RANGE, DRIBBLE_RANGE, KICK_RANGE, PASS_RANGE, SHOOT_RANGE, legal_paths};
pub use tile::{BOARD_SIZE, BoardTile, Direction};
pub use types::{Action, Difficulty, Piece, PieceRole, Team};
