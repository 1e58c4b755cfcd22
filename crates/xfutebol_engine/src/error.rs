//! Rule violations reported by the engine.

use crate::tile::BoardTile;
use crate::types::{Action, Team};

/// Why the engine refused an action or a board edit.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The match has already ended.
    #[display("The match is already over")]
    GameOver,

    /// The match has not been started.
    #[display("The match has not started yet")]
    NotStarted,

    /// The acting piece belongs to the side not on the move.
    #[display("It is {_0}'s turn")]
    NotYourTurn(Team),

    /// No piece stands on the tile.
    #[display("There is no piece on {_0}")]
    NoPieceAt(BoardTile),

    /// A piece already stands on the tile.
    #[display("{_0} is already occupied")]
    TileOccupied(BoardTile),

    /// Two pieces with the same id.
    #[display("Piece {_0} is already on the board")]
    DuplicatePiece(String),

    /// The action needs the acting piece to hold the ball.
    #[display("{_0} requires the ball")]
    BallRequired(Action),

    /// The action is not allowed while holding the ball.
    #[display("{_0} is not allowed while holding the ball")]
    BallNotAllowed(Action),

    /// The path is not one of the legal paths for this piece and action.
    #[display("Illegal {action} path")]
    IllegalPath {
        /// Attempted action.
        action: Action,
    },
}

impl std::error::Error for GameError {}
