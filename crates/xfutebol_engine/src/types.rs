//! Core domain types for xfutebol.

use serde::{Deserialize, Serialize};

use crate::tile::BoardTile;

/// Side of the pitch.
///
/// `Neutral` is what an empty tile belongs to; it never takes a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Team {
    /// Defends row 0, kicks off first.
    White,
    /// Defends row 7.
    Black,
    /// No team.
    Neutral,
}

impl Team {
    /// Returns the opposing team. `Neutral` has no opponent.
    pub fn opponent(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
            Team::Neutral => Team::Neutral,
        }
    }

    /// Letter used in piece ids.
    pub fn letter(self) -> char {
        match self {
            Team::White => 'W',
            Team::Black => 'B',
            Team::Neutral => 'N',
        }
    }

    /// Row this team's goal sits on.
    pub fn goal_row(self) -> Option<u8> {
        match self {
            Team::White => Some(0),
            Team::Black => Some(7),
            Team::Neutral => None,
        }
    }

    /// Whether `tile` lies in this team's own half.
    pub fn owns_half(self, tile: BoardTile) -> bool {
        match self {
            Team::White => tile.row() <= 3,
            Team::Black => tile.row() >= 4,
            Team::Neutral => false,
        }
    }

    /// Signed progress of `tile` towards the goal this team attacks (0 = own goal line).
    pub fn progress(self, tile: BoardTile) -> i32 {
        match self {
            Team::White => tile.row() as i32,
            Team::Black => 7 - tile.row() as i32,
            Team::Neutral => 0,
        }
    }
}

/// Role of a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum PieceRole {
    /// Confined to its box.
    Goalkeeper,
    /// Slow back line.
    Defender,
    /// Covers ground.
    Midfielder,
    /// Starts with the ball at kickoff.
    Attacker,
}

impl PieceRole {
    /// Letter used in piece ids.
    pub fn letter(self) -> char {
        match self {
            PieceRole::Goalkeeper => 'G',
            PieceRole::Defender => 'D',
            PieceRole::Midfielder => 'M',
            PieceRole::Attacker => 'A',
        }
    }

    /// Maximum tiles a ball-less piece of this role travels with one move.
    pub fn move_range(self) -> u8 {
        match self {
            PieceRole::Goalkeeper | PieceRole::Defender => 1,
            PieceRole::Midfielder | PieceRole::Attacker => 2,
        }
    }
}

/// The seven action kinds.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Reposition a piece.
    Move,
    /// Hand the ball to a teammate.
    Pass,
    /// Put the ball into the goal mouth.
    Shoot,
    /// Win the ball back.
    Intercept,
    /// Clear the ball into space.
    Kick,
    /// Mark an opponent in the own half.
    Defend,
    /// Shove an adjacent opponent one tile.
    Push,
}

/// Bot strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Difficulty {
    /// Only ever moves pieces.
    Easy,
    /// Greedy over every action kind.
    Medium,
    /// Greedy, and careful with possession.
    Hard,
}

/// A piece on the board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Stable id, e.g. `WA01`.
    pub id: String,
    /// Owning team.
    pub team: Team,
    /// Role.
    pub role: PieceRole,
}

impl Piece {
    /// Creates a piece with id `<team><role><seq:02>`.
    pub fn new(team: Team, role: PieceRole, seq: u8) -> Self {
        Self {
            id: format!("{}{}{:02}", team.letter(), role.letter(), seq),
            team,
            role,
        }
    }
}
