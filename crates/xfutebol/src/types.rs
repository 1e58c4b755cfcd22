//! Host-side value types exposed to callers.
//!
//! These mirror the engine's vocabulary but belong to this crate, so the
//! presentation layer never sees engine types. See `convert` for the mappings.

use serde::{Deserialize, Serialize};

/// Opaque session identifier.
pub type SessionId = String;

/// Team colours.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum Team {
    /// Kicks off, attacks row 7.
    White,
    /// Attacks row 0.
    Black,
}

impl Team {
    /// Returns the opposing team.
    pub fn opponent(self) -> Self {
        match self {
            Team::White => Team::Black,
            Team::Black => Team::White,
        }
    }
}

/// Piece roles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
pub enum PieceRole {
    /// Goalkeeper.
    Goalkeeper,
    /// Defender.
    Defender,
    /// Midfielder.
    Midfielder,
    /// Attacker.
    Attacker,
}

/// The seven action kinds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ActionKind {
    /// Reposition a piece to one tile.
    Move,
    /// Pass to a teammate.
    Pass,
    /// Shoot at goal.
    Shoot,
    /// Win the ball.
    Intercept,
    /// Clear the ball.
    Kick,
    /// Mark an opponent.
    Defend,
    /// Push an adjacent opponent.
    Push,
}

/// Opponent strength.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Difficulty {
    /// Moves only.
    Easy,
    /// Greedy.
    #[default]
    Medium,
    /// Greedy and careful.
    Hard,
}

/// Match ending rules.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum GameModeType {
    /// 10 turns.
    #[default]
    QuickMatch,
    /// 20 turns.
    StandardMatch,
    /// First to score, no turn limit.
    GoldenGoal,
}

/// A board coordinate, row and col in 0..=7.
///
/// Callers may build any value; out-of-range ones are rejected when the
/// dispatcher converts them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// Row, 0 is White's goal line.
    pub row: u8,
    /// Column.
    pub col: u8,
}

impl Position {
    /// Creates a position.
    pub fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// An ordered path of positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionPath {
    /// Positions in travel order.
    pub positions: Vec<Position>,
}

/// A piece as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieceView {
    /// Engine piece id, e.g. `WA01`.
    pub id: String,
    /// Team.
    pub team: Team,
    /// Role.
    pub role: PieceRole,
    /// Current position.
    pub position: Position,
    /// Holds the ball.
    pub has_ball: bool,
}

/// Board snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardView {
    /// All pieces.
    pub pieces: Vec<PieceView>,
    /// Ball position when nobody holds it.
    pub ball_position: Option<Position>,
    /// Side on the move.
    pub current_turn: Team,
    /// Actions left for the side on the move.
    pub actions_remaining: u8,
    /// White goals.
    pub white_score: u8,
    /// Black goals.
    pub black_score: u8,
    /// Turn number, starting at 1.
    pub turn_number: u32,
}

impl BoardView {
    /// The piece holding the ball.
    pub fn ball_holder(&self) -> Option<&PieceView> {
        self.pieces.iter().find(|piece| piece.has_ball)
    }

    /// Finds a piece by id.
    pub fn piece(&self, id: &str) -> Option<&PieceView> {
        self.pieces.iter().find(|piece| piece.id == id)
    }

    /// ASCII rendering with row 7 on top; `*` marks the ball holder, `o` a loose ball.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Turn {} | {} to move ({} actions) | White {} - {} Black\n",
            self.turn_number,
            self.current_turn,
            self.actions_remaining,
            self.white_score,
            self.black_score
        );
        for row in (0..8u8).rev() {
            out.push_str(&format!("{} ", row));
            for col in 0..8u8 {
                let here = Position::new(row, col);
                let cell = match self.pieces.iter().find(|piece| piece.position == here) {
                    Some(piece) if piece.has_ball => format!("{}*", piece.id),
                    Some(piece) => format!("{} ", piece.id),
                    None if self.ball_position == Some(here) => "  o  ".to_string(),
                    None => "  .  ".to_string(),
                };
                out.push_str(&cell);
            }
            out.push('\n');
        }
        out.push_str("    0    1    2    3    4    5    6    7\n");
        out
    }
}

/// Result of one dispatched action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The action was executed.
    pub success: bool,
    /// Human-readable summary or rejection reason.
    pub message: String,
    /// The match is over.
    pub game_over: bool,
    /// Winner, when over.
    pub winner: Option<Team>,
    /// Actions the acting side has left this turn.
    pub actions_remaining: u8,
    /// Team that scored with this action.
    pub goal_scored: Option<Team>,
    /// The acting side's turn ended.
    pub turn_ended: bool,
    /// The board was reset for a kickoff; previously fetched legal targets are stale.
    pub kickoff_reset: bool,
}

impl ActionOutcome {
    /// A failed outcome that left the session untouched.
    pub fn failure(message: impl Into<String>, actions_remaining: u8) -> Self {
        Self {
            success: false,
            message: message.into(),
            game_over: false,
            winner: None,
            actions_remaining,
            goal_scored: None,
            turn_ended: false,
            kickoff_reset: false,
        }
    }

    /// Whether a goal or the end of the match happened.
    pub fn interrupts(&self) -> bool {
        self.goal_scored.is_some() || self.game_over
    }
}

/// An action proposed for the automated side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpponentProposal {
    /// Acting piece.
    pub piece_id: String,
    /// Action kind.
    pub kind: ActionKind,
    /// Path; push carries `[target, destination]`, move a single position.
    pub path: Vec<Position>,
}
