//! Built-in decision policy.
//!
//! The bot scores every legal action of its side with a fixed heuristic and
//! returns the best ones. Ties keep enumeration order (pieces by tile, then
//! action kind), so a given position always yields the same choice.

use strum::IntoEnumIterator;
use tracing::{debug, instrument};

use crate::board::Board;
use crate::game::GameMatch;
use crate::rules;
use crate::tile::BoardTile;
use crate::types::{Action, Difficulty, Piece, PieceRole, Team};

/// An action proposed by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotMove {
    /// Tile of the acting piece.
    pub piece_tile: BoardTile,
    /// Id of the acting piece.
    pub piece_id: String,
    /// Action kind.
    pub action: Action,
    /// Path to execute.
    pub path: Vec<BoardTile>,
    /// Heuristic value.
    pub score: i32,
}

/// Heuristic player for one side.
#[derive(Debug, Clone, Copy)]
pub struct Bot {
    team: Team,
    difficulty: Difficulty,
}

impl Bot {
    /// Creates a bot playing `team`.
    pub fn new(team: Team, difficulty: Difficulty) -> Self {
        Self { team, difficulty }
    }

    /// Up to `count` best actions, best first. Empty when the match is over.
    #[instrument(skip(self, game), fields(team = ?self.team, difficulty = ?self.difficulty))]
    pub fn choose_actions(&self, game: &GameMatch, count: usize) -> Vec<BotMove> {
        if game.is_over() {
            return Vec::new();
        }
        let board = game.board();
        let mut candidates = Vec::new();
        for (tile, piece) in board.pieces().filter(|(_, piece)| piece.team == self.team) {
            for action in Action::iter().filter(|action| self.considers(*action)) {
                for path in rules::legal_paths(board, tile, action) {
                    let score = self.evaluate(board, tile, piece, action, &path);
                    candidates.push(BotMove {
                        piece_tile: tile,
                        piece_id: piece.id.clone(),
                        action,
                        path,
                        score,
                    });
                }
            }
        }
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates.truncate(count);
        debug!(chosen = ?candidates.first(), "Bot decided");
        candidates
    }

    fn considers(&self, action: Action) -> bool {
        match self.difficulty {
            Difficulty::Easy => action == Action::Move,
            Difficulty::Medium | Difficulty::Hard => true,
        }
    }

    fn evaluate(&self, board: &Board, from: BoardTile, piece: &Piece, action: Action, path: &[BoardTile]) -> i32 {
        let Some(&end) = path.last() else {
            return i32::MIN;
        };
        let team = self.team;
        let advance = team.progress(end) - team.progress(from);
        let has_ball = board.holds_ball(from);
        let ball = board.ball.as_ref().map(|ball| ball.position);

        let mut score = match action {
            Action::Shoot => 1000,
            Action::Move if has_ball && Board::scoring_zone(team).contains(&end) => 2000,
            Action::Move if has_ball => 100 + 40 * advance,
            Action::Move if board.loose_ball() == Some(end) => 500,
            Action::Move => {
                // Attackers drift forward, everyone else stays compact.
                let drift = if piece.role == PieceRole::Attacker {
                    2 * advance
                } else {
                    advance
                };
                match ball {
                    Some(ball) => 20 - 3 * end.distance(ball) as i32 + drift,
                    None => drift,
                }
            }
            Action::Pass => {
                let receiver_bonus = match board.piece_at(end).map(|receiver| receiver.role) {
                    Some(PieceRole::Attacker) => 20,
                    _ => 0,
                };
                120 + 40 * advance + receiver_bonus
            }
            Action::Intercept => 600,
            Action::Kick => 10 + 5 * team.progress(end),
            Action::Defend => match board.ball_holder() {
                Some(holder) if board.team_at(holder) == team.opponent() => {
                    60 - 5 * end.distance(holder) as i32
                }
                _ => 5,
            },
            Action::Push if board.holds_ball(path[0]) => 550,
            Action::Push => 2,
        };

        if self.difficulty == Difficulty::Hard && carries_ball_to(action, has_ball) && exposed(board, end, team) {
            score -= 80;
        }
        score
    }
}

/// Whether the ball ends on `end` in the hands of the acting side.
fn carries_ball_to(action: Action, has_ball: bool) -> bool {
    matches!(action, Action::Pass) || (action == Action::Move && has_ball)
}

/// Whether an opponent stands next to `tile`.
fn exposed(board: &Board, tile: BoardTile, team: Team) -> bool {
    board
        .pieces()
        .any(|(other, piece)| piece.team == team.opponent() && other.is_adjacent(tile))
}
