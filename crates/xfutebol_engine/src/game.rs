//! Match state and the seven action mutators.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::board::Board;
use crate::error::GameError;
use crate::rules;
use crate::tile::BoardTile;
use crate::types::{Action, Piece, Team};

/// Actions each side gets per turn.
pub const ACTIONS_PER_TURN: u8 = 2;

/// Ending rules of a match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMode {
    /// Display name.
    pub name: String,
    /// Turn limit, `None` for unlimited.
    pub max_turns: Option<u32>,
    /// First goal ends the match.
    pub golden_goal: bool,
    /// Actions per turn.
    pub actions_per_turn: u8,
}

impl GameMode {
    /// Ten turns.
    pub fn quick_match() -> Self {
        Self {
            name: "Quick Match".to_string(),
            max_turns: Some(10),
            golden_goal: false,
            actions_per_turn: ACTIONS_PER_TURN,
        }
    }

    /// Twenty turns.
    pub fn standard_match() -> Self {
        Self {
            name: "Standard Match".to_string(),
            max_turns: Some(20),
            golden_goal: false,
            actions_per_turn: ACTIONS_PER_TURN,
        }
    }

    /// No turn limit; the first goal wins.
    pub fn golden_goal() -> Self {
        Self {
            name: "Golden Goal".to_string(),
            max_turns: None,
            golden_goal: true,
            actions_per_turn: ACTIONS_PER_TURN,
        }
    }
}

/// Lifecycle of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchStatus {
    /// Built but not started.
    NotStarted,
    /// Accepting actions.
    InProgress,
    /// Over; `None` is a draw.
    Finished {
        /// Winning team.
        winner: Option<Team>,
    },
}

/// What a successful action did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    /// The action performed.
    pub action: Action,
    /// The acting side's turn is over.
    pub turn_ended: bool,
    /// Team that scored with this action.
    pub goal_scored: Option<Team>,
    /// The match ended with this action.
    pub game_over: bool,
    /// Winner when the match ended.
    pub winner: Option<Team>,
    /// Actions the acting side has left this turn.
    pub actions_remaining: u8,
    /// The board was reset for a kickoff.
    pub kickoff_reset: bool,
}

/// One entry of the match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    /// 1-based position in the history.
    pub sequence: u32,
    /// Turn the action was played in.
    pub turn_number: u32,
    /// Acting team.
    pub team: Team,
    /// Acting piece.
    pub piece_id: String,
    /// Action kind.
    pub action: Action,
    /// Path as executed.
    pub path: Vec<BoardTile>,
    /// Scorer, if the action produced a goal.
    pub goal_scored: Option<Team>,
    /// `(white, black)` after the action.
    pub score: (u8, u8),
    /// The board was reset for a kickoff afterwards.
    pub kickoff_reset: bool,
}

/// A match between White and Black.
#[derive(Debug, Clone)]
pub struct GameMatch {
    mode: GameMode,
    board: Board,
    status: MatchStatus,
    current_turn: Team,
    actions_remaining: u8,
    score: (u8, u8),
    turn_number: u32,
    history: Vec<ActionRecord>,
}

impl GameMatch {
    /// A match on the standard formation, White kicking off.
    #[instrument]
    pub fn standard(mode: GameMode) -> Self {
        Self::with_board(mode, Board::standard(Team::White))
    }

    /// A match on a custom board.
    #[instrument(skip(board))]
    pub fn with_board(mode: GameMode, board: Board) -> Self {
        Self {
            mode,
            board,
            status: MatchStatus::NotStarted,
            current_turn: Team::White,
            actions_remaining: 0,
            score: (0, 0),
            turn_number: 0,
            history: Vec::new(),
        }
    }

    /// Starts the match with `first` on the move.
    #[instrument(skip(self))]
    pub fn start(&mut self, first: Team) {
        info!(mode = %self.mode.name, ?first, "Match started");
        self.status = MatchStatus::InProgress;
        self.current_turn = first;
        self.actions_remaining = self.mode.actions_per_turn;
        self.turn_number = 1;
    }

    /// The board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Ending rules.
    pub fn mode(&self) -> &GameMode {
        &self.mode
    }

    /// Lifecycle status.
    pub fn status(&self) -> MatchStatus {
        self.status
    }

    /// Side on the move.
    pub fn current_turn(&self) -> Team {
        self.current_turn
    }

    /// Actions left for the side on the move.
    pub fn actions_remaining(&self) -> u8 {
        self.actions_remaining
    }

    /// `(white, black)` goals.
    pub fn score(&self) -> (u8, u8) {
        self.score
    }

    /// Current turn, starting at 1.
    pub fn turn_number(&self) -> u32 {
        self.turn_number
    }

    /// Whether the match has ended.
    pub fn is_over(&self) -> bool {
        matches!(self.status, MatchStatus::Finished { .. })
    }

    /// Winner of a finished match.
    pub fn winner(&self) -> Option<Team> {
        match self.status {
            MatchStatus::Finished { winner } => winner,
            MatchStatus::NotStarted | MatchStatus::InProgress => None,
        }
    }

    /// Every action played so far, oldest first.
    pub fn action_log(&self) -> &[ActionRecord] {
        &self.history
    }

    /// `(id, tile, piece)` for every piece.
    pub fn all_pieces(&self) -> Vec<(String, BoardTile, Piece)> {
        self.board
            .pieces()
            .map(|(tile, piece)| (piece.id.clone(), tile, piece.clone()))
            .collect()
    }

    /// Finds a piece by id.
    pub fn piece_by_id(&self, id: &str) -> Option<(BoardTile, Piece)> {
        self.board
            .find_piece(id)
            .map(|(tile, piece)| (tile, piece.clone()))
    }

    /// Id of the piece holding the ball.
    pub fn ball_holder(&self) -> Option<String> {
        self.board
            .ball
            .as_ref()
            .and_then(|ball| ball.possession.clone())
    }

    /// Legal paths for the piece on `from`.
    pub fn legal_paths(&self, from: BoardTile, action: Action) -> Vec<Vec<BoardTile>> {
        rules::legal_paths(&self.board, from, action)
    }

    /// Legal move destinations for the piece on `from`.
    pub fn legal_moves(&self, from: BoardTile) -> Vec<BoardTile> {
        self.legal_paths(from, Action::Move)
            .into_iter()
            .filter_map(|path| path.last().copied())
            .collect()
    }

    /// Moves the piece on `from` to `to`.
    pub fn perform_move(&mut self, from: BoardTile, to: BoardTile) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Move, vec![to])
    }

    /// Passes along `path`, which ends on the receiver.
    pub fn perform_pass(&mut self, from: BoardTile, path: Vec<BoardTile>) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Pass, path)
    }

    /// Shoots along `path`, which ends in the goal mouth.
    pub fn perform_shoot(&mut self, from: BoardTile, path: Vec<BoardTile>) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Shoot, path)
    }

    /// Wins the ball on the single tile in `path`.
    pub fn perform_intercept(&mut self, from: BoardTile, path: Vec<BoardTile>) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Intercept, path)
    }

    /// Clears the ball along `path`.
    pub fn perform_kick(&mut self, from: BoardTile, path: Vec<BoardTile>) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Kick, path)
    }

    /// Steps along `path` to mark an opponent.
    pub fn perform_defend(&mut self, from: BoardTile, path: Vec<BoardTile>) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Defend, path)
    }

    /// Pushes the opponent on `target` to `destination`.
    pub fn perform_push(
        &mut self,
        from: BoardTile,
        target: BoardTile,
        destination: BoardTile,
    ) -> Result<ActionOutcome, GameError> {
        self.perform(from, Action::Push, vec![target, destination])
    }

    #[instrument(skip(self, path), fields(turn = self.turn_number))]
    fn perform(
        &mut self,
        from: BoardTile,
        action: Action,
        path: Vec<BoardTile>,
    ) -> Result<ActionOutcome, GameError> {
        match self.status {
            MatchStatus::NotStarted => return Err(GameError::NotStarted),
            MatchStatus::Finished { .. } => return Err(GameError::GameOver),
            MatchStatus::InProgress => {}
        }
        let piece = self
            .board
            .piece_at(from)
            .cloned()
            .ok_or(GameError::NoPieceAt(from))?;
        if piece.team != self.current_turn {
            return Err(GameError::NotYourTurn(self.current_turn));
        }
        let has_ball = self.board.holds_ball(from);
        match action {
            Action::Pass | Action::Shoot | Action::Kick if !has_ball => {
                return Err(GameError::BallRequired(action));
            }
            Action::Intercept | Action::Defend if has_ball => {
                return Err(GameError::BallNotAllowed(action));
            }
            _ => {}
        }
        if !rules::legal_paths(&self.board, from, action).contains(&path) {
            warn!(piece = %piece.id, %action, "Rejected illegal path");
            return Err(GameError::IllegalPath { action });
        }

        let turn_number = self.turn_number;
        self.apply(from, action, &path)?;
        let outcome = self.settle(action);

        self.history.push(ActionRecord {
            sequence: self.history.len() as u32 + 1,
            turn_number,
            team: piece.team,
            piece_id: piece.id.clone(),
            action,
            path,
            goal_scored: outcome.goal_scored,
            score: self.score,
            kickoff_reset: outcome.kickoff_reset,
        });
        debug!(piece = %piece.id, %action, ?outcome, "Action performed");
        Ok(outcome)
    }

    /// Changes the board for an already validated action.
    fn apply(&mut self, from: BoardTile, action: Action, path: &[BoardTile]) -> Result<(), GameError> {
        let Some(&end) = path.last() else {
            return Err(GameError::IllegalPath { action });
        };
        match action {
            Action::Move | Action::Defend => self.board.relocate(from, end),
            Action::Intercept if self.board.is_free(end) => self.board.relocate(from, end),
            Action::Intercept => self.board.give_ball(from),
            Action::Pass => self.board.give_ball(end),
            Action::Shoot | Action::Kick => {
                self.board.drop_ball(end);
                Ok(())
            }
            Action::Push => {
                let target = path[0];
                if self.board.holds_ball(target) {
                    self.board.drop_ball(target);
                }
                self.board.relocate(target, end)
            }
        }
    }

    /// Applies goal, budget and ending rules after an action.
    fn settle(&mut self, action: Action) -> ActionOutcome {
        let mut outcome = ActionOutcome {
            action,
            turn_ended: false,
            goal_scored: self.board.goal_scored(),
            game_over: false,
            winner: None,
            actions_remaining: 0,
            kickoff_reset: false,
        };

        if let Some(scorer) = outcome.goal_scored {
            match scorer {
                Team::White => self.score.0 += 1,
                Team::Black => self.score.1 += 1,
                Team::Neutral => {}
            }
            info!(?scorer, score = ?self.score, "Goal");
            outcome.turn_ended = true;
            if self.mode.golden_goal {
                self.finish(Some(scorer));
            } else {
                let conceding = scorer.opponent();
                self.board = Board::standard(conceding);
                outcome.kickoff_reset = true;
                self.next_turn(conceding);
            }
        } else {
            self.actions_remaining = self.actions_remaining.saturating_sub(1);
            if self.actions_remaining == 0 {
                outcome.turn_ended = true;
                self.next_turn(self.current_turn.opponent());
            } else {
                outcome.actions_remaining = self.actions_remaining;
            }
        }

        outcome.game_over = self.is_over();
        outcome.winner = self.winner();
        outcome
    }

    fn next_turn(&mut self, next: Team) {
        if let Some(limit) = self.mode.max_turns
            && self.turn_number >= limit
        {
            let (white, black) = self.score;
            let winner = match white.cmp(&black) {
                std::cmp::Ordering::Greater => Some(Team::White),
                std::cmp::Ordering::Less => Some(Team::Black),
                std::cmp::Ordering::Equal => None,
            };
            self.finish(winner);
            return;
        }
        self.current_turn = next;
        self.actions_remaining = self.mode.actions_per_turn;
        self.turn_number += 1;
    }

    fn finish(&mut self, winner: Option<Team>) {
        info!(?winner, score = ?self.score, "Match finished");
        self.status = MatchStatus::Finished { winner };
        self.actions_remaining = 0;
    }
}
