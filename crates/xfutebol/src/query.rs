//! Read-only queries.
//!
//! Everything is computed from the live session on each call; nothing is
//! cached, so a kickoff reset is visible to the very next query. A missing
//! session or piece yields the empty value of each query.

use tracing::{debug, instrument, warn};
use xfutebol_engine::{Action, Bot, GameMatch};

use crate::convert::tiles_to_path;
use crate::error::ConversionError;
use crate::service::GameService;
use crate::types::{
    ActionKind, BoardView, Difficulty, OpponentProposal, PieceView, Position, PositionPath, Team,
};

impl GameService {
    /// Board snapshot.
    #[instrument(skip(self))]
    pub fn get_board(&self, session_id: &str) -> Option<BoardView> {
        self.store
            .with_session(session_id, |session| board_view(session.game()))?
            .map_err(|e| warn!(session_id, error = %e, "Board could not be converted"))
            .ok()
    }

    /// Legal paths for a piece and action kind, regardless of whose turn it is.
    #[instrument(skip(self))]
    pub fn legal_targets(&self, session_id: &str, piece_id: &str, kind: ActionKind) -> Vec<PositionPath> {
        self.store
            .with_session(session_id, |session| {
                let game = session.game();
                let Some((tile, _)) = game.piece_by_id(piece_id) else {
                    debug!(piece_id, "Piece not on board");
                    return Vec::new();
                };
                game.legal_paths(tile, Action::from(kind))
                    .iter()
                    .map(|path| PositionPath {
                        positions: tiles_to_path(path),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Destinations a piece may move to.
    pub fn get_legal_moves(&self, session_id: &str, piece_id: &str) -> Vec<Position> {
        self.legal_targets(session_id, piece_id, ActionKind::Move)
            .into_iter()
            .filter_map(|path| path.positions.last().copied())
            .collect()
    }

    /// Legal pass paths.
    pub fn get_legal_passes(&self, session_id: &str, piece_id: &str) -> Vec<PositionPath> {
        self.legal_targets(session_id, piece_id, ActionKind::Pass)
    }

    /// Legal shot paths.
    pub fn get_legal_shoots(&self, session_id: &str, piece_id: &str) -> Vec<PositionPath> {
        self.legal_targets(session_id, piece_id, ActionKind::Shoot)
    }

    /// Legal intercepts.
    pub fn get_legal_intercepts(&self, session_id: &str, piece_id: &str) -> Vec<PositionPath> {
        self.legal_targets(session_id, piece_id, ActionKind::Intercept)
    }

    /// Legal kick paths.
    pub fn get_legal_kicks(&self, session_id: &str, piece_id: &str) -> Vec<PositionPath> {
        self.legal_targets(session_id, piece_id, ActionKind::Kick)
    }

    /// Legal defend paths.
    pub fn get_legal_defends(&self, session_id: &str, piece_id: &str) -> Vec<PositionPath> {
        self.legal_targets(session_id, piece_id, ActionKind::Defend)
    }

    /// Legal pushes as `[target, destination]` pairs.
    pub fn get_legal_pushes(&self, session_id: &str, piece_id: &str) -> Vec<PositionPath> {
        self.legal_targets(session_id, piece_id, ActionKind::Push)
    }

    /// Whether the match has ended; `false` for a missing session.
    pub fn is_over(&self, session_id: &str) -> bool {
        self.store
            .with_session(session_id, |session| session.game().is_over())
            .unwrap_or(false)
    }

    /// Winner of a finished match.
    pub fn winner(&self, session_id: &str) -> Option<Team> {
        self.store
            .with_session(session_id, |session| session.game().winner())
            .flatten()
            .and_then(|team| Team::try_from(team).ok())
    }

    /// Side on the move.
    pub fn current_turn(&self, session_id: &str) -> Option<Team> {
        self.store
            .with_session(session_id, |session| session.game().current_turn())
            .and_then(|team| Team::try_from(team).ok())
    }

    /// Actions left for the side on the move.
    pub fn actions_remaining(&self, session_id: &str) -> Option<u8> {
        self.store
            .with_session(session_id, |session| session.game().actions_remaining())
    }

    /// What the built-in decision policy would play next for the side on the move.
    #[instrument(skip(self))]
    pub fn get_opponent_action(&self, session_id: &str, difficulty: Difficulty) -> Option<OpponentProposal> {
        self.store
            .with_session(session_id, |session| {
                let game = session.game();
                let bot = Bot::new(game.current_turn(), difficulty.into());
                bot.choose_actions(game, 1).into_iter().next()
            })
            .flatten()
            .map(|choice| OpponentProposal {
                piece_id: choice.piece_id,
                kind: choice.action.into(),
                path: tiles_to_path(&choice.path),
            })
    }
}

/// Converts the engine state into a snapshot.
pub fn board_view(game: &GameMatch) -> Result<BoardView, ConversionError> {
    let board = game.board();
    let pieces = board
        .pieces()
        .map(|(tile, piece)| {
            Ok(PieceView {
                id: piece.id.clone(),
                team: Team::try_from(piece.team)?,
                role: piece.role.into(),
                position: tile.into(),
                has_ball: board.holds_ball(tile),
            })
        })
        .collect::<Result<Vec<_>, ConversionError>>()?;
    let (white_score, black_score) = game.score();

    Ok(BoardView {
        pieces,
        ball_position: board.loose_ball().map(Position::from),
        current_turn: Team::try_from(game.current_turn())?,
        actions_remaining: game.actions_remaining(),
        white_score,
        black_score,
        turn_number: game.turn_number(),
    })
}
