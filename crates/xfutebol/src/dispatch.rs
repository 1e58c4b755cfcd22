//! Action dispatch.
//!
//! All seven action kinds go through two generic executors. Each looks up
//! the session and the piece, converts the caller's positions, then hands
//! the engine mutator it was given the piece's tile and the converted
//! arguments. Engine rejections come back as failed outcomes; only lookup
//! and conversion problems are [`DispatchError`]s, and the public operations
//! fold those into failed outcomes too. Both kinds land in the match log as
//! `REJECTED` entries without an error field.

use serde_json::json;
use tracing::{debug, info, instrument, warn};
use xfutebol_engine::{ActionOutcome as EngineOutcome, BoardTile, GameError, GameMatch};

use crate::convert::path_to_tiles;
use crate::error::{DispatchError, DispatchErrorKind};
use crate::logger::LogSource;
use crate::service::GameService;
use crate::store::Session;
use crate::types::{ActionKind, ActionOutcome, Position};

impl GameService {
    /// Moves a piece to `to`.
    pub fn execute_move(&self, session_id: &str, piece_id: &str, to: Position) -> ActionOutcome {
        self.execute_path_action(session_id, piece_id, ActionKind::Move, &[to], |game, from, path| {
            match path.as_slice() {
                [to] => game.perform_move(from, *to),
                _ => Err(GameError::IllegalPath {
                    action: xfutebol_engine::Action::Move,
                }),
            }
        })
    }

    /// Passes along `path`, ending on the receiver.
    pub fn execute_pass(&self, session_id: &str, piece_id: &str, path: &[Position]) -> ActionOutcome {
        self.execute_path_action(session_id, piece_id, ActionKind::Pass, path, GameMatch::perform_pass)
    }

    /// Shoots along `path`.
    pub fn execute_shoot(&self, session_id: &str, piece_id: &str, path: &[Position]) -> ActionOutcome {
        self.execute_path_action(session_id, piece_id, ActionKind::Shoot, path, GameMatch::perform_shoot)
    }

    /// Wins the ball at the single position in `path`.
    pub fn execute_intercept(&self, session_id: &str, piece_id: &str, path: &[Position]) -> ActionOutcome {
        self.execute_path_action(
            session_id,
            piece_id,
            ActionKind::Intercept,
            path,
            GameMatch::perform_intercept,
        )
    }

    /// Clears the ball along `path`.
    pub fn execute_kick(&self, session_id: &str, piece_id: &str, path: &[Position]) -> ActionOutcome {
        self.execute_path_action(session_id, piece_id, ActionKind::Kick, path, GameMatch::perform_kick)
    }

    /// Steps along `path` to mark an opponent.
    pub fn execute_defend(&self, session_id: &str, piece_id: &str, path: &[Position]) -> ActionOutcome {
        self.execute_path_action(session_id, piece_id, ActionKind::Defend, path, GameMatch::perform_defend)
    }

    /// Pushes the opponent on `target` to `destination`.
    pub fn execute_push(
        &self,
        session_id: &str,
        piece_id: &str,
        target: Position,
        destination: Position,
    ) -> ActionOutcome {
        self.execute_two_position_action(
            session_id,
            piece_id,
            ActionKind::Push,
            target,
            destination,
            GameMatch::perform_push,
        )
    }

    /// Dispatches any action kind from a path.
    ///
    /// Move takes a one-position path and push a `[target, destination]` pair.
    #[instrument(skip(self, path), fields(path_len = path.len()))]
    pub fn execute(&self, session_id: &str, piece_id: &str, kind: ActionKind, path: &[Position]) -> ActionOutcome {
        match kind {
            ActionKind::Move => match path {
                [to] => self.execute_move(session_id, piece_id, *to),
                _ => self.reject_shape(session_id, piece_id, kind, arity(1, path.len())),
            },
            ActionKind::Pass => self.execute_pass(session_id, piece_id, path),
            ActionKind::Shoot => self.execute_shoot(session_id, piece_id, path),
            ActionKind::Intercept => self.execute_intercept(session_id, piece_id, path),
            ActionKind::Kick => self.execute_kick(session_id, piece_id, path),
            ActionKind::Defend => self.execute_defend(session_id, piece_id, path),
            ActionKind::Push => match path {
                [target, destination] => self.execute_push(session_id, piece_id, *target, *destination),
                _ => self.reject_shape(session_id, piece_id, kind, arity(2, path.len())),
            },
        }
    }

    /// Executor for actions described by a path of one or more positions.
    #[instrument(skip(self, path, mutator), fields(path_len = path.len()))]
    pub fn execute_path_action<F>(
        &self,
        session_id: &str,
        piece_id: &str,
        kind: ActionKind,
        path: &[Position],
        mutator: F,
    ) -> ActionOutcome
    where
        F: FnOnce(&mut GameMatch, BoardTile, Vec<BoardTile>) -> Result<EngineOutcome, GameError>,
    {
        let result = self.dispatch(session_id, piece_id, kind, |game, from| {
            if path.is_empty() {
                return Err(DispatchError::new(DispatchErrorKind::EmptyPath));
            }
            let tiles = path_to_tiles(path)?;
            Ok(mutator(game, from, tiles))
        });
        self.settle(session_id, kind, result)
    }

    /// Executor for actions described by exactly two positions.
    #[instrument(skip(self, mutator))]
    pub fn execute_two_position_action<F>(
        &self,
        session_id: &str,
        piece_id: &str,
        kind: ActionKind,
        first: Position,
        second: Position,
        mutator: F,
    ) -> ActionOutcome
    where
        F: FnOnce(&mut GameMatch, BoardTile, BoardTile, BoardTile) -> Result<EngineOutcome, GameError>,
    {
        let result = self.dispatch(session_id, piece_id, kind, |game, from| {
            let first = BoardTile::try_from(first)?;
            let second = BoardTile::try_from(second)?;
            Ok(mutator(game, from, first, second))
        });
        self.settle(session_id, kind, result)
    }

    /// Steps shared by both executors. The session lock is held from lookup
    /// until the log is updated.
    fn dispatch<F>(
        &self,
        session_id: &str,
        piece_id: &str,
        kind: ActionKind,
        invoke: F,
    ) -> Result<ActionOutcome, DispatchError>
    where
        F: FnOnce(&mut GameMatch, BoardTile) -> Result<Result<EngineOutcome, GameError>, DispatchError>,
    {
        let handle = self
            .store
            .get(session_id)
            .ok_or_else(|| DispatchError::new(DispatchErrorKind::SessionNotFound(session_id.to_string())))?;
        let mut session = handle.lock();

        let result = run_on_session(&mut session, piece_id, kind, invoke);
        match &result {
            Ok(outcome) if outcome.success => {
                session.sync_log();
            }
            Ok(outcome) => log_rejection(&mut session, LogSource::Engine, piece_id, kind, &outcome.message),
            Err(e) => match &e.kind {
                DispatchErrorKind::UnmappedOutcome(_) => {
                    session.sync_log();
                    session.log_mut().log_error(
                        &format!("{} for {} ran but its outcome could not be reported", kind, piece_id),
                        Some(e.kind.to_string()),
                    );
                }
                other => log_rejection(&mut session, LogSource::System, piece_id, kind, &other.to_string()),
            },
        }
        result
    }

    /// Folds dispatch errors into a failed outcome.
    fn settle(&self, session_id: &str, kind: ActionKind, result: Result<ActionOutcome, DispatchError>) -> ActionOutcome {
        match result {
            Ok(outcome) => outcome,
            Err(e) => self.reject(session_id, kind, e),
        }
    }

    /// Records a malformed request that never reached the executors.
    fn reject_shape(&self, session_id: &str, piece_id: &str, kind: ActionKind, error: DispatchError) -> ActionOutcome {
        self.store.with_session_mut(session_id, |session| {
            log_rejection(session, LogSource::System, piece_id, kind, &error.kind.to_string())
        });
        self.reject(session_id, kind, error)
    }

    fn reject(&self, session_id: &str, kind: ActionKind, error: DispatchError) -> ActionOutcome {
        warn!(session_id, %kind, error = %error, "Dispatch failed");
        let remaining = self.actions_remaining(session_id).unwrap_or(0);
        ActionOutcome::failure(error.user_message(), remaining)
    }
}

fn run_on_session<F>(
    session: &mut Session,
    piece_id: &str,
    kind: ActionKind,
    invoke: F,
) -> Result<ActionOutcome, DispatchError>
where
    F: FnOnce(&mut GameMatch, BoardTile) -> Result<Result<EngineOutcome, GameError>, DispatchError>,
{
    let game = session.game_mut();
    let Some((from, _)) = game.piece_by_id(piece_id) else {
        debug!(piece_id, "Piece not on board");
        return Err(DispatchError::new(DispatchErrorKind::PieceNotFound(piece_id.to_string())));
    };
    let remaining = game.actions_remaining();

    match invoke(game, from)? {
        Ok(raw) => {
            let outcome = ActionOutcome::try_from(&raw)
                .map_err(|e| DispatchError::new(DispatchErrorKind::UnmappedOutcome(e)))?;
            info!(
                piece_id,
                %kind,
                goal = ?outcome.goal_scored,
                turn_ended = outcome.turn_ended,
                game_over = outcome.game_over,
                "Action executed"
            );
            Ok(outcome)
        }
        Err(rejection) => {
            warn!(piece_id, %kind, reason = %rejection, "Engine rejected action");
            Ok(ActionOutcome::failure(rejection.to_string(), remaining))
        }
    }
}

/// Rejections are ordinary outcomes, so they carry no error field.
fn log_rejection(session: &mut Session, source: LogSource, piece_id: &str, kind: ActionKind, reason: &str) {
    session.log_mut().log_event(
        source,
        "REJECTED",
        reason,
        Some(json!({ "piece_id": piece_id, "action": kind.to_string() })),
    );
}

#[track_caller]
fn arity(expected: usize, actual: usize) -> DispatchError {
    DispatchError::new(DispatchErrorKind::WrongArity { expected, actual })
}
