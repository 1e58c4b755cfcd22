//! Session storage.
//!
//! The map lock only guards bookkeeping: lookups clone the session's own
//! handle and release the map before any engine work. Each session then has
//! its own lock, held for the whole of one dispatched action, so actions on
//! one session are serialized while unrelated sessions run in parallel.

use std::collections::HashMap;
use std::sync::Arc;

use derive_getters::Getters;
use parking_lot::Mutex;
use serde_json::json;
use tracing::{debug, info, instrument};
use uuid::Uuid;
use xfutebol_engine::{GameMatch, MatchStatus, Team as EngineTeam};

use crate::logger::{LogSource, MatchLogger};
use crate::types::{GameModeType, SessionId};

/// One match and its log.
#[derive(Debug, Getters)]
pub struct Session {
    /// Session ID.
    id: SessionId,
    /// Mode the session was created with.
    mode: GameModeType,
    /// Engine state.
    game: GameMatch,
    /// Match log.
    log: MatchLogger,
}

impl Session {
    fn new(id: SessionId, mode: GameModeType, game: GameMatch) -> Self {
        let mut log = MatchLogger::new(id.clone(), mode);
        log.log_event(
            LogSource::System,
            "GAME_CREATED",
            "Session created",
            Some(json!({
                "mode": mode.to_string(),
                "turn": game.turn_number(),
                "current_turn": game.current_turn().to_string(),
            })),
        );
        Self {
            id,
            mode,
            game,
            log,
        }
    }

    /// Mutable engine state.
    pub fn game_mut(&mut self) -> &mut GameMatch {
        &mut self.game
    }

    /// Mutable match log.
    pub fn log_mut(&mut self) -> &mut MatchLogger {
        &mut self.log
    }

    /// Mirrors new engine records into the log.
    pub fn sync_log(&mut self) -> usize {
        self.log.sync_from_engine(&self.game)
    }
}

type SessionHandle = Arc<Mutex<Session>>;

/// Concurrent map of live sessions.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<SessionId, SessionHandle>>>,
}

impl SessionStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating session store");
        Self::default()
    }

    /// Starts a standard match in `mode` with White to move.
    #[instrument(skip(self))]
    pub fn create(&self, mode: GameModeType) -> SessionId {
        let mut game = GameMatch::standard(mode.into());
        game.start(EngineTeam::White);
        self.insert(mode, game)
    }

    /// Stores an already built match under a fresh id.
    ///
    /// A match that was never started is started with White to move.
    #[instrument(skip(self, game))]
    pub fn insert(&self, mode: GameModeType, mut game: GameMatch) -> SessionId {
        if game.status() == MatchStatus::NotStarted {
            game.start(EngineTeam::White);
        }
        let mut sessions = self.sessions.lock();
        let mut id = Uuid::new_v4().to_string();
        while sessions.contains_key(&id) {
            id = Uuid::new_v4().to_string();
        }
        sessions.insert(
            id.clone(),
            Arc::new(Mutex::new(Session::new(id.clone(), mode, game))),
        );
        info!(session_id = %id, %mode, total = sessions.len(), "Created session");
        id
    }

    /// Handle to a session, for the duration of one call.
    pub(crate) fn get(&self, id: &str) -> Option<SessionHandle> {
        let handle = self.sessions.lock().get(id).cloned();
        if handle.is_none() {
            debug!(session_id = id, "Session not found");
        }
        handle
    }

    /// Runs `f` against a session, `None` when it does not exist.
    pub fn with_session<R>(&self, id: &str, f: impl FnOnce(&Session) -> R) -> Option<R> {
        let handle = self.get(id)?;
        let session = handle.lock();
        Some(f(&session))
    }

    /// Runs `f` against a session mutably, `None` when it does not exist.
    pub fn with_session_mut<R>(&self, id: &str, f: impl FnOnce(&mut Session) -> R) -> Option<R> {
        let handle = self.get(id)?;
        let mut session = handle.lock();
        Some(f(&mut session))
    }

    /// Removes a session; `true` if it existed.
    #[instrument(skip(self))]
    pub fn remove(&self, id: &str) -> bool {
        let removed = self.sessions.lock().remove(id).is_some();
        if removed {
            info!(session_id = id, "Removed session");
        } else {
            debug!(session_id = id, "Nothing to remove");
        }
        removed
    }

    /// Whether a session exists.
    pub fn exists(&self, id: &str) -> bool {
        self.sessions.lock().contains_key(id)
    }

    /// Ids of all live sessions.
    #[instrument(skip(self))]
    pub fn list(&self) -> Vec<SessionId> {
        let ids: Vec<_> = self.sessions.lock().keys().cloned().collect();
        debug!(count = ids.len(), "Listed sessions");
        ids
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.lock().len()
    }

    /// Whether no session is live.
    pub fn is_empty(&self) -> bool {
        self.sessions.lock().is_empty()
    }
}
