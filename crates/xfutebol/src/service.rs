//! The produced interface: session lifecycle and match logging.
//!
//! Action dispatch lives in `dispatch` and read-only queries in `query`; all
//! three extend [`GameService`].

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{info, instrument, warn};
use xfutebol_engine::GameMatch;

use crate::error::LogExportError;
use crate::logger::{DEFAULT_EXPORT_RETENTION, LogEntry, LogSource};
use crate::store::SessionStore;
use crate::types::{GameModeType, SessionId};

/// Entry point for presentation layers, the CLI and tests.
///
/// Cheap to clone; clones share the same sessions.
#[derive(Debug, Clone)]
pub struct GameService {
    pub(crate) store: SessionStore,
    export_retention: usize,
}

impl GameService {
    /// Creates a service with no sessions.
    #[instrument]
    pub fn new() -> Self {
        Self::with_retention(DEFAULT_EXPORT_RETENTION)
    }

    /// Creates a service keeping at most `export_retention` exported logs per directory.
    #[instrument]
    pub fn with_retention(export_retention: usize) -> Self {
        Self {
            store: SessionStore::new(),
            export_retention,
        }
    }

    /// The underlying store.
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Starts a new match and returns its id.
    #[instrument(skip(self))]
    pub fn create_session(&self, mode: GameModeType) -> SessionId {
        let id = self.store.create(mode);
        info!(session_id = %id, %mode, "New game");
        id
    }

    /// Starts a session from an already built match, e.g. a custom position.
    #[instrument(skip(self, game))]
    pub fn adopt_match(&self, mode: GameModeType, game: GameMatch) -> SessionId {
        self.store.insert(mode, game)
    }

    /// Deletes a session; `true` if it existed.
    #[instrument(skip(self))]
    pub fn delete_session(&self, session_id: &str) -> bool {
        self.store.remove(session_id)
    }

    /// Whether a session exists.
    pub fn session_exists(&self, session_id: &str) -> bool {
        self.store.exists(session_id)
    }

    /// Ids of all live sessions.
    pub fn list_sessions(&self) -> Vec<SessionId> {
        self.store.list()
    }

    /// Records a presentation-layer event; `false` when the session is missing.
    #[instrument(skip(self, data))]
    pub fn log_event(&self, session_id: &str, event: &str, description: &str, data: Option<Value>) -> bool {
        self.store
            .with_session_mut(session_id, |session| {
                session.log_mut().log_external_event(event, description, data)
            })
            .is_some()
    }

    /// Records an event from an explicit source.
    pub(crate) fn log_from(
        &self,
        session_id: &str,
        source: LogSource,
        event: &str,
        description: &str,
        data: Option<Value>,
    ) {
        self.store.with_session_mut(session_id, |session| {
            session.log_mut().log_event(source, event, description, data)
        });
    }

    /// Records a failure attributed to `source`.
    pub(crate) fn log_error_from(&self, session_id: &str, source: LogSource, description: &str, error: Option<String>) {
        self.store.with_session_mut(session_id, |session| {
            session.log_mut().log_error_from(source, description, error)
        });
    }

    /// Mirrors new engine records into the log; the count appended, `None` when missing.
    #[instrument(skip(self))]
    pub fn sync_log(&self, session_id: &str) -> Option<usize> {
        self.store.with_session_mut(session_id, |session| session.sync_log())
    }

    /// Snapshot of the log entries.
    pub fn log_entries(&self, session_id: &str) -> Option<Vec<LogEntry>> {
        self.store
            .with_session(session_id, |session| session.log().entries().clone())
    }

    /// The log as text, after mirroring pending engine records.
    #[instrument(skip(self))]
    pub fn export_log(&self, session_id: &str) -> Option<String> {
        self.store.with_session_mut(session_id, |session| {
            session.sync_log();
            session.log().export_to_text()
        })
    }

    /// Writes the log into `dir`; `None` when the session is missing.
    #[instrument(skip(self, dir), fields(dir = %dir.as_ref().display()))]
    pub fn export_log_to_file(
        &self,
        session_id: &str,
        dir: impl AsRef<Path>,
    ) -> Option<Result<PathBuf, LogExportError>> {
        let retention = self.export_retention;
        let result = self.store.with_session_mut(session_id, |session| {
            session.sync_log();
            session.log_mut().export_to_file(dir.as_ref(), retention)
        });
        if let Some(Err(e)) = &result {
            warn!(session_id, error = %e, "Log export failed");
        }
        result
    }
}

impl Default for GameService {
    fn default() -> Self {
        Self::new()
    }
}
