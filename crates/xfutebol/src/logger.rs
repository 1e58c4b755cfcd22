//! Per-session match log.
//!
//! Entries come from two directions: events reported by whoever drives the
//! session (UI clicks, opponent proposals, lifecycle) and the engine's own
//! action history, mirrored in by [`MatchLogger::sync_from_engine`]. The log is
//! append-only and exports to a line-oriented text format:
//!
//! ```text
//! === XFUTEBOL MATCH LOG ===
//! session_id: 0b6f...
//! mode: quick-match
//! started_at: 2026-01-01T12:00:00.000Z
//! === EVENTS ===
//! [2026-01-01T12:00:00.120Z] ENGINE:MOVE {"piece_id":"WA01",...,"score":"0-0"}
//! === SUMMARY ===
//! duration_ms: 120
//! ...
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use derive_getters::Getters;
use serde::Serialize;
use serde_json::{Value, json};
use strum::IntoEnumIterator;
use tracing::{debug, info, instrument, warn};
use xfutebol_engine::{ActionRecord, GameMatch};

use crate::convert::tiles_to_path;
use crate::error::LogExportError;
use crate::types::{ActionKind, GameModeType, SessionId};

/// Number of exported files kept per directory.
pub const DEFAULT_EXPORT_RETENTION: usize = 10;

/// Prefix shared by every exported log file.
pub const EXPORT_PREFIX: &str = "xfutebol_";

/// Who produced a log entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogSource {
    /// Reported by the presentation layer.
    Ui,
    /// Mirrored from the engine's action history.
    Engine,
    /// The automated opponent.
    Bot,
    /// Session lifecycle and internal failures.
    System,
}

/// One log line.
#[derive(Debug, Clone, PartialEq, Serialize, Getters)]
pub struct LogEntry {
    /// Wall-clock time of the append, never earlier than the previous entry.
    timestamp: DateTime<Utc>,
    /// Producer.
    source: LogSource,
    /// Event name, e.g. `MOVE` or `HALTED`.
    event: String,
    /// Structured payload.
    data: Option<Value>,
    /// Error text for failure entries.
    error: Option<String>,
}

/// Append-only chronological log for one session.
#[derive(Debug, Clone, Getters)]
pub struct MatchLogger {
    session_id: SessionId,
    mode: GameModeType,
    started_at: DateTime<Utc>,
    entries: Vec<LogEntry>,
    /// Engine records mirrored so far.
    #[getter(skip)]
    synced: usize,
    /// Score after the last mirrored record.
    #[getter(skip)]
    last_score: (u8, u8),
    #[getter(skip)]
    exports: u32,
}

impl MatchLogger {
    /// Creates an empty log.
    #[instrument]
    pub fn new(session_id: SessionId, mode: GameModeType) -> Self {
        Self {
            session_id,
            mode,
            started_at: Utc::now(),
            entries: Vec::new(),
            synced: 0,
            last_score: (0, 0),
            exports: 0,
        }
    }

    /// Records an event reported by the presentation layer.
    pub fn log_external_event(&mut self, event: &str, description: &str, data: Option<Value>) {
        self.log_event(LogSource::Ui, event, description, data);
    }

    /// Records an event from any source; `description` is stored in the payload.
    pub fn log_event(&mut self, source: LogSource, event: &str, description: &str, data: Option<Value>) {
        let payload = with_description(description, data);
        self.append(source, event, Some(payload), None);
    }

    /// Mirrors one engine action record.
    pub fn log_engine_action(&mut self, record: &ActionRecord) {
        let (white, black) = record.score;
        let data = json!({
            "sequence": record.sequence,
            "turn": record.turn_number,
            "team": record.team.to_string(),
            "piece_id": record.piece_id,
            "path": tiles_to_path(&record.path),
            "score": format!("{}-{}", white, black),
            "goal": record.goal_scored.map(|team| team.to_string()),
            "kickoff_reset": record.kickoff_reset,
        });
        let event = ActionKind::from(record.action).to_string();
        self.append(LogSource::Engine, &event, Some(data), None);
        if let Some(scorer) = record.goal_scored {
            self.append(
                LogSource::Engine,
                "GOAL",
                Some(json!({ "team": scorer.to_string(), "score": format!("{}-{}", white, black) })),
                None,
            );
        }
        self.last_score = record.score;
    }

    /// Records a failure from the session machinery.
    pub fn log_error(&mut self, description: &str, error: Option<String>) {
        self.log_error_from(LogSource::System, description, error);
    }

    /// Records a failure attributed to `source`.
    pub fn log_error_from(&mut self, source: LogSource, description: &str, error: Option<String>) {
        let error = error.unwrap_or_else(|| description.to_string());
        self.append(
            source,
            "ERROR",
            Some(with_description(description, None)),
            Some(error),
        );
    }

    /// Mirrors engine records not yet in the log and returns how many were added.
    ///
    /// Compares counts only, so a second call without new engine actions adds nothing.
    #[instrument(skip(self, game), fields(session_id = %self.session_id))]
    pub fn sync_from_engine(&mut self, game: &GameMatch) -> usize {
        let records = game.action_log();
        if records.len() < self.synced {
            warn!(
                synced = self.synced,
                available = records.len(),
                "Engine history shorter than mirrored count"
            );
            return 0;
        }
        let fresh = &records[self.synced..];
        for record in fresh {
            self.log_engine_action(record);
        }
        self.synced = records.len();
        if !fresh.is_empty() {
            debug!(appended = fresh.len(), "Synced engine records");
        }
        fresh.len()
    }

    /// Number of entries that carry an error.
    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.error.is_some()).count()
    }

    /// Renders the full log as text.
    #[instrument(skip(self), fields(session_id = %self.session_id, entries = self.entries.len()))]
    pub fn export_to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("=== XFUTEBOL MATCH LOG ===\n");
        out.push_str(&format!("session_id: {}\n", self.session_id));
        out.push_str(&format!("mode: {}\n", self.mode));
        out.push_str(&format!("started_at: {}\n", stamp(self.started_at)));
        out.push_str("=== EVENTS ===\n");
        for entry in &self.entries {
            out.push_str(&format_entry(entry));
            out.push('\n');
        }

        let duration_ms = self
            .entries
            .last()
            .map(|entry| (entry.timestamp - self.started_at).num_milliseconds().max(0))
            .unwrap_or(0);
        out.push_str("=== SUMMARY ===\n");
        out.push_str(&format!("duration_ms: {}\n", duration_ms));
        out.push_str(&format!("entries: {}\n", self.entries.len()));
        for source in LogSource::iter() {
            let count = self.entries.iter().filter(|entry| entry.source == source).count();
            out.push_str(&format!("source.{}: {}\n", source, count));
        }
        out.push_str(&format!("errors: {}\n", self.error_count()));
        out.push_str(&format!(
            "final_score: {}-{}\n",
            self.last_score.0, self.last_score.1
        ));
        out
    }

    /// Writes the export into `dir` and prunes older exports beyond `retention`.
    ///
    /// Pruning is best-effort: failures are logged and the written path is
    /// still returned.
    #[instrument(skip(self, dir), fields(session_id = %self.session_id, dir = %dir.as_ref().display()))]
    pub fn export_to_file(&mut self, dir: impl AsRef<Path>, retention: usize) -> Result<PathBuf, LogExportError> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        self.exports += 1;
        let short_id: String = self.session_id.chars().take(8).collect();
        let file_name = format!(
            "{}{}_{}_{:03}.log",
            EXPORT_PREFIX,
            Utc::now().format("%Y%m%dT%H%M%S%3f"),
            short_id,
            self.exports
        );
        let path = dir.join(file_name);
        std::fs::write(&path, self.export_to_text())?;
        info!(path = %path.display(), "Exported match log");

        if let Err(e) = prune_exports(dir, retention.max(1)) {
            warn!(error = %e, "Failed to prune old exports");
            self.log_error("Failed to prune old log exports", Some(e.to_string()));
        }
        Ok(path)
    }

    fn append(&mut self, source: LogSource, event: &str, data: Option<Value>, error: Option<String>) {
        let now = Utc::now();
        let timestamp = match self.entries.last() {
            Some(last) if last.timestamp > now => last.timestamp,
            _ => now,
        };
        self.entries.push(LogEntry {
            timestamp,
            source,
            event: event.to_string(),
            data,
            error,
        });
    }
}

fn stamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `[timestamp] SOURCE:EVENT {data}` plus ` error="..."` for failures.
fn format_entry(entry: &LogEntry) -> String {
    let mut line = format!("[{}] {}:{}", stamp(entry.timestamp), entry.source, entry.event);
    if let Some(data) = &entry.data {
        line.push(' ');
        line.push_str(&data.to_string());
    }
    if let Some(error) = &entry.error {
        line.push_str(&format!(" error={}", Value::String(error.clone())));
    }
    line
}

fn with_description(description: &str, data: Option<Value>) -> Value {
    match data {
        Some(Value::Object(mut map)) => {
            map.insert("description".to_string(), Value::String(description.to_string()));
            Value::Object(map)
        }
        Some(other) => json!({ "description": description, "value": other }),
        None => json!({ "description": description }),
    }
}

/// Deletes the oldest `xfutebol_*.log` files so that at most `keep` remain.
fn prune_exports(dir: &Path, keep: usize) -> std::io::Result<usize> {
    let mut exports = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !(name.starts_with(EXPORT_PREFIX) && name.ends_with(".log")) {
            continue;
        }
        let modified = entry.metadata()?.modified()?;
        exports.push((modified, name, entry.path()));
    }
    if exports.len() <= keep {
        return Ok(0);
    }

    exports.sort();
    let excess = exports.len() - keep;
    for (_, _, path) in exports.iter().take(excess) {
        std::fs::remove_file(path)?;
        debug!(path = %path.display(), "Pruned old export");
    }
    Ok(excess)
}
