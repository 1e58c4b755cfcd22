//! Error types for the session core.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::types::SessionId;

/// A host value that has no engine counterpart, or the reverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum ConversionError {
    /// Row or column outside 0..=7.
    #[display("Position ({}, {}) is off the board", row, col)]
    OutOfRange {
        /// Requested row.
        row: u8,
        /// Requested column.
        col: u8,
    },
    /// The engine reported a team the host does not model.
    #[display("Engine team {} has no host counterpart", _0)]
    UnmappedTeam(#[error(not(source))] xfutebol_engine::Team),
}

/// Why a dispatch could not reach the engine.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DispatchErrorKind {
    /// No session with this id.
    #[display("Game not found")]
    SessionNotFound(SessionId),
    /// No piece with this id on the current board.
    #[display("Piece not found: {}", _0)]
    PieceNotFound(String),
    /// A path-shaped action arrived without positions.
    #[display("Path is empty")]
    EmptyPath,
    /// A two-position action arrived with the wrong arity.
    #[display("Expected {} positions, got {}", expected, actual)]
    WrongArity {
        /// Required positions.
        expected: usize,
        /// Supplied positions.
        actual: usize,
    },
    /// A coordinate could not be converted.
    #[display("{}", _0)]
    Conversion(ConversionError),
    /// The engine applied the action but reported a value the host does not model.
    #[display("Engine outcome could not be converted: {}", _0)]
    UnmappedOutcome(ConversionError),
}

/// Dispatch failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Dispatch error: {} at {}:{}", kind, file, line)]
pub struct DispatchError {
    /// What went wrong.
    #[error(not(source))]
    pub kind: DispatchErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DispatchError {
    /// Creates a new dispatch error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: DispatchErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Message shown to players, without location or internal ids.
    pub fn user_message(&self) -> String {
        match &self.kind {
            DispatchErrorKind::PieceNotFound(_) => "Piece not found".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<ConversionError> for DispatchError {
    #[track_caller]
    fn from(err: ConversionError) -> Self {
        Self::new(DispatchErrorKind::Conversion(err))
    }
}

/// Log export failure with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Log export error: {} at {}:{}", message, file, line)]
pub struct LogExportError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl LogExportError {
    /// Creates a new export error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

impl From<std::io::Error> for LogExportError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(format!("I/O error: {}", err))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
