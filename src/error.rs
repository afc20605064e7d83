//! Error types for the attendance engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure an attendance operation can report. All of them are
//! recoverable by the caller; none is fatal to the process.

use thiserror::Error;
use uuid::Uuid;

use crate::models::EntryStatus;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/engine.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/engine.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Input was malformed or would break an entry invariant.
    #[error("Validation failed: {message}")]
    Validation {
        /// A description of what was invalid.
        message: String,
    },

    /// The requested transition is not permitted from the entry's current state.
    #[error("Entry {entry_id} cannot move from '{current}' to '{requested}'")]
    InvalidState {
        /// The entry the transition was attempted on.
        entry_id: Uuid,
        /// The state the entry is currently in.
        current: EntryStatus,
        /// The state the caller asked for.
        requested: EntryStatus,
    },

    /// A break operation is not permitted in the break's current state.
    #[error("Break {break_id}: {message}")]
    InvalidBreakState {
        /// The break involved.
        break_id: Uuid,
        /// A description of the violation.
        message: String,
    },

    /// The user already has an open entry.
    #[error("User '{user_id}' is already clocked in (entry {entry_id})")]
    Conflict {
        /// The user that attempted to clock in.
        user_id: String,
        /// The entry that is still open.
        entry_id: Uuid,
    },

    /// No entry exists with the given id.
    #[error("Time entry not found: {entry_id}")]
    EntryNotFound {
        /// The id that was looked up.
        entry_id: Uuid,
    },

    /// The break does not exist on the given entry.
    #[error("Break {break_id} not found on entry {entry_id}")]
    BreakNotFound {
        /// The entry that was searched.
        entry_id: Uuid,
        /// The break id that was looked up.
        break_id: Uuid,
    },

    /// The storage collaborator failed.
    #[error("Storage error: {message}")]
    Storage {
        /// The underlying failure.
        message: String,
    },

    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or held invalid values.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed input.
    Validation,
    /// Operation not permitted in the current lifecycle state.
    InvalidState,
    /// Uniqueness invariant would be violated.
    Conflict,
    /// Referenced entry or break does not exist.
    NotFound,
    /// Storage collaborator failure.
    Storage,
    /// Engine configuration problem.
    Config,
}

impl EngineError {
    /// Shorthand for a [`EngineError::Validation`] error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Shorthand for a [`EngineError::Storage`] error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Validation { .. } => ErrorKind::Validation,
            EngineError::InvalidState { .. } | EngineError::InvalidBreakState { .. } => {
                ErrorKind::InvalidState
            }
            EngineError::Conflict { .. } => ErrorKind::Conflict,
            EngineError::EntryNotFound { .. } | EngineError::BreakNotFound { .. } => {
                ErrorKind::NotFound
            }
            EngineError::Storage { .. } => ErrorKind::Storage,
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ErrorKind::Config
            }
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
