//! Error types shared across the logtint crates

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line matched none of the supported logcat layouts. Fatal by
    /// policy: misparsing log data silently is worse than stopping.
    #[error("unrecognized log line: {line:?}")]
    UnrecognizedLine { line: String },

    #[error("failed to spawn {command:?}: {reason}")]
    Spawn { command: String, reason: String },
}

impl Error {
    pub fn unrecognized_line(line: impl Into<String>) -> Self {
        Self::UnrecognizedLine { line: line.into() }
    }

    pub fn spawn(command: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Spawn {
            command: command.into(),
            reason: reason.into(),
        }
    }
}
