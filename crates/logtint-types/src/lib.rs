//! Shared types for logtint
//!
//! This crate contains the data model used across the logtint crates.

mod error;

pub use error::{Error, Result};

// ============================================================================
// Log Record Types
// ============================================================================

/// Log priority, one letter per logcat convention
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Priority {
    Verbose,
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Priority {
    /// Parse the single-letter priority used by every logcat layout
    pub fn from_letter(c: char) -> Option<Self> {
        match c {
            'V' => Some(Self::Verbose),
            'D' => Some(Self::Debug),
            'I' => Some(Self::Info),
            'W' => Some(Self::Warn),
            'E' => Some(Self::Error),
            'F' => Some(Self::Fatal),
            _ => None,
        }
    }

    /// Single-letter display form
    pub fn as_letter(&self) -> char {
        match self {
            Self::Verbose => 'V',
            Self::Debug => 'D',
            Self::Info => 'I',
            Self::Warn => 'W',
            Self::Error => 'E',
            Self::Fatal => 'F',
        }
    }
}

/// One parsed log record, immutable once built
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Record {
    /// Timestamp as printed by the source (empty when the layout has none)
    pub time: String,

    /// Emitting process id
    pub pid: u32,

    /// Emitting thread id; equals `pid` when the layout carries no thread
    pub tid: u32,

    /// Log priority
    pub priority: Priority,

    /// Free-text source label attached by the emitter
    pub tag: String,

    /// Message text (can be empty)
    pub text: String,
}

impl Record {
    /// Grouping identity: consecutive records sharing this key form a burst
    pub fn group_key(&self) -> GroupKey {
        GroupKey {
            pid: self.pid,
            priority: self.priority,
            tag: self.tag.clone(),
        }
    }
}

/// Identity of a contiguous burst of records
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GroupKey {
    pub pid: u32,
    pub priority: Priority,
    pub tag: String,
}
