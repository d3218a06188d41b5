//! Log processing for logtint
//!
//! This crate provides line parsing, process tracking, backlog buffering,
//! burst grouping, and the pipeline that drives them over an input stream.

mod backlog;
mod grouper;
mod parser;
mod pipeline;
mod tracker;

pub use backlog::Backlog;
pub use grouper::Grouper;
pub use parser::LineParser;
pub use pipeline::Pipeline;
pub use tracker::ProcessTracker;

// Re-export types used in our public API
pub use logtint_types::{Error, GroupKey, Priority, Record, Result};
