//! Line rendering for logtint
//!
//! This crate turns parsed records into fixed-column, optionally colorized
//! output lines.

mod format;
mod palette;

pub use format::{Formatter, MAX_PID_WIDTH, MAX_TAG_WIDTH};
pub use palette::{BOLD, DIM, RESET, REVERSE, priority_style, tag_color};
