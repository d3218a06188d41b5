//! Static ANSI palette
//!
//! Every escape sequence the renderer can emit is enumerated here at
//! compile time. Tag colors are stable across runs: the color is derived
//! from the first few bytes of the tag, so the same tag always renders the
//! same way.

use logtint_types::Priority;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const REVERSE: &str = "\x1b[7m";

/// Background-colored block style for each priority letter
pub const fn priority_style(priority: Priority) -> &'static str {
    match priority {
        Priority::Verbose => "\x1b[37;40m",
        Priority::Debug => "\x1b[30;44m",
        Priority::Info => "\x1b[30;42m",
        Priority::Warn => "\x1b[30;43m",
        Priority::Error => "\x1b[30;41m",
        Priority::Fatal => "\x1b[30;45m",
    }
}

/// Number of base terminal colors (red through white)
const NB_BASE_COLORS: usize = 7;

/// Tag palette: dim, normal, then bold variants of the seven base colors.
/// Indexed as `variant * NB_BASE_COLORS + base`.
const TAG_PALETTE: [&str; 3 * NB_BASE_COLORS] = [
    // Dim variants
    "\x1b[2;31m",
    "\x1b[2;32m",
    "\x1b[2;33m",
    "\x1b[2;34m",
    "\x1b[2;35m",
    "\x1b[2;36m",
    "\x1b[2;37m",
    // Normal variants
    "\x1b[31m",
    "\x1b[32m",
    "\x1b[33m",
    "\x1b[34m",
    "\x1b[35m",
    "\x1b[36m",
    "\x1b[37m",
    // Bold variants
    "\x1b[1;31m",
    "\x1b[1;32m",
    "\x1b[1;33m",
    "\x1b[1;34m",
    "\x1b[1;35m",
    "\x1b[1;36m",
    "\x1b[1;37m",
];

/// Pick a stable color for a tag, keyed by its first four bytes.
///
/// Tags of tracked applications skip the dim variants and may get bold
/// ones; other tags get dim or normal variants. An empty tag gets no color.
pub fn tag_color(tag: &str, tracked: bool) -> &'static str {
    if tag.is_empty() {
        return "";
    }
    let key = tag
        .as_bytes()
        .iter()
        .take(4)
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b));
    let mut idx = (key % (2 * NB_BASE_COLORS as u64)) as usize;
    if tracked {
        idx += NB_BASE_COLORS;
    }
    TAG_PALETTE[idx]
}
