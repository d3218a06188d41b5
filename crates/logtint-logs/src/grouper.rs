//! Burst grouping
//!
//! Batches consecutive records sharing (pid, priority, tag) into a group
//! and decides per group whether to reveal or drop it. Within a group,
//! visibility only ever goes from hidden to shown; once shown, every
//! buffered line is released and later lines flush immediately.

use logtint_types::GroupKey;

/// Groups rendered lines by burst identity and gates their release
pub struct Grouper {
    key: Option<GroupKey>,
    lines: Vec<String>,
    show: bool,
}

impl Grouper {
    pub fn new() -> Self {
        Self {
            key: None,
            lines: Vec::new(),
            show: false,
        }
    }

    /// Feed one rendered line. Returns the lines to emit now, in order:
    /// empty while the group stays hidden, the whole buffered burst plus
    /// this line the moment it becomes visible, and just this line while
    /// the group remains visible.
    pub fn push(&mut self, key: GroupKey, line: String, visible: bool) -> Vec<String> {
        if self.key.as_ref() != Some(&key) {
            // A hidden group's pending lines are discarded at the
            // transition; a visible group has nothing pending.
            self.key = Some(key);
            self.lines.clear();
            self.show = false;
        }
        if visible {
            self.show = true;
        }
        if self.show {
            let mut out = std::mem::take(&mut self.lines);
            out.push(line);
            out
        } else {
            self.lines.push(line);
            Vec::new()
        }
    }
}

impl Default for Grouper {
    fn default() -> Self {
        Self::new()
    }
}
