//! Pre-identification record buffer
//!
//! While no process is tracked yet, records are held here instead of being
//! presented. Once identity is discovered the backlog is replayed in
//! arrival order and emptied; a process start discards it instead.

use logtint_types::Record;

#[derive(Default)]
pub struct Backlog {
    records: Vec<Record>,
}

impl Backlog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, rec: Record) {
        self.records.push(rec);
    }

    /// Take every buffered record, in arrival order, leaving the backlog
    /// empty. Used for replay.
    pub fn drain(&mut self) -> Vec<Record> {
        std::mem::take(&mut self.records)
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
