//! Bounded, ordered store of captured diagnostics.

use livepen_types::{DiagnosticEntry, DiagnosticKind};
use std::collections::VecDeque;

/// An append-only diagnostic feed with hysteresis eviction.
///
/// Once the log grows past `threshold` entries, the oldest entries are
/// dropped until only `retain` remain.
#[derive(Debug, Clone)]
pub struct DiagnosticLog {
    entries: VecDeque<DiagnosticEntry>,
    threshold: usize,
    retain: usize,
}

impl DiagnosticLog {
    pub fn new(threshold: usize, retain: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            threshold,
            retain: retain.min(threshold),
        }
    }

    /// Appends an entry and returns how many old entries were evicted.
    pub fn push(&mut self, entry: DiagnosticEntry) -> usize {
        self.entries.push_back(entry);
        if self.entries.len() <= self.threshold {
            return 0;
        }
        let evicted = self.entries.len() - self.retain;
        self.entries.drain(..evicted);
        evicted
    }

    /// Appends a new entry stamped with the current time.
    pub fn append(&mut self, kind: DiagnosticKind, args: Vec<String>) -> usize {
        self.push(DiagnosticEntry::now(kind, args))
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    pub fn retain(&self) -> usize {
        self.retain
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &DiagnosticEntry> {
        self.entries.iter()
    }

    /// A cloned, ordered snapshot of the log.
    pub fn to_vec(&self) -> Vec<DiagnosticEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for DiagnosticLog {
    fn default() -> Self {
        Self::new(100, 50)
    }
}
