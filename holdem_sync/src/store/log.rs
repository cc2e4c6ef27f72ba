//! Bounded, newest-first event log.

use chrono::{Local, NaiveTime};
use std::collections::VecDeque;

/// Maximum number of entries kept in the log.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Timestamped operator log, newest entry first.
///
/// This is an audit trail for the person at the keyboard, not game history.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    entries: VecDeque<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_LOG_ENTRIES + 1),
        }
    }

    /// Record a message stamped with the local wall-clock time.
    pub fn push(&mut self, message: &str) {
        self.push_at(Local::now().time(), message);
    }

    /// Record a message with an explicit timestamp.
    ///
    /// Inserts exactly one entry at the front and drops at most one from the
    /// tail.
    pub fn push_at(&mut self, time: NaiveTime, message: &str) {
        self.entries
            .push_front(format!("[{}] {}", time.format("%H:%M:%S"), message));
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_back();
        }
    }

    /// Most recent entry.
    pub fn latest(&self) -> Option<&str> {
        self.entries.front().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate newest to oldest.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
