//! Ordered console log owned by the isolation host.

use chrono::{DateTime, Utc};
use playground_sandbox::{ConsoleLevel, ConsoleMessage, LogKind};
use serde::{Deserialize, Serialize};

/// One relayed console event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Insertion order. Monotonic for the lifetime of the log, across clears.
    pub sequence: u64,
    pub kind: LogKind,
    /// Console entry point that produced the entry.
    pub level: ConsoleLevel,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct ConsoleLog {
    entries: Vec<LogEntry>,
    next_sequence: u64,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: ConsoleMessage) -> &LogEntry {
        let entry = LogEntry {
            sequence: self.next_sequence,
            kind: message.log_type.kind(),
            level: message.log_type,
            text: message.content,
            timestamp: Utc::now(),
        };
        self.next_sequence += 1;
        self.entries.push(entry);
        // Just pushed.
        &self.entries[self.entries.len() - 1]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_of(&self, kind: LogKind) -> usize {
        self.entries.iter().filter(|e| e.kind == kind).count()
    }
}
