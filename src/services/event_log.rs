use chrono::{DateTime, Local, Timelike};
use serde::Serialize;

/// One human-readable line of the job trail.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

impl LogEntry {
    /// `YYYY-MM-DD HH:MM:SS.cc`, centisecond precision.
    pub fn formatted_time(&self) -> String {
        let centis = self.timestamp.nanosecond() % 1_000_000_000 / 10_000_000;
        format!("{}.{:02}", self.timestamp.format("%Y-%m-%d %H:%M:%S"), centis)
    }
}

impl std::fmt::Display for LogEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.formatted_time(), self.message)
    }
}

/// Append-only trail of job events, kept in generation order.
///
/// Not bounded and not deduplicated; only [`EventLog::clear`] shrinks it.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    entries: Vec<LogEntry>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, message: impl Into<String>) {
        let entry = LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        };
        tracing::info!(event = %entry.message, "job event");
        self.entries.push(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
