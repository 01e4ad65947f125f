// ── Bounded debug log ──
//
// In-memory observability sink rendered by the Log screen. Entries are
// also mirrored to `tracing` so the log file carries the same trail.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Maximum retained entries; the oldest is dropped beyond this.
pub const MAX_LOG_ENTRIES: usize = 100;

/// Severity of a debug-log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warning,
    Error,
    Success,
}

impl LogLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Success => "SUCCESS",
        }
    }
}

/// One timestamped entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Bounded log, newest entry first.
#[derive(Debug, Clone, Default)]
pub struct DebugLog {
    entries: VecDeque<LogEntry>,
}

impl DebugLog {
    /// Prepend an entry, dropping the oldest past [`MAX_LOG_ENTRIES`].
    pub fn push(&mut self, level: LogLevel, message: impl Into<String>) {
        let message = message.into();
        match level {
            LogLevel::Error | LogLevel::Warning => {
                tracing::warn!(target: "hashwatch::poll", "{message}");
            }
            LogLevel::Info | LogLevel::Success => {
                tracing::debug!(target: "hashwatch::poll", "{message}");
            }
        }

        self.entries.push_front(LogEntry {
            timestamp: Utc::now(),
            level,
            message,
        });
        if self.entries.len() > MAX_LOG_ENTRIES {
            self.entries.pop_back();
        }
    }

    /// Entries newest-first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn to_vec(&self) -> Vec<LogEntry> {
        self.entries.iter().cloned().collect()
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
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_entry_first() {
        let mut log = DebugLog::default();
        log.push(LogLevel::Info, "first");
        log.push(LogLevel::Error, "second");
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second", "first"]);
    }

    #[test]
    fn drops_oldest_past_capacity() {
        let mut log = DebugLog::default();
        for i in 0..(MAX_LOG_ENTRIES + 5) {
            log.push(LogLevel::Info, format!("entry {i}"));
        }
        assert_eq!(log.len(), MAX_LOG_ENTRIES);
        // Newest survives at the front, entry 5 is now the oldest.
        assert_eq!(
            log.entries().next().map(|e| e.message.as_str()),
            Some("entry 104")
        );
        assert_eq!(
            log.entries().last().map(|e| e.message.as_str()),
            Some("entry 5")
        );
    }
}
