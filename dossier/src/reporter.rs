//! Append-only status log surfaced to the user.

use chrono::{DateTime, Utc};

/// Severity tag on a log line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Error,
}

/// One human-readable line in the intake log.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub at: DateTime<Utc>,
    pub level: LogLevel,
    pub message: String,
}

/// Collects status lines for one intake session.
///
/// The log is append-only. Per-file progress and status live on the
/// descriptors and are a pure projection of their state; they are never
/// duplicated here.
#[derive(Debug, Default)]
pub struct StatusReporter {
    entries: Vec<LogEntry>,
}

impl StatusReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Info, message.into());
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(LogLevel::Error, message.into());
    }

    fn push(&mut self, level: LogLevel, message: String) {
        match level {
            LogLevel::Error => tracing::warn!(status = %message, "intake"),
            _ => tracing::info!(status = %message, "intake"),
        }
        self.entries.push(LogEntry {
            at: Utc::now(),
            level,
            message,
        });
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Number of entries at the given level.
    pub fn count(&self, level: LogLevel) -> usize {
        self.entries.iter().filter(|e| e.level == level).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_is_append_only_and_ordered() {
        let mut reporter = StatusReporter::new();
        reporter.info("one");
        reporter.error("two");
        reporter.success("three");

        let messages: Vec<_> = reporter.entries().iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["one", "two", "three"]);
        assert_eq!(reporter.count(LogLevel::Error), 1);
        assert_eq!(reporter.count(LogLevel::Success), 1);
    }
}
