// src/sys/logs.rs

use chrono::{DateTime, Utc};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Per-invocation step transcript. Entries are only ever appended, and the
/// rendered text is what the host engine shows next to the test step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionLog {
    entries: Vec<String>,
}

impl ExecutionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, message: impl AsRef<str>) {
        self.record_at(Utc::now(), message);
    }

    pub fn record_at(&mut self, at: DateTime<Utc>, message: impl AsRef<str>) {
        let message = message.as_ref();
        tracing::info!(step = self.entries.len(), "{}", message);
        self.entries
            .push(format!("{} - {}", at.format(TIMESTAMP_FORMAT), message));
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.entries.iter().any(|line| line.contains(needle))
    }

    /// Lines joined with the platform line separator.
    pub fn render(&self) -> String {
        let separator = if cfg!(windows) { "\r\n" } else { "\n" };
        self.entries.join(separator)
    }
}
