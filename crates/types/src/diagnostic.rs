//! Captured console output from a preview document.

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity / channel of a captured diagnostic line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    Info,
    Warning,
    Error,
    /// Ordinary program output (`console.log`).
    Trace,
}

impl DiagnosticKind {
    /// Upper-case label shown in front of each console line.
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticKind::Info => "INFO",
            DiagnosticKind::Warning => "WARN",
            DiagnosticKind::Error => "ERROR",
            DiagnosticKind::Trace => "LOG",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One captured unit of program output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagnosticEntry {
    kind: DiagnosticKind,
    timestamp: DateTime<Utc>,
    message: Vec<String>,
}

impl DiagnosticEntry {
    pub fn new(kind: DiagnosticKind, timestamp: DateTime<Utc>, message: Vec<String>) -> Self {
        Self {
            kind,
            timestamp,
            message,
        }
    }

    /// Creates an entry stamped with the current time.
    pub fn now(kind: DiagnosticKind, message: Vec<String>) -> Self {
        Self::new(kind, Utc::now(), message)
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn message(&self) -> &[String] {
        &self.message
    }

    /// The arguments joined with single spaces.
    pub fn text(&self) -> String {
        self.message.join(" ")
    }

    /// Renders `[HH:MM:SS] KIND: args` using the local wall clock.
    pub fn render_line(&self) -> String {
        let local: DateTime<Local> = self.timestamp.with_timezone(&Local);
        format!(
            "[{}] {}: {}",
            local.format("%H:%M:%S"),
            self.kind.label(),
            self.text()
        )
    }
}
