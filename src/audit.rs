//! JSONL audit logging for openclaw-snitch
//!
//! Records every hook-mode decision to a JSONL file for later analysis.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::input::HookEvent;
use crate::output::HookOutput;

/// Log level for audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Allowed,
    Blocked,
    Injected,
    Flagged,
    Error,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    pub timestamp: DateTime<Utc>,

    pub level: LogLevel,

    /// Host event name
    pub event: &'static str,

    /// Blocklist terms that matched (if any)
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_terms: Vec<String>,

    /// Summary of the input
    pub input_summary: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_key: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from an event and the response sent back
    pub fn new(event: &HookEvent, output: &HookOutput, matched_terms: Vec<String>) -> Self {
        let level = match event {
            HookEvent::BeforeToolCall(_) if output.is_block() => LogLevel::Blocked,
            HookEvent::BeforeToolCall(_) => LogLevel::Allowed,
            HookEvent::AgentBootstrap(_) if !output.bootstrap_files.is_empty() => {
                LogLevel::Injected
            }
            HookEvent::MessageReceived(_) if !output.messages.is_empty() => LogLevel::Flagged,
            _ => LogLevel::Allowed,
        };

        Self {
            timestamp: Utc::now(),
            level,
            event: event.name(),
            matched_terms,
            input_summary: event.summary(),
            reason: output.block.as_ref().map(|b| b.block_reason.clone()),
            session_key: event.session_key().map(String::from),
        }
    }

    /// Entry for input that could not be parsed at all
    pub fn parse_error(raw: &str, error: &str) -> Self {
        Self {
            timestamp: Utc::now(),
            level: LogLevel::Error,
            event: "unknown",
            matched_terms: Vec::new(),
            input_summary: raw.chars().take(100).collect(),
            reason: Some(error.to_string()),
            session_key: None,
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger; `None` or an unopenable path disables it
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            // Ensure parent directory exists
            if let Some(parent) = p.parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            match OpenOptions::new().create(true).append(true).open(p) {
                Ok(file) => Some(BufWriter::new(file)),
                Err(e) => {
                    tracing::warn!(path = %p.display(), error = %e, "audit log disabled");
                    None
                }
            }
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log a decision
    pub fn log_decision(
        &mut self,
        event: &HookEvent,
        output: &HookOutput,
        matched_terms: Vec<String>,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(event, output, matched_terms);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
