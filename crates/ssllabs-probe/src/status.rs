//! Monitoring status levels and the outcome of a single check.

use std::fmt;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Result level reported to the monitoring framework.
///
/// The discriminants are the process exit codes the framework expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Status {
    Ok = 0,
    Warning = 1,
    Critical = 2,
    Unknown = 3,
}

impl Status {
    pub fn exit_code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::Warning => "WARNING",
            Status::Critical => "CRITICAL",
            Status::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final result of a check run: exactly one of these is reported per run.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub status: Status,
    pub message: String,
    /// Full assessment document, dumped after the status line when present.
    pub details: Option<Value>,
}

impl CheckOutcome {
    pub fn new(status: Status, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// `"<LEVEL> - <message>"`.
    pub fn status_line(&self) -> String {
        format!("{} - {}", self.status, self.message)
    }

    /// Everything written to stdout: the status line, then the assessment
    /// document (sorted keys, four-space indent) if one is attached.
    pub fn render(&self) -> String {
        let mut out = self.status_line();
        out.push('\n');
        if let Some(details) = &self.details {
            out.push_str(&pretty_json(details));
            out.push('\n');
        }
        out
    }

    pub fn exit_code(&self) -> u8 {
        self.status.exit_code()
    }
}

fn pretty_json(value: &Value) -> String {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    match value.serialize(&mut ser) {
        Ok(()) => String::from_utf8(buf).unwrap_or_else(|_| value.to_string()),
        Err(_) => value.to_string(),
    }
}
