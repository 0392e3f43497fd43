//! Console Log: lines received from the Preview Surface.
//!
//! Messages are appended in arrival order. There is no staleness check, so a
//! line posted by a preview that has since been replaced is still appended.

use jsxlive_protocol::ConsoleMessage;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsoleLog {
    lines: Vec<String>,
}

impl ConsoleLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Extracts the console line from a structured message, if it is one of ours.
pub fn parse_console_message(data: &serde_json::Value) -> Option<String> {
    let message = ConsoleMessage::deserialize(data).ok()?;
    message.is_from_preview().then_some(message.logs)
}
