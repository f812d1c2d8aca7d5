//! Command results.

use std::fmt;

/// The result of running a command: ordered messages and ordered errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Output {
    messages: Vec<String>,
    errors: Vec<String>,
}

impl Output {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a success message.
    pub fn print(&mut self, message: impl fmt::Display) {
        self.messages.push(message.to_string());
    }

    /// Add an error.
    pub fn error(&mut self, err: impl fmt::Display) {
        self.errors.push(err.to_string());
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
