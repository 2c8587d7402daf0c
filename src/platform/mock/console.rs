//! Mock console and remote log sinks for testing

use core::cell::RefCell;
use core::fmt;
use std::string::{String, ToString};
use std::vec::Vec;

use brickpico_core::log::{ConsoleSink, LogPriority, RemoteSink};

/// Mock console
///
/// Keeps every printed line (and any unterminated output) for test
/// verification.
#[derive(Debug, Default)]
pub struct MockConsole {
    lines: RefCell<Vec<String>>,
    raw: RefCell<String>,
}

impl MockConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Printed lines, oldest first
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Output printed without a line terminator
    pub fn raw(&self) -> String {
        self.raw.borrow().clone()
    }

    pub fn clear(&self) {
        self.lines.borrow_mut().clear();
        self.raw.borrow_mut().clear();
    }
}

impl ConsoleSink for MockConsole {
    fn write_line(&self, args: fmt::Arguments<'_>) {
        self.lines.borrow_mut().push(args.to_string());
    }

    fn write(&self, args: fmt::Arguments<'_>) {
        self.raw.borrow_mut().push_str(&args.to_string());
    }
}

/// Mock remote (syslog) sink
#[derive(Debug, Default)]
pub struct MockRemote {
    sent: RefCell<Vec<(LogPriority, String)>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwarded messages, oldest first
    pub fn sent(&self) -> Vec<(LogPriority, String)> {
        self.sent.borrow().clone()
    }
}

impl RemoteSink for MockRemote {
    fn send(&self, priority: LogPriority, message: &str) {
        self.sent.borrow_mut().push((priority, message.to_string()));
    }
}
