use serde::Serialize;
use std::fmt;

/// One newline-delimited record read from the input stream.
///
/// The text is kept exactly as read, trailing `\n` included when present.
/// `index` is the zero-based position of the line in the input order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Line {
    index: u64,
    text: String,
}

impl Line {
    pub fn new(index: u64, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Returned by `Dispatcher::run` once the source reaches end-of-stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DispatchReport {
    pub lines_dispatched: u64,
    /// Units still running when the loop returned; nothing waited for them.
    pub live_at_return: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UnitStats {
    pub started: u64,
    pub completed: u64,
    pub failed: u64,
    pub panicked: u64,
    pub live: usize,
}

impl UnitStats {
    pub fn finished(&self) -> u64 {
        self.completed + self.failed + self.panicked
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    Drained,
    TimedOut { abandoned: usize },
}
