//! Echo channel leaf actions write user-visible text to.

use std::sync::Mutex;

pub trait Console: Send + Sync {
    fn echo(&self, text: &str);
}

/// Prints each message on stdout.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl Console for StdoutConsole {
    fn echo(&self, text: &str) {
        println!("{text}");
    }
}

/// Keeps messages in memory (shell transcript, tests).
#[derive(Debug, Default)]
pub struct BufferConsole {
    lines: Mutex<Vec<String>>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take everything echoed so far.
    pub fn drain(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(mut lines) => std::mem::take(&mut *lines),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Console for BufferConsole {
    fn echo(&self, text: &str) {
        match self.lines.lock() {
            Ok(mut lines) => lines.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
    }
}
