use sentinel_stream::ProgressSink;
use std::io::{self, Write};

/// Single-slot status line on stderr.
///
/// Each backend progress message overwrites the previous one with a
/// carriage return; `clear` wipes the slot before results (or an error)
/// are printed.
pub struct StderrStatus {
    last_width: usize,
}

impl StderrStatus {
    pub fn new() -> Self {
        Self { last_width: 0 }
    }

    pub fn clear(&mut self) {
        if self.last_width > 0 {
            eprint!("\r{}\r", " ".repeat(self.last_width));
            let _ = io::stderr().flush();
            self.last_width = 0;
        }
    }
}

impl Default for StderrStatus {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSink for StderrStatus {
    fn status(&mut self, msg: &str) {
        let width = msg.chars().count();
        let pad = self.last_width.saturating_sub(width);
        eprint!("\r{msg}{}", " ".repeat(pad));
        let _ = io::stderr().flush();
        self.last_width = width;
    }
}
