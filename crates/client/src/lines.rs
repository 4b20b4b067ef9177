/// Reassembles `\n`-delimited lines from a stream of arbitrary byte chunks.
///
/// Network chunk boundaries do not respect event boundaries: one chunk may
/// carry several lines, or a line may arrive split across chunks. The
/// splitter buffers the trailing partial line between pushes.
#[derive(Default)]
pub struct LineSplitter {
    buf: Vec<u8>,
}

impl LineSplitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one chunk and returns every line completed by it, without the
    /// trailing `\n` (a `\r` before it is stripped too).
    pub fn push_chunk(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buf.extend_from_slice(chunk);
        let mut lines = Vec::new();
        while let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
            let mut line: Vec<u8> = self.buf.drain(..=pos).collect();
            line.pop();
            if line.last() == Some(&b'\r') {
                line.pop();
            }
            lines.push(String::from_utf8_lossy(&line).into_owned());
        }
        lines
    }

    /// Returns the unterminated final line, if any. A stream that closes
    /// without a trailing newline still delivered that last event.
    pub fn finish(self) -> Option<String> {
        if self.buf.is_empty() {
            None
        } else {
            Some(String::from_utf8_lossy(&self.buf).into_owned())
        }
    }
}
