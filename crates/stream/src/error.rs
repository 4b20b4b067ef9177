use thiserror::Error;

pub type Result<T> = std::result::Result<T, StreamError>;

/// Request-level failures of the event stream.
///
/// Per-item anchoring problems are not represented here; those are absorbed
/// inside `sentinel-anchor` and never fail a request.
#[derive(Error, Debug)]
pub enum StreamError {
    /// A line that is not a well-formed event. The offending line is kept
    /// (truncated) for the error display.
    #[error("malformed event line {line:?}: {reason}")]
    Protocol { line: String, reason: String },

    /// The channel closed without ever producing a terminal event.
    #[error("stream closed before a terminal result or error event")]
    Incomplete,

    /// Explicit `error` event from the backend; the message is surfaced
    /// verbatim.
    #[error("{0}")]
    Upstream(String),
}

const MAX_REPORTED_LINE_CHARS: usize = 120;

impl StreamError {
    pub(crate) fn protocol(line: &str, reason: impl ToString) -> Self {
        let line = match line.char_indices().nth(MAX_REPORTED_LINE_CHARS) {
            Some((idx, _)) => format!("{}...", &line[..idx]),
            None => line.to_string(),
        };
        Self::Protocol {
            line,
            reason: reason.to_string(),
        }
    }
}
