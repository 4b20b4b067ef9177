use crate::error::{Result, StreamError};
use sentinel_protocol::{ResultPayload, StreamEvent};

/// Receiver for transient progress messages.
///
/// This is a single-slot status display, not an accumulating log: each
/// message replaces the previous one.
pub trait ProgressSink {
    fn status(&mut self, msg: &str);
}

/// Sink that discards progress messages.
pub struct NullSink;

impl ProgressSink for NullSink {
    fn status(&mut self, _msg: &str) {}
}

/// Whether the consumer wants more lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Done,
}

enum Outcome {
    Result(Box<ResultPayload>),
    Upstream(String),
}

/// Push-based consumer of the newline-delimited analysis event stream.
///
/// Drive it with [`StreamConsumer::push_line`] until it reports
/// [`Control::Done`] (or the channel closes), then call
/// [`StreamConsumer::finish`] for the terminal outcome. Being push-based
/// keeps it independent of the transport: the HTTP client feeds it decoded
/// chunks, tests feed it plain strings.
pub struct StreamConsumer {
    outcome: Option<Outcome>,
}

impl StreamConsumer {
    pub fn new() -> Self {
        Self { outcome: None }
    }

    /// Processes one raw line.
    ///
    /// Blank lines (keep-alives) are skipped. A line that does not decode to
    /// a known event is a [`StreamError::Protocol`]; the progress slot is
    /// left untouched in that case. Once a terminal event has been seen,
    /// further lines are ignored and `Done` is returned without side effects.
    pub fn push_line(&mut self, line: &str, sink: &mut dyn ProgressSink) -> Result<Control> {
        if self.outcome.is_some() {
            return Ok(Control::Done);
        }
        let line = line.trim();
        if line.is_empty() {
            return Ok(Control::Continue);
        }
        let event: StreamEvent =
            serde_json::from_str(line).map_err(|err| StreamError::protocol(line, err))?;
        match event {
            StreamEvent::Log { msg } => {
                log::debug!("backend: {msg}");
                sink.status(&msg);
                Ok(Control::Continue)
            }
            StreamEvent::Error { msg } => {
                self.outcome = Some(Outcome::Upstream(msg));
                Ok(Control::Done)
            }
            StreamEvent::Result { data } => {
                self.outcome = Some(Outcome::Result(Box::new(data)));
                Ok(Control::Done)
            }
        }
    }

    /// Resolves the terminal outcome once the caller stops feeding lines.
    pub fn finish(self) -> Result<ResultPayload> {
        match self.outcome {
            Some(Outcome::Result(data)) => Ok(*data),
            Some(Outcome::Upstream(msg)) => Err(StreamError::Upstream(msg)),
            None => Err(StreamError::Incomplete),
        }
    }
}

impl Default for StreamConsumer {
    fn default() -> Self {
        Self::new()
    }
}

/// Drains an in-memory sequence of lines to its terminal outcome.
pub fn consume_lines<I, S>(lines: I, sink: &mut dyn ProgressSink) -> Result<ResultPayload>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut consumer = StreamConsumer::new();
    for line in lines {
        if consumer.push_line(line.as_ref(), sink)? == Control::Done {
            break;
        }
    }
    consumer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Sink that records every message and exposes the latest one, mirroring
    /// how the status display actually behaves.
    #[derive(Default)]
    struct RecordingSink {
        messages: Vec<String>,
    }

    impl RecordingSink {
        fn latest(&self) -> Option<&str> {
            self.messages.last().map(String::as_str)
        }
    }

    impl ProgressSink for RecordingSink {
        fn status(&mut self, msg: &str) {
            self.messages.push(msg.to_string());
        }
    }

    fn result_line(scraped: &str) -> String {
        format!(r#"{{"type":"result","data":{{"scraped_content":"{scraped}"}}}}"#)
    }

    #[test]
    fn logs_then_result_yields_payload_and_last_status() {
        let mut sink = RecordingSink::default();
        let lines = vec![
            r#"{"type":"log","msg":"A"}"#.to_string(),
            r#"{"type":"log","msg":"B"}"#.to_string(),
            result_line("body"),
        ];
        let payload = consume_lines(lines, &mut sink).expect("terminal result");
        assert_eq!(payload.scraped_content, "body");
        assert_eq!(sink.latest(), Some("B"));
        assert_eq!(sink.messages, vec!["A".to_string(), "B".to_string()]);
    }

    #[test]
    fn error_event_aborts_before_trailing_result() {
        let mut sink = RecordingSink::default();
        let lines = vec![
            r#"{"type":"log","msg":"A"}"#.to_string(),
            r#"{"type":"error","msg":"boom"}"#.to_string(),
            result_line("never read"),
        ];
        let err = consume_lines(lines, &mut sink).expect_err("upstream failure");
        match err {
            StreamError::Upstream(msg) => assert_eq!(msg, "boom"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn lines_after_terminal_event_have_no_side_effects() {
        let mut sink = RecordingSink::default();
        let mut consumer = StreamConsumer::new();
        let control = consumer
            .push_line(r#"{"type":"error","msg":"boom"}"#, &mut sink)
            .expect("valid line");
        assert_eq!(control, Control::Done);
        // A trailing log line must not reach the sink.
        let control = consumer
            .push_line(r#"{"type":"log","msg":"late"}"#, &mut sink)
            .expect("ignored line");
        assert_eq!(control, Control::Done);
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn empty_channel_is_incomplete() {
        let mut sink = NullSink;
        let err = consume_lines(Vec::<String>::new(), &mut sink).expect_err("no terminal event");
        assert!(matches!(err, StreamError::Incomplete));
    }

    #[test]
    fn malformed_line_is_protocol_error() {
        let mut sink = RecordingSink::default();
        let lines = vec!["not json at all".to_string()];
        let err = consume_lines(lines, &mut sink).expect_err("protocol violation");
        match err {
            StreamError::Protocol { line, .. } => assert_eq!(line, "not json at all"),
            other => panic!("unexpected error: {other}"),
        }
        assert!(sink.messages.is_empty());
    }

    #[test]
    fn unknown_tag_is_protocol_error() {
        let mut sink = NullSink;
        let lines = vec![r#"{"type":"heartbeat","msg":"hi"}"#.to_string()];
        let err = consume_lines(lines, &mut sink).expect_err("closed union");
        assert!(matches!(err, StreamError::Protocol { .. }));
    }

    #[test]
    fn blank_lines_are_skipped() {
        let mut sink = RecordingSink::default();
        let lines = vec!["".to_string(), "  ".to_string(), result_line("x")];
        let payload = consume_lines(lines, &mut sink).expect("terminal result");
        assert_eq!(payload.scraped_content, "x");
    }

    #[test]
    fn long_malformed_line_is_truncated_in_error() {
        let mut sink = NullSink;
        let long = "x".repeat(500);
        let err = consume_lines(vec![long], &mut sink).expect_err("protocol violation");
        match err {
            StreamError::Protocol { line, .. } => {
                assert!(line.len() < 200);
                assert!(line.ends_with("..."));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
