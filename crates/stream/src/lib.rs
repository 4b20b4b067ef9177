mod consumer;
mod error;

pub use consumer::{consume_lines, Control, NullSink, ProgressSink, StreamConsumer};
pub use error::{Result, StreamError};
