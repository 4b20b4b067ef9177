use sentinel_stream::StreamError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ClientError>;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Stream(#[from] StreamError),
}
