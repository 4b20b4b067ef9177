mod backend;
mod error;
mod lines;

pub use backend::{resolve_backend_url, BackendClient, DEFAULT_BACKEND_URL};
pub use error::{ClientError, Result};
pub use lines::LineSplitter;
