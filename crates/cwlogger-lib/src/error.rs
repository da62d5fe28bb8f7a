use thiserror::Error;

use crate::sink::SinkError;

/// Convenient result alias for the cwlogger library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Raised when a record is handled without a destination log group.
    #[error("log_group is required")]
    MissingLogGroup,

    /// Raised when a severity name cannot be parsed.
    #[error("unknown log level: {value}")]
    InvalidLevel { value: String },

    /// Raised when the encoded payload could not be serialized.
    #[error("failed to encode log payload: {0}")]
    Encode(#[from] serde_json::Error),

    /// Raised when the sink rejected the event submission.
    #[error("failed to put log events: {0}")]
    Submit(#[source] SinkError),
}
