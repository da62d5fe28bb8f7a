//! The remote log sink the handler provisions resources in and submits to.
//!
//! [`LogSink`] is the seam between the pipeline and the service; the
//! production implementation is [`CloudWatchSink`].

mod cloudwatch;

use async_trait::async_trait;
use thiserror::Error;

pub use cloudwatch::CloudWatchSink;

/// A single event ready for submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputEvent {
    pub timestamp_millis: i64,
    pub message: String,
}

/// Errors reported by a [`LogSink`].
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The group or stream being created is already present.
    #[error("{resource} already exists")]
    AlreadyExists { resource: String },

    /// Any other failure reported by the service or transport.
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
}

impl SinkError {
    pub fn is_already_exists(&self) -> bool {
        matches!(self, SinkError::AlreadyExists { .. })
    }
}

/// Operations required from the remote log service.
#[async_trait]
pub trait LogSink: Send + Sync {
    async fn create_log_group(&self, group: &str) -> Result<(), SinkError>;

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), SinkError>;

    /// Submit events and return the service's continuation token, if any.
    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<InputEvent>,
    ) -> Result<Option<String>, SinkError>;

    async fn put_retention_policy(&self, group: &str, days: i32) -> Result<(), SinkError>;
}
