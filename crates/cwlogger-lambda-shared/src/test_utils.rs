//! Test utilities for Lambda handler testing.
//!
//! Provides request fixtures, mock request IDs, and handlers backed by the
//! library's in-memory [`RecordingSink`].
//!
//! ```ignore
//! use cwlogger_lambda_shared::test_utils::{mock_request_id, recording_handler, warn_request};
//!
//! let (sink, handler) = recording_handler();
//! let response = handle_log_request(&handler, &warn_request("g1"), &mock_request_id("warn")).await;
//! assert_eq!(sink.put_calls(), 1);
//! ```

use std::sync::Arc;

use serde_json::json;

use cwlogger_lib::{Handler, HandlerConfig};

pub use cwlogger_lib::test_utils::{RecordingSink, SinkCall};

use crate::requests::{AttributeDto, LogRequest};

/// Create a mock request ID for testing.
///
/// `lambda_runtime::Context` is non-exhaustive, so tests that bypass the
/// runtime pass request IDs directly.
pub fn mock_request_id(suffix: &str) -> String {
    format!("test-request-{}", suffix)
}

/// Handler at the default (debug) threshold writing to a fresh recording sink.
pub fn recording_handler() -> (Arc<RecordingSink>, Handler) {
    recording_handler_with(RecordingSink::new())
}

/// Handler writing to the given, pre-configured recording sink.
pub fn recording_handler_with(sink: RecordingSink) -> (Arc<RecordingSink>, Handler) {
    let sink = Arc::new(sink);
    let handler = Handler::new(sink.clone(), HandlerConfig::default());
    (sink, handler)
}

/// The canonical "disk full" warning request for `log_group`.
pub fn warn_request(log_group: &str) -> LogRequest {
    LogRequest {
        log_group: log_group.to_string(),
        level: Some("warn".to_string()),
        message: "disk full".to_string(),
        attributes: vec![AttributeDto {
            key: "disk".to_string(),
            value: json!("/dev/sda1"),
        }],
        retention_days: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_request_id_formats_correctly() {
        assert_eq!(mock_request_id("123"), "test-request-123");
    }

    #[test]
    fn warn_request_matches_fixture() {
        let request = warn_request("g1");
        assert_eq!(request.log_group, "g1");
        assert_eq!(request.attributes.len(), 1);
    }
}
