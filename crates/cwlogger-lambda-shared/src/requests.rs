//! Request types and validation for Lambda endpoints.

use serde::{Deserialize, Serialize};
use tracing::warn;

use cwlogger_lib::{Attr, Error as LibError, Level, LogRecord, SinkContext};

use crate::LogResponse;

/// Validation trait for Lambda request types.
pub trait Validate {
    /// Validate the request, returning the failure response to send if invalid.
    ///
    /// The `request_id` is only used to correlate the rejection in logs.
    fn validate(&self, request_id: &str) -> Result<(), LogResponse>;
}

/// A single key/value attribute as sent by callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDto {
    pub key: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// Request to write one log record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRequest {
    /// Destination log group. Required.
    #[serde(default)]
    pub log_group: String,

    /// Severity name; case-insensitive, unrecognized values mean `info`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,

    /// Log message text.
    #[serde(default)]
    pub message: String,

    /// Attributes attached to the record, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeDto>,

    /// Retention applied if this request creates the log group.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<i32>,
}

impl LogRequest {
    /// Resolved severity of the request.
    pub fn level(&self) -> Level {
        Level::from_request(self.level.as_deref())
    }

    /// Destination settings handed to the handler alongside the record.
    pub fn to_context(&self) -> SinkContext {
        SinkContext::new(self.log_group.clone()).with_retention_days(self.retention_days)
    }

    /// Build the record to submit, stamped with the current time.
    pub fn to_record(&self) -> LogRecord {
        LogRecord::new(self.level(), self.message.clone()).with_attrs(
            self.attributes
                .iter()
                .map(|attr| Attr::any(attr.key.clone(), attr.value.clone())),
        )
    }
}

impl Validate for LogRequest {
    fn validate(&self, request_id: &str) -> Result<(), LogResponse> {
        if self.log_group.trim().is_empty() {
            warn!(request_id = %request_id, "rejecting request without log_group");
            return Err(LogResponse::failure(LibError::MissingLogGroup.to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_minimal_request() {
        let request: LogRequest =
            serde_json::from_value(json!({"log_group": "g1", "message": "hi"})).unwrap();
        assert_eq!(request.log_group, "g1");
        assert_eq!(request.level(), Level::Info);
        assert!(request.attributes.is_empty());
        assert!(request.retention_days.is_none());
    }

    #[test]
    fn resolves_level_case_insensitively() {
        let request: LogRequest =
            serde_json::from_value(json!({"log_group": "g", "level": "WaRn", "message": ""}))
                .unwrap();
        assert_eq!(request.level(), Level::Warn);
    }

    #[test]
    fn unknown_level_defaults_to_info() {
        let request: LogRequest =
            serde_json::from_value(json!({"log_group": "g", "level": "trace", "message": ""}))
                .unwrap();
        assert_eq!(request.level(), Level::Info);
    }

    #[test]
    fn rejects_missing_log_group() {
        let request: LogRequest = serde_json::from_value(json!({"message": "hi"})).unwrap();
        let err = request.validate("test").unwrap_err();
        assert!(!err.success);
        assert_eq!(err.error.as_deref(), Some("log_group is required"));
    }

    #[test]
    fn rejects_blank_log_group() {
        let request = LogRequest {
            log_group: "   ".to_string(),
            ..LogRequest::default()
        };
        assert!(request.validate("test").is_err());
    }

    #[test]
    fn context_carries_group_and_retention() {
        let request = LogRequest {
            log_group: "g1".to_string(),
            retention_days: Some(14),
            ..LogRequest::default()
        };
        let ctx = request.to_context();
        assert_eq!(ctx.log_group, "g1");
        assert_eq!(ctx.retention_days, Some(14));
    }

    #[test]
    fn record_keeps_attribute_order() {
        let request: LogRequest = serde_json::from_value(json!({
            "log_group": "g1",
            "level": "error",
            "message": "failed",
            "attributes": [
                {"key": "b", "value": 2},
                {"key": "a", "value": {"nested": true}},
                {"key": "c"}
            ]
        }))
        .unwrap();

        let record = request.to_record();
        assert_eq!(record.level, Level::Error);
        assert_eq!(record.message, "failed");
        let keys: Vec<_> = record.attrs.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
