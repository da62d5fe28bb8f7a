//! Response body returned by cwlogger Lambda functions.

use serde::{Deserialize, Serialize};

/// Message returned when a record was written.
pub const SUCCESS_MESSAGE: &str = "Log written successfully";

/// Outcome of a log request.
///
/// Exactly one of `message` (on success) or `error` (on failure) is set.
///
/// # Example
///
/// ```
/// use cwlogger_lambda_shared::LogResponse;
///
/// let response = LogResponse::failure("log_group is required");
/// let json = serde_json::to_string(&response).unwrap();
/// assert_eq!(json, r#"{"success":false,"error":"log_group is required"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogResponse {
    pub success: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogResponse {
    /// Successful response with the standard message.
    pub fn success() -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_string()),
            error: None,
        }
    }

    /// Failed response carrying `error`.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_serialization() {
        let json = serde_json::to_string(&LogResponse::success()).unwrap();
        assert_eq!(
            json,
            r#"{"success":true,"message":"Log written successfully"}"#
        );
    }

    #[test]
    fn test_failure_omits_message() {
        let response = LogResponse::failure("boom");
        assert!(!response.success);
        assert!(response.message.is_none());
        assert_eq!(response.error.as_deref(), Some("boom"));
    }
}
