//! AWS Lambda function writing one structured log record per invocation.
//!
//! The request names the destination log group, a level, a message, and
//! optional attributes and retention. The record goes through the
//! process-wide [`Handler`], so the group and stream are provisioned once per
//! Lambda instance and reused by later invocations.

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use tracing::{debug, error, info};

use cwlogger_lambda_shared::{
    get_runtime, init_runtime_from_env, init_tracing, LogRequest, LogResponse, TracingConfig,
    Validate,
};
use cwlogger_lib::{Delivery, Handler};

/// Entry point used by the Lambda runtime.
pub async fn run() -> Result<(), Error> {
    init_tracing(&TracingConfig::from_env());

    // Load AWS configuration and build the handler once (logs cold-start timing)
    let _handler = init_runtime_from_env().await;

    lambda_runtime::run(service_fn(handler)).await
}

/// Lambda handler invoked per request.
///
/// Request-level failures are reported in the response body, never as a
/// function error.
pub async fn handler(event: LambdaEvent<Value>) -> Result<LogResponse, Error> {
    let request_id = event.context.request_id.clone();

    let request: LogRequest = match serde_json::from_value(event.payload) {
        Ok(req) => req,
        Err(e) => {
            error!(request_id = %request_id, error = %e, "failed to parse request");
            return Ok(LogResponse::failure(format!("Invalid request: {}", e)));
        }
    };

    Ok(handle_log_request(get_runtime(), &request, &request_id).await)
}

/// Core handler logic separated for reuse in tests.
pub async fn handle_log_request(
    handler: &Handler,
    request: &LogRequest,
    request_id: &str,
) -> LogResponse {
    info!(
        request_id = %request_id,
        log_group = %request.log_group,
        level = %request.level(),
        attributes = request.attributes.len(),
        retention_days = ?request.retention_days,
        "handling log request"
    );

    if let Err(response) = request.validate(request_id) {
        return response;
    }

    let ctx = request.to_context();
    let record = request.to_record();

    match handler.log(&ctx, &record).await {
        Ok(Delivery::Submitted) => {
            info!(request_id = %request_id, log_group = %ctx.log_group, "log record written");
            LogResponse::success()
        }
        Ok(Delivery::Filtered) => {
            debug!(
                request_id = %request_id,
                level = %record.level,
                "log record below handler threshold"
            );
            LogResponse::success()
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "failed to write log record");
            LogResponse::failure(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cwlogger_lambda_shared::test_utils::{
        mock_request_id, recording_handler, recording_handler_with, warn_request, RecordingSink,
    };
    use cwlogger_lambda_shared::SUCCESS_MESSAGE;

    #[tokio::test]
    async fn writes_valid_request() {
        let (sink, handler) = recording_handler();

        let response =
            handle_log_request(&handler, &warn_request("g1"), &mock_request_id("ok")).await;

        assert!(response.success);
        assert_eq!(response.message.as_deref(), Some(SUCCESS_MESSAGE));
        assert_eq!(sink.put_calls(), 1);
    }

    #[tokio::test]
    async fn empty_log_group_is_rejected_without_sink_calls() {
        let (sink, handler) = recording_handler();
        let request = LogRequest {
            message: "orphan".to_string(),
            ..warn_request("")
        };

        let response = handle_log_request(&handler, &request, &mock_request_id("empty")).await;

        assert!(!response.success);
        assert_eq!(response.error.as_deref(), Some("log_group is required"));
        assert!(sink.calls().is_empty());
    }

    #[tokio::test]
    async fn submission_failure_becomes_error_response() {
        let (_, handler) = recording_handler_with(RecordingSink::new().failing_put());

        let response =
            handle_log_request(&handler, &warn_request("g1"), &mock_request_id("fail")).await;

        assert!(!response.success);
        assert!(response
            .error
            .as_deref()
            .is_some_and(|e| e.starts_with("failed to put log events")));
    }
}
