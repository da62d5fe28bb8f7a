//! CloudWatch Logs implementation of [`LogSink`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs::error::{DisplayErrorContext, SdkError};
use aws_sdk_cloudwatchlogs::types::InputLogEvent;
use aws_sdk_cloudwatchlogs::Client;
use tracing::debug;

use super::{InputEvent, LogSink, SinkError};

/// Log sink backed by the AWS CloudWatch Logs API.
#[derive(Debug, Clone)]
pub struct CloudWatchSink {
    client: Client,
}

impl CloudWatchSink {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS credential and region chain.
    pub async fn from_env() -> Self {
        let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
        debug!(region = ?config.region(), "loaded AWS configuration");
        Self::new(Client::new(&config))
    }
}

fn service_error<E, R>(operation: &'static str, err: &SdkError<E, R>) -> SinkError
where
    E: std::error::Error + 'static,
    R: std::fmt::Debug,
{
    SinkError::Service {
        operation,
        message: DisplayErrorContext(err).to_string(),
    }
}

#[async_trait]
impl LogSink for CloudWatchSink {
    async fn create_log_group(&self, group: &str) -> Result<(), SinkError> {
        match self
            .client
            .create_log_group()
            .log_group_name(group)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception()) =>
            {
                Err(SinkError::AlreadyExists {
                    resource: format!("log group {group}"),
                })
            }
            Err(err) => Err(service_error("CreateLogGroup", &err)),
        }
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), SinkError> {
        match self
            .client
            .create_log_stream()
            .log_group_name(group)
            .log_stream_name(stream)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_resource_already_exists_exception()) =>
            {
                Err(SinkError::AlreadyExists {
                    resource: format!("log stream {group}/{stream}"),
                })
            }
            Err(err) => Err(service_error("CreateLogStream", &err)),
        }
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<InputEvent>,
    ) -> Result<Option<String>, SinkError> {
        let log_events = events
            .into_iter()
            .map(|event| {
                InputLogEvent::builder()
                    .timestamp(event.timestamp_millis)
                    .message(event.message)
                    .build()
                    .map_err(|e| SinkError::Service {
                        operation: "PutLogEvents",
                        message: e.to_string(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .put_log_events()
            .log_group_name(group)
            .log_stream_name(stream)
            .set_log_events(Some(log_events))
            .send()
            .await
            .map_err(|err| service_error("PutLogEvents", &err))?;

        Ok(output.next_sequence_token().map(str::to_string))
    }

    async fn put_retention_policy(&self, group: &str, days: i32) -> Result<(), SinkError> {
        self.client
            .put_retention_policy()
            .log_group_name(group)
            .retention_in_days(days)
            .send()
            .await
            .map(|_| ())
            .map_err(|err| service_error("PutRetentionPolicy", &err))
    }
}
