//! The `put` subcommand: send one record through a [`Handler`].

use clap::Args;
use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error};

use cwlogger_lib::{Attr, Delivery, Error as LibError, Handler, Level, LogRecord, SinkContext};

/// Message printed when the record was written.
pub const SUCCESS_MESSAGE: &str = "Log written successfully";

#[derive(Args, Debug, Clone)]
pub struct PutArgs {
    /// Destination log group.
    #[arg(long = "log-group")]
    pub log_group: String,

    /// Severity: debug, info, warn or error. Unrecognized values mean info.
    #[arg(long)]
    pub level: Option<String>,

    /// Log message text.
    #[arg(long, default_value = "")]
    pub message: String,

    /// Attribute as `key=value`; the value is read as JSON when it parses.
    #[arg(long = "attr", value_parser = parse_attr)]
    pub attrs: Vec<Attr>,

    /// Retention applied if the log group is created by this call.
    #[arg(long = "retention-days")]
    pub retention_days: Option<i32>,
}

impl PutArgs {
    pub fn level(&self) -> Level {
        Level::from_request(self.level.as_deref())
    }

    /// Reject arguments that cannot be submitted anywhere.
    pub fn validate(&self) -> Result<(), LibError> {
        if self.log_group.trim().is_empty() {
            return Err(LibError::MissingLogGroup);
        }
        Ok(())
    }

    pub fn to_context(&self) -> SinkContext {
        SinkContext::new(self.log_group.clone()).with_retention_days(self.retention_days)
    }

    pub fn to_record(&self) -> LogRecord {
        LogRecord::new(self.level(), self.message.clone()).with_attrs(self.attrs.iter().cloned())
    }
}

/// JSON summary printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PutOutcome {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PutOutcome {
    pub fn success() -> Self {
        Self {
            success: true,
            message: Some(SUCCESS_MESSAGE.to_string()),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error.into()),
        }
    }
}

/// Parse a `key=value` attribute.
///
/// `count=3` yields a number and `ok=true` a boolean, while `disk=/dev/sda1`
/// stays a string.
pub fn parse_attr(raw: &str) -> Result<Attr, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got `{raw}`"))?;
    if key.is_empty() {
        return Err(format!("attribute key is empty in `{raw}`"));
    }

    let value =
        serde_json::from_str::<JsonValue>(value).unwrap_or_else(|_| JsonValue::from(value));
    Ok(Attr::any(key, value))
}

/// Submit already validated arguments.
pub async fn submit(handler: &Handler, args: &PutArgs) -> PutOutcome {
    match handler.log(&args.to_context(), &args.to_record()).await {
        Ok(Delivery::Submitted) => PutOutcome::success(),
        Ok(Delivery::Filtered) => {
            debug!(level = %args.level(), "record below handler threshold");
            PutOutcome::success()
        }
        Err(e) => {
            error!(log_group = %args.log_group, error = %e, "failed to write log record");
            PutOutcome::failure(e.to_string())
        }
    }
}
