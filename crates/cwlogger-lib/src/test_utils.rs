//! Test utilities for exercising handlers without a real log service.
//!
//! [`RecordingSink`] implements [`LogSink`] in memory, recording every call
//! so tests can assert on exactly which provisioning and submission requests
//! reached the service.
//!
//! # Usage
//!
//! Available in this crate's tests, and to dependent crates through the
//! `test-utils` feature:
//!
//! ```ignore
//! use cwlogger_lib::test_utils::RecordingSink;
//!
//! let sink = Arc::new(RecordingSink::new().with_existing_group("g1"));
//! let handler = Handler::new(sink.clone(), HandlerConfig::default());
//! // ... handle records
//! assert_eq!(sink.group_creations("g1"), 1);
//! ```

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::sink::{InputEvent, LogSink, SinkError};

/// A call observed by [`RecordingSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    CreateLogGroup {
        group: String,
    },
    CreateLogStream {
        group: String,
        stream: String,
    },
    PutLogEvents {
        group: String,
        stream: String,
        events: Vec<InputEvent>,
    },
    PutRetentionPolicy {
        group: String,
        days: i32,
    },
}

/// In-memory [`LogSink`] that records calls and can inject failures.
#[derive(Debug, Default)]
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    existing_groups: HashSet<String>,
    existing_streams: bool,
    fail_create_group: bool,
    fail_create_stream: bool,
    fail_put: bool,
    fail_retention: bool,
    latency: Option<Duration>,
    tokens: AtomicU64,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `AlreadyExists` when `group` is created.
    pub fn with_existing_group(mut self, group: &str) -> Self {
        self.existing_groups.insert(group.to_string());
        self
    }

    /// Report `AlreadyExists` for every stream creation.
    pub fn with_existing_streams(mut self) -> Self {
        self.existing_streams = true;
        self
    }

    pub fn failing_create_group(mut self) -> Self {
        self.fail_create_group = true;
        self
    }

    pub fn failing_create_stream(mut self) -> Self {
        self.fail_create_stream = true;
        self
    }

    pub fn failing_put(mut self) -> Self {
        self.fail_put = true;
        self
    }

    pub fn failing_retention(mut self) -> Self {
        self.fail_retention = true;
        self
    }

    /// Sleep inside every call to widen race windows in concurrency tests.
    pub fn with_latency(mut self) -> Self {
        self.latency = Some(Duration::from_millis(20));
        self
    }

    /// Snapshot of every call so far, in order.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }

    pub fn group_creations(&self, group: &str) -> usize {
        self.count(|call| matches!(call, SinkCall::CreateLogGroup { group: g } if g == group))
    }

    pub fn stream_creations(&self, group: &str) -> usize {
        self.count(|call| matches!(call, SinkCall::CreateLogStream { group: g, .. } if g == group))
    }

    pub fn retention_updates(&self) -> usize {
        self.count(|call| matches!(call, SinkCall::PutRetentionPolicy { .. }))
    }

    /// Every submitted event with its destination, in submission order.
    pub fn put_events(&self) -> Vec<(String, String, InputEvent)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                SinkCall::PutLogEvents {
                    group,
                    stream,
                    events,
                } => Some(
                    events
                        .into_iter()
                        .map(move |event| (group.clone(), stream.clone(), event)),
                ),
                _ => None,
            })
            .flatten()
            .collect()
    }

    /// Number of `put_log_events` calls, regardless of outcome.
    pub fn put_calls(&self) -> usize {
        self.count(|call| matches!(call, SinkCall::PutLogEvents { .. }))
    }

    fn count(&self, pred: impl Fn(&SinkCall) -> bool) -> usize {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .iter()
            .filter(|call| pred(call))
            .count()
    }

    fn record(&self, call: SinkCall) {
        self.calls.lock().expect("calls lock poisoned").push(call);
    }

    async fn pause(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn injected(operation: &'static str) -> SinkError {
    SinkError::Service {
        operation,
        message: "injected failure".to_string(),
    }
}

#[async_trait]
impl LogSink for RecordingSink {
    async fn create_log_group(&self, group: &str) -> Result<(), SinkError> {
        self.record(SinkCall::CreateLogGroup {
            group: group.to_string(),
        });
        self.pause().await;

        if self.existing_groups.contains(group) {
            return Err(SinkError::AlreadyExists {
                resource: format!("log group {group}"),
            });
        }
        if self.fail_create_group {
            return Err(injected("CreateLogGroup"));
        }
        Ok(())
    }

    async fn create_log_stream(&self, group: &str, stream: &str) -> Result<(), SinkError> {
        self.record(SinkCall::CreateLogStream {
            group: group.to_string(),
            stream: stream.to_string(),
        });
        self.pause().await;

        if self.existing_streams {
            return Err(SinkError::AlreadyExists {
                resource: format!("log stream {group}/{stream}"),
            });
        }
        if self.fail_create_stream {
            return Err(injected("CreateLogStream"));
        }
        Ok(())
    }

    async fn put_log_events(
        &self,
        group: &str,
        stream: &str,
        events: Vec<InputEvent>,
    ) -> Result<Option<String>, SinkError> {
        self.record(SinkCall::PutLogEvents {
            group: group.to_string(),
            stream: stream.to_string(),
            events,
        });
        self.pause().await;

        if self.fail_put {
            return Err(injected("PutLogEvents"));
        }
        let n = self.tokens.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(Some(format!("token-{n}")))
    }

    async fn put_retention_policy(&self, group: &str, days: i32) -> Result<(), SinkError> {
        self.record(SinkCall::PutRetentionPolicy {
            group: group.to_string(),
            days,
        });

        if self.fail_retention {
            return Err(injected("PutRetentionPolicy"));
        }
        Ok(())
    }
}
