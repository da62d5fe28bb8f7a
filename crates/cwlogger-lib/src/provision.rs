//! Idempotent provisioning of log groups and log streams.
//!
//! [`ProvisioningCache`] remembers which groups and streams this process has
//! already created (or attempted to create), so each resource costs at most
//! one creation call per process lifetime. A single async mutex guards both
//! maps and is held across the sink call; concurrent callers for the same key
//! wait for the winner and reuse its result. A key is recorded before its
//! creation call is issued, so a caller dropped mid-call (a timeout, say)
//! leaves the resource marked as attempted.
//!
//! # Stream naming
//!
//! A base stream name is suffixed with the UTC time of first use at second
//! granularity (`log-stream-2025-06-01-12-30-45`). Every record a process
//! emits for one group goes to that stream. Two processes starting within the
//! same second would pick the same name; the collision is tolerated since the
//! create call reports a conflict and both keep writing to the shared stream.

use std::collections::{HashMap, HashSet};

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::context::SinkContext;
use crate::sink::LogSink;

/// `chrono` format of the suffix appended to base stream names.
pub const STREAM_SUFFIX_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

#[derive(Debug, Default)]
struct CacheState {
    groups: HashSet<String>,
    /// "group/base" -> suffixed stream name.
    streams: HashMap<String, String>,
}

/// Per-process record of provisioned groups and streams.
///
/// Entries are only ever added. Share one instance between handlers with an
/// `Arc`.
#[derive(Debug, Default)]
pub struct ProvisioningCache {
    state: Mutex<CacheState>,
}

impl ProvisioningCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make sure `ctx.log_group` has been created once.
    ///
    /// Creation errors are logged and swallowed; the group counts as handled
    /// either way. Retention is applied only after a successful creation.
    pub async fn ensure_group(&self, sink: &dyn LogSink, ctx: &SinkContext) {
        let group = ctx.log_group.as_str();
        let mut state = self.state.lock().await;
        if state.groups.contains(group) {
            return;
        }

        // Recorded before the call so a dropped future never retries creation
        state.groups.insert(group.to_string());
        let created = sink.create_log_group(group).await;

        match created {
            Ok(()) => {
                info!(group, "created log group");
                if let Some(days) = ctx.retention_days {
                    match sink.put_retention_policy(group, days).await {
                        Ok(()) => debug!(group, days, "applied retention policy"),
                        Err(err) => {
                            warn!(group, days, error = %err, "failed to apply retention policy")
                        }
                    }
                }
            }
            Err(err) if err.is_already_exists() => {
                debug!(group, "log group already exists");
            }
            Err(err) => {
                warn!(group, error = %err, "failed to create log group; continuing");
            }
        }
    }

    /// Resolve the stream this process writes to for `(ctx.log_group, base)`.
    ///
    /// The first call creates a timestamp-suffixed stream; the name is cached
    /// and returned whatever the creation outcome.
    pub async fn ensure_stream(&self, sink: &dyn LogSink, ctx: &SinkContext, base: &str) -> String {
        let group = ctx.log_group.as_str();
        let key = format!("{group}/{base}");

        let mut state = self.state.lock().await;
        if let Some(stream) = state.streams.get(&key) {
            return stream.clone();
        }

        let stream = format!("{base}-{}", Utc::now().format(STREAM_SUFFIX_FORMAT));
        state.streams.insert(key, stream.clone());
        let created = sink.create_log_stream(group, &stream).await;

        match created {
            Ok(()) => info!(group, stream = %stream, "created log stream"),
            Err(err) if err.is_already_exists() => {
                debug!(group, stream = %stream, "log stream already exists")
            }
            Err(err) => {
                warn!(group, stream = %stream, error = %err, "failed to create log stream; continuing")
            }
        }

        stream
    }

    /// Whether `group` has been handled by this cache.
    pub async fn knows_group(&self, group: &str) -> bool {
        self.state.lock().await.groups.contains(group)
    }

    /// Cached stream name for `(group, base)`, if one was provisioned.
    pub async fn stream_for(&self, group: &str, base: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .streams
            .get(&format!("{group}/{base}"))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDateTime;

    use super::*;
    use crate::test_utils::{RecordingSink, SinkCall};

    fn ctx(group: &str) -> SinkContext {
        SinkContext::new(group)
    }

    #[tokio::test]
    async fn creates_group_once() {
        let sink = RecordingSink::new();
        let cache = ProvisioningCache::new();

        cache.ensure_group(&sink, &ctx("g1")).await;
        cache.ensure_group(&sink, &ctx("g1")).await;

        assert_eq!(sink.group_creations("g1"), 1);
        assert!(cache.knows_group("g1").await);
    }

    #[tokio::test]
    async fn failed_group_creation_is_still_cached() {
        let sink = RecordingSink::new().failing_create_group();
        let cache = ProvisioningCache::new();

        cache.ensure_group(&sink, &ctx("g1")).await;
        cache.ensure_group(&sink, &ctx("g1")).await;

        assert_eq!(sink.group_creations("g1"), 1);
    }

    #[tokio::test]
    async fn retention_applied_after_successful_creation() {
        let sink = RecordingSink::new();
        let cache = ProvisioningCache::new();

        cache
            .ensure_group(&sink, &ctx("g1").with_retention_days(Some(14)))
            .await;

        assert!(sink.calls().contains(&SinkCall::PutRetentionPolicy {
            group: "g1".into(),
            days: 14,
        }));
    }

    #[tokio::test]
    async fn retention_skipped_when_group_exists() {
        let sink = RecordingSink::new().with_existing_group("g1");
        let cache = ProvisioningCache::new();

        cache
            .ensure_group(&sink, &ctx("g1").with_retention_days(Some(14)))
            .await;

        assert_eq!(sink.retention_updates(), 0);
    }

    #[tokio::test]
    async fn retention_skipped_without_days() {
        let sink = RecordingSink::new();
        let cache = ProvisioningCache::new();

        cache.ensure_group(&sink, &ctx("g1")).await;

        assert_eq!(sink.retention_updates(), 0);
    }

    #[tokio::test]
    async fn retention_failure_is_swallowed() {
        let sink = RecordingSink::new().failing_retention();
        let cache = ProvisioningCache::new();

        cache
            .ensure_group(&sink, &ctx("g1").with_retention_days(Some(7)))
            .await;

        assert!(cache.knows_group("g1").await);
        assert_eq!(sink.retention_updates(), 1);
    }

    #[tokio::test]
    async fn stream_name_is_suffixed_with_timestamp() {
        let sink = RecordingSink::new();
        let cache = ProvisioningCache::new();

        let stream = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;

        let suffix = stream
            .strip_prefix("log-stream-")
            .expect("stream keeps its base name");
        assert!(NaiveDateTime::parse_from_str(suffix, STREAM_SUFFIX_FORMAT).is_ok());
    }

    #[tokio::test]
    async fn stream_name_is_stable_per_key() {
        let sink = RecordingSink::new();
        let cache = ProvisioningCache::new();

        let first = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;
        let second = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;

        assert_eq!(first, second);
        assert_eq!(sink.stream_creations("g1"), 1);
        assert_eq!(
            cache.stream_for("g1", "log-stream").await.as_deref(),
            Some(first.as_str())
        );
    }

    #[tokio::test]
    async fn streams_are_tracked_per_group() {
        let sink = RecordingSink::new();
        let cache = ProvisioningCache::new();

        cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;
        cache.ensure_stream(&sink, &ctx("g2"), "log-stream").await;

        assert_eq!(sink.stream_creations("g1"), 1);
        assert_eq!(sink.stream_creations("g2"), 1);
    }

    #[tokio::test]
    async fn failed_stream_creation_is_still_cached() {
        let sink = RecordingSink::new().failing_create_stream();
        let cache = ProvisioningCache::new();

        let first = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;
        let second = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;

        assert_eq!(first, second);
        assert_eq!(sink.stream_creations("g1"), 1);
    }

    #[tokio::test]
    async fn cancelled_creation_is_not_repeated() {
        let sink = RecordingSink::new().with_latency();
        let cache = ProvisioningCache::new();

        let group = tokio::time::timeout(
            Duration::from_millis(5),
            cache.ensure_group(&sink, &ctx("g1")),
        )
        .await;
        let stream = tokio::time::timeout(
            Duration::from_millis(5),
            cache.ensure_stream(&sink, &ctx("g1"), "log-stream"),
        )
        .await;
        assert!(group.is_err() && stream.is_err());

        cache.ensure_group(&sink, &ctx("g1")).await;
        let name = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;

        assert_eq!(sink.group_creations("g1"), 1);
        assert_eq!(sink.stream_creations("g1"), 1);
        assert_eq!(sink.calls().len(), 2);
        assert!(name.starts_with("log-stream-"));
    }

    #[tokio::test]
    async fn conflicting_stream_name_is_still_used() {
        let sink = RecordingSink::new().with_existing_streams();
        let cache = ProvisioningCache::new();

        let first = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;
        let second = cache.ensure_stream(&sink, &ctx("g1"), "log-stream").await;

        assert_eq!(first, second);
        assert_eq!(sink.stream_creations("g1"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_callers_share_one_creation() {
        let sink = Arc::new(RecordingSink::new().with_latency());
        let cache = Arc::new(ProvisioningCache::new());

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let sink = Arc::clone(&sink);
            let cache = Arc::clone(&cache);
            tasks.push(tokio::spawn(async move {
                cache.ensure_group(sink.as_ref(), &ctx("g1")).await;
                cache.ensure_stream(sink.as_ref(), &ctx("g1"), "log-stream").await
            }));
        }

        let mut names = Vec::new();
        for task in tasks {
            names.push(task.await.unwrap());
        }

        assert_eq!(sink.group_creations("g1"), 1);
        assert_eq!(sink.stream_creations("g1"), 1);
        assert!(names.windows(2).all(|w| w[0] == w[1]));
    }
}
