//! The submission pipeline and handler derivation.
//!
//! A [`Handler`] turns one [`LogRecord`] into one event at the sink:
//!
//! 1. encode the record with the handler's inherited attributes and groups
//! 2. ensure the log group exists
//! 3. ensure this process's log stream exists
//! 4. put exactly one event
//! 5. keep the returned continuation token
//!
//! Steps 2–5 run under the handler's submission lock, so calls through one
//! handler never interleave at the sink. Encoding is pure and runs before the
//! lock is taken.
//!
//! Handlers derived with [`Handler::with_attrs`] and [`Handler::with_group`]
//! share the sink and the [`ProvisioningCache`] with their parent but own
//! their attribute and group sequences and their submission lock. Provisioning
//! stays exclusive across all of them through the shared cache; submissions
//! from different derived handlers may run concurrently.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use crate::attr::Attr;
use crate::config::HandlerConfig;
use crate::context::SinkContext;
use crate::encode::encode;
use crate::error::{Error, Result};
use crate::level::Level;
use crate::provision::ProvisioningCache;
use crate::record::LogRecord;
use crate::sink::{CloudWatchSink, InputEvent, LogSink};

/// Outcome of [`Handler::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The record was submitted to the sink.
    Submitted,
    /// The record was below the handler's threshold and discarded.
    Filtered,
}

#[derive(Debug, Default)]
struct SubmissionState {
    sequence_token: Option<String>,
}

/// Structured log handler writing to a [`LogSink`].
pub struct Handler {
    sink: Arc<dyn LogSink>,
    cache: Arc<ProvisioningCache>,
    config: HandlerConfig,
    attrs: Vec<Attr>,
    groups: Vec<String>,
    submission: Mutex<SubmissionState>,
}

impl Handler {
    /// Create a root handler with a fresh provisioning cache.
    pub fn new(sink: Arc<dyn LogSink>, config: HandlerConfig) -> Self {
        Self::with_cache(sink, Arc::new(ProvisioningCache::new()), config)
    }

    /// Create a root handler over an existing cache.
    pub fn with_cache(
        sink: Arc<dyn LogSink>,
        cache: Arc<ProvisioningCache>,
        config: HandlerConfig,
    ) -> Self {
        Self {
            sink,
            cache,
            config,
            attrs: Vec::new(),
            groups: Vec::new(),
            submission: Mutex::default(),
        }
    }

    /// Build a CloudWatch-backed handler from the ambient AWS and
    /// `CWLOGGER_*` environment.
    pub async fn from_env() -> Self {
        let sink = CloudWatchSink::from_env().await;
        Self::new(Arc::new(sink), HandlerConfig::from_env())
    }

    pub fn config(&self) -> &HandlerConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<ProvisioningCache> {
        &self.cache
    }

    /// Attributes added through [`Handler::with_attrs`], oldest first.
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// Group path added through [`Handler::with_group`], outermost first.
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    /// Whether records at `level` pass this handler's threshold.
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.config.threshold
    }

    /// Most recent continuation token returned by the sink.
    pub async fn sequence_token(&self) -> Option<String> {
        self.submission.lock().await.sequence_token.clone()
    }

    /// Apply the severity gate, then [`Handler::handle`] the record.
    pub async fn log(&self, ctx: &SinkContext, record: &LogRecord) -> Result<Delivery> {
        if !self.enabled(record.level) {
            trace!(level = %record.level, threshold = %self.config.threshold, "record filtered");
            return Ok(Delivery::Filtered);
        }
        self.handle(ctx, record).await?;
        Ok(Delivery::Submitted)
    }

    /// Submit `record` to `ctx.log_group` as a single event.
    ///
    /// Only the final submission can fail the call; provisioning problems are
    /// logged by the cache and otherwise ignored.
    pub async fn handle(&self, ctx: &SinkContext, record: &LogRecord) -> Result<()> {
        if ctx.log_group.trim().is_empty() {
            return Err(Error::MissingLogGroup);
        }

        let message = encode(record, &self.attrs, &self.groups).to_message()?;
        let event = InputEvent {
            timestamp_millis: record.timestamp_millis(),
            message,
        };

        let mut state = self.submission.lock().await;

        self.cache.ensure_group(self.sink.as_ref(), ctx).await;
        let stream = self
            .cache
            .ensure_stream(self.sink.as_ref(), ctx, &self.config.stream_base)
            .await;

        let token = self
            .sink
            .put_log_events(&ctx.log_group, &stream, vec![event])
            .await
            .map_err(Error::Submit)?;
        state.sequence_token = token;

        debug!(group = %ctx.log_group, stream = %stream, "submitted log event");
        Ok(())
    }

    /// Derive a handler whose records also carry `extra`.
    pub fn with_attrs(&self, extra: impl IntoIterator<Item = Attr>) -> Handler {
        let mut attrs = self.attrs.clone();
        attrs.extend(extra);
        self.derive(attrs, self.groups.clone())
    }

    /// Derive a handler nested one group deeper.
    ///
    /// An empty name leaves the group path unchanged.
    pub fn with_group(&self, name: impl Into<String>) -> Handler {
        let name = name.into();
        let mut groups = self.groups.clone();
        if !name.is_empty() {
            groups.push(name);
        }
        self.derive(self.attrs.clone(), groups)
    }

    fn derive(&self, attrs: Vec<Attr>, groups: Vec<String>) -> Handler {
        Handler {
            sink: Arc::clone(&self.sink),
            cache: Arc::clone(&self.cache),
            config: self.config.clone(),
            attrs,
            groups,
            submission: Mutex::default(),
        }
    }
}
