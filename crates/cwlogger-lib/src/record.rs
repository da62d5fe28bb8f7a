use chrono::{DateTime, FixedOffset, Utc};

use crate::attr::Attr;
use crate::level::Level;

/// A single log call as handed to the submission pipeline.
#[derive(Debug, Clone)]
pub struct LogRecord {
    pub time: DateTime<FixedOffset>,
    pub level: Level,
    pub message: String,
    pub attrs: Vec<Attr>,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self::at(Utc::now().fixed_offset(), level, message)
    }

    /// Create a record with an explicit timestamp.
    pub fn at(time: DateTime<FixedOffset>, level: Level, message: impl Into<String>) -> Self {
        Self {
            time,
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    /// Event timestamp in milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.time.timestamp_millis()
    }
}
