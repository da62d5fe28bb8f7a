/// Destination settings supplied alongside each record.
///
/// Carries what the front end resolves per request: the log group to write
/// to and, optionally, the retention applied when that group is first
/// created.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SinkContext {
    pub log_group: String,
    pub retention_days: Option<i32>,
}

impl SinkContext {
    pub fn new(log_group: impl Into<String>) -> Self {
        Self {
            log_group: log_group.into(),
            retention_days: None,
        }
    }

    pub fn with_retention_days(mut self, days: Option<i32>) -> Self {
        self.retention_days = days;
        self
    }
}
