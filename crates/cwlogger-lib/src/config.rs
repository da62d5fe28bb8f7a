//! Handler configuration.
//!
//! # Environment Variables
//!
//! - `CWLOGGER_LEVEL`: minimum severity handled (`debug`, `info`, `warn`,
//!   `error`). Defaults to `debug`.

use tracing::warn;

use crate::level::Level;

/// Base name of the stream every record is written to, before suffixing.
pub const DEFAULT_STREAM_BASE: &str = "log-stream";

/// Environment variable holding the handler's severity threshold.
pub const LEVEL_ENV: &str = "CWLOGGER_LEVEL";

/// Settings fixed at handler construction and inherited by derived handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    /// Records below this level are discarded.
    pub threshold: Level,
    /// Base stream name; the provisioned stream appends a timestamp.
    pub stream_base: String,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            threshold: Level::Debug,
            stream_base: DEFAULT_STREAM_BASE.to_string(),
        }
    }
}

impl HandlerConfig {
    /// Read configuration from the environment.
    ///
    /// An unparseable level is reported and replaced by the default.
    pub fn from_env() -> Self {
        Self::from_level_var(std::env::var(LEVEL_ENV).ok().as_deref())
    }

    fn from_level_var(value: Option<&str>) -> Self {
        let mut config = Self::default();
        if let Some(raw) = value {
            match raw.parse::<Level>() {
                Ok(level) => config.threshold = level,
                Err(err) => {
                    warn!(variable = LEVEL_ENV, error = %err, "ignoring invalid level")
                }
            }
        }
        config
    }

    pub fn with_threshold(mut self, threshold: Level) -> Self {
        self.threshold = threshold;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_debug_and_fixed_stream() {
        let config = HandlerConfig::default();
        assert_eq!(config.threshold, Level::Debug);
        assert_eq!(config.stream_base, "log-stream");
    }

    #[test]
    fn reads_level_from_variable() {
        assert_eq!(
            HandlerConfig::from_level_var(Some("warn")).threshold,
            Level::Warn
        );
        assert_eq!(HandlerConfig::from_level_var(None).threshold, Level::Debug);
    }

    #[test]
    fn invalid_level_falls_back_to_default() {
        assert_eq!(
            HandlerConfig::from_level_var(Some("loud")).threshold,
            Level::Debug
        );
    }
}
