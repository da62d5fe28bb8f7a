//! Severity levels and their parsing rules.

use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Severity of a log record.
///
/// Discriminants follow the conventional structured-logging scale so that
/// ordering comparisons (`>=` against a threshold) behave as expected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug = -4,
    #[default]
    Info = 0,
    Warn = 4,
    Error = 8,
}

impl Level {
    /// Upper-case name written into the encoded payload.
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
        }
    }

    /// Lenient parsing used for inbound requests.
    ///
    /// Case-insensitive; a missing or unrecognized value maps to `Info`.
    pub fn from_request(value: Option<&str>) -> Self {
        value
            .and_then(|v| v.parse::<Level>().ok())
            .unwrap_or_default()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            _ => Err(Error::InvalidLevel {
                value: s.to_string(),
            }),
        }
    }
}
