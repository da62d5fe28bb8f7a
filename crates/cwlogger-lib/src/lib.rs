//! cwlogger library entry points.
//!
//! This crate encodes structured log records into JSON events and submits
//! them to a remote log sink (CloudWatch Logs in production), creating the
//! log group and a per-process log stream on first use. Front ends (CLI,
//! Lambdas) should only depend on the items exported here instead of
//! reimplementing behavior.
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides an in-memory recording sink. Enable the
//! `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

pub mod attr;
pub mod config;
pub mod context;
pub mod encode;
pub mod error;
pub mod handler;
pub mod level;
pub mod provision;
pub mod record;
pub mod sink;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use attr::{Attr, Value};
pub use config::{HandlerConfig, DEFAULT_STREAM_BASE};
pub use context::SinkContext;
pub use encode::{encode, Node, Tree};
pub use error::{Error, Result};
pub use handler::{Delivery, Handler};
pub use level::Level;
pub use provision::{ProvisioningCache, STREAM_SUFFIX_FORMAT};
pub use record::LogRecord;
pub use sink::{CloudWatchSink, InputEvent, LogSink, SinkError};
