//! Shared infrastructure for cwlogger AWS Lambda functions.
//!
//! This crate provides common functionality used across Lambda handlers:
//!
//! - [`init_runtime_from_env`]: process-wide [`cwlogger_lib::Handler`] built at cold start
//! - [`init_tracing`]: JSON-formatted diagnostic tracing
//! - [`LogRequest`] / [`LogResponse`]: wire types with validation
//!
//! # Testing Support
//!
//! The [`test_utils`] module provides request fixtures and recording handlers.
//! Enable the `test-utils` feature to access it from dependent crates.

#![deny(warnings)]

mod requests;
mod response;
mod runtime;
mod tracing_init;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use requests::{AttributeDto, LogRequest, Validate};
pub use response::{LogResponse, SUCCESS_MESSAGE};
pub use runtime::{get_runtime, init_runtime, init_runtime_from_env, try_runtime};
pub use tracing_init::{init_tracing, LogFormat, TracingConfig};
