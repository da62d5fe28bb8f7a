//! Process-wide handler shared by every invocation of a Lambda instance.
//!
//! The handler, and with it the provisioning cache, is built once at cold
//! start and reused by all invocations, so the log group and stream are
//! provisioned at most once per instance.
//!
//! # Cold-Start Performance
//!
//! Initialization logs `init_ms`, the time spent loading AWS configuration
//! and building the CloudWatch client.

use std::sync::OnceLock;
use std::time::Instant;

use tracing::info;

use cwlogger_lib::Handler;

/// Lazily-initialized Lambda runtime state.
static RUNTIME: OnceLock<Handler> = OnceLock::new();

/// Install `handler` as the process-wide handler.
///
/// The first installed handler wins; later calls return it and drop their
/// argument.
pub fn init_runtime(handler: Handler) -> &'static Handler {
    RUNTIME.get_or_init(|| handler)
}

/// Build the handler from the AWS and `CWLOGGER_*` environment and install it.
pub async fn init_runtime_from_env() -> &'static Handler {
    if let Some(handler) = RUNTIME.get() {
        return handler;
    }

    let start = Instant::now();
    let handler = Handler::from_env().await;
    info!(
        init_ms = start.elapsed().as_millis() as u64,
        threshold = %handler.config().threshold,
        stream_base = %handler.config().stream_base,
        "Lambda runtime initialization complete"
    );

    init_runtime(handler)
}

/// Get the installed handler, if any.
pub fn try_runtime() -> Option<&'static Handler> {
    RUNTIME.get()
}

/// Get the installed handler.
///
/// # Panics
///
/// Panics if neither `init_runtime` nor `init_runtime_from_env` has run.
pub fn get_runtime() -> &'static Handler {
    match RUNTIME.get() {
        Some(handler) => handler,
        None => panic!("Lambda runtime not initialized. Call init_runtime() first."),
    }
}
