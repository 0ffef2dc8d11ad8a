//! Structured logging via **tracing**.
//!
//! stdout is reserved for generated output (the `-` sink writes there),
//! so all diagnostics go to stderr as structured JSON.

use tracing::{error, info, warn};

/// Initializes the global tracing subscriber.
///
/// Call once at process start. Output is JSON on stderr; filtering is
/// controlled by `RUST_LOG` (e.g. `RUST_LOG=traitgen_core=debug`).
pub fn init_structured_logging() {
    tracing_subscriber::fmt()
        .json()
        .with_ansi(false)
        .with_level(true)
        .with_target(true)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Logs an info event.
pub fn log_info(message: &str) {
    info!(detail = %message);
}

/// Logs a warning event.
pub fn log_warn(message: &str) {
    warn!(detail = %message);
}

/// Logs an error event.
pub fn log_error(message: &str) {
    error!(detail = %message);
}
