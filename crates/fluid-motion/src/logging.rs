#![forbid(unsafe_code)]

//! Structured logging.
//!
//! The crate emits `tracing` events and never installs a subscriber itself:
//!
//! | Level   | Event                                                   |
//! |---------|---------------------------------------------------------|
//! | `debug` | drag began, released or cancelled; settle complete or   |
//! |         | interrupted; motion superseded; snap index changed      |
//! | `trace` | per-sample drag updates, origin registry writes         |
//!
//! Applications that want JSON lines on stderr can enable the `tracing-json`
//! feature and call [`init_json_subscriber`] once at startup.

pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Failure to install the global subscriber.
#[cfg(feature = "tracing-json")]
#[derive(Debug, thiserror::Error)]
#[error("failed to install tracing subscriber: {0}")]
pub struct InitError(String);

/// Install a JSON-formatting subscriber filtered by `RUST_LOG`
/// (default `fluid_motion=info`).
///
/// Fails if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> Result<(), InitError> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("fluid_motion=info"));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| InitError(e.to_string()))
}
