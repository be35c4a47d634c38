//! Telemetry: structured logging and command spans.

mod logging;
mod spans;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use spans::{CommandSpan, SpanExt};
