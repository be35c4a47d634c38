//! Span utilities for command tracing.

use tracing::{debug_span, Span};

/// Extension trait for adding context to spans.
pub trait SpanExt {
    /// Record the result of an operation into the span.
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display;
}

impl SpanExt for Span {
    fn record_result<T, E>(&self, result: &Result<T, E>)
    where
        E: std::fmt::Display,
    {
        match result {
            Ok(_) => {
                self.record("status", "ok");
            }
            Err(e) => {
                self.record("status", "error");
                self.record("error.message", e.to_string().as_str());
            }
        }
    }
}

/// Factory for per-command spans.
pub struct CommandSpan;

impl CommandSpan {
    /// Span for one session command. `status` and `error.message` are filled
    /// in by [`SpanExt::record_result`].
    pub fn new(line_no: usize, command: &str) -> Span {
        debug_span!(
            "command",
            line = line_no,
            command = %command,
            status = tracing::field::Empty,
            error.message = tracing::field::Empty,
        )
    }
}
