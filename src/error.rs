//! Simulator error types.
//!
//! Every failure is returned as a value. Informational outcomes (freeing an
//! unknown id, asking for a success rate with no requests) are not errors and
//! live in [`crate::allocator::FreeOutcome`] and [`crate::Rate`].

use thiserror::Error;

/// Errors returned by allocator and cache operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Allocation failed: no free block of {requested} bytes")]
    AllocationFailed { requested: usize },
}

impl SimError {
    /// Returns true if the caller can retry (different size, or after a free).
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}
