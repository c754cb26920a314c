//! Error types for the close protocol
//!
//! Closers report failures as opaque boxed errors ([`CloserError`]); the
//! registry never inspects them. A failing `close_all` pass collects every
//! failure and returns one [`CloseError`]: the first failure in LIFO
//! execution order is the primary, all later failures are suppressed causes
//! attached in encounter order.

use thiserror::Error;

/// Opaque failure from a single closer's close action.
///
/// The registry only carries these values; it does not inspect, retry, or
/// downcast them.
pub type CloserError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Aggregated failure from a `close_all` pass.
///
/// Holds the primary failure (first failing closer in LIFO execution order)
/// plus zero or more suppressed failures in the order they were encountered.
/// The primary is exposed as this error's `source()`.
#[derive(Debug, Error)]
#[error("close failed: {primary}; {} suppressed failure(s)", .suppressed.len())]
pub struct CloseError {
    #[source]
    primary: CloserError,
    suppressed: Vec<CloserError>,
}

impl CloseError {
    /// Build an aggregated error from failures in encounter order.
    ///
    /// Returns `None` when the pass had no failures.
    pub(crate) fn from_failures(mut failures: Vec<CloserError>) -> Option<Self> {
        if failures.is_empty() {
            return None;
        }
        let primary = failures.remove(0);
        Some(CloseError {
            primary,
            suppressed: failures,
        })
    }

    /// The first failure encountered during the close pass.
    pub fn primary(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.primary.as_ref()
    }

    /// Failures encountered after the primary, in encounter order.
    pub fn suppressed(&self) -> &[CloserError] {
        &self.suppressed
    }

    /// Total number of failed closers (primary included).
    pub fn failures(&self) -> usize {
        1 + self.suppressed.len()
    }

    /// Consume the error, returning all failures primary-first.
    pub fn into_errors(self) -> Vec<CloserError> {
        let mut errors = Vec::with_capacity(1 + self.suppressed.len());
        errors.push(self.primary);
        errors.extend(self.suppressed);
        errors
    }
}
