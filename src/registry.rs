//! The cleanup registry and its close protocol
//!
//! # Design
//!
//! A single `parking_lot::Mutex` guards the pending batch (a `Vec` in
//! registration order). `register` holds the lock for one push; `close_all`
//! holds it only long enough to swap the batch out, then runs the captured
//! closers unlocked in reverse registration order. Registrations that land
//! during a close join the next batch.
//!
//! # Thread Safety
//!
//! `register` and `close_all` are safe under concurrent invocation. The swap
//! in `close_all` is the epoch boundary: a closer belongs to exactly one
//! captured batch, so concurrent close calls never run the same closer twice.

use crate::closer::{Closer, CloserFn};
use crate::error::{CloseError, CloserError};
use parking_lot::Mutex;
use std::sync::Arc;

/// Thread-safe LIFO cleanup registry.
///
/// Collects closers during a scope and runs them all on [`close_all`], last
/// registered first. Reusable: after a close the registry is empty and open
/// for the next batch.
///
/// # Example
///
/// ```
/// use autocloser::{AutoCloser, CloserFn};
///
/// let registry = AutoCloser::new();
/// let conn = registry.register(CloserFn::new(|| Ok(())));
/// // `conn` is the registered closer, usable until close_all runs it.
/// registry.close_all().unwrap();
/// ```
///
/// [`close_all`]: AutoCloser::close_all
#[derive(Default)]
pub struct AutoCloser {
    pending: Mutex<Vec<Arc<dyn Closer>>>,
}

impl AutoCloser {
    /// Create an empty, open registry.
    pub fn new() -> Self {
        AutoCloser {
            pending: Mutex::new(Vec::new()),
        }
    }

    /// Register a closer and get it back as a shared handle.
    ///
    /// The registry keeps one `Arc` clone for the pending batch and returns
    /// the other, so registration chains with construction and the caller
    /// keeps using the resource it just registered. Always succeeds; a closer
    /// registered after a prior [`close_all`](AutoCloser::close_all) joins
    /// the next batch.
    pub fn register<C>(&self, closer: C) -> Arc<C>
    where
        C: Closer + 'static,
    {
        let closer = Arc::new(closer);
        self.push(closer.clone());
        closer
    }

    /// Register an already-shared closer.
    pub fn register_arc(&self, closer: Arc<dyn Closer>) -> Arc<dyn Closer> {
        self.push(closer.clone());
        closer
    }

    /// Register a cleanup closure to run on the next close pass.
    pub fn defer<F>(&self, f: F)
    where
        F: FnOnce() -> Result<(), CloserError> + Send + 'static,
    {
        self.push(Arc::new(CloserFn::new(f)));
    }

    fn push(&self, closer: Arc<dyn Closer>) {
        let mut pending = self.pending.lock();
        pending.push(closer);
        tracing::debug!(pending = pending.len(), "registered closer");
    }

    /// Number of closers waiting for the next close pass.
    pub fn pending(&self) -> usize {
        self.pending.lock().len()
    }

    /// Close all pending closers in LIFO order.
    ///
    /// Atomically captures the pending batch and runs every captured closer
    /// exactly once, last registered first, continuing through failures. The
    /// first failure becomes the primary of the returned [`CloseError`];
    /// later failures are attached as suppressed causes in encounter order.
    ///
    /// An empty batch is a successful no-op, so repeated calls are safe.
    pub fn close_all(&self) -> Result<(), CloseError> {
        let batch = std::mem::take(&mut *self.pending.lock());
        if batch.is_empty() {
            return Ok(());
        }
        tracing::debug!(batch = batch.len(), "closing batch");

        let mut failures: Vec<CloserError> = Vec::new();
        for closer in batch.into_iter().rev() {
            if let Err(e) = closer.close() {
                tracing::warn!(error = %e, "closer failed");
                failures.push(e);
            }
        }

        match CloseError::from_failures(failures) {
            None => Ok(()),
            Some(err) => Err(err),
        }
    }
}

impl std::fmt::Debug for AutoCloser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoCloser")
            .field("pending", &self.pending.lock().len())
            .finish()
    }
}
