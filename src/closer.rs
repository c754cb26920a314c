//! The `Closer` trait and closure adapter
//!
//! A closer is an opaque unit of cleanup work: one fallible close action, no
//! identity beyond the action itself. The registry stores closers as
//! `Arc<dyn Closer>` trait objects, so the trait is object-safe and takes
//! `&self` (closers needing mutable state use interior mutability, as
//! [`CloserFn`] does).

use crate::error::CloserError;
use parking_lot::Mutex;

/// A registered unit of cleanup work.
///
/// Implementations release whatever resource they guard and report failure as
/// an opaque boxed error. The registry invokes `close` exactly once per
/// captured batch and never retries.
pub trait Closer: Send + Sync {
    /// Release the guarded resource.
    fn close(&self) -> Result<(), CloserError>;
}

/// Adapter that runs a `FnOnce` closure as a [`Closer`].
///
/// The closure runs at most once: the first `close` call takes it out and
/// runs it, any later call is a successful no-op.
pub struct CloserFn {
    action: Mutex<Option<Box<dyn FnOnce() -> Result<(), CloserError> + Send>>>,
}

impl CloserFn {
    /// Wrap a cleanup closure.
    pub fn new<F>(f: F) -> Self
    where
        F: FnOnce() -> Result<(), CloserError> + Send + 'static,
    {
        CloserFn {
            action: Mutex::new(Some(Box::new(f))),
        }
    }
}

impl Closer for CloserFn {
    fn close(&self) -> Result<(), CloserError> {
        match self.action.lock().take() {
            Some(action) => action(),
            None => Ok(()),
        }
    }
}

impl std::fmt::Debug for CloserFn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloserFn")
            .field("spent", &self.action.lock().is_none())
            .finish()
    }
}
