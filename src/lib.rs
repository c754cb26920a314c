//! Thread-safe LIFO resource-cleanup registry
//!
//! Callers register cleanup actions (closers) during a scope, possibly from
//! multiple threads, and a single `close_all` call runs them in LIFO order:
//! last registered, first closed. Failures never stop the walk; every captured
//! closer is attempted, and all failures are reported together as one
//! [`CloseError`] carrying the first failure as primary and the rest as
//! ordered suppressed causes.
//!
//! # Design
//!
//! - [`AutoCloser`]: the registry. A single mutex guards the pending batch;
//!   `close_all` swaps the batch out atomically and runs it unlocked.
//! - [`Closer`]: trait for a unit of cleanup work with one fallible close
//!   action. Stored as `Arc<dyn Closer>` trait objects.
//! - [`CloserFn`]: adapter turning a `FnOnce` closure into a [`Closer`].
//! - [`CloseError`]: aggregated close failure (primary + suppressed).
//!
//! The registry is reusable: each `close_all` call drains the closers
//! registered since the previous call, and registration after a close starts
//! the next batch.
//!
//! # Thread Safety
//!
//! `register` and `close_all` are safe to call concurrently from multiple
//! threads. No closer is lost, duplicated, or run out of LIFO order; a closer
//! belongs to exactly one captured batch.
//!
//! # Example
//!
//! ```
//! use autocloser::AutoCloser;
//!
//! let registry = AutoCloser::new();
//! registry.defer(|| {
//!     // release some resource
//!     Ok(())
//! });
//! registry.close_all().unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod closer;
pub mod error;
pub mod registry;

pub use closer::{Closer, CloserFn};
pub use error::{CloseError, CloserError};
pub use registry::AutoCloser;
