//! Concurrency tests for the cleanup registry
//!
//! - T threads registering R closers each lose nothing and duplicate nothing
//! - A close pass runs every captured closer exactly once
//! - Registration racing a close pass lands each closer in exactly one batch

use autocloser::{AutoCloser, Closer, CloserError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

/// Closer that counts how many times it has been closed.
struct Counting {
    closes: AtomicUsize,
}

impl Counting {
    fn new() -> Self {
        Counting {
            closes: AtomicUsize::new(0),
        }
    }
}

impl Closer for Counting {
    fn close(&self) -> Result<(), CloserError> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_concurrent_registration_loses_nothing() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 200;

    let registry = Arc::new(AutoCloser::new());
    let barrier = Arc::new(Barrier::new(THREADS));

    let handles: Vec<_> = (0..THREADS)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let mut registered = Vec::with_capacity(PER_THREAD);
                barrier.wait();
                for _ in 0..PER_THREAD {
                    registered.push(registry.register(Counting::new()));
                }
                registered
            })
        })
        .collect();

    let mut all: Vec<Arc<Counting>> = Vec::new();
    for handle in handles {
        all.extend(handle.join().unwrap());
    }

    assert_eq!(registry.pending(), THREADS * PER_THREAD);

    registry.close_all().unwrap();
    assert_eq!(registry.pending(), 0);
    for closer in &all {
        assert_eq!(closer.closes.load(Ordering::SeqCst), 1);
    }
}

#[test]
fn test_registration_racing_close_runs_each_closer_once() {
    const REGISTRARS: usize = 4;
    const PER_THREAD: usize = 500;

    let registry = Arc::new(AutoCloser::new());
    let barrier = Arc::new(Barrier::new(REGISTRARS + 1));

    let registrars: Vec<_> = (0..REGISTRARS)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                let mut registered = Vec::with_capacity(PER_THREAD);
                barrier.wait();
                for _ in 0..PER_THREAD {
                    registered.push(registry.register(Counting::new()));
                }
                registered
            })
        })
        .collect();

    // Keep draining while registrations pour in. Each pass captures whatever
    // batch is pending at that instant.
    let closer_thread = {
        let registry = registry.clone();
        let barrier = barrier.clone();
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..50 {
                registry.close_all().unwrap();
                thread::yield_now();
            }
        })
    };

    let mut all: Vec<Arc<Counting>> = Vec::new();
    for handle in registrars {
        all.extend(handle.join().unwrap());
    }
    closer_thread.join().unwrap();

    // Final pass picks up anything the racing passes missed.
    registry.close_all().unwrap();

    assert_eq!(all.len(), REGISTRARS * PER_THREAD);
    for closer in &all {
        assert_eq!(closer.closes.load(Ordering::SeqCst), 1);
    }
    assert_eq!(registry.pending(), 0);
}

#[test]
fn test_concurrent_close_calls_never_double_close() {
    const CLOSERS: usize = 1000;
    const DRAINERS: usize = 4;

    let registry = Arc::new(AutoCloser::new());
    let mut all = Vec::with_capacity(CLOSERS);
    for _ in 0..CLOSERS {
        all.push(registry.register(Counting::new()));
    }

    let barrier = Arc::new(Barrier::new(DRAINERS));
    let handles: Vec<_> = (0..DRAINERS)
        .map(|_| {
            let registry = registry.clone();
            let barrier = barrier.clone();
            thread::spawn(move || {
                barrier.wait();
                registry.close_all().unwrap();
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    // Exactly one drainer captured the batch; every closer ran exactly once.
    for closer in &all {
        assert_eq!(closer.closes.load(Ordering::SeqCst), 1);
    }
    assert_eq!(registry.pending(), 0);
}
