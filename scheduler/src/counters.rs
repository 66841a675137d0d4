//! Process-wide observability counters, injected rather than ambient.
//!
//! Keeping counters behind a trait injected at construction (instead of a
//! global singleton) is what makes the queue's tests deterministic: a
//! test can assert on exactly the deltas its own queue produced.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;

/// Gauge/counter name the queue increments on dispatch and decrements on
/// release.
pub const DOMAINS_FETCHING: &str = "DOMAINS_FETCHING";
/// Incremented once per `offer` that was rejected by the bounded-heap
/// discipline.
pub const URLS_REJECTED: &str = "URLS_REJECTED";
/// Incremented once per URL drained by `abort_all`.
pub const URLS_ABORTED: &str = "URLS_ABORTED";

/// Process-wide counter/gauge sink.
pub trait Counters: Send + Sync {
    fn increment(&self, name: &str, delta: i64);
    fn decrement(&self, name: &str, delta: i64);
}

/// An in-process [`Counters`] implementation backed by atomics, suitable
/// for production use by a single-process crawler as well as for tests
/// that want to assert on counter values directly (no mocking needed).
#[derive(Debug, Default)]
pub struct AtomicCounters {
    values: Mutex<HashMap<String, AtomicI64>>,
}

impl AtomicCounters {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, name: &str) -> i64 {
        self.values
            .lock()
            .unwrap()
            .get(name)
            .map_or(0, |v| v.load(Ordering::Relaxed))
    }

    fn add(&self, name: &str, delta: i64) {
        let mut values = self.values.lock().unwrap();
        values
            .entry(name.to_string())
            .or_insert_with(|| AtomicI64::new(0))
            .fetch_add(delta, Ordering::Relaxed);
    }
}

impl Counters for AtomicCounters {
    fn increment(&self, name: &str, delta: i64) {
        self.add(name, delta);
    }

    fn decrement(&self, name: &str, delta: i64) {
        self.add(name, -delta);
    }
}
