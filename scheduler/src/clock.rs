//! Wall-clock abstraction.
//!
//! The queue reasons entirely in epoch milliseconds (`nextFetchEpochMs`,
//! `crawlEndEpochMs`) so that politeness and deadline checks are testable
//! without sleeping real time. Production code uses [`SystemClock`];
//! tests inject a fake that advances under their control.

use std::time::{SystemTime, UNIX_EPOCH};

/// Source of the current wall-clock instant, in epoch milliseconds.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// [`Clock`] backed by [`SystemTime::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        i64::try_from(now.as_millis()).unwrap_or(i64::MAX)
    }
}
