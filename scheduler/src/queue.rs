//! [`DomainQueue`]: the bounded, mutex-guarded priority collection that
//! is the core of this crate.

use std::sync::{Arc, Mutex};

use tracing::{debug, info, trace, warn};

use crate::clock::Clock;
use crate::counters::{Counters, DOMAINS_FETCHING, URLS_ABORTED, URLS_REJECTED};
use crate::error::SchedulerError;
use crate::policy::FetcherPolicy;
use crate::scored_url::ScoredUrl;
use crate::sink::{FetchRecord, OutputSink};

/// Observable lifecycle state of a [`DomainQueue`], derived from its
/// current contents rather than tracked as separate mutable state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueState {
    /// Items may be growing; nothing dispatched.
    Accepting,
    /// At least one batch is out with a fetcher.
    Serving,
    /// The crawl deadline has passed, the queue is empty, but batches
    /// dispatched before the deadline are still outstanding.
    Draining,
    /// Empty and no active fetchers; the queue may be destroyed.
    Terminal,
}

struct Inner {
    items: Vec<ScoredUrl>,
    sorted: bool,
    num_active_fetchers: u32,
    next_fetch_epoch_ms: i64,
}

/// Bounded priority collection of [`ScoredUrl`]s for one origin.
///
/// `offer`, `poll`, `release`, and `abort_all` are mutually exclusive:
/// each acquires the same internal lock for its whole critical section.
/// No operation performs I/O or blocks while holding it; sink writes in
/// `abort_all` take the sink's own internal lock per write, not this
/// queue's lock.
pub struct DomainQueue {
    domain: String,
    policy: FetcherPolicy,
    sink: Arc<dyn OutputSink>,
    counters: Arc<dyn Counters>,
    clock: Arc<dyn Clock>,
    inner: Mutex<Inner>,
}

impl DomainQueue {
    #[must_use]
    pub fn new(
        domain: impl Into<String>,
        policy: FetcherPolicy,
        sink: Arc<dyn OutputSink>,
        counters: Arc<dyn Counters>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            domain: domain.into(),
            policy,
            sink,
            counters,
            clock,
            inner: Mutex::new(Inner {
                items: Vec::new(),
                sorted: true,
                num_active_fetchers: 0,
                next_fetch_epoch_ms: 0,
            }),
        }
    }

    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn policy(&self) -> &FetcherPolicy {
        &self.policy
    }

    /// Number of URLs currently held. Read-only; never changes queue
    /// state, so it does not appear in the invariants `offer`/`poll`
    /// must preserve.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().items.len()
    }

    /// `items.len == 0 AND numActiveFetchers == 0` — the single
    /// condition the supervising layer may use to decide this queue may
    /// be destroyed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.items.is_empty() && inner.num_active_fetchers == 0
    }

    #[must_use]
    pub fn state(&self) -> QueueState {
        let inner = self.inner.lock().unwrap();
        let now = self.clock.now_ms();
        let deadline_passed = self
            .policy
            .crawl_end_epoch_ms()
            .is_some_and(|deadline| now >= deadline);

        match (inner.items.is_empty(), inner.num_active_fetchers > 0) {
            (true, false) => QueueState::Terminal,
            (true, true) if deadline_passed => QueueState::Draining,
            (_, true) => QueueState::Serving,
            (false, false) => QueueState::Accepting,
        }
    }

    /// Attempts to add `item`. Returns `false` if the queue is full and
    /// `item`'s score does not beat the current worst-scored item.
    pub fn offer(&self, item: ScoredUrl) -> bool {
        let mut inner = self.inner.lock().unwrap();
        let max_urls = self.policy.max_urls() as usize;

        if inner.items.len() < max_urls {
            inner.items.push(item);
            inner.sorted = false;
            return true;
        }

        Self::ensure_sorted(&mut inner);

        let worst_score = inner
            .items
            .last()
            .expect("items is non-empty: max_urls >= 1")
            .score();

        if item.score() <= worst_score {
            drop(inner);
            self.counters.increment(URLS_REJECTED, 1);
            trace!(domain = %self.domain, score = item.score(), "offer rejected: does not beat worst queued item");
            return false;
        }

        inner.items.pop();
        let pos = inner.items.binary_search(&item).unwrap_or_else(|p| p);
        inner.items.insert(pos, item);
        trace!(domain = %self.domain, "offer evicted worst item to admit higher-scored URL");
        true
    }

    /// Returns a batch of URLs that may be fetched now, or `None`.
    pub fn poll(&self) -> Option<FetchBatch> {
        let mut inner = self.inner.lock().unwrap();

        if inner.items.is_empty() {
            return None;
        }

        let now = self.clock.now_ms();

        if self
            .policy
            .crawl_end_epoch_ms()
            .is_some_and(|deadline| now >= deadline)
        {
            self.abort_all_locked(&mut inner);
            return None;
        }

        Self::ensure_sorted(&mut inner);

        if self.policy.threads_per_host() > 1 {
            if inner.num_active_fetchers < self.policy.threads_per_host() {
                inner.num_active_fetchers += 1;
                let item = inner.items.remove(0);
                debug!(domain = %self.domain, "dispatching single-item batch under multi-threaded policy");
                return Some(FetchBatch {
                    domain: self.domain.clone(),
                    items: vec![item],
                    released: false,
                });
            }
            return None;
        }

        if inner.num_active_fetchers == 0 && now >= inner.next_fetch_epoch_ms {
            let req = self.policy.fetch_request(inner.items.len() as u32, now);
            let take = (req.num_urls() as usize).min(inner.items.len());
            let items: Vec<ScoredUrl> = inner.items.drain(0..take).collect();
            inner.num_active_fetchers += 1;
            inner.next_fetch_epoch_ms = req.next_request_epoch_ms();
            drop(inner);
            self.counters.increment(DOMAINS_FETCHING, 1);
            debug!(domain = %self.domain, batch_size = items.len(), "dispatching batch under single-threaded policy");
            return Some(FetchBatch {
                domain: self.domain.clone(),
                items,
                released: false,
            });
        }

        None
    }

    /// Signals that `batch` has been fully processed. Releasing a batch
    /// from a different queue, or releasing with no active fetchers,
    /// is a programming error and panics.
    pub fn release(&self, mut batch: FetchBatch) {
        if batch.domain != self.domain {
            panic!(
                "{}",
                SchedulerError::ForeignBatch {
                    queue_domain: self.domain.clone(),
                    batch_domain: batch.domain.clone(),
                }
            );
        }

        let mut inner = self.inner.lock().unwrap();
        if inner.num_active_fetchers == 0 {
            drop(inner);
            panic!(
                "{}",
                SchedulerError::ReleaseUnderflow {
                    domain: self.domain.clone(),
                }
            );
        }
        inner.num_active_fetchers -= 1;
        drop(inner);

        self.counters.decrement(DOMAINS_FETCHING, 1);
        batch.released = true;
        trace!(domain = %self.domain, "batch released");
    }

    /// Emits a synthetic ABORTED record for every URL still queued, then
    /// clears the queue. Does not touch `num_active_fetchers`: batches
    /// already dispatched must still be released by their fetchers.
    /// Calling this twice is idempotent — the second call finds an empty
    /// queue and does nothing.
    pub fn abort_all(&self) {
        let mut inner = self.inner.lock().unwrap();
        self.abort_all_locked(&mut inner);
    }

    fn abort_all_locked(&self, inner: &mut Inner) {
        if inner.items.is_empty() {
            return;
        }

        Self::ensure_sorted(inner);
        let drained: Vec<ScoredUrl> = inner.items.drain(..).collect();
        let count = drained.len();

        for item in drained {
            let (url, _score, metadata) = item.into_parts();
            let record = FetchRecord::aborted(&url, metadata);
            if let Err(err) = self.sink.append(record) {
                warn!(domain = %self.domain, url = %url, error = %err, "sink write failed during abort drain");
            }
        }

        self.counters.increment(URLS_ABORTED, count as i64);
        info!(domain = %self.domain, count, "aborted queued URLs: crawl deadline passed");
    }

    fn ensure_sorted(inner: &mut Inner) {
        if inner.sorted {
            return;
        }
        inner.items.sort();
        inner.sorted = true;
    }
}

/// A non-empty, score-sorted group of [`ScoredUrl`]s released by one
/// [`DomainQueue::poll`] call, to be fetched externally and returned via
/// [`DomainQueue::release`].
pub struct FetchBatch {
    domain: String,
    items: Vec<ScoredUrl>,
    released: bool,
}

impl FetchBatch {
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    #[must_use]
    pub fn items(&self) -> &[ScoredUrl] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Drop for FetchBatch {
    fn drop(&mut self) {
        if !self.released {
            warn!(domain = %self.domain, batch_size = self.items.len(), "FetchBatch dropped without being released");
        }
    }
}
