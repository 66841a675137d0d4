//! [`FetcherPolicy`]: immutable politeness configuration, and the
//! [`FetchRequest`] plan it derives per dispatch.

/// Immutable politeness configuration shared read-only across every
/// [`DomainQueue`](crate::DomainQueue). Built once by the caller's config
/// layer (outside this crate's scope) and handed to each queue at
/// construction.
#[derive(Debug, Clone, Copy)]
pub struct FetcherPolicy {
    crawl_delay_ms: u32,
    max_urls: u32,
    threads_per_host: u32,
    requests_per_batch: u32,
    crawl_end_epoch_ms: Option<i64>,
}

impl FetcherPolicy {
    /// Builds a policy. `max_urls`, `threads_per_host`, and
    /// `requests_per_batch` are clamped to a minimum of 1 — the data
    /// model requires each to hold, and silently clamping rather than
    /// returning a `Result` keeps callers from needing to thread a
    /// construction error through purely-local config building.
    #[must_use]
    pub fn new(
        crawl_delay_ms: u32,
        max_urls: u32,
        threads_per_host: u32,
        requests_per_batch: u32,
        crawl_end_epoch_ms: Option<i64>,
    ) -> Self {
        Self {
            crawl_delay_ms,
            max_urls: max_urls.max(1),
            threads_per_host: threads_per_host.max(1),
            requests_per_batch: requests_per_batch.max(1),
            crawl_end_epoch_ms,
        }
    }

    #[must_use]
    pub fn crawl_delay_ms(&self) -> u32 {
        self.crawl_delay_ms
    }

    #[must_use]
    pub fn max_urls(&self) -> u32 {
        self.max_urls
    }

    #[must_use]
    pub fn threads_per_host(&self) -> u32 {
        self.threads_per_host
    }

    #[must_use]
    pub fn requests_per_batch(&self) -> u32 {
        self.requests_per_batch
    }

    #[must_use]
    pub fn crawl_end_epoch_ms(&self) -> Option<i64> {
        self.crawl_end_epoch_ms
    }

    /// Derives how many URLs to release now and when the *next* request
    /// to this host may begin, given the current queue size and the
    /// current instant.
    ///
    /// Under single-threaded (`threads_per_host == 1`) politeness, the
    /// next request may not begin before `now + crawl_delay_ms` —
    /// including when `crawl_delay_ms == 0`, which simply means no
    /// enforced gap. Under multi-threaded dispatch, no minimum delay is
    /// enforced between dispatches (see the open question in the
    /// project's design notes); `next_request_epoch_ms` is `now` and is
    /// not used to gate anything in that mode.
    #[must_use]
    pub fn fetch_request(&self, queue_size: u32, now_ms: i64) -> FetchRequest {
        let num_urls = queue_size.min(self.requests_per_batch).max(1);
        let next_request_epoch_ms = if self.threads_per_host == 1 {
            now_ms + i64::from(self.crawl_delay_ms)
        } else {
            now_ms
        };

        FetchRequest {
            num_urls,
            next_request_epoch_ms,
        }
    }
}

/// A policy-derived dispatch plan, valid for the single `poll` call that
/// produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    num_urls: u32,
    next_request_epoch_ms: i64,
}

impl FetchRequest {
    #[must_use]
    pub fn num_urls(&self) -> u32 {
        self.num_urls
    }

    #[must_use]
    pub fn next_request_epoch_ms(&self) -> i64 {
        self.next_request_epoch_ms
    }
}
