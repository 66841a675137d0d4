//! Per-domain polite fetch scheduler.
//!
//! This crate owns the part of a web-mining crawler that decides, for a
//! single origin, which URLs may be fetched *now*: it bounds how many
//! scored URLs are kept, orders them by priority, and releases batches to
//! fetcher workers under a configurable politeness policy (minimum delay
//! between requests, maximum concurrent connections per host, optional
//! batching, a global crawl deadline).
//!
//! It does not perform DNS, TCP, or HTTP, does not persist state across
//! restarts, does not enforce `robots.txt`, and does not rank URLs —
//! those are the responsibility of collaborators outside this crate.
//! See [`DomainQueue`] for the core type.

mod clock;
mod counters;
mod error;
mod policy;
mod queue;
mod scored_url;
mod sink;

pub use clock::{Clock, SystemClock};
pub use counters::{AtomicCounters, Counters, DOMAINS_FETCHING, URLS_ABORTED, URLS_REJECTED};
pub use error::SchedulerError;
pub use policy::{FetchRequest, FetcherPolicy};
pub use queue::{DomainQueue, FetchBatch, QueueState};
pub use scored_url::ScoredUrl;
pub use sink::{FetchRecord, FetchStatus, HttpStatusCode, OutputSink};
