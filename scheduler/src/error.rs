//! Error conditions, fatal and recoverable.
//!
//! `DomainQueue`'s own calling contract (`ForeignBatch`, `ReleaseUnderflow`)
//! is never recoverable — queue admission/dispatch outcomes that *are*
//! routine (rejection, a deadline passing, no batch ready) are reported
//! through `bool`/`Option` return values instead, never through this type.
//! Constructing one of those two variants is paired with a `panic!`, never
//! propagated upward.
//!
//! `ScoredUrl::new`'s two variants (`NonFiniteScore`, `InvalidUrl`) are the
//! opposite: ordinary, recoverable input validation, returned from a
//! fallible constructor for the caller to handle or propagate like any
//! other `Result`.
use thiserror::Error;

/// Either a violation of [`DomainQueue`](crate::DomainQueue)'s calling
/// contract, or a recoverable [`ScoredUrl`](crate::ScoredUrl) construction
/// error — see the module docs for which variants are which.
///
/// The queue-contract variants are programmer errors, not recoverable
/// runtime conditions: correctness of the active-fetcher count matters
/// more than staying up, so callers are expected to crash rather than
/// silently drift the count.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// `release` was called with a batch whose `owning_queue` tag does not
    /// match this queue.
    #[error("released batch for domain {batch_domain:?} on queue for domain {queue_domain:?}")]
    ForeignBatch {
        queue_domain: String,
        batch_domain: String,
    },

    /// `release` was called more times than matching `poll`s returned
    /// non-empty batches, i.e. `num_active_fetchers` would go negative.
    #[error("active-fetcher count underflowed on domain {domain:?}: released with none active")]
    ReleaseUnderflow { domain: String },

    /// A normalized URL failed to parse as a syntactically valid URL.
    #[error("invalid URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A score was not finite (NaN or +/-infinity).
    #[error("non-finite score {score} for URL {url:?}")]
    NonFiniteScore { url: String, score: f64 },
}
