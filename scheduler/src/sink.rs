//! The output sink: where completion and abort records go.
//!
//! The queue only ever writes to the sink from [`DomainQueue::abort_all`]
//! (successful fetches are recorded by the fetcher itself, outside this
//! crate). The sink is shared across every queue in the process, so
//! implementations must be internally thread-safe.

use std::collections::BTreeMap;

/// Outcome of a fetch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStatus {
    Fetched,
    Error,
    /// The crawl window closed before this URL was dispatched.
    Aborted,
}

/// HTTP status code, or the sentinel used when none was ever obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpStatusCode {
    Code(u16),
    /// No HTTP exchange ever happened for this URL.
    Unknown,
}

/// A completion record, successful or synthetic. Bit-level shape matches
/// what downstream readers expect: both URL fields populated, timing
/// fields zeroed and content empty for records that never actually
/// fetched anything.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRecord {
    pub status: FetchStatus,
    pub http_status: HttpStatusCode,
    pub requested_url: String,
    pub final_url: String,
    pub requested_at_epoch_ms: i64,
    pub fetched_at_epoch_ms: i64,
    pub headers: Option<BTreeMap<String, String>>,
    pub body: Option<Vec<u8>>,
    pub content_type: Option<String>,
    pub bytes_per_second: f64,
    pub metadata: BTreeMap<String, String>,
}

impl FetchRecord {
    /// Builds the synthetic record `abort_all` emits for a URL that never
    /// got dispatched: status `ABORTED`, http code `UNKNOWN`, both URL
    /// fields equal to the normalized URL, all timing fields zero,
    /// content empty, metadata carried through verbatim.
    #[must_use]
    pub fn aborted(normalized_url: &str, metadata: BTreeMap<String, String>) -> Self {
        Self {
            status: FetchStatus::Aborted,
            http_status: HttpStatusCode::Unknown,
            requested_url: normalized_url.to_string(),
            final_url: normalized_url.to_string(),
            requested_at_epoch_ms: 0,
            fetched_at_epoch_ms: 0,
            headers: None,
            body: None,
            content_type: None,
            bytes_per_second: 0.0,
            metadata,
        }
    }
}

/// Append-only writer for completion records.
///
/// Implementations must be safe to call from any thread without external
/// synchronization — the queue takes no lock of its own around this call
/// beyond holding its own internal lock, per the concurrency model.
pub trait OutputSink: Send + Sync {
    /// Appends `record`. Errors are a `String` rather than an associated
    /// error type: `abort_all` only logs failures and continues the
    /// drain (see the crate's error handling design), so callers gain
    /// nothing from a richer error type here.
    fn append(&self, record: FetchRecord) -> Result<(), String>;
}
