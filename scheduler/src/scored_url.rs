//! [`ScoredUrl`]: a priority-ordered unit of crawl work for one origin.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::SchedulerError;

/// A URL queued for fetch, carrying its upstream priority score and an
/// opaque metadata bag that is carried through verbatim to the fetched
/// record (or the aborted record, if the crawl window closes first).
///
/// Ordered by score descending, URL ascending as tiebreak, so that a
/// `BTreeSet`-free sorted `Vec<ScoredUrl>` can be kept in canonical order
/// with a single `sort_unstable` and searched with `binary_search`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredUrl {
    normalized_url: String,
    score: f64,
    metadata: BTreeMap<String, String>,
}

impl ScoredUrl {
    /// Builds a `ScoredUrl`, validating both invariants the queue relies
    /// on: the URL is non-empty and syntactically valid, and the score is
    /// finite. Normalization itself (what "canonical form" means for a
    /// given URL) is the upstream scorer's job; this only checks that the
    /// result parses.
    pub fn new(
        normalized_url: impl Into<String>,
        score: f64,
        metadata: BTreeMap<String, String>,
    ) -> Result<Self, SchedulerError> {
        let normalized_url = normalized_url.into();

        if !score.is_finite() {
            return Err(SchedulerError::NonFiniteScore {
                url: normalized_url,
                score,
            });
        }

        url::Url::parse(&normalized_url).map_err(|source| SchedulerError::InvalidUrl {
            url: normalized_url.clone(),
            source,
        })?;

        Ok(Self {
            normalized_url,
            score,
            metadata,
        })
    }

    #[must_use]
    pub fn normalized_url(&self) -> &str {
        &self.normalized_url
    }

    #[must_use]
    pub fn score(&self) -> f64 {
        self.score
    }

    #[must_use]
    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    pub fn into_parts(self) -> (String, f64, BTreeMap<String, String>) {
        (self.normalized_url, self.score, self.metadata)
    }
}

impl Eq for ScoredUrl {}

impl PartialOrd for ScoredUrl {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScoredUrl {
    /// Score descending, then URL ascending — so the *first* element of a
    /// sorted slice is always the next URL to dispatch.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .partial_cmp(&self.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| self.normalized_url.cmp(&other.normalized_url))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(u: &str, score: f64) -> ScoredUrl {
        ScoredUrl::new(u, score, BTreeMap::new()).unwrap()
    }

    #[test]
    fn rejects_non_finite_score() {
        let err = ScoredUrl::new("https://a.example/", f64::NAN, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, SchedulerError::NonFiniteScore { .. }));
    }

    #[test]
    fn rejects_unparsable_url() {
        let err = ScoredUrl::new("not a url", 1.0, BTreeMap::new()).unwrap_err();
        assert!(matches!(err, SchedulerError::InvalidUrl { .. }));
    }

    #[test]
    fn orders_by_score_descending_then_url_ascending() {
        let mut urls = vec![
            url("https://b.example/", 3.0),
            url("https://a.example/", 3.0),
            url("https://c.example/", 5.0),
        ];
        urls.sort();
        let ordered: Vec<&str> = urls.iter().map(ScoredUrl::normalized_url).collect();
        assert_eq!(
            ordered,
            vec!["https://c.example/", "https://a.example/", "https://b.example/"]
        );
    }

    #[test]
    fn metadata_round_trips_through_into_parts() {
        let mut meta = BTreeMap::new();
        meta.insert("depth".to_string(), "2".to_string());
        let scored = ScoredUrl::new("https://a.example/", 1.0, meta.clone()).unwrap();
        let (u, s, m) = scored.into_parts();
        assert_eq!(u, "https://a.example/");
        assert_eq!(s, 1.0);
        assert_eq!(m, meta);
    }
}
