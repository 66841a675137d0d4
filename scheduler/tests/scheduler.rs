//! Integration tests exercising the public API of `polite-scheduler`
//! across multiple queues sharing one sink and one counters instance —
//! the shape a real crawl supervisor would use.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use polite_scheduler::{
    AtomicCounters, Clock, Counters, DomainQueue, FetchRecord, FetcherPolicy, OutputSink,
    QueueState, ScoredUrl,
};

struct FakeClock(AtomicI64);

impl FakeClock {
    fn new(start: i64) -> Self {
        Self(AtomicI64::new(start))
    }

    fn set(&self, t: i64) {
        self.0.store(t, Ordering::SeqCst);
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Default)]
struct VecSink {
    records: Mutex<Vec<FetchRecord>>,
}

impl OutputSink for VecSink {
    fn append(&self, record: FetchRecord) -> Result<(), String> {
        self.records.lock().unwrap().push(record);
        Ok(())
    }
}

fn scored(url: &str, score: f64) -> ScoredUrl {
    ScoredUrl::new(url, score, BTreeMap::new()).unwrap()
}

#[test]
fn multiple_queues_share_one_sink_under_deadline() {
    let sink = Arc::new(VecSink::default());
    let counters = Arc::new(AtomicCounters::new());
    let clock = Arc::new(FakeClock::new(0));

    let policy = FetcherPolicy::new(0, 10, 1, 1, Some(50));

    let queue_a = DomainQueue::new(
        "a.example",
        policy,
        sink.clone() as Arc<dyn OutputSink>,
        counters.clone() as Arc<dyn Counters>,
        clock.clone() as Arc<dyn Clock>,
    );
    let queue_b = DomainQueue::new(
        "b.example",
        policy,
        sink.clone() as Arc<dyn OutputSink>,
        counters.clone() as Arc<dyn Counters>,
        clock.clone() as Arc<dyn Clock>,
    );

    queue_a.offer(scored("https://a.example/1", 1.0));
    queue_a.offer(scored("https://a.example/2", 2.0));
    queue_b.offer(scored("https://b.example/1", 1.0));

    clock.set(100);
    assert!(queue_a.poll().is_none());
    assert!(queue_b.poll().is_none());

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r.requested_url.contains(".example/")));
    drop(records);

    assert!(queue_a.is_empty());
    assert!(queue_b.is_empty());
}

#[test]
fn queue_state_transitions_through_full_lifecycle() {
    let sink = Arc::new(VecSink::default());
    let counters = Arc::new(AtomicCounters::new());
    let clock = Arc::new(FakeClock::new(0));
    let policy = FetcherPolicy::new(0, 10, 1, 1, Some(1000));

    let queue = DomainQueue::new(
        "example.com",
        policy,
        sink as Arc<dyn OutputSink>,
        counters as Arc<dyn Counters>,
        clock.clone() as Arc<dyn Clock>,
    );

    assert_eq!(queue.state(), QueueState::Terminal);

    queue.offer(scored("https://example.com/", 1.0));
    assert_eq!(queue.state(), QueueState::Accepting);

    let batch = queue.poll().unwrap();
    assert_eq!(queue.state(), QueueState::Serving);

    clock.set(2000);
    assert_eq!(
        queue.state(),
        QueueState::Draining,
        "items already empty (single item was dispatched) and a batch is still outstanding past the deadline"
    );

    queue.release(batch);
    assert_eq!(queue.state(), QueueState::Terminal);
}

#[test]
fn draining_state_while_dispatched_batch_outstanding_past_deadline() {
    let sink = Arc::new(VecSink::default());
    let counters = Arc::new(AtomicCounters::new());
    let clock = Arc::new(FakeClock::new(0));
    let policy = FetcherPolicy::new(0, 10, 1, 1, Some(50));

    let queue = DomainQueue::new(
        "example.com",
        policy,
        sink as Arc<dyn OutputSink>,
        counters as Arc<dyn Counters>,
        clock.clone() as Arc<dyn Clock>,
    );

    queue.offer(scored("https://example.com/1", 1.0));
    queue.offer(scored("https://example.com/2", 2.0));
    let batch = queue.poll().expect("dispatched before deadline");

    clock.set(100);
    assert!(queue.poll().is_none(), "drains remaining items on next poll");
    assert_eq!(queue.state(), QueueState::Draining);

    queue.release(batch);
    assert_eq!(queue.state(), QueueState::Terminal);
}

#[test]
fn high_churn_offer_under_bounded_capacity_keeps_top_k() {
    let sink = Arc::new(VecSink::default());
    let counters = Arc::new(AtomicCounters::new());
    let clock = Arc::new(FakeClock::new(0));
    let policy = FetcherPolicy::new(0, 5, 1, 5, None);

    let queue = Arc::new(DomainQueue::new(
        "example.com",
        policy,
        sink as Arc<dyn OutputSink>,
        counters as Arc<dyn Counters>,
        clock as Arc<dyn Clock>,
    ));

    std::thread::scope(|s| {
        for t in 0..4 {
            let queue = Arc::clone(&queue);
            s.spawn(move || {
                for i in 0..200 {
                    let score = f64::from(t * 200 + i);
                    queue.offer(scored(&format!("https://u{t}-{i}.example/"), score));
                }
            });
        }
    });

    assert_eq!(queue.len(), 5);
    let batch = queue.poll().expect("single-threaded batch of up to 5");
    let scores: Vec<f64> = batch.items().iter().map(ScoredUrl::score).collect();
    let mut sorted_desc = scores.clone();
    sorted_desc.sort_by(|a, b| b.partial_cmp(a).unwrap());
    assert_eq!(scores, sorted_desc, "batch is returned score-descending");
    assert_eq!(scores.len(), 5);
    queue.release(batch);
}
