//! Lock-free cache of compiled expressions.
//!
//! # Design Decisions
//! - Readers load one immutable map snapshot through `ArcSwap`, no locking
//! - Writers copy the snapshot, insert, and compare-and-swap the whole map;
//!   a lost race re-reads the winner's snapshot and retries
//! - Two threads may parse the same text concurrently, but only one entry is
//!   ever published per key and later readers all share it
//! - No eviction: keys come from configuration, not from requests. A hard
//!   entry limit still applies; past it expressions are parsed per call

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use arc_swap::{ArcSwap, Guard};

use crate::expression::parser::ParsedExpression;
use crate::observability::metrics;

type Snapshot = HashMap<String, Arc<ParsedExpression>>;

/// Expression text → compiled expression.
#[derive(Debug)]
pub struct ExpressionCache {
    entries: ArcSwap<Snapshot>,
    limit: usize,
    overflow_logged: AtomicBool,
}

impl ExpressionCache {
    /// Create an empty cache holding at most `limit` entries.
    pub fn new(limit: usize) -> Self {
        Self {
            entries: ArcSwap::from_pointee(HashMap::new()),
            limit,
            overflow_logged: AtomicBool::new(false),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.load().is_empty()
    }

    /// Cached lookup without compiling.
    pub fn get(&self, text: &str) -> Option<Arc<ParsedExpression>> {
        self.entries.load().get(text).cloned()
    }

    /// Return the cached expression for `text`, compiling and publishing it on a miss.
    pub fn get_or_insert_with<F>(&self, text: &str, parse: F) -> Arc<ParsedExpression>
    where
        F: FnOnce(&str) -> ParsedExpression,
    {
        if let Some(hit) = self.get(text) {
            return hit;
        }

        metrics::record_expression_cache_miss();
        let parsed = Arc::new(parse(text));
        let mut current = self.entries.load_full();

        loop {
            if let Some(existing) = current.get(text) {
                return existing.clone();
            }

            if current.len() >= self.limit {
                if !self.overflow_logged.swap(true, Ordering::Relaxed) {
                    tracing::debug!(limit = self.limit, "Expression cache is full, compiling per call");
                }
                return parsed;
            }

            let mut next = Snapshot::clone(&current);
            next.insert(text.to_string(), parsed.clone());

            let previous = self.entries.compare_and_swap(&current, Arc::new(next));
            if Arc::ptr_eq(&*previous, &current) {
                metrics::record_expression_cache_insert();
                return parsed;
            }

            current = Guard::into_inner(previous);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::parser::parse_expression;
    use crate::expression::trie::VariableTrie;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicU64, AtomicUsize};
    use std::sync::Mutex;
    use std::thread;

    use ::metrics::{Counter, CounterFn, Gauge, Histogram, Key, KeyName, Metadata, Recorder, SharedString, Unit};

    struct Count(AtomicU64);

    impl CounterFn for Count {
        fn increment(&self, value: u64) {
            self.0.fetch_add(value, Ordering::Relaxed);
        }

        fn absolute(&self, value: u64) {
            self.0.fetch_max(value, Ordering::Relaxed);
        }
    }

    /// Records counters by name; gauges are only noted as registered.
    #[derive(Default)]
    struct CountingRecorder {
        counters: Mutex<BTreeMap<String, Arc<Count>>>,
        gauges: Mutex<Vec<String>>,
    }

    impl CountingRecorder {
        fn counter(&self, name: &str) -> u64 {
            let counters = self.counters.lock().unwrap();
            counters.get(name).map_or(0, |c| c.0.load(Ordering::Relaxed))
        }
    }

    impl Recorder for CountingRecorder {
        fn describe_counter(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_gauge(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}
        fn describe_histogram(&self, _: KeyName, _: Option<Unit>, _: SharedString) {}

        fn register_counter(&self, key: &Key, _: &Metadata<'_>) -> Counter {
            let mut counters = self.counters.lock().unwrap();
            let count = counters
                .entry(key.name().to_string())
                .or_insert_with(|| Arc::new(Count(AtomicU64::new(0))))
                .clone();
            Counter::from_arc(count)
        }

        fn register_gauge(&self, key: &Key, _: &Metadata<'_>) -> Gauge {
            self.gauges.lock().unwrap().push(key.name().to_string());
            Gauge::noop()
        }

        fn register_histogram(&self, _: &Key, _: &Metadata<'_>) -> Histogram {
            Histogram::noop()
        }
    }

    fn parse(text: &str) -> ParsedExpression {
        parse_expression(text, &VariableTrie::new())
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ExpressionCache::new(16);
        assert!(cache.get("$host").is_none());

        let first = cache.get_or_insert_with("$host", parse);
        let second = cache.get_or_insert_with("$host", |_| panic!("should be cached"));
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_metrics_count_misses_and_published_entries() {
        let recorder = CountingRecorder::default();
        let full = ExpressionCache::new(1);

        ::metrics::with_local_recorder(&recorder, || {
            let cache = ExpressionCache::new(16);
            cache.get_or_insert_with("$host", parse);
            cache.get_or_insert_with("$host", parse);
            cache.get_or_insert_with("$request_path", parse);

            full.get_or_insert_with("a", parse);
            full.get_or_insert_with("b", parse);
        });

        assert_eq!(recorder.counter(metrics::EXPRESSION_CACHE_MISSES), 4);
        assert_eq!(recorder.counter(metrics::EXPRESSION_CACHE_INSERTS), 3);
        assert!(recorder.gauges.lock().unwrap().is_empty());
    }

    #[test]
    fn test_keys_are_exact() {
        let cache = ExpressionCache::new(16);
        cache.get_or_insert_with("$host", parse);
        cache.get_or_insert_with("$Host", parse);
        cache.get_or_insert_with("$host ", parse);
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_limit_stops_publishing() {
        let cache = ExpressionCache::new(1);
        cache.get_or_insert_with("a", parse);
        let parsed = cache.get_or_insert_with("b", parse);
        assert_eq!(parsed.instructions().len(), 1);
        assert_eq!(cache.len(), 1);
        assert!(cache.get("b").is_none());
    }

    #[test]
    fn test_concurrent_inserts_publish_one_entry_per_key() {
        let cache = Arc::new(ExpressionCache::new(1024));
        let parses = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = cache.clone();
                let parses = parses.clone();
                thread::spawn(move || {
                    for i in 0..64 {
                        let text = format!("$host/{}", (i + t) % 32);
                        cache.get_or_insert_with(&text, |s| {
                            parses.fetch_add(1, Ordering::Relaxed);
                            parse(s)
                        });
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 32);
        assert!(parses.load(Ordering::Relaxed) >= 32);

        let first = cache.get("$host/0").unwrap();
        let again = cache.get_or_insert_with("$host/0", |_| panic!("should be cached"));
        assert!(Arc::ptr_eq(&first, &again));
    }
}
