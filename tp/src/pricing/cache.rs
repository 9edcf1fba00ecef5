//! Process-wide price cache with TTL and in-flight deduplication
//!
//! One fetch runs per key at a time. Concurrent callers for the same key join
//! that fetch instead of starting their own. The map keeps only a weak handle
//! to a running fetch: it keeps going while any caller still awaits it and is
//! dropped, with its upstream calls, once every caller has gone away.
//!
//! A fetch marked not cacheable, because some provider failed in a way a
//! retry could fix, is handed to the callers that waited on it and then
//! forgotten, so the next request asks the providers again.

use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared, WeakShared};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

use super::PriceComparison;

/// Outcome of one aggregated fetch
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub comparisons: Vec<PriceComparison>,
    /// False when a provider failed transiently
    pub cacheable: bool,
}

/// A fetch producing one aggregated comparison
pub type ComparisonFetch = BoxFuture<'static, Fetched>;

/// Identity of a price comparison
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteKey {
    pub property_id: String,
    pub checkin: NaiveDate,
    pub checkout: NaiveDate,
    pub guests: u32,
}

enum Slot {
    Ready {
        value: Vec<PriceComparison>,
        expires_at: Instant,
    },
    Pending {
        id: u64,
        fetch: WeakShared<ComparisonFetch>,
    },
}

enum Lookup {
    Hit(Vec<PriceComparison>),
    Join(Shared<ComparisonFetch>),
}

/// Internal state protected by mutex
struct CacheInner {
    slots: HashMap<QuoteKey, Slot>,
    next_id: u64,
}

impl CacheInner {
    /// Publish a finished fetch, unless the slot was taken over meanwhile
    fn store(&mut self, key: QuoteKey, id: u64, fetched: Fetched, ttl: Duration, max_entries: usize) {
        let ours = match self.slots.get(&key) {
            Some(Slot::Pending { id: pending, .. }) => *pending == id,
            Some(Slot::Ready { .. }) => false,
            None => true,
        };
        if !ours {
            debug!(?key, "CacheInner::store: slot superseded, dropping result");
            return;
        }

        if !fetched.cacheable {
            debug!(?key, "CacheInner::store: transient provider failure, not caching");
            self.slots.remove(&key);
            return;
        }

        let now = Instant::now();
        self.slots.insert(
            key,
            Slot::Ready {
                value: fetched.comparisons,
                expires_at: now + ttl,
            },
        );
        self.evict(now, max_entries);
    }

    fn evict(&mut self, now: Instant, max_entries: usize) {
        self.slots.retain(|_, slot| match slot {
            Slot::Ready { expires_at, .. } => *expires_at > now,
            Slot::Pending { fetch, .. } => fetch.upgrade().is_some(),
        });

        while self.slots.len() > max_entries {
            let oldest = self
                .slots
                .iter()
                .filter_map(|(key, slot)| match slot {
                    Slot::Ready { expires_at, .. } => Some((key, *expires_at)),
                    Slot::Pending { .. } => None,
                })
                .min_by_key(|(_, expires_at)| *expires_at)
                .map(|(key, _)| key.clone());
            match oldest {
                Some(key) => {
                    self.slots.remove(&key);
                }
                None => break,
            }
        }
    }
}

/// Bounded TTL cache shared by every price comparison in the process
pub struct PriceCache {
    ttl: Duration,
    max_entries: usize,
    inner: Arc<Mutex<CacheInner>>,
}

impl PriceCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        debug!(?ttl, %max_entries, "PriceCache::new: called");
        Self {
            ttl,
            max_entries: max_entries.max(1),
            inner: Arc::new(Mutex::new(CacheInner {
                slots: HashMap::new(),
                next_id: 0,
            })),
        }
    }

    /// Fresh cached value, the running fetch for `key`, or a new fetch from `fetch`
    pub async fn get_or_fetch<F>(&self, key: QuoteKey, fetch: F) -> Vec<PriceComparison>
    where
        F: FnOnce() -> ComparisonFetch,
    {
        debug!(?key, "PriceCache::get_or_fetch: called");
        let shared = {
            let mut inner = self.inner.lock().await;
            let now = Instant::now();

            let lookup = match inner.slots.get(&key) {
                Some(Slot::Ready { value, expires_at }) if *expires_at > now => Some(Lookup::Hit(value.clone())),
                Some(Slot::Pending { fetch, .. }) => fetch.upgrade().map(Lookup::Join),
                _ => None,
            };

            match lookup {
                Some(Lookup::Hit(value)) => {
                    debug!("PriceCache::get_or_fetch: hit");
                    return value;
                }
                Some(Lookup::Join(shared)) => {
                    debug!("PriceCache::get_or_fetch: joining in-flight fetch");
                    shared
                }
                None => {
                    debug!("PriceCache::get_or_fetch: miss, starting fetch");
                    let id = inner.next_id;
                    inner.next_id += 1;

                    let cache = Arc::clone(&self.inner);
                    let store_key = key.clone();
                    let ttl = self.ttl;
                    let max_entries = self.max_entries;
                    let upstream = fetch();
                    let shared = async move {
                        let fetched = upstream.await;
                        cache.lock().await.store(store_key, id, fetched.clone(), ttl, max_entries);
                        fetched
                    }
                    .boxed()
                    .shared();

                    if let Some(weak) = shared.downgrade() {
                        inner.slots.insert(key, Slot::Pending { id, fetch: weak });
                    }
                    shared
                }
            }
        };

        shared.await.comparisons
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Provider, QuoteStatus};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn key(id: &str) -> QuoteKey {
        QuoteKey {
            property_id: id.to_string(),
            checkin: NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            checkout: NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
            guests: 2,
        }
    }

    fn comparison(price: f64) -> Vec<PriceComparison> {
        vec![PriceComparison {
            provider: Provider::Agoda,
            price: Some(price),
            url: "https://agoda.example".to_string(),
            fetched_at: None,
            status: QuoteStatus::Live,
        }]
    }

    fn degraded() -> Fetched {
        let comparisons = vec![
            PriceComparison {
                provider: Provider::Agoda,
                price: Some(10.0),
                url: "https://agoda.example".to_string(),
                fetched_at: None,
                status: QuoteStatus::Live,
            },
            PriceComparison {
                provider: Provider::Booking,
                price: None,
                url: "https://booking.example".to_string(),
                fetched_at: None,
                status: QuoteStatus::Fallback,
            },
        ];
        Fetched {
            comparisons,
            cacheable: false,
        }
    }

    fn counting_fetch(calls: &Arc<AtomicUsize>, price: f64, delay: Duration) -> ComparisonFetch {
        let calls = Arc::clone(calls);
        async move {
            calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(delay).await;
            Fetched {
                comparisons: comparison(price),
                cacheable: true,
            }
        }
        .boxed()
    }

    #[tokio::test]
    async fn test_second_call_is_a_hit() {
        let cache = PriceCache::new(Duration::from_secs(60), 16);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 10.0, Duration::ZERO))
            .await;
        let second = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 99.0, Duration::ZERO))
            .await;

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_failure_is_not_cached() {
        let cache = PriceCache::new(Duration::from_secs(60), 16);
        let calls = Arc::new(AtomicUsize::new(0));

        let first = {
            let calls = Arc::clone(&calls);
            cache
                .get_or_fetch(key("a"), move || {
                    async move {
                        calls.fetch_add(1, Ordering::SeqCst);
                        degraded()
                    }
                    .boxed()
                })
                .await
        };
        assert_eq!(first[1].status, QuoteStatus::Fallback);

        let retry = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 12.0, Duration::ZERO))
            .await;
        assert_eq!(retry[0].price, Some(12.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The live result sticks
        let cached = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 99.0, Duration::ZERO))
            .await;
        assert_eq!(cached[0].price, Some(12.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let cache = PriceCache::new(Duration::from_millis(20), 16);
        let calls = Arc::new(AtomicUsize::new(0));

        cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 10.0, Duration::ZERO))
            .await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        let again = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 12.0, Duration::ZERO))
            .await;

        assert_eq!(again[0].price, Some(12.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_fetch() {
        let cache = Arc::new(PriceCache::new(Duration::from_secs(60), 16));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_fetch(key("a"), || counting_fetch(&calls, 10.0, Duration::from_millis(50)))
                    .await
            }));
        }
        for handle in handles {
            assert_eq!(handle.await.unwrap()[0].price, Some(10.0));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_cancelled_starter_does_not_break_joiners() {
        let cache = Arc::new(PriceCache::new(Duration::from_secs(60), 16));
        let calls = Arc::new(AtomicUsize::new(0));

        let starter = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(key("a"), || counting_fetch(&calls, 10.0, Duration::from_millis(100)))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let joiner = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(key("a"), || counting_fetch(&calls, 99.0, Duration::ZERO))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        starter.abort();

        let value = joiner.await.unwrap();
        assert_eq!(value[0].price, Some(10.0));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The joiner completed the fetch, so the result was cached
        let cached = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 50.0, Duration::ZERO))
            .await;
        assert_eq!(cached[0].price, Some(10.0));
    }

    #[tokio::test]
    async fn test_fetch_abandoned_when_every_caller_cancels() {
        let cache = Arc::new(PriceCache::new(Duration::from_secs(60), 16));
        let calls = Arc::new(AtomicUsize::new(0));

        let lone = {
            let cache = Arc::clone(&cache);
            let calls = Arc::clone(&calls);
            tokio::spawn(async move {
                cache
                    .get_or_fetch(key("a"), || counting_fetch(&calls, 10.0, Duration::from_secs(30)))
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        lone.abort();
        let _ = lone.await;

        // Nothing is left to join, so the next caller starts over
        let fresh = cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 20.0, Duration::ZERO))
            .await;
        assert_eq!(fresh[0].price, Some(20.0));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_max_entries_evicts_oldest() {
        let cache = PriceCache::new(Duration::from_secs(60), 2);
        let calls = Arc::new(AtomicUsize::new(0));

        for id in ["a", "b", "c"] {
            cache
                .get_or_fetch(key(id), || counting_fetch(&calls, 1.0, Duration::ZERO))
                .await;
            tokio::time::sleep(Duration::from_millis(5)).await;
        }

        // "c" is still held
        cache
            .get_or_fetch(key("c"), || counting_fetch(&calls, 1.0, Duration::ZERO))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // "a" was evicted first
        cache
            .get_or_fetch(key("a"), || counting_fetch(&calls, 1.0, Duration::ZERO))
            .await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }
}
