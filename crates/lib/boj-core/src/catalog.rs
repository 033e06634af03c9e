//! Time-bounded cache over a paginated upstream collection.
//!
//! [`PagedCollectionCache`] materializes every page of an upstream list into a
//! single [`Collection`] and keeps it for a TTL window. Concurrent callers that
//! miss the cache attach to one shared sweep instead of starting their own.

use std::error::Error;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use boj_types::Collection;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use serde::de::DeserializeOwned;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::fetch::{FetchClient, FetchError};

pub const DEFAULT_TTL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_MAX_PAGES: u32 = 20;

type SweepOutcome<T> = Result<Arc<Collection<T>>, CatalogError>;
type SharedSweep<T> = Shared<BoxFuture<'static, SweepOutcome<T>>>;

/// Configuration for a paginated collection cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogConfig {
    pub ttl: Duration,
    pub max_pages: u32,
}

impl CatalogConfig {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }

    #[must_use]
    pub const fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure of a whole sweep. Cloned to every caller attached to that sweep.
#[derive(Debug, Clone)]
pub enum CatalogError {
    /// The first page could not be fetched or decoded.
    Fetch { page: u32, source: Arc<FetchError> },
    /// The sweep task ended without producing an outcome.
    Aborted(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch { source, .. } => write!(f, "{source}"),
            Self::Aborted(message) => write!(f, "catalog sweep aborted: {message}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Fetch { source, .. } => Some(source.as_ref()),
            Self::Aborted(_) => None,
        }
    }
}

struct CacheEntry<T> {
    collection: Arc<Collection<T>>,
    expires_at: Instant,
}

impl<T> CacheEntry<T> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

struct CacheState<T> {
    entry: Option<CacheEntry<T>>,
    in_flight: Option<SharedSweep<T>>,
}

struct CacheInner<T> {
    client: FetchClient,
    endpoint: String,
    config: CatalogConfig,
    state: Mutex<CacheState<T>>,
}

impl<T> CacheInner<T> {
    fn state(&self) -> MutexGuard<'_, CacheState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight marker when the sweep task ends, however it ends.
struct InFlightRelease<'a, T> {
    inner: &'a CacheInner<T>,
}

impl<T> Drop for InFlightRelease<'_, T> {
    fn drop(&mut self) {
        self.inner.state().in_flight = None;
        debug!(endpoint = %self.inner.endpoint, "catalog sweep released");
    }
}

/// Coalescing TTL cache over one paginated upstream endpoint.
pub struct PagedCollectionCache<T> {
    inner: Arc<CacheInner<T>>,
}

impl<T> Clone for PagedCollectionCache<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> fmt::Debug for PagedCollectionCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedCollectionCache")
            .field("endpoint", &self.inner.endpoint)
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl<T> PagedCollectionCache<T>
where
    T: DeserializeOwned + Send + Sync + 'static,
{
    /// Creates an empty cache over `endpoint`. Pages are requested as
    /// `<endpoint>?page=<n>` starting at 1.
    #[must_use]
    pub fn new(client: FetchClient, endpoint: impl Into<String>, config: CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                client,
                endpoint: endpoint.into(),
                config,
                state: Mutex::new(CacheState {
                    entry: None,
                    in_flight: None,
                }),
            }),
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Returns the cached collection, sweeping the upstream on a miss.
    ///
    /// The returned collection may hold fewer items than its `count` when a page
    /// after the first failed mid-sweep.
    ///
    /// # Errors
    /// Returns [`CatalogError`] when the first page cannot be fetched. Every
    /// caller attached to that sweep receives the same error.
    pub async fn get(&self) -> Result<Arc<Collection<T>>, CatalogError> {
        let sweep = {
            let mut state = self.inner.state();
            if let Some(entry) = state
                .entry
                .as_ref()
                .filter(|entry| entry.is_fresh(Instant::now()))
            {
                return Ok(entry.collection.clone());
            }
            if state.in_flight.is_some() {
                debug!(endpoint = %self.inner.endpoint, "joining in-flight catalog sweep");
            }
            state
                .in_flight
                .get_or_insert_with(|| self.spawn_sweep())
                .clone()
        };
        sweep.await
    }

    /// True when a fresh entry is cached.
    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.inner
            .state()
            .entry
            .as_ref()
            .is_some_and(|entry| entry.is_fresh(Instant::now()))
    }

    /// Drops the cached entry. A sweep already in flight is left running.
    pub fn invalidate(&self) {
        self.inner.state().entry = None;
    }

    /// Starts a sweep task. Must be called with the state lock held so the
    /// handle is installed before the task can release it.
    fn spawn_sweep(&self) -> SharedSweep<T> {
        let inner = self.inner.clone();
        let task = tokio::spawn(async move {
            let _release = InFlightRelease { inner: &inner };
            let outcome = sweep(&inner).await.map(Arc::new);
            if let Ok(collection) = &outcome {
                inner.state().entry = Some(CacheEntry {
                    collection: collection.clone(),
                    expires_at: Instant::now() + inner.config.ttl,
                });
            }
            outcome
        });

        async move {
            match task.await {
                Ok(outcome) => outcome,
                Err(err) => Err(CatalogError::Aborted(err.to_string())),
            }
        }
        .boxed()
        .shared()
    }
}

async fn sweep<T: DeserializeOwned>(inner: &CacheInner<T>) -> Result<Collection<T>, CatalogError> {
    let mut items = Vec::new();
    let mut count = 0_u64;

    for page in 1..=inner.config.max_pages {
        let url = format!("{}?page={page}", inner.endpoint);
        match inner.client.get_json::<Collection<T>>(&url).await {
            Ok(batch) => {
                count = batch.count;
                items.extend(batch.items);
                if u64::try_from(items.len()).is_ok_and(|len| len >= count) {
                    break;
                }
            }
            Err(err) if page == 1 => {
                warn!(endpoint = %inner.endpoint, error = %err, "catalog sweep failed on first page");
                return Err(CatalogError::Fetch {
                    page,
                    source: Arc::new(err),
                });
            }
            Err(err) => {
                warn!(
                    endpoint = %inner.endpoint,
                    page,
                    collected = items.len(),
                    count,
                    error = %err,
                    "catalog sweep stopped early; keeping partial collection"
                );
                break;
            }
        }
    }

    info!(endpoint = %inner.endpoint, collected = items.len(), count, "catalog sweep finished");
    Ok(Collection::new(count, items))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde::Deserialize;
    use serde_json::json;

    use crate::fetch::{FetchOptions, FnTransport, HttpResponse, TransportError, TransportFuture};

    #[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
    struct Item {
        id: u64,
    }

    const PAGE_SIZE: u64 = 50;

    /// Upstream of `total` items served `PAGE_SIZE` per page. Pages listed in
    /// `failing` always answer 500; pages listed in `empty` answer 200 with no
    /// items and push the rest of the catalog one page later.
    struct Upstream {
        total: u64,
        failing: Vec<u32>,
        empty: Vec<u32>,
        latency: Duration,
        calls: Arc<AtomicUsize>,
    }

    impl Upstream {
        fn new(total: u64) -> Self {
            Self {
                total,
                failing: Vec::new(),
                empty: Vec::new(),
                latency: Duration::from_millis(10),
                calls: Arc::new(AtomicUsize::new(0)),
            }
        }

        fn failing(mut self, pages: &[u32]) -> Self {
            self.failing = pages.to_vec();
            self
        }

        fn empty(mut self, pages: &[u32]) -> Self {
            self.empty = pages.to_vec();
            self
        }

        fn cache(&self) -> PagedCollectionCache<Item> {
            let total = self.total;
            let failing = self.failing.clone();
            let empty = self.empty.clone();
            let latency = self.latency;
            let calls = self.calls.clone();
            let transport = FnTransport(move |url: String| -> TransportFuture<'static> {
                calls.fetch_add(1, Ordering::SeqCst);
                let page: u32 = url
                    .rsplit("page=")
                    .next()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(1);
                let fail = failing.contains(&page);
                let blank = empty.contains(&page);
                let offset = u64::from(page - 1)
                    - empty.iter().filter(|&&other| other < page).map(|_| 1_u64).sum::<u64>();
                Box::pin(async move {
                    tokio::time::sleep(latency).await;
                    if fail {
                        return Ok::<_, TransportError>(HttpResponse {
                            status: 500,
                            status_text: "Internal Server Error".to_string(),
                            body: String::new(),
                        });
                    }
                    let start = offset * PAGE_SIZE;
                    let end = if blank { start } else { (start + PAGE_SIZE).min(total) };
                    let items: Vec<_> = (start..end).map(|id| json!({ "id": id + 1 })).collect();
                    Ok(HttpResponse {
                        status: 200,
                        status_text: "OK".to_string(),
                        body: json!({ "count": total, "items": items }).to_string(),
                    })
                })
            });
            let client = FetchClient::with_transport(Arc::new(transport), FetchOptions::default());
            PagedCollectionCache::new(client, "http://upstream/tag/list", CatalogConfig::default())
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweeps_every_page_once() {
        let upstream = Upstream::new(120);
        let cache = upstream.cache();

        let collection = cache.get().await.unwrap();
        assert_eq!(collection.count, 120);
        assert_eq!(collection.items.len(), 120);
        assert_eq!(collection.items.last(), Some(&Item { id: 120 }));
        assert_eq!(upstream.calls(), 3);
        assert!(cache.is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_served_without_upstream_calls() {
        let upstream = Upstream::new(120);
        let cache = upstream.cache();

        let first = cache.get().await.unwrap();
        let second = cache.get().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(upstream.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_sweep() {
        let upstream = Upstream::new(120);
        let cache = upstream.cache();

        let results =
            futures::future::join_all((0..8).map(|_| {
                let cache = cache.clone();
                async move { cache.get().await }
            }))
            .await;

        let first = results[0].as_ref().unwrap();
        for result in &results {
            assert!(Arc::ptr_eq(first, result.as_ref().unwrap()));
        }
        assert_eq!(upstream.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_share_one_failure() {
        let upstream = Upstream::new(120).failing(&[1]);
        let cache = upstream.cache();

        let (left, right) = tokio::join!(cache.get(), cache.get());
        let (
            Err(CatalogError::Fetch { source: left, page: 1 }),
            Err(CatalogError::Fetch { source: right, .. }),
        ) = (left, right)
        else {
            panic!("both callers should observe the first-page failure");
        };
        assert!(Arc::ptr_eq(&left, &right));
        // One page, four attempts.
        assert_eq!(upstream.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn mid_sweep_failure_keeps_partial_collection() {
        let upstream = Upstream::new(150).failing(&[2]);
        let cache = upstream.cache();

        let collection = cache.get().await.unwrap();
        assert_eq!(collection.count, 150);
        assert_eq!(collection.items.len(), 50);
        assert!(collection.is_partial());
        // Page 1 once, page 2 four times, page 3 never.
        assert_eq!(upstream.calls(), 5);
        assert!(cache.is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn empty_page_mid_sweep_does_not_end_it() {
        let upstream = Upstream::new(150).empty(&[2]);
        let cache = upstream.cache();

        let collection = cache.get().await.unwrap();
        assert_eq!(collection.count, 150);
        assert_eq!(collection.items.len(), 150);
        assert_eq!(collection.items.last(), Some(&Item { id: 150 }));
        assert!(!collection.is_partial());
        assert_eq!(upstream.calls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn first_page_failure_caches_nothing() {
        let upstream = Upstream::new(120).failing(&[1]);
        let cache = upstream.cache();

        let err = cache.get().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "API request failed with status 500: Internal Server Error"
        );
        assert!(!cache.is_fresh());
        assert_eq!(upstream.calls(), 4);

        assert!(cache.get().await.is_err());
        assert_eq!(upstream.calls(), 8);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_triggers_exactly_one_new_sweep() {
        let upstream = Upstream::new(120);
        let cache = upstream.cache();

        cache.get().await.unwrap();
        tokio::time::advance(DEFAULT_TTL + Duration::from_secs(1)).await;
        assert!(!cache.is_fresh());

        let (left, right) = tokio::join!(cache.get(), cache.get());
        assert!(Arc::ptr_eq(&left.unwrap(), &right.unwrap()));
        assert_eq!(upstream.calls(), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn stops_at_page_cap() {
        let upstream = Upstream::new(10_000);
        let cache = upstream.cache();

        let collection = cache.get().await.unwrap();
        assert_eq!(upstream.calls(), 20);
        assert_eq!(collection.items.len(), 1000);
        assert_eq!(collection.count, 10_000);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_upstream_is_not_an_error() {
        let upstream = Upstream::new(0);
        let cache = upstream.cache();

        let collection = cache.get().await.unwrap();
        assert_eq!(collection.count, 0);
        assert!(collection.items.is_empty());
        assert_eq!(upstream.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn abandoned_caller_does_not_cancel_sweep() {
        let upstream = Upstream::new(120);
        let cache = upstream.cache();

        let abandoned = tokio::time::timeout(Duration::from_millis(5), cache.get()).await;
        assert!(abandoned.is_err());

        let collection = cache.get().await.unwrap();
        assert_eq!(collection.items.len(), 120);
        assert_eq!(upstream.calls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn invalidate_forces_new_sweep() {
        let upstream = Upstream::new(30);
        let cache = upstream.cache();

        cache.get().await.unwrap();
        cache.invalidate();
        cache.get().await.unwrap();
        assert_eq!(upstream.calls(), 2);
    }
}
