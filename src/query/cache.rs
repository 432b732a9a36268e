//! The shared query cache.

use crate::error::{DashboardError, Result};
use crate::query::{QueryKey, QueryState};
use futures_util::future::{BoxFuture, FutureExt, Shared};
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tokio::sync::broadcast;
use tracing::{debug, trace};

type CachedValue = Arc<dyn Any + Send + Sync>;
type FetchResult = std::result::Result<CachedValue, Arc<DashboardError>>;
type SharedFetch = Shared<BoxFuture<'static, FetchResult>>;

struct InFlight {
    id: u64,
    future: SharedFetch,
}

#[derive(Default)]
struct Entry {
    value: Option<CachedValue>,
    updated_at: Option<Instant>,
    stale: bool,
    in_flight: Option<InFlight>,
    /// Set when an invalidation lands while a fetch is running.
    invalidated_in_flight: bool,
}

impl Entry {
    fn fresh_value(&self, stale_time: Duration) -> Option<&CachedValue> {
        let updated_at = self.updated_at?;
        if self.stale || updated_at.elapsed() >= stale_time {
            return None;
        }
        self.value.as_ref()
    }
}

struct Inner {
    entries: Mutex<HashMap<QueryKey, Entry>>,
    stale_time: Duration,
    next_fetch_id: AtomicU64,
    invalidations: broadcast::Sender<QueryKey>,
}

/// Key-addressed cache with stale tracking and in-flight de-duplication.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.lock().len())
            .field("stale_time", &self.inner.stale_time)
            .finish()
    }
}

impl QueryCache {
    /// Create a cache whose entries stay fresh for `stale_time`.
    pub fn new(stale_time: Duration) -> Self {
        let (invalidations, _) = broadcast::channel(256);
        Self {
            inner: Arc::new(Inner {
                entries: Mutex::new(HashMap::new()),
                stale_time,
                next_fetch_id: AtomicU64::new(1),
                invalidations,
            }),
        }
    }

    pub fn stale_time(&self) -> Duration {
        self.inner.stale_time
    }

    /// Return fresh cached data for `key`, or run `fetcher` to get it.
    ///
    /// Callers that ask for the same key while a fetch is running wait on
    /// that fetch instead of starting their own. Failures are not cached.
    pub async fn fetch<T, F, Fut>(&self, key: QueryKey, fetcher: F) -> Result<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (fetch_id, future) = {
            let mut entries = self.lock();
            let entry = entries.entry(key.clone()).or_default();

            if let Some(value) = entry
                .fresh_value(self.inner.stale_time)
                .and_then(|value| value.downcast_ref::<T>())
            {
                trace!("Cache hit for {}", key);
                return Ok(value.clone());
            }

            let joined = entry
                .in_flight
                .as_ref()
                .map(|flight| (flight.id, flight.future.clone()));
            match joined {
                Some(flight) => {
                    debug!("Joining in-flight fetch for {}", key);
                    flight
                }
                None => {
                    debug!("Fetching {}", key);
                    let id = self.inner.next_fetch_id.fetch_add(1, Ordering::Relaxed);
                    let request = fetcher();
                    let future = async move {
                        request
                            .await
                            .map(|value| Arc::new(value) as CachedValue)
                            .map_err(Arc::new)
                    }
                    .boxed()
                    .shared();
                    entry.in_flight = Some(InFlight {
                        id,
                        future: future.clone(),
                    });
                    entry.invalidated_in_flight = false;
                    (id, future)
                }
            }
        };

        let result = future.await;
        self.complete(&key, fetch_id, &result);

        match result {
            Ok(value) => value.downcast_ref::<T>().cloned().ok_or_else(|| {
                DashboardError::config_error(format!("cached value for {} has another type", key))
            }),
            Err(e) => Err(Arc::try_unwrap(e).unwrap_or_else(DashboardError::Shared)),
        }
    }

    /// Like [`fetch`](Self::fetch), folded into a [`QueryState`].
    ///
    /// A query that is not `enabled` returns `Disabled` without calling the
    /// fetcher.
    pub async fn query<T, F, Fut>(&self, key: QueryKey, enabled: bool, fetcher: F) -> QueryState<T>
    where
        T: Clone + Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        if !enabled {
            trace!("Query {} is disabled", key);
            return QueryState::Disabled;
        }
        self.fetch(key, fetcher).await.into()
    }

    /// Record the outcome of fetch `fetch_id`. Only the first waiter to
    /// finish does anything; the rest find the flight already cleared.
    fn complete(&self, key: &QueryKey, fetch_id: u64, result: &FetchResult) {
        let mut entries = self.lock();
        let Some(entry) = entries.get_mut(key) else {
            return;
        };
        if entry.in_flight.as_ref().map(|flight| flight.id) != Some(fetch_id) {
            return;
        }
        entry.in_flight = None;
        if let Ok(value) = result {
            entry.value = Some(Arc::clone(value));
            entry.updated_at = Some(Instant::now());
            entry.stale = entry.invalidated_in_flight;
        }
        entry.invalidated_in_flight = false;
        if entry.value.is_none() {
            entries.remove(key);
        }
    }

    /// Mark every entry under `prefix` as stale and notify subscribers.
    pub fn invalidate(&self, prefix: &QueryKey) {
        let mut count = 0;
        {
            let mut entries = self.lock();
            for (key, entry) in entries.iter_mut() {
                if key.starts_with(prefix) {
                    entry.stale = true;
                    if entry.in_flight.is_some() {
                        entry.invalidated_in_flight = true;
                    }
                    count += 1;
                }
            }
        }
        debug!("Invalidated {} ({} entries)", prefix, count);
        // No subscribers is fine.
        let _ = self.inner.invalidations.send(prefix.clone());
    }

    /// Cached data for `key`, fresh or not.
    pub fn get_data<T: Clone + 'static>(&self, key: &QueryKey) -> Option<T> {
        self.lock()
            .get(key)
            .and_then(|entry| entry.value.as_ref())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Store `value` under `key` as fresh data.
    pub fn set_data<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) {
        let mut entries = self.lock();
        let entry = entries.entry(key).or_default();
        entry.value = Some(Arc::new(value));
        entry.updated_at = Some(Instant::now());
        entry.stale = false;
    }

    /// Whether `key` would be re-fetched by the next [`fetch`](Self::fetch).
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.lock()
            .get(key)
            .map_or(true, |entry| entry.fresh_value(self.inner.stale_time).is_none())
    }

    pub fn is_fetching(&self, key: &QueryKey) -> bool {
        self.lock()
            .get(key)
            .is_some_and(|entry| entry.in_flight.is_some())
    }

    pub fn remove(&self, key: &QueryKey) {
        self.lock().remove(key);
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Receive every prefix passed to [`invalidate`](Self::invalidate).
    pub fn subscribe(&self) -> broadcast::Receiver<QueryKey> {
        self.inner.invalidations.subscribe()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Entry>> {
        self.inner
            .entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(Duration::from_millis(crate::DEFAULT_STALE_TIME_MS))
    }
}
