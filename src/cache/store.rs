//! Cache Store Module
//!
//! Main cache engine: a bounded map of TTL-stamped entries with eviction
//! notification, read-through helpers and an optional background sweeper.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::eviction::{expired_keys, select_victim};
use crate::cache::{CacheEntry, CacheStats, DEFAULT_MAX_SIZE, DEFAULT_SWEEP_INTERVAL, DEFAULT_TTL};
use crate::tasks::spawn_sweep_task;

/// Callback invoked with the key and value of every entry leaving a store.
pub type EvictFn<T> = Arc<dyn Fn(&str, &T) + Send + Sync>;

// == Cache Options ==
/// Construction parameters for a [`CacheStore`].
#[derive(Debug, Clone)]
pub struct CacheOptions {
    /// Name used in logs and by the registry
    pub name: String,
    /// Default lifetime for entries set without an explicit TTL
    pub ttl: Duration,
    /// Capacity bound
    pub max_size: usize,
    /// Period of the background expiry sweep
    pub sweep_interval: Duration,
}

impl Default for CacheOptions {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            ttl: DEFAULT_TTL,
            max_size: DEFAULT_MAX_SIZE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }
}

impl CacheOptions {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }
}

// == Inner State ==
struct Inner<T> {
    entries: HashMap<String, CacheEntry<T>>,
    /// Monotonic counter stamped on every write and read
    next_seq: u64,
}

impl<T> Inner<T> {
    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}

// == Cache Store ==
/// Bounded, TTL-expiring key/value store.
///
/// All operations take `&self`; share a store between tasks as
/// `Arc<CacheStore<T>>`. Every removal (delete, clear, lazy expiry, sweep,
/// capacity eviction) is reported once to the `on_evict` callback. The
/// callback runs while the store is locked and must not call back into the
/// same store.
pub struct CacheStore<T> {
    name: String,
    default_ttl: Duration,
    max_size: usize,
    sweep_interval: Duration,
    inner: Mutex<Inner<T>>,
    on_evict: Option<EvictFn<T>>,
    in_flight: Mutex<HashMap<String, Arc<OnceCell<T>>>>,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl<T> fmt::Debug for CacheStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("name", &self.name)
            .field("default_ttl", &self.default_ttl)
            .field("max_size", &self.max_size)
            .field("has_on_evict", &self.on_evict.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> CacheStore<T>
where
    T: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an empty store. No background sweeper runs until
    /// [`start_sweeper`](Self::start_sweeper) is called.
    pub fn new(options: CacheOptions) -> Self {
        Self {
            name: options.name,
            default_ttl: options.ttl,
            max_size: options.max_size,
            sweep_interval: options.sweep_interval,
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                next_seq: 0,
            }),
            on_evict: None,
            in_flight: Mutex::new(HashMap::new()),
            sweeper: Mutex::new(None),
        }
    }

    /// Installs the eviction callback.
    pub fn with_on_evict<F>(mut self, on_evict: F) -> Self
    where
        F: Fn(&str, &T) + Send + Sync + 'static,
    {
        self.on_evict = Some(Arc::new(on_evict));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Set ==
    /// Stores `data` under `key` with the default TTL.
    pub fn set(&self, key: impl Into<String>, data: T) {
        self.set_with_ttl(key, data, None);
    }

    /// Stores `data` under `key`, with `ttl` or the store default.
    ///
    /// Overwriting an existing key replaces it in place without notifying
    /// `on_evict`. Inserting a new key into a full store first evicts the
    /// least recently written-or-read entry.
    ///
    /// An overwrite never triggers capacity eviction, even on a full store:
    /// the map does not grow, so `len() <= max_size` already holds, and
    /// evicting first could drop an unrelated live entry (or the key being
    /// written) for no room gained.
    pub fn set_with_ttl(&self, key: impl Into<String>, data: T, ttl: Option<Duration>) {
        let key = key.into();

        if self.max_size == 0 {
            self.notify_evict(&key, &data);
            return;
        }

        let now = Instant::now();
        let ttl = ttl.unwrap_or(self.default_ttl);
        let mut inner = self.lock_inner();

        if !inner.entries.contains_key(&key) && inner.entries.len() >= self.max_size {
            if let Some(victim) = select_victim(&inner.entries) {
                if let Some(evicted) = inner.entries.remove(&victim) {
                    debug!(cache = %self.name, key = %victim, "evicted entry for capacity");
                    self.notify_evict(&victim, &evicted.data);
                }
            }
        }

        let seq = inner.bump_seq();
        inner.entries.insert(key, CacheEntry::new(data, ttl, now, seq));
    }

    // == Get ==
    /// Returns a clone of the live value for `key`.
    ///
    /// A hit bumps the entry's hit count and restarts its TTL window. An
    /// expired entry is removed (and reported to `on_evict`) and treated as
    /// absent.
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        let mut inner = self.lock_inner();

        let expired = inner.entries.get(key)?.is_expired_at(now);
        if expired {
            if let Some(entry) = inner.entries.remove(key) {
                self.notify_evict(key, &entry.data);
            }
            return None;
        }

        let seq = inner.bump_seq();
        let entry = inner.entries.get_mut(key)?;
        entry.touch(now, seq);
        Some(entry.data.clone())
    }

    // == Has ==
    /// `get(key).is_some()`, including its side effects.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    // == Delete ==
    /// Removes `key`. Returns true if an entry was removed.
    pub fn delete(&self, key: &str) -> bool {
        let mut inner = self.lock_inner();
        match inner.entries.remove(key) {
            Some(entry) => {
                self.notify_evict(key, &entry.data);
                true
            }
            None => false,
        }
    }

    // == Clear ==
    /// Removes every entry, reporting each to `on_evict`. Returns the count.
    pub fn clear(&self) -> usize {
        let mut inner = self.lock_inner();
        let drained: Vec<(String, CacheEntry<T>)> = inner.entries.drain().collect();
        for (key, entry) in &drained {
            self.notify_evict(key, &entry.data);
        }
        drained.len()
    }

    // == Get Or Set ==
    /// Read-through: returns the cached value, or awaits `compute`, stores
    /// its result under `key` and returns it.
    ///
    /// Concurrent callers that miss the same key each run their own
    /// `compute`; the last one to finish wins the slot. Use
    /// [`get_or_set_shared`](Self::get_or_set_shared) to coalesce them.
    /// A failing `compute` stores nothing and its error is returned as is.
    pub async fn get_or_set<F, Fut, E>(&self, key: &str, compute: F, ttl: Option<Duration>) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }

        let data = compute().await?;
        self.set_with_ttl(key, data.clone(), ttl);
        Ok(data)
    }

    // == Get Or Set (single-flight) ==
    /// Like [`get_or_set`](Self::get_or_set), but at most one `compute` per
    /// key is in flight: concurrent callers wait for it and share its value.
    ///
    /// If the running `compute` fails, one of the waiters runs its own.
    pub async fn get_or_set_shared<F, Fut, E>(
        &self,
        key: &str,
        compute: F,
        ttl: Option<Duration>,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(cached) = self.get(key) {
            return Ok(cached);
        }

        let cell = self
            .lock_in_flight()
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = cell
            .get_or_try_init(move || async move {
                let data: T = compute().await?;
                self.set_with_ttl(key, data.clone(), ttl);
                Ok::<T, E>(data)
            })
            .await
            .cloned();

        // After a failure the cell stays registered while waiters still hold
        // it: one of them is retrying and later callers must join that retry.
        let mut in_flight = self.lock_in_flight();
        let owns_slot = in_flight.get(key).is_some_and(|current| Arc::ptr_eq(current, &cell));
        if owns_slot && (result.is_ok() || Arc::strong_count(&cell) == 2) {
            in_flight.remove(key);
        }
        // Release our handle under the lock so the next check counts holders exactly
        drop(cell);
        drop(in_flight);

        result
    }

    // == Stats ==
    /// Returns a snapshot of the store.
    pub fn stats(&self) -> CacheStats {
        let inner = self.lock_inner();
        CacheStats::snapshot(&inner.entries, self.max_size, Instant::now())
    }

    // == Sweep Expired ==
    /// Removes every expired entry, reporting each to `on_evict`.
    ///
    /// Returns the number of entries removed. This is the body of the
    /// background sweep.
    pub fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut inner = self.lock_inner();

        let expired = expired_keys(&inner.entries, now);
        let count = expired.len();

        for key in expired {
            if let Some(entry) = inner.entries.remove(&key) {
                self.notify_evict(&key, &entry.data);
            }
        }

        count
    }

    // == Length ==
    /// Returns the current number of entries, expired-but-unswept included.
    pub fn len(&self) -> usize {
        self.lock_inner().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_inner().entries.is_empty()
    }

    // == Sweeper Lifecycle ==
    /// Starts the periodic expiry sweep for this store.
    ///
    /// The task only holds a weak reference and stops by itself once the
    /// store is dropped. Calling this again replaces the previous task.
    /// Must be called from within a tokio runtime.
    pub fn start_sweeper(self: &Arc<Self>) {
        let handle = spawn_sweep_task(Arc::downgrade(self), self.sweep_interval);
        if let Some(previous) = self.lock_sweeper().replace(handle) {
            previous.abort();
        }
    }

    /// Whether a sweeper task is currently attached and running.
    pub fn is_sweeping(&self) -> bool {
        self.lock_sweeper()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Stops the background sweeper. Entries are left in place.
    pub fn dispose(&self) {
        if let Some(handle) = self.lock_sweeper().take() {
            handle.abort();
            debug!(cache = %self.name, "sweeper stopped");
        }
    }

    // == Helpers ==
    fn notify_evict(&self, key: &str, data: &T) {
        if let Some(on_evict) = &self.on_evict {
            on_evict(key, data);
        }
    }

    fn lock_inner(&self) -> MutexGuard<'_, Inner<T>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, Arc<OnceCell<T>>>> {
        self.in_flight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_sweeper(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.sweeper.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T> Drop for CacheStore<T> {
    fn drop(&mut self) {
        let sweeper = self
            .sweeper
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = sweeper {
            handle.abort();
        }
    }
}
