//! TTL Sweep Task
//!
//! Background task that periodically removes expired entries from one store.

use std::sync::Weak;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, MIN_SWEEP_INTERVAL};

/// Spawns a background task that sweeps expired entries out of `cache`.
///
/// The task sleeps for `interval` between runs and holds only a weak
/// reference, so it ends on its own once the store is dropped. The returned
/// handle is owned by the store and aborted by `CacheStore::dispose`.
/// Intervals shorter than [`MIN_SWEEP_INTERVAL`] are raised to it.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(CacheStore::new(CacheOptions::named("api")));
/// let handle = spawn_sweep_task(Arc::downgrade(&cache), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<T>(cache: Weak<CacheStore<T>>, interval: Duration) -> JoinHandle<()>
where
    T: Clone + Send + Sync + 'static,
{
    let interval = interval.max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        debug!("Starting TTL sweep task with interval of {:?}", interval);

        loop {
            tokio::time::sleep(interval).await;

            let Some(cache) = cache.upgrade() else {
                debug!("Cache dropped, stopping TTL sweep task");
                break;
            };

            let removed = cache.sweep_expired();

            if removed > 0 {
                info!(cache = %cache.name(), "TTL sweep: removed {} expired entries", removed);
            } else {
                debug!(cache = %cache.name(), "TTL sweep: no expired entries found");
            }
        }
    })
}
