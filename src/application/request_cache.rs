// Request memoization with in-flight deduplication
use futures::future::{BoxFuture, Shared};
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

type SharedFetch<V, E> = Shared<BoxFuture<'static, Result<V, E>>>;

struct InFlight<V, E> {
    /// Tells apart successive fetches of the same key.
    generation: u64,
    fetch: SharedFetch<V, E>,
}

struct Slot<V, E> {
    /// Last good value and the generation of the fetch that produced it.
    cached: Option<(u64, V)>,
    in_flight: Option<InFlight<V, E>>,
}

impl<V, E> Default for Slot<V, E> {
    fn default() -> Self {
        Self {
            cached: None,
            in_flight: None,
        }
    }
}

enum Plan<V, E> {
    Cached(V),
    Join(u64, SharedFetch<V, E>),
    Lead(u64, SharedFetch<V, E>),
}

/// Per-key cache of the last successful response plus the fetch currently
/// running for that key, if any.
///
/// At most one fetch per key is in flight; concurrent callers await the same
/// fetch, and any of them that sees it succeed stores the value, so the
/// fetch still lands in the cache when its leader is dropped. A value never
/// replaces one from a later fetch. Failures leave the last good value in
/// place. Singleton resources use `()` as key.
pub struct RequestCache<K, V, E> {
    slots: Mutex<HashMap<K, Slot<V, E>>>,
    generations: AtomicU64,
}

impl<K, V, E> Default for RequestCache<K, V, E> {
    fn default() -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            generations: AtomicU64::new(0),
        }
    }
}

impl<K, V, E> RequestCache<K, V, E>
where
    K: Eq + Hash + Clone + Debug,
    V: Clone + Send + Sync + 'static,
    E: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the in-flight result for `key` if a fetch is running, else the
    /// cached value unless `force_refresh`, else runs `fetch`.
    pub async fn get_or_fetch<F, Fut>(&self, key: K, force_refresh: bool, fetch: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>> + Send + 'static,
    {
        // Decided under one lock so no second fetch can slip in between the
        // check and the registration.
        let plan = {
            let mut slots = self.slots.lock();
            let slot = slots.entry(key.clone()).or_default();
            if let Some(in_flight) = &slot.in_flight {
                Plan::Join(in_flight.generation, in_flight.fetch.clone())
            } else if let Some((_, cached)) = slot.cached.as_ref().filter(|_| !force_refresh) {
                Plan::Cached(cached.clone())
            } else {
                let generation = self.generations.fetch_add(1, Ordering::Relaxed);
                let shared = fetch().boxed().shared();
                slot.in_flight = Some(InFlight {
                    generation,
                    fetch: shared.clone(),
                });
                Plan::Lead(generation, shared)
            }
        };

        match plan {
            Plan::Cached(value) => {
                tracing::trace!(?key, "request cache hit");
                Ok(value)
            }
            Plan::Join(generation, shared) => {
                tracing::trace!(?key, "joining in-flight request");
                let result = shared.await;
                if let Ok(value) = &result {
                    self.store(&key, generation, value.clone());
                }
                result
            }
            Plan::Lead(generation, shared) => {
                tracing::debug!(?key, force_refresh, "fetching");
                let guard = InFlightGuard {
                    cache: self,
                    key: &key,
                    generation,
                };
                let result = shared.await;
                match &result {
                    Ok(value) => self.store(guard.key, generation, value.clone()),
                    Err(_) => tracing::debug!(?key, "fetch failed, keeping last cached value"),
                }
                result
            }
        }
    }

    pub fn cached(&self, key: &K) -> Option<V> {
        self.slots
            .lock()
            .get(key)
            .and_then(|slot| slot.cached.as_ref().map(|(_, value)| value.clone()))
    }

    #[cfg(test)]
    fn is_in_flight(&self, key: &K) -> bool {
        self.slots
            .lock()
            .get(key)
            .is_some_and(|slot| slot.in_flight.is_some())
    }

    fn store(&self, key: &K, generation: u64, value: V) {
        if let Some(slot) = self.slots.lock().get_mut(key) {
            if slot.cached.as_ref().is_none_or(|(cached, _)| *cached <= generation) {
                slot.cached = Some((generation, value));
            }
        }
    }
}

/// Clears the leader's in-flight marker when its fetch settles or when the
/// leading caller is dropped mid-fetch.
struct InFlightGuard<'a, K: Eq + Hash, V, E> {
    cache: &'a RequestCache<K, V, E>,
    key: &'a K,
    generation: u64,
}

impl<K: Eq + Hash, V, E> Drop for InFlightGuard<'_, K, V, E> {
    fn drop(&mut self) {
        let mut slots = self.cache.slots.lock();
        if let Some(slot) = slots.get_mut(self.key) {
            if slot
                .in_flight
                .as_ref()
                .is_some_and(|in_flight| in_flight.generation == self.generation)
            {
                slot.in_flight = None;
            }
        }
    }
}
