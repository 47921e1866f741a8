//! Request coalescing keyed by request signature
//!
//! Concurrent callers asking for the same key share one underlying future. The
//! in-flight entry is removed by the future itself as it completes, so the key is
//! free again before any caller sees the result. Work is driven by a detached
//! task: callers that stop waiting do not cancel the request.

use std::collections::HashMap;
use std::fmt::{self, Debug};
use std::future::Future;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt, Shared};
use parking_lot::Mutex;
use tracing::debug;

type InFlight<T> = Shared<BoxFuture<'static, T>>;

/// Map of in-flight requests keyed by request signature
pub struct Coalescer<K, T> {
    in_flight: Arc<Mutex<HashMap<K, InFlight<T>>>>,
}

impl<K, T> Clone for Coalescer<K, T> {
    fn clone(&self) -> Self {
        Self {
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<K, T> fmt::Debug for Coalescer<K, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Coalescer")
            .field("in_flight", &self.in_flight.lock().len())
            .finish()
    }
}

impl<K, T> Default for Coalescer<K, T> {
    fn default() -> Self {
        Self {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl<K, T> Coalescer<K, T>
where
    K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Joins the in-flight request for `key`, or starts one with `start`
    ///
    /// `start` runs under the map lock and only when nothing is in flight for
    /// `key`, so it may re-check a cache without racing another starter. Must be
    /// called from within a tokio runtime.
    pub fn run<F>(&self, key: K, start: F) -> InFlight<T>
    where
        F: FnOnce() -> BoxFuture<'static, T>,
    {
        let mut in_flight = self.in_flight.lock();
        if let Some(existing) = in_flight.get(&key) {
            debug!(?key, "joining in-flight request");
            return existing.clone();
        }

        debug!(?key, "starting request");
        let work = start();
        let map = Arc::clone(&self.in_flight);
        let entry_key = key.clone();
        let shared = async move {
            // The key is freed even if the work panics
            let output = AssertUnwindSafe(work).catch_unwind().await;
            map.lock().remove(&entry_key);
            match output {
                Ok(output) => output,
                Err(payload) => panic::resume_unwind(payload),
            }
        }
        .boxed()
        .shared();

        in_flight.insert(key, shared.clone());
        drop(in_flight);

        tokio::spawn(shared.clone());
        shared
    }

    /// Joins or starts a request, awaiting its result
    pub async fn get<F, Fut>(&self, key: K, start: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T> + Send + 'static,
    {
        self.run(key, || start().boxed()).await
    }

    /// Number of requests currently in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.lock().len()
    }

    /// Returns true if a request for `key` is in flight
    pub fn is_in_flight(&self, key: &K) -> bool {
        self.in_flight.lock().contains_key(key)
    }
}
