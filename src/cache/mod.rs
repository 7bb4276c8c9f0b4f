//! Single-slot memoization of a promise generator.
//!
//! A [`Cache`] hands out the same [`Promise`] to every caller until that
//! promise fails or, when a cache time is configured, until the entry goes
//! unused for that long. Overlapping callers share one in-flight promise, so
//! at most one generator call is live at a time.
//!
//! # Invalidation
//!
//! - **Failure**: the slot is cleared as soon as the cached promise rejects,
//!   before the rejection is delivered. Every caller still receives the
//!   failure; the *next* call runs the generator again. Inside a Tokio runtime
//!   a watcher task drives the promise, so this happens even when no caller
//!   awaits it or when the rejection is observed through a promise the
//!   generator shared with someone else. Outside a runtime the first caller
//!   to observe the rejection clears the slot.
//! - **Expiry** (`cache_time > 0`): every call rearms a single timer. The slot
//!   is cleared `cache_time` after the most recent call (sliding expiry).
//!
//! A successful promise with `cache_time == Duration::ZERO` is kept for the
//! lifetime of the `Cache`.
//!
//! # Example
//!
//! ```rust
//! use std::time::Duration;
//! use tilly::{cache, ko, ok};
//!
//! # tokio_test::block_on(async {
//! let get_resolved = cache(|| ok("Result!"), Duration::ZERO);
//! let first = get_resolved.get();
//! first.clone().await.unwrap();
//! assert!(get_resolved.get().ptr_eq(&first));
//!
//! let get_rejected = cache(|| ko::<()>("Error!"), Duration::ZERO);
//! let first = get_rejected.get();
//! first.clone().await.unwrap_err();
//! assert!(!get_rejected.get().ptr_eq(&first));
//! # });
//! ```

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::failure::Failure;
use crate::promise::{Payload, Promise};

/// The mutable state behind a [`Cache`].
struct Slot<T> {
    promise: Option<Promise<T>>,
    /// Bumped every time the slot is populated.
    generation: u64,
    expiry: Option<JoinHandle<()>>,
    /// Drives `promise` so a rejection clears the slot without any caller.
    watcher: Option<JoinHandle<()>>,
    /// Bumped every time the expiry timer is rearmed.
    lease: u64,
}

impl<T> Slot<T> {
    fn empty() -> Self {
        Slot {
            promise: None,
            generation: 0,
            expiry: None,
            watcher: None,
            lease: 0,
        }
    }

    /// Clear the slot if it still holds the promise of `generation`.
    fn invalidate(&mut self, generation: u64) {
        if self.generation == generation && self.promise.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(generation, "cached promise rejected, slot cleared");
        }
    }

    /// Clear the slot if no call has rearmed the timer since `lease`.
    fn expire(&mut self, lease: u64) {
        if self.lease != lease {
            return;
        }
        self.expiry = None;
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
        if self.promise.take().is_some() {
            #[cfg(feature = "tracing")]
            tracing::debug!(generation = self.generation, "cached promise expired");
        }
    }
}

fn lock<T>(slot: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A memoizing wrapper around a promise generator.
///
/// Created by [`cache`]. See the [module documentation](self) for the
/// invalidation rules.
pub struct Cache<T, G> {
    generator: G,
    cache_time: Duration,
    slot: Arc<Mutex<Slot<T>>>,
}

/// Wrap `generator` so repeated calls share one promise.
///
/// `cache_time` of [`Duration::ZERO`] disables expiry; only a failure then
/// clears the cached promise.
pub fn cache<T, G, Fut>(generator: G, cache_time: Duration) -> Cache<T, G>
where
    T: Payload,
    G: Fn() -> Fut,
    Fut: Future<Output = Result<T, Failure>> + Send + 'static,
{
    Cache {
        generator,
        cache_time,
        slot: Arc::new(Mutex::new(Slot::empty())),
    }
}

impl<T, G, Fut> Cache<T, G>
where
    T: Payload,
    G: Fn() -> Fut,
    Fut: Future<Output = Result<T, Failure>> + Send + 'static,
{
    /// Return the cached promise, running the generator if the slot is empty.
    ///
    /// Every call with a non-zero cache time rearms the expiry timer.
    ///
    /// # Panics
    ///
    /// With a non-zero cache time the expiry timer is spawned with
    /// [`tokio::spawn`], so this must be called from within a Tokio runtime.
    /// The generator runs while the slot is locked and must not call back
    /// into the same `Cache`.
    pub fn get(&self) -> Promise<T> {
        let mut slot = lock(&self.slot);

        let promise = match slot.promise.clone() {
            Some(promise) => promise,
            None => self.populate(&mut slot),
        };

        if !self.cache_time.is_zero() {
            self.rearm_expiry(&mut slot);
        }

        promise
    }

    /// The configured cache time.
    pub fn cache_time(&self) -> Duration {
        self.cache_time
    }

    fn populate(&self, slot: &mut Slot<T>) -> Promise<T> {
        slot.generation = slot.generation.wrapping_add(1);
        let generation = slot.generation;
        let weak = Arc::downgrade(&self.slot);
        let pending = (self.generator)();

        let promise = Promise::from_future(async move {
            let result = pending.await;
            if result.is_err() {
                if let Some(slot) = weak.upgrade() {
                    lock(&slot).invalidate(generation);
                }
            }
            result
        });

        #[cfg(feature = "tracing")]
        tracing::debug!(generation, "cache slot populated");

        if let Ok(runtime) = Handle::try_current() {
            let watched = promise.clone();
            slot.watcher = Some(runtime.spawn(async move {
                let _ = watched.await;
            }));
        }

        slot.promise = Some(promise.clone());
        promise
    }

    fn rearm_expiry(&self, slot: &mut Slot<T>) {
        if let Some(timer) = slot.expiry.take() {
            timer.abort();
        }
        slot.lease = slot.lease.wrapping_add(1);

        // A cache time too large to represent never expires.
        let Some(deadline) = Instant::now().checked_add(self.cache_time) else {
            return;
        };

        let lease = slot.lease;
        let weak: Weak<Mutex<Slot<T>>> = Arc::downgrade(&self.slot);
        slot.expiry = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(slot) = weak.upgrade() {
                lock(&slot).expire(lease);
            }
        }));
    }
}

impl<T, G> Drop for Cache<T, G> {
    fn drop(&mut self) {
        let mut slot = lock(&self.slot);
        for task in [slot.expiry.take(), slot.watcher.take()].into_iter().flatten() {
            task.abort();
        }
    }
}

impl<T, G> fmt::Debug for Cache<T, G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = lock(&self.slot);
        f.debug_struct("Cache")
            .field("cache_time", &self.cache_time)
            .field("cached", &slot.promise.is_some())
            .field("generation", &slot.generation)
            .finish_non_exhaustive()
    }
}
