//! In-process cache-aside store
//!
//! Values live in a [`DashMap`] keyed by [`CacheKey`] strings, type-erased as
//! `Arc<dyn Any>` and recovered through the key's type parameter.
//!
//! Invalidation is generation based. A global clock is bumped on every
//! invalidation and the new stamp is written into the key's slot, leaving a
//! tombstone if the slot held nothing. A load takes a ticket (the clock value)
//! before calling its loader and installs its result only if the slot's stamp
//! is not newer than the ticket, so a load that raced a write never installs
//! the pre-write value. Tombstones are swept once no in-flight load is older
//! than them.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::btree_map::{BTreeMap, Entry as TicketEntry};
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, instrument, trace, warn};

use crate::config::CacheConfig;
use crate::key::CacheKey;

type Erased = Arc<dyn Any + Send + Sync>;

struct CachedValue {
    value: Erased,
    touched: Instant,
}

#[derive(Default)]
struct Slot {
    value: Option<CachedValue>,
    /// Stamp of the latest invalidation, 0 if never invalidated
    invalidated_at: u64,
}

struct Inner {
    slots: DashMap<String, Slot>,
    clock: AtomicU64,
    cleared_at: AtomicU64,
    /// Tickets of in-flight loads with their multiplicity
    loads: Mutex<BTreeMap<u64, usize>>,
    ttl: Duration,
}

/// Registration of an in-flight load; released on drop, including when the
/// load future is cancelled
struct LoadTicket<'a> {
    loads: &'a Mutex<BTreeMap<u64, usize>>,
    ticket: u64,
}

impl Drop for LoadTicket<'_> {
    fn drop(&mut self) {
        let mut loads = self.loads.lock();
        if let TicketEntry::Occupied(mut entry) = loads.entry(self.ticket) {
            *entry.get_mut() -= 1;
            if *entry.get() == 0 {
                entry.remove();
            }
        }
    }
}

impl Inner {
    fn is_fresh(&self, cached: &CachedValue, now: Instant) -> bool {
        now.duration_since(cached.touched) < self.ttl
    }

    fn lookup<T: Send + Sync + 'static>(&self, key: &CacheKey<T>) -> Option<Arc<T>> {
        let mut slot = self.slots.get_mut(key.as_str())?;
        let now = Instant::now();
        let cached = slot.value.as_mut()?;
        if !self.is_fresh(cached, now) {
            return None;
        }
        cached.touched = now;

        match Arc::clone(&cached.value).downcast::<T>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(key = %key, "cached value has an unexpected type, reloading");
                None
            }
        }
    }

    fn begin_load(&self) -> LoadTicket<'_> {
        let mut loads = self.loads.lock();
        let ticket = self.clock.load(Ordering::SeqCst);
        *loads.entry(ticket).or_insert(0) += 1;
        LoadTicket {
            loads: &self.loads,
            ticket,
        }
    }

    fn install<T: Send + Sync + 'static>(
        &self,
        key: &CacheKey<T>,
        value: &Arc<T>,
        ticket: u64,
    ) -> bool {
        let mut slot = self.slots.entry(key.as_str().to_owned()).or_default();
        // Checked under the shard lock so a concurrent clear cannot slip in between.
        if slot.invalidated_at > ticket || self.cleared_at.load(Ordering::SeqCst) > ticket {
            return false;
        }
        let erased: Erased = value.clone();
        slot.value = Some(CachedValue {
            value: erased,
            touched: Instant::now(),
        });
        true
    }

    fn next_stamp(&self) -> u64 {
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn invalidate(&self, key: &str) -> u64 {
        let stamp = self.next_stamp();
        let mut slot = self.slots.entry(key.to_owned()).or_default();
        slot.value = None;
        slot.invalidated_at = slot.invalidated_at.max(stamp);
        stamp
    }

    /// Highest stamp that no current or future load can be older than
    fn tombstone_bound(&self) -> u64 {
        let loads = self.loads.lock();
        let clock = self.clock.load(Ordering::SeqCst);
        loads.keys().next().map_or(clock, |oldest| (*oldest).min(clock))
    }

    fn sweep(&self) -> usize {
        let bound = self.tombstone_bound();
        let now = Instant::now();
        let before = self.slots.len();

        self.slots.retain(|_, slot| {
            if slot
                .value
                .as_ref()
                .is_some_and(|cached| !self.is_fresh(cached, now))
            {
                slot.value = None;
            }
            slot.value.is_some() || slot.invalidated_at > bound
        });

        before.saturating_sub(self.slots.len())
    }
}

/// Process-wide settings cache
///
/// Shared behind an `Arc` by every service. Hits never suspend; misses run
/// the caller's loader, which performs its own store access.
pub struct SettingsCache {
    inner: Arc<Inner>,
    config: CacheConfig,
    sweeper: Mutex<Option<JoinHandle<()>>>,
}

impl SettingsCache {
    /// Create an empty cache; call [`spawn_sweeper`](Self::spawn_sweeper) to
    /// start background eviction
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                slots: DashMap::new(),
                clock: AtomicU64::new(0),
                cleared_at: AtomicU64::new(0),
                loads: Mutex::new(BTreeMap::new()),
                ttl: config.ttl,
            }),
            config,
            sweeper: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Return the cached value for `key`, or run `loader` and cache its result
    ///
    /// A hit slides the entry's TTL. A loader error is returned unchanged and
    /// leaves the key absent. If the key is invalidated while `loader` runs,
    /// the loaded value is returned to this caller but not cached.
    #[instrument(skip_all, fields(key = %key))]
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &CacheKey<T>, loader: F) -> Result<Arc<T>, E>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        if let Some(value) = self.inner.lookup(key) {
            trace!("cache hit");
            return Ok(value);
        }

        let ticket = self.inner.begin_load();
        let value = Arc::new(loader().await?);

        if self.inner.install(key, &value, ticket.ticket) {
            trace!("cache miss, installed");
        } else {
            debug!("key invalidated during load, result not cached");
        }
        Ok(value)
    }

    /// Drop the value under `key`; loads already running for it will not
    /// install their result
    pub fn invalidate<T>(&self, key: &CacheKey<T>) {
        let stamp = self.inner.invalidate(key.as_str());
        trace!(key = %key, stamp, "invalidated");
    }

    /// Drop every value
    pub fn clear(&self) {
        let stamp = self.inner.next_stamp();
        self.inner.cleared_at.fetch_max(stamp, Ordering::SeqCst);
        self.inner.slots.clear();
        debug!(stamp, "cache cleared");
    }

    /// Number of keys currently holding a value
    pub fn len(&self) -> usize {
        self.inner
            .slots
            .iter()
            .filter(|slot| slot.value.is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict expired values and obsolete tombstones now, returning how many
    /// slots were removed
    pub fn purge_expired(&self) -> usize {
        self.inner.sweep()
    }

    /// Start the background sweeper if it is not running
    ///
    /// The task holds only a weak reference and ends by itself once the cache
    /// is dropped. Must be called from within a Tokio runtime.
    pub fn spawn_sweeper(&self) {
        let mut sweeper = self.sweeper.lock();
        if sweeper.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return;
        }

        let inner = Arc::downgrade(&self.inner);
        let period = self.config.sweep_interval.max(Duration::from_millis(1));

        *sweeper = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                let Some(inner) = inner.upgrade() else {
                    break;
                };
                let removed = inner.sweep();
                if removed > 0 {
                    debug!(removed, "swept settings cache");
                }
            }
        }));
        debug!(?period, "cache sweeper started");
    }

    /// Stop the background sweeper
    pub fn shutdown(&self) {
        if let Some(handle) = self.sweeper.lock().take() {
            handle.abort();
            debug!("cache sweeper stopped");
        }
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Default for SettingsCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}

impl Drop for SettingsCache {
    fn drop(&mut self) {
        self.shutdown();
    }
}
