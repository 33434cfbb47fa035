//! # Pool: bounded, self-replenishing queue of ready units.
//!
//! A [`Pool`] keeps up to `capacity` preloaded units of one `(kind, key)` and
//! hands them out in FIFO order. Every successful [`Pool::take`] schedules
//! exactly one replenishment load in a background task.
//!
//! ## Architecture
//! ```text
//! Manager::initialize_pool(cfg)
//!     └─► Pool::fill(n) ──► JoinSet { load_one() × n }
//!
//! load_one():
//!     LoadCycle::run() ─ Ok(unit) ──► accept(unit)
//!                     └ Err     ──► give up (RetriesExhausted already published)
//!
//! accept(unit):
//!     ├─ disposed or queue full ─► SurplusDiscarded + dispose(unit)
//!     └─ otherwise             ─► push_back, units_ready = len, UnitLoaded, on_loaded
//!
//! take(show_chance, on_consumed):
//!     gate closed ─► GateClosed, Ok(false)
//!     queue empty ─► PoolDepleted, Ok(false)
//!     otherwise   ─► pop_front, units_ready = len, spawn(load_one), UnitDispatched,
//!                    Provider::show(unit, ShowSession) , Ok(true)
//! ```
//!
//! ## Rules
//! - `units_ready` never exceeds `capacity`.
//! - The failure counter is shared by every in-flight load of the pool.
//! - `units_ready` is updated under the queue lock, so it always matches the queue.
//! - The queue lock is never held across an `.await` or a provider call.
//! - A unit that arrives after `dispose` is disposed immediately.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::{runtime::Handle, sync::watch, task::JoinSet};

use crate::{
    error::PreloadError,
    events::{Bus, Event, EventKind},
    policies::{RetryPolicy, gate},
    resources::{
        Callbacks, ConsumeHook, LoadTarget, PoolConfig, Provider, ResourceKey, ResourceKind,
        ShowSession, UnitRef,
    },
};

use super::{
    loader::LoadCycle,
    registry::{Registry, next_component_id},
};

/// Bounded FIFO of preloaded units for one `(kind, key)`.
pub struct Pool<P: Provider> {
    id: u64,
    me: Weak<Self>,
    kind: ResourceKind,
    key: ResourceKey,
    capacity: usize,
    target: LoadTarget,
    callbacks: Callbacks,
    retry: RetryPolicy,

    provider: Arc<P>,
    bus: Bus,
    registry: Weak<Registry<P>>,
    runtime: Handle,

    queue: Mutex<VecDeque<UnitRef<P>>>,
    ready: watch::Sender<usize>,
    failures: AtomicU32,
    disposed: AtomicBool,
}

impl<P: Provider> Pool<P> {
    /// Must be called from within a Tokio runtime; replenishment loads are
    /// spawned on it.
    pub(crate) fn new(
        cfg: &PoolConfig,
        provider: Arc<P>,
        bus: Bus,
        retry: RetryPolicy,
        registry: Weak<Registry<P>>,
    ) -> Arc<Self> {
        let (ready, _) = watch::channel(0);
        Arc::new_cyclic(|me| Self {
            id: next_component_id(),
            me: me.clone(),
            kind: cfg.kind(),
            key: cfg.key().clone(),
            capacity: cfg.capacity(),
            target: cfg.target(),
            callbacks: cfg.callbacks().clone(),
            retry,
            provider,
            bus,
            registry,
            runtime: Handle::current(),
            queue: Mutex::new(VecDeque::with_capacity(cfg.capacity())),
            ready,
            failures: AtomicU32::new(0),
            disposed: AtomicBool::new(false),
        })
    }

    /// Issues `count` loads concurrently and waits for all of them to settle.
    ///
    /// Exhausted load cycles are not errors here; only a load task that died
    /// (panicked) fails the fill with [`PreloadError::Initialization`].
    pub(crate) async fn fill(self: &Arc<Self>, count: usize) -> Result<(), PreloadError> {
        let mut set = JoinSet::new();
        for _ in 0..count {
            let pool = Arc::clone(self);
            set.spawn(async move { pool.load_one().await });
        }
        while let Some(res) = set.join_next().await {
            if let Err(e) = res {
                return Err(PreloadError::Initialization {
                    reason: format!("pool {}/{} load task failed: {e}", self.kind, self.key),
                });
            }
        }
        Ok(())
    }

    /// Hands out the oldest ready unit if the gate opens.
    ///
    /// Returns `Ok(true)` if a unit was dispatched to [`Provider::show`]. A closed
    /// gate, an empty queue or a disposed pool all return `Ok(false)`.
    /// The replenishment load is spawned on the runtime the pool was created
    /// in, so `take` may be called from any thread.
    ///
    /// # Errors
    /// [`PreloadError::InvalidArgument`] if `show_chance` is outside `[0.0, 1.0]`.
    pub fn take(
        &self,
        show_chance: f64,
        on_consumed: Option<ConsumeHook>,
    ) -> Result<bool, PreloadError> {
        if !gate::decide(show_chance)? {
            self.publish(Event::new(EventKind::GateClosed));
            return Ok(false);
        }
        if self.is_disposed() {
            return Ok(false);
        }

        let taken = {
            let mut queue = self.queue.lock();
            let unit = queue.pop_front();
            if unit.is_some() {
                self.ready.send_replace(queue.len());
            }
            unit.map(|unit| (unit, queue.len()))
        };
        let Some((unit, ready)) = taken else {
            self.publish(Event::new(EventKind::PoolDepleted).with_ready(0));
            return Ok(false);
        };

        self.replenish();
        self.publish(
            Event::new(EventKind::UnitDispatched)
                .with_unit(unit.id())
                .with_ready(ready),
        );

        let finish = {
            let unit = unit.clone();
            move || {
                unit.dispose();
            }
        };
        let session = ShowSession::new(
            self.kind,
            self.key.clone(),
            unit.id(),
            self.callbacks.clone(),
            self.bus.clone(),
            on_consumed,
            finish,
        );
        self.provider.show(unit.get(), session);
        Ok(true)
    }

    /// Disposes every queued unit and removes the pool from the registry.
    ///
    /// Idempotent. Loads still in flight dispose their unit on arrival.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        let drained: Vec<UnitRef<P>> = {
            let mut queue = self.queue.lock();
            self.ready.send_replace(0);
            queue.drain(..).collect()
        };
        for unit in drained {
            unit.dispose();
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(self.kind, &self.key, self.id);
        }
    }

    /// Number of units ready to be taken.
    #[inline]
    pub fn units_ready(&self) -> usize {
        *self.ready.borrow()
    }

    /// Subscribes to changes of [`units_ready`](Self::units_ready).
    pub fn subscribe_ready(&self) -> watch::Receiver<usize> {
        self.ready.subscribe()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    #[inline]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    fn replenish(&self) {
        if let Some(pool) = self.me.upgrade() {
            self.runtime.spawn(async move { pool.load_one().await });
        }
    }

    async fn load_one(&self) {
        if self.is_disposed() {
            return;
        }
        let cycle = LoadCycle {
            provider: self.provider.as_ref(),
            target: &self.target,
            callbacks: &self.callbacks,
            bus: &self.bus,
            retry: self.retry,
            failures: &self.failures,
        };
        if let Ok(unit) = cycle.run().await {
            self.accept(unit);
        }
    }

    fn accept(&self, unit: P::Unit) {
        let unit = UnitRef::new(
            unit,
            Arc::clone(&self.provider),
            self.kind,
            self.key.clone(),
            self.bus.clone(),
        );

        let queued = {
            let mut queue = self.queue.lock();
            if self.is_disposed() {
                Err("pool_disposed")
            } else if queue.len() >= self.capacity {
                Err("pool_full")
            } else {
                queue.push_back(unit.clone());
                self.ready.send_replace(queue.len());
                Ok(queue.len())
            }
        };

        match queued {
            Ok(ready) => {
                self.publish(
                    Event::new(EventKind::UnitLoaded)
                        .with_unit(unit.id())
                        .with_ready(ready),
                );
                self.callbacks.loaded(&self.key);
            }
            Err(reason) => {
                self.publish(
                    Event::new(EventKind::SurplusDiscarded)
                        .with_unit(unit.id())
                        .with_reason(reason),
                );
                unit.dispose();
            }
        }
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev.with_resource(self.kind, self.key.shared()));
    }
}

impl<P: Provider> std::fmt::Debug for Pool<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pool")
            .field("kind", &self.kind)
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .field("ready", &self.units_ready())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
