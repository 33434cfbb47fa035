//! # Persistent: one long-lived unit with retry-then-fail loading.
//!
//! Used for the [`ResourceKind::Banner`] family, whose display surface is owned
//! by the application and lives until it is explicitly disposed. Loading uses
//! the same bounded retry as the pool, but exhausting the ceiling is an error
//! returned to the caller.
//!
//! ```text
//! initialize_persistent(cfg) ─► load ─ Ok  ─► unit installed
//!                                    └ Err ─► dispose() + LoadFailure
//! reload()                   ─► load ─ Ok  ─► swap, dispose old unit
//!                                    └ Err ─► keep old unit, LoadFailure
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::{
    error::PreloadError,
    events::{Bus, Event, EventKind},
    policies::RetryPolicy,
    resources::{
        Callbacks, LoadTarget, PersistentConfig, Provider, ResourceKey, ResourceKind, UnitRef,
        UnitSize,
    },
};

use super::{
    loader::LoadCycle,
    registry::{Registry, next_component_id},
};

/// Controller for one long-lived unit.
pub struct Persistent<P: Provider> {
    id: u64,
    key: ResourceKey,
    size: UnitSize,
    target: LoadTarget,
    callbacks: Callbacks,
    retry: RetryPolicy,

    provider: Arc<P>,
    bus: Bus,
    registry: Weak<Registry<P>>,

    unit: Mutex<Option<UnitRef<P>>>,
    failures: AtomicU32,
    disposed: AtomicBool,
}

impl<P: Provider> Persistent<P> {
    pub(crate) fn new(
        cfg: &PersistentConfig,
        provider: Arc<P>,
        bus: Bus,
        retry: RetryPolicy,
        registry: Weak<Registry<P>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            id: next_component_id(),
            key: cfg.key().clone(),
            size: cfg.size(),
            target: cfg.target(),
            callbacks: cfg.callbacks().clone(),
            retry,
            provider,
            bus,
            registry,
            unit: Mutex::new(None),
            failures: AtomicU32::new(0),
            disposed: AtomicBool::new(false),
        })
    }

    /// Loads the first unit. On exhaustion the controller is disposed.
    pub(crate) async fn load(&self) -> Result<(), PreloadError> {
        match self.load_unit().await {
            Ok(unit) => self.install(unit),
            Err(e) => {
                self.dispose();
                Err(e)
            }
        }
    }

    /// Loads a replacement unit and swaps it in, disposing the old one.
    ///
    /// # Errors
    /// - [`PreloadError::LoadFailure`] if the retry ceiling was exceeded; the
    ///   current unit is kept.
    /// - [`PreloadError::Disposed`] if the controller was disposed.
    pub async fn reload(&self) -> Result<(), PreloadError> {
        if self.is_disposed() {
            return Err(self.disposed_error());
        }
        let unit = self.load_unit().await?;
        self.install(unit)
    }

    /// Current unit, for external display.
    ///
    /// The returned handle cannot dispose the unit; only [`dispose`](Self::dispose) can.
    pub fn unit(&self) -> Option<UnitRef<P>> {
        self.unit.lock().clone()
    }

    /// Disposes the unit and leaves the registry. Idempotent.
    pub fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(unit) = self.unit.lock().take() {
            unit.dispose();
        }
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(ResourceKind::Banner, &self.key, self.id);
        }
    }

    #[inline]
    pub fn size(&self) -> UnitSize {
        self.size
    }

    #[inline]
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    async fn load_unit(&self) -> Result<UnitRef<P>, PreloadError> {
        let cycle = LoadCycle {
            provider: self.provider.as_ref(),
            target: &self.target,
            callbacks: &self.callbacks,
            bus: &self.bus,
            retry: self.retry,
            failures: &self.failures,
        };
        let unit = cycle.run().await?;
        Ok(UnitRef::new(
            unit,
            Arc::clone(&self.provider),
            ResourceKind::Banner,
            self.key.clone(),
            self.bus.clone(),
        ))
    }

    fn install(&self, unit: UnitRef<P>) -> Result<(), PreloadError> {
        let previous = {
            let mut slot = self.unit.lock();
            if self.is_disposed() {
                None
            } else {
                Some(slot.replace(unit.clone()))
            }
        };
        let Some(previous) = previous else {
            self.publish(
                Event::new(EventKind::SurplusDiscarded)
                    .with_unit(unit.id())
                    .with_reason("persistent_disposed"),
            );
            unit.dispose();
            return Err(self.disposed_error());
        };
        if let Some(old) = previous {
            old.dispose();
        }
        self.publish(Event::new(EventKind::UnitLoaded).with_unit(unit.id()));
        self.callbacks.loaded(&self.key);
        Ok(())
    }

    fn disposed_error(&self) -> PreloadError {
        PreloadError::Disposed {
            kind: ResourceKind::Banner,
            key: self.key.to_string(),
        }
    }

    fn publish(&self, ev: Event) {
        self.bus
            .publish(ev.with_resource(ResourceKind::Banner, self.key.shared()));
    }
}

impl<P: Provider> fmt::Debug for Persistent<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Persistent")
            .field("key", &self.key)
            .field("size", &self.size)
            .field("unit", &self.unit.lock().as_ref().map(UnitRef::id))
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
