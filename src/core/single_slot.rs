//! # SingleSlot: gated, no-retry, at-most-one resource.
//!
//! The single slot holds zero or one unit of the [`ResourceKind::AppOpen`]
//! family. It is created only if the probability gate opened at initialization
//! time (see [`Manager::initialize_single_slot`](crate::Manager::initialize_single_slot))
//! and issues exactly one load, never retrying.
//!
//! ## State machine
//! ```text
//! Loading ──ok──► Loaded ──show()──► Showing ──Dismissed/FailedToShow──► Disposed
//!    │               └──dispose()──────────────────────────────────────► Disposed
//!    └──err──► Failed (unregistered)
//! ```
//!
//! `Failed` and `Disposed` are terminal.

use std::fmt;
use std::sync::atomic::AtomicU32;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use crate::{
    events::{Bus, Event, EventKind},
    policies::RetryPolicy,
    resources::{
        Callbacks, LoadTarget, Provider, ResourceKey, ResourceKind, ShowSession,
        SingleSlotConfig, UnitRef,
    },
};

use super::{
    loader::LoadCycle,
    registry::{Registry, next_component_id},
};

/// Lifecycle state of the [`SingleSlot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SlotState {
    Loading,
    Loaded,
    Showing,
    Disposed,
    /// The single load attempt failed.
    Failed,
}

impl SlotState {
    /// Returns a short stable label (snake_case).
    pub fn as_label(&self) -> &'static str {
        match self {
            SlotState::Loading => "loading",
            SlotState::Loaded => "loaded",
            SlotState::Showing => "showing",
            SlotState::Disposed => "disposed",
            SlotState::Failed => "failed",
        }
    }

    /// True for `Disposed` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SlotState::Disposed | SlotState::Failed)
    }
}

struct Slot<P: Provider> {
    state: SlotState,
    unit: Option<UnitRef<P>>,
}

/// Controller for the process-wide single-slot resource.
pub struct SingleSlot<P: Provider> {
    id: u64,
    me: Weak<Self>,
    key: ResourceKey,
    target: LoadTarget,
    callbacks: Callbacks,
    show_on_load: bool,

    provider: Arc<P>,
    bus: Bus,
    registry: Weak<Registry<P>>,

    slot: Mutex<Slot<P>>,
}

impl<P: Provider> SingleSlot<P> {
    pub(crate) fn new(
        cfg: &SingleSlotConfig,
        provider: Arc<P>,
        bus: Bus,
        registry: Weak<Registry<P>>,
    ) -> Arc<Self> {
        Arc::new_cyclic(|me| Self {
            id: next_component_id(),
            me: me.clone(),
            key: cfg.key().clone(),
            target: cfg.target(),
            callbacks: cfg.callbacks().clone(),
            show_on_load: cfg.show_on_load(),
            provider,
            bus,
            registry,
            slot: Mutex::new(Slot {
                state: SlotState::Loading,
                unit: None,
            }),
        })
    }

    /// Issues the single load. Returns `true` if the slot ended up loaded.
    ///
    /// On failure the slot becomes `Failed` and leaves the registry. If
    /// `show_on_load` is set, a loaded unit is shown right away.
    pub(crate) async fn load(&self) -> bool {
        let failures = AtomicU32::new(0);
        let cycle = LoadCycle {
            provider: self.provider.as_ref(),
            target: &self.target,
            callbacks: &self.callbacks,
            bus: &self.bus,
            retry: RetryPolicy::never(),
            failures: &failures,
        };

        let unit = match cycle.run().await {
            Ok(unit) => UnitRef::new(
                unit,
                Arc::clone(&self.provider),
                ResourceKind::AppOpen,
                self.key.clone(),
                self.bus.clone(),
            ),
            Err(_) => {
                {
                    let mut slot = self.slot.lock();
                    if slot.state == SlotState::Loading {
                        slot.state = SlotState::Failed;
                    }
                }
                self.unregister();
                return false;
            }
        };

        let accepted = {
            let mut slot = self.slot.lock();
            if slot.state == SlotState::Loading {
                slot.state = SlotState::Loaded;
                slot.unit = Some(unit.clone());
                true
            } else {
                false
            }
        };
        if !accepted {
            self.publish(
                Event::new(EventKind::SurplusDiscarded)
                    .with_unit(unit.id())
                    .with_reason("slot_disposed"),
            );
            unit.dispose();
            return false;
        }

        self.publish(Event::new(EventKind::UnitLoaded).with_unit(unit.id()));
        self.callbacks.loaded(&self.key);

        if self.show_on_load {
            self.show();
        }
        true
    }

    /// Shows the loaded unit. No-op (returns `false`) unless the slot is `Loaded`.
    ///
    /// Dismissal or show failure disposes the slot.
    pub fn show(&self) -> bool {
        let unit = {
            let mut slot = self.slot.lock();
            if slot.state != SlotState::Loaded {
                return false;
            }
            let Some(unit) = slot.unit.clone() else {
                return false;
            };
            slot.state = SlotState::Showing;
            unit
        };

        self.publish(Event::new(EventKind::UnitDispatched).with_unit(unit.id()));
        let me = self.me.clone();
        let session = ShowSession::new(
            ResourceKind::AppOpen,
            self.key.clone(),
            unit.id(),
            self.callbacks.clone(),
            self.bus.clone(),
            None,
            move || {
                if let Some(slot) = me.upgrade() {
                    slot.dispose();
                }
            },
        );
        self.provider.show(unit.get(), session);
        true
    }

    /// Disposes the held unit (if any) and leaves the registry. Idempotent.
    pub fn dispose(&self) {
        let unit = {
            let mut slot = self.slot.lock();
            if slot.state.is_terminal() {
                return;
            }
            slot.state = SlotState::Disposed;
            slot.unit.take()
        };
        if let Some(unit) = unit {
            unit.dispose();
        }
        self.unregister();
    }

    /// True if a unit is loaded and not yet shown.
    pub fn is_loaded(&self) -> bool {
        self.slot.lock().state == SlotState::Loaded
    }

    /// Current state.
    pub fn state(&self) -> SlotState {
        self.slot.lock().state
    }

    #[inline]
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub(crate) fn id(&self) -> u64 {
        self.id
    }

    fn unregister(&self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.unregister(ResourceKind::AppOpen, &self.key, self.id);
        }
    }

    fn publish(&self, ev: Event) {
        self.bus
            .publish(ev.with_resource(ResourceKind::AppOpen, self.key.shared()));
    }
}

impl<P: Provider> fmt::Debug for SingleSlot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SingleSlot")
            .field("key", &self.key)
            .field("state", &self.state())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::registry::Component;
    use crate::test_support::{MockProvider, ShowMode};

    fn setup(
        cfg: SingleSlotConfig,
    ) -> (
        Arc<MockProvider>,
        Arc<Registry<MockProvider>>,
        Arc<SingleSlot<MockProvider>>,
    ) {
        let bus = Bus::new(64);
        let provider = Arc::new(MockProvider::new());
        let registry = Registry::new(bus.clone());
        let slot = SingleSlot::new(&cfg, provider.clone(), bus, Arc::downgrade(&registry));
        registry
            .register(Component::SingleSlot(slot.clone()))
            .unwrap();
        (provider, registry, slot)
    }

    fn cfg() -> SingleSlotConfig {
        SingleSlotConfig::new(ResourceKey::new("app-open").unwrap())
    }

    #[tokio::test]
    async fn test_failure_is_not_retried() {
        let (provider, registry, slot) = setup(cfg());
        provider.fail_always();

        assert!(!slot.load().await);
        assert_eq!(provider.load_count(), 1);
        assert_eq!(slot.state(), SlotState::Failed);
        assert!(registry.single_slot().is_none());
    }

    #[tokio::test]
    async fn test_show_then_dismiss_disposes() {
        let (provider, registry, slot) = setup(cfg());
        assert!(slot.load().await);
        assert!(slot.is_loaded());

        assert!(slot.show());
        assert_eq!(slot.state(), SlotState::Showing);
        assert!(!slot.show());

        provider.dismiss_all();
        assert_eq!(slot.state(), SlotState::Disposed);
        assert_eq!(provider.disposed_count(), 1);
        assert!(registry.single_slot().is_none());
    }

    #[tokio::test]
    async fn test_show_on_load() {
        let (provider, _registry, slot) = setup(cfg().with_show_on_load(true));
        provider.set_show_mode(ShowMode::FailToShow);

        assert!(slot.load().await);
        assert_eq!(provider.shown_ids().len(), 1);
        assert_eq!(slot.state(), SlotState::Disposed);
        assert_eq!(provider.disposed_count(), 1);
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent_and_safe_when_never_shown() {
        let (provider, _registry, slot) = setup(cfg());
        assert!(slot.load().await);
        slot.dispose();
        slot.dispose();
        assert_eq!(provider.disposed_count(), 1);
        assert!(!slot.show());
    }

    #[tokio::test]
    async fn test_dispose_while_loading_discards_unit() {
        let (provider, _registry, slot) = setup(cfg());
        provider.hold_loads();
        let loading = {
            let slot = slot.clone();
            tokio::spawn(async move { slot.load().await })
        };
        while provider.load_count() == 0 {
            tokio::task::yield_now().await;
        }
        slot.dispose();
        provider.release_loads(1);

        assert!(!loading.await.unwrap());
        assert_eq!(slot.state(), SlotState::Disposed);
        assert_eq!(provider.disposed_count(), 1);
    }
}
