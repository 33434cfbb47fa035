//! # Component registry - directory of live pools and controllers.
//!
//! The registry maps `(ResourceKind, ResourceKey)` to the one live component
//! that manages it. Components add themselves when they are created by the
//! [`Manager`](crate::Manager) and remove themselves when they are disposed.
//!
//! ## Architecture
//! ```text
//! Manager::initialize_*() ─► component::new() ─► Registry::register(component)
//!                                                   ├─► Ok  → ComponentRegistered
//!                                                   └─► Err → DuplicateRejected (DuplicateKey)
//! component.dispose()     ─► Registry::unregister(kind, key, id) → ComponentRemoved
//! Manager lookups         ─► Registry::pool / pools / single_slot / persistent / ...
//! ```
//!
//! ## Rules
//! - At most one live component per `(kind, key)`.
//! - `unregister` only removes the entry if the id matches, so a disposed
//!   component can never evict its successor.
//! - Locks are held for the map operation only, never across an `.await`.
//! - The single slot is claimed at most once per registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::{
    error::PreloadError,
    events::{Bus, Event, EventKind},
    resources::{Provider, ResourceKey, ResourceKind},
};

use super::{persistent::Persistent, pool::Pool, single_slot::SingleSlot};

static COMPONENT_ID: AtomicU64 = AtomicU64::new(1);

/// Allocates a process-unique component id.
pub(crate) fn next_component_id() -> u64 {
    COMPONENT_ID.fetch_add(1, Ordering::Relaxed)
}

/// A live component held by the registry.
pub(crate) enum Component<P: Provider> {
    Pool(Arc<Pool<P>>),
    SingleSlot(Arc<SingleSlot<P>>),
    Persistent(Arc<Persistent<P>>),
}

impl<P: Provider> Component<P> {
    fn id(&self) -> u64 {
        match self {
            Component::Pool(c) => c.id(),
            Component::SingleSlot(c) => c.id(),
            Component::Persistent(c) => c.id(),
        }
    }

    fn kind(&self) -> ResourceKind {
        match self {
            Component::Pool(c) => c.kind(),
            Component::SingleSlot(_) => ResourceKind::AppOpen,
            Component::Persistent(_) => ResourceKind::Banner,
        }
    }

    fn key(&self) -> &ResourceKey {
        match self {
            Component::Pool(c) => c.key(),
            Component::SingleSlot(c) => c.key(),
            Component::Persistent(c) => c.key(),
        }
    }

    pub(crate) fn dispose(&self) {
        match self {
            Component::Pool(c) => c.dispose(),
            Component::SingleSlot(c) => c.dispose(),
            Component::Persistent(c) => c.dispose(),
        }
    }
}

impl<P: Provider> Clone for Component<P> {
    fn clone(&self) -> Self {
        match self {
            Component::Pool(c) => Component::Pool(Arc::clone(c)),
            Component::SingleSlot(c) => Component::SingleSlot(Arc::clone(c)),
            Component::Persistent(c) => Component::Persistent(Arc::clone(c)),
        }
    }
}

/// Directory of live components keyed by `(kind, key)`.
pub struct Registry<P: Provider> {
    entries: RwLock<HashMap<ResourceKind, HashMap<ResourceKey, Component<P>>>>,
    single_slot_claimed: AtomicBool,
    bus: Bus,
}

impl<P: Provider> Registry<P> {
    /// Creates a new empty registry.
    pub(crate) fn new(bus: Bus) -> Arc<Self> {
        Arc::new(Self {
            entries: RwLock::new(HashMap::new()),
            single_slot_claimed: AtomicBool::new(false),
            bus,
        })
    }

    /// Adds a component; fails with `DuplicateKey` if its `(kind, key)` is live.
    pub(crate) fn register(&self, component: Component<P>) -> Result<(), PreloadError> {
        let kind = component.kind();
        let key = component.key().clone();

        {
            let mut entries = self.entries.write();
            let family = entries.entry(kind).or_default();
            if family.contains_key(&key) {
                drop(entries);
                self.bus.publish(
                    Event::new(EventKind::DuplicateRejected)
                        .with_resource(kind, key.shared())
                        .with_reason("component_already_exists"),
                );
                return Err(PreloadError::DuplicateKey {
                    kind,
                    key: key.to_string(),
                });
            }
            family.insert(key.clone(), component);
        }

        self.bus
            .publish(Event::new(EventKind::ComponentRegistered).with_resource(kind, key.shared()));
        Ok(())
    }

    /// Removes the entry for `(kind, key)` if it belongs to component `id`.
    ///
    /// Returns `true` if an entry was removed. Idempotent.
    pub(crate) fn unregister(&self, kind: ResourceKind, key: &ResourceKey, id: u64) -> bool {
        let removed = {
            let mut entries = self.entries.write();
            match entries.get_mut(&kind) {
                Some(family) if family.get(key).is_some_and(|c| c.id() == id) => {
                    family.remove(key);
                    true
                }
                _ => false,
            }
        };
        if removed {
            self.bus
                .publish(Event::new(EventKind::ComponentRemoved).with_resource(kind, key.shared()));
        }
        removed
    }

    /// Claims the process-wide single slot; `false` if it was claimed before.
    pub(crate) fn claim_single_slot(&self) -> bool {
        !self.single_slot_claimed.swap(true, Ordering::AcqRel)
    }

    /// Clones every live component (for shutdown).
    pub(crate) fn snapshot(&self) -> Vec<Component<P>> {
        self.entries
            .read()
            .values()
            .flat_map(|family| family.values().cloned())
            .collect()
    }

    fn get(&self, kind: ResourceKind, key: &str) -> Option<Component<P>> {
        self.entries.read().get(&kind)?.get(key).cloned()
    }

    fn family(&self, kind: ResourceKind) -> Vec<Component<P>> {
        let entries = self.entries.read();
        let mut out: Vec<(ResourceKey, Component<P>)> = entries
            .get(&kind)
            .map(|family| family.iter().map(|(k, c)| (k.clone(), c.clone())).collect())
            .unwrap_or_default();
        drop(entries);
        out.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        out.into_iter().map(|(_, c)| c).collect()
    }

    /// Returns the live pool for `(kind, key)`, if any.
    pub fn pool(&self, kind: ResourceKind, key: &str) -> Option<Arc<Pool<P>>> {
        match self.get(kind, key)? {
            Component::Pool(p) => Some(p),
            _ => None,
        }
    }

    /// Returns every live pool of `kind`, sorted by key.
    pub fn pools(&self, kind: ResourceKind) -> Vec<Arc<Pool<P>>> {
        self.family(kind)
            .into_iter()
            .filter_map(|c| match c {
                Component::Pool(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Returns the live single slot, if any.
    pub fn single_slot(&self) -> Option<Arc<SingleSlot<P>>> {
        self.family(ResourceKind::AppOpen)
            .into_iter()
            .find_map(|c| match c {
                Component::SingleSlot(s) => Some(s),
                _ => None,
            })
    }

    /// Returns the live persistent controller for `key`, if any.
    pub fn persistent(&self, key: &str) -> Option<Arc<Persistent<P>>> {
        match self.get(ResourceKind::Banner, key)? {
            Component::Persistent(p) => Some(p),
            _ => None,
        }
    }

    /// Returns every live persistent controller, sorted by key.
    pub fn persistents(&self) -> Vec<Arc<Persistent<P>>> {
        self.family(ResourceKind::Banner)
            .into_iter()
            .filter_map(|c| match c {
                Component::Persistent(p) => Some(p),
                _ => None,
            })
            .collect()
    }

    /// Number of live components across all families.
    pub fn len(&self) -> usize {
        self.entries.read().values().map(HashMap::len).sum()
    }

    /// True if no component is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
