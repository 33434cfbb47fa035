//! # Unit wrapper with checked disposal.
//!
//! Every unit returned by a provider is wrapped in a [`UnitRef`] before it is
//! stored anywhere. The wrapper carries an explicit `disposed` flag, so a second
//! dispose is a checked no-op instead of a provider call on a released unit.
//!
//! ## Rules
//! - Only the runtime can dispose a unit (`dispose` is crate-private).
//! - A unit dropped without explicit disposal is disposed on drop.
//! - Each disposal publishes exactly one [`EventKind::UnitDisposed`].

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crate::events::{Bus, Event, EventKind};

use super::{
    key::{ResourceKey, ResourceKind},
    provider::Provider,
};

static UNIT_ID: AtomicU64 = AtomicU64::new(1);

struct UnitCell<P: Provider> {
    id: u64,
    unit: P::Unit,
    provider: Arc<P>,
    kind: ResourceKind,
    key: ResourceKey,
    bus: Bus,
    disposed: AtomicBool,
}

impl<P: Provider> UnitCell<P> {
    fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.provider.dispose(&self.unit);
        self.bus.publish(
            Event::new(EventKind::UnitDisposed)
                .with_resource(self.kind, self.key.shared())
                .with_unit(self.id),
        );
        true
    }
}

impl<P: Provider> Drop for UnitCell<P> {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Shared handle to a loaded unit.
///
/// Cloning the handle does not clone the unit.
pub struct UnitRef<P: Provider> {
    cell: Arc<UnitCell<P>>,
}

impl<P: Provider> UnitRef<P> {
    pub(crate) fn new(
        unit: P::Unit,
        provider: Arc<P>,
        kind: ResourceKind,
        key: ResourceKey,
        bus: Bus,
    ) -> Self {
        Self {
            cell: Arc::new(UnitCell {
                id: UNIT_ID.fetch_add(1, Ordering::Relaxed),
                unit,
                provider,
                kind,
                key,
                bus,
                disposed: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the provider's unit.
    #[inline]
    pub fn get(&self) -> &P::Unit {
        &self.cell.unit
    }

    /// Process-unique id of this unit (for logs/metrics).
    #[inline]
    pub fn id(&self) -> u64 {
        self.cell.id
    }

    /// True once the unit has been released.
    #[inline]
    pub fn is_disposed(&self) -> bool {
        self.cell.disposed.load(Ordering::Acquire)
    }

    /// Disposes the unit; returns `false` if it was already disposed.
    pub(crate) fn dispose(&self) -> bool {
        self.cell.dispose()
    }
}

impl<P: Provider> Clone for UnitRef<P> {
    fn clone(&self) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<P: Provider> fmt::Debug for UnitRef<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRef")
            .field("id", &self.cell.id)
            .field("kind", &self.cell.kind)
            .field("key", &self.cell.key)
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;

    fn unit(provider: &Arc<MockProvider>) -> UnitRef<MockProvider> {
        UnitRef::new(
            provider.make_unit("k"),
            provider.clone(),
            ResourceKind::Interstitial,
            ResourceKey::new("k").unwrap(),
            Bus::new(8),
        )
    }

    #[test]
    fn test_dispose_is_checked_noop_second_time() {
        let provider = Arc::new(MockProvider::new());
        let u = unit(&provider);
        assert!(u.dispose());
        assert!(!u.dispose());
        assert!(u.is_disposed());
        assert_eq!(provider.disposed_count(), 1);
    }

    #[test]
    fn test_drop_disposes_once() {
        let provider = Arc::new(MockProvider::new());
        let u = unit(&provider);
        let clone = u.clone();
        drop(u);
        assert_eq!(provider.disposed_count(), 0);
        drop(clone);
        assert_eq!(provider.disposed_count(), 1);

        let u = unit(&provider);
        u.dispose();
        drop(u);
        assert_eq!(provider.disposed_count(), 2);
    }
}
