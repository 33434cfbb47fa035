//! # Runtime events emitted by pools, controllers and the manager.
//!
//! The [`EventKind`] enum classifies event types across four categories:
//! - **Load events**: load attempts, failures, retries, accepted and surplus units
//! - **Dispatch events**: what happened to a unit once it was handed out
//! - **Registry events**: components entering and leaving the directory
//! - **Bootstrap events**: provider init and initialization strategy progress
//!
//! The [`Event`] struct carries metadata such as the resource family and key,
//! attempt number, ready count and a human-readable reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use preloadvisor::{Event, EventKind, ResourceKind};
//!
//! let ev = Event::new(EventKind::LoadFailed)
//!     .with_resource(ResourceKind::Rewarded, "level-end")
//!     .with_reason("no fill")
//!     .with_attempt(2);
//!
//! assert_eq!(ev.kind, EventKind::LoadFailed);
//! assert_eq!(ev.key.as_deref(), Some("level-end"));
//! assert_eq!(ev.attempt, Some(2));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

use crate::resources::ResourceKind;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    // === Load events ===
    /// A load attempt is about to be issued.
    ///
    /// Sets: `resource`, `key`, `attempt` (1-based within the load cycle).
    LoadStarting,

    /// A load attempt failed.
    ///
    /// Sets: `resource`, `key`, `attempt`, `reason`.
    LoadFailed,

    /// The failed attempt will be retried immediately.
    ///
    /// Sets: `resource`, `key`, `attempt` (the failed one), `retries` (shared counter value).
    RetryScheduled,

    /// The retry ceiling was exceeded; the load cycle gave up.
    ///
    /// Sets: `resource`, `key`, `attempt`, `reason`.
    RetriesExhausted,

    /// A unit was loaded and accepted by its component.
    ///
    /// Sets: `resource`, `key`, `unit`, `ready` (pools only).
    UnitLoaded,

    /// A loaded unit was discarded because its pool was full or disposed.
    ///
    /// Sets: `resource`, `key`, `unit`, `reason`.
    SurplusDiscarded,

    // === Dispatch events ===
    /// The probability gate rejected a take/load request.
    ///
    /// Sets: `resource`, `key`.
    GateClosed,

    /// A take found no ready unit.
    ///
    /// Sets: `resource`, `key`.
    PoolDepleted,

    /// A unit was removed from its component and handed to the provider for display.
    ///
    /// Sets: `resource`, `key`, `unit`, `ready` (pools only).
    UnitDispatched,

    /// Provider reported the unit visible.
    UnitShown,

    /// Provider recorded an impression.
    UnitImpression,

    /// Provider reported a click.
    UnitClicked,

    /// Provider is about to dismiss the unit.
    UnitWillDismiss,

    /// Presentation ended; the unit has been disposed.
    UnitDismissed,

    /// Presentation failed; the unit has been disposed.
    ///
    /// Sets: `reason`.
    UnitShowFailed,

    /// Consumer earned the unit's reward.
    ///
    /// Sets: `reason` (reward kind and amount).
    UnitConsumed,

    /// A unit was released through the provider.
    ///
    /// Sets: `resource`, `key`, `unit`.
    UnitDisposed,

    // === Registry events ===
    /// A component was added to the registry.
    ///
    /// Sets: `resource`, `key`.
    ComponentRegistered,

    /// A registration was refused because the `(kind, key)` pair is live.
    ///
    /// Sets: `resource`, `key`, `reason`.
    DuplicateRejected,

    /// A component left the registry (disposed, failed or shut down).
    ///
    /// Sets: `resource`, `key`.
    ComponentRemoved,

    // === Bootstrap events ===
    /// Provider bootstrap finished.
    ProviderInitialized,

    /// Every component started by `initialize_all` finished its initial load.
    ///
    /// Sets: `reason` (strategy label).
    InitializationComplete,

    /// A component or the provider failed during a background initialization.
    ///
    /// Sets: `resource`/`key` when known, `reason`.
    InitializationFailed,

    /// The manager is shutting down.
    ShutdownRequested,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,

    /// Family of the resource, if applicable.
    pub resource: Option<ResourceKind>,
    /// Resource key, if applicable.
    pub key: Option<Arc<str>>,
    /// Id of the unit involved.
    pub unit: Option<u64>,
    /// Attempt number within a load cycle (starting from 1).
    pub attempt: Option<u32>,
    /// Value of the shared retry counter.
    pub retries: Option<u32>,
    /// Ready units after the change (pools only).
    pub ready: Option<usize>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            resource: None,
            key: None,
            unit: None,
            attempt: None,
            retries: None,
            ready: None,
            reason: None,
        }
    }

    /// Attaches the resource family and key.
    #[inline]
    pub fn with_resource(mut self, kind: ResourceKind, key: impl Into<Arc<str>>) -> Self {
        self.resource = Some(kind);
        self.key = Some(key.into());
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a unit id.
    #[inline]
    pub fn with_unit(mut self, id: u64) -> Self {
        self.unit = Some(id);
        self
    }

    /// Attaches an attempt number.
    #[inline]
    pub fn with_attempt(mut self, n: u32) -> Self {
        self.attempt = Some(n);
        self
    }

    /// Attaches the shared retry counter value.
    #[inline]
    pub fn with_retries(mut self, n: u32) -> Self {
        self.retries = Some(n);
        self
    }

    /// Attaches the ready count.
    #[inline]
    pub fn with_ready(mut self, n: usize) -> Self {
        self.ready = Some(n);
        self
    }

    /// True for events that concern one specific resource.
    #[inline]
    pub fn is_resource_event(&self) -> bool {
        self.resource.is_some()
    }
}
