//! # Core subscriber trait
//!
//! `Subscribe` is the extension point for plugging custom event handlers into the
//! runtime (metrics, audit logs, test probes). Each subscriber is driven by a
//! dedicated worker loop fed by a bounded queue owned by the
//! [`SubscriberSet`](crate::subscribers::SubscriberSet).
//!
//! ## Contract
//! - Implementations may be slow; they do **not** block pools or other subscribers.
//! - Each subscriber declares its preferred queue capacity via
//!   [`Subscribe::queue_capacity`]. On overflow, events for that subscriber are
//!   **dropped** (warn).
//!
//! ## Example
//! ```rust
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use preloadvisor::{Event, EventKind, Subscribe};
//!
//! #[derive(Default)]
//! struct FillRate {
//!     loaded: AtomicUsize,
//!     failed: AtomicUsize,
//! }
//!
//! #[async_trait::async_trait]
//! impl Subscribe for FillRate {
//!     async fn on_event(&self, ev: &Event) {
//!         match ev.kind {
//!             EventKind::UnitLoaded => { self.loaded.fetch_add(1, Ordering::Relaxed); }
//!             EventKind::LoadFailed => { self.failed.fetch_add(1, Ordering::Relaxed); }
//!             _ => {}
//!         }
//!     }
//!     fn name(&self) -> &'static str { "fill-rate" }
//! }
//! ```

use crate::events::Event;
use async_trait::async_trait;

/// Contract for event subscribers.
///
/// Called from a subscriber-dedicated worker task. Implementations should avoid
/// blocking the async runtime.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Handle a single event for this subscriber.
    async fn on_event(&self, event: &Event);

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Preferred capacity of this subscriber's queue.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
