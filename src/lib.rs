//! # preloadvisor
//!
//! **Preloadvisor** keeps expensive, asynchronously loaded, single-use resources
//! ("units") ready before anybody asks for them.
//!
//! Units are loaded in the background through a user-supplied [`Provider`], held
//! in bounded queues, handed out on demand and replenished automatically. The
//! crate is the lifecycle engine only: the network/SDK call that loads or renders
//! a unit stays behind the [`Provider`] trait.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐
//!     │  PoolConfig  │   │ SingleSlotConfig │   │ PersistentConfig │
//!     └──────┬───────┘   └────────┬─────────┘   └────────┬─────────┘
//!            ▼                    ▼                      ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Manager (runtime orchestrator)                                   │
//! │  - Bus (broadcast events)                                         │
//! │  - Registry (one live component per (kind, key))                  │
//! │  - SubscriberSet (fans out to user subscribers)                   │
//! │  - Provider (loads, shows and disposes units)                     │
//! └──────┬──────────────────┬──────────────────────┬──────────────────┘
//!        ▼                  ▼                      ▼
//!     ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//!     │     Pool     │   │  SingleSlot  │   │  Persistent  │
//!     │ (FIFO queue, │   │ (gated, one  │   │ (one unit,   │
//!     │  replenish)  │   │  load only)  │   │  retry/fail) │
//!     └┬─────────────┘   └┬─────────────┘   └┬─────────────┘
//!      │ Publishes        │ Publishes        │ Publishes
//!      │ - LoadStarting   │ - GateClosed     │ - LoadFailed
//!      │ - UnitLoaded     │ - UnitShown      │ - RetriesExhausted
//!      │ - UnitDispatched │ - UnitDisposed   │ - ...
//!      ▼                  ▼                  ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │                        Bus (broadcast channel)                    │
//! │                   (capacity: Config::bus_capacity)                │
//! └─────────────────────────────────┬─────────────────────────────────┘
//!                                   ▼
//!                       ┌────────────────────────┐
//!                       │  subscriber_listener   │
//!                       │     (in Manager)       │
//!                       └───────────┬────────────┘
//!                                   ▼
//!                             SubscriberSet
//!                            (per-sub queues)
//!                         ┌─────────┼─────────┐
//!                         ▼         ▼         ▼
//!                      worker1   worker2   workerN
//! ```
//!
//! ### Pool lifecycle
//! ```text
//! initialize_pool(cfg) ──► Registry::register ──► fill: capacity × load_one()
//!
//! load_one():
//!   loop {
//!     ├─► publish LoadStarting{ attempt }
//!     ├─► provider.load(target)
//!     │       ├─ Ok  ──► queue full? ─► dispose (SurplusDiscarded)
//!     │       │                   └──► enqueue, units_ready += 1 (UnitLoaded)
//!     │       └─ Err ──► publish LoadFailed, shared counter += 1
//!     │                  ├─ counter <= max_retries ─► RetryScheduled, continue
//!     │                  └─ counter >  max_retries ─► reset, RetriesExhausted, exit
//!   }
//!
//! take(show_chance):
//!   gate ─► pop_front ─► spawn(load_one) ─► provider.show(unit, ShowSession)
//!                                              └─ Dismissed / FailedToShow ─► dispose
//! ```
//!
//! ## Features
//! | Area              | Description                                                 | Key types / traits                         |
//! |-------------------|-------------------------------------------------------------|--------------------------------------------|
//! | **Provider API**  | Plug in the SDK that loads, shows and disposes units.       | [`Provider`], [`ShowSession`]              |
//! | **Components**    | Pools, the single slot and persistent controllers.          | [`Pool`], [`SingleSlot`], [`Persistent`]   |
//! | **Orchestration** | Registry, bootstrap strategies and shutdown.                | [`Manager`], [`InitStrategy`]              |
//! | **Policies**      | Probability gate and bounded retry.                         | [`gate`], [`RetryPolicy`]                  |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, probes).      | [`Subscribe`], [`Event`]                   |
//! | **Errors**        | Typed errors for the runtime and for providers.             | [`PreloadError`], [`LoadError`]            |
//! | **Configuration** | Centralize runtime settings.                                | [`Config`]                                 |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] subscriber that writes through `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use preloadvisor::{
//!     Bootstrap, Config, InitStrategy, LoadError, LoadTarget, Manager, PersistentConfig,
//!     PoolConfig, Provider, ResourceKey, ResourceKind, Reward, ShowEvent, ShowSession,
//! };
//!
//! struct Sdk;
//!
//! #[async_trait::async_trait]
//! impl Provider for Sdk {
//!     type Unit = u64;
//!
//!     async fn load(&self, _target: &LoadTarget) -> Result<u64, LoadError> {
//!         Ok(42)
//!     }
//!     fn show(&self, _unit: &u64, session: ShowSession) {
//!         session.emit(ShowEvent::Showed);
//!         session.emit(ShowEvent::Dismissed);
//!     }
//!     fn dispose(&self, _unit: &u64) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn preloadvisor::Subscribe>> = {
//!         use preloadvisor::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn preloadvisor::Subscribe>> = Vec::new();
//!
//!     let mgr = Manager::builder(Config::default(), Arc::new(Sdk))
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let boot = Bootstrap::new()
//!         .with_pool(PoolConfig::new(ResourceKind::Rewarded, ResourceKey::new("rewarded")?, 2))
//!         .with_persistent(PersistentConfig::new(ResourceKey::new("banner")?));
//!     mgr.initialize_all(InitStrategy::EagerAwait, boot).await?;
//!
//!     if let Some(pool) = mgr.pool_or_none(ResourceKind::Rewarded, "rewarded") {
//!         pool.take(1.0, Some(Box::new(|r: &Reward| println!("earned {}", r.amount))))?;
//!     }
//!
//!     mgr.shutdown().await;
//!     Ok(())
//! }
//! ```
mod core;
mod error;
mod events;
mod policies;
mod resources;
mod subscribers;

#[cfg(test)]
mod test_support;

// ---- Public re-exports ----

pub use core::{
    Bootstrap, Config, InitialFill, Manager, ManagerBuilder, Persistent, Pool, Registry,
    SingleSlot, SlotState,
};
pub use error::{LoadError, PreloadError};
pub use events::{Bus, Event, EventKind};
pub use policies::{InitStrategy, RetryPolicy, gate};
pub use resources::{
    Callbacks, ConsumeHook, LoadRequest, LoadTarget, Orientation, PersistentConfig, PoolConfig,
    Provider, ResourceKey, ResourceKind, Reward, ShowEvent, ShowSession, SingleSlotConfig,
    UnitRef, UnitSize,
};
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a built-in logger subscriber.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
