//! Runtime core: components, registry and orchestration.
//!
//! The public entry point of this module is [`Manager`], which creates pools and
//! controllers, owns the [`Registry`], and drives bootstrap and shutdown.
//!
//! Internal modules:
//! - [`loader`]: one load cycle with bounded retry and event publishing;
//! - [`pool`]: bounded, self-replenishing queue of ready units;
//! - [`single_slot`]: gated, no-retry, at-most-one resource;
//! - [`persistent`]: one long-lived unit with retry-then-fail loading;
//! - [`registry`]: one live component per `(kind, key)`;
//! - [`manager`]: initialization strategies, lookups, shutdown.

mod builder;
mod config;
mod loader;
mod manager;
mod persistent;
mod pool;
mod registry;
mod single_slot;

pub use builder::ManagerBuilder;
pub use config::{Config, InitialFill};
pub use manager::{Bootstrap, Manager};
pub use persistent::Persistent;
pub use pool::Pool;
pub use registry::Registry;
pub use single_slot::{SingleSlot, SlotState};
