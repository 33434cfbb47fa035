//! # Event subscribers for the preload runtime.
//!
//! This module provides the [`Subscribe`] trait, the [`SubscriberSet`] fan-out
//! and the built-in [`LogWriter`] (feature `logging`).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Pool / SingleSlot / Persistent ── publish(Event) ──► Bus ──► Manager listener
//!                                                                     │
//!                                                          SubscriberSet::emit(&Event)
//!                                                     ┌───────────┬───┴───────┐
//!                                                     ▼           ▼           ▼
//!                                                 LogWriter    Metrics     Custom
//! ```

#[cfg(feature = "logging")]
mod embedded;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use embedded::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
