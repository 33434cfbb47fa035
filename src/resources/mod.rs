//! # Resource abstractions and configurations.
//!
//! This module provides the resource-related types:
//! - [`Provider`] - trait for the external SDK that loads/shows/disposes units
//! - [`UnitRef`] - shared handle to a loaded unit with checked disposal
//! - [`ShowSession`] / [`ShowEvent`] - lifecycle reporting while a unit is shown
//! - [`PoolConfig`], [`SingleSlotConfig`], [`PersistentConfig`] - per-family settings
//! - [`Callbacks`] - optional lifecycle notifications
//! - [`ResourceKey`], [`ResourceKind`] - registry identity

mod callbacks;
mod config;
mod key;
mod provider;
mod request;
mod session;
mod unit;

pub use callbacks::Callbacks;
pub use config::{PersistentConfig, PoolConfig, SingleSlotConfig};
pub use key::{ResourceKey, ResourceKind};
pub use provider::Provider;
pub use request::{LoadRequest, LoadTarget, Orientation, UnitSize};
pub use session::{ConsumeHook, Reward, ShowEvent, ShowSession};
pub use unit::UnitRef;
