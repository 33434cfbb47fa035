//! Gate, retry and initialization policies.
//!
//! This module groups the knobs that control **whether** a unit is loaded or
//! shown, **how often** a failed load is retried, and **what** the bootstrap waits for.
//!
//! ## Contents
//! - [`gate`]          probability gate (`decide(chance)`)
//! - [`RetryPolicy`]   bounded, immediate retry of failed loads
//! - [`InitStrategy`]  eager / partial / no-await bootstrap
//!
//! ## Quick wiring
//! ```text
//! Pool::take(show_chance) ──► gate::decide ──► dequeue + replenish
//! SingleSlot init(load_chance) ──► gate::decide ──► single load (RetryPolicy::never)
//! Pool / Persistent load ──► RetryPolicy (Config::max_retries, default 3)
//! Manager::initialize_all(InitStrategy, Bootstrap)
//! ```

pub mod gate;
mod retry;
mod strategy;

pub use retry::RetryPolicy;
pub use strategy::InitStrategy;
