//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for the preload runtime.
//!
//! Config is used in two ways:
//! 1. **Manager creation**: `Manager::builder(config, provider)`
//! 2. **Component defaults**: pools and persistents take their retry ceiling from it
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by the bus
//! - `max_retries = 0` → a failed load is never retried

use crate::policies::RetryPolicy;

/// How many loads a pool issues when it is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitialFill {
    /// Exactly `capacity` loads (default).
    #[default]
    Capacity,
    /// `capacity + 1` loads; the surplus unit is disposed when it arrives.
    CapacityPlusOne,
}

/// Global configuration for the preload runtime.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped by Bus)
/// - `max_retries`: Failures tolerated per load cycle of pools and persistents
/// - `initial_fill`: Number of loads a new pool issues
///
/// The single slot never retries regardless of `max_retries`.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow subscribers that lag behind more than `bus_capacity` messages skip
    /// older items.
    pub bus_capacity: usize,

    /// Maximum failures tolerated by one load cycle before giving up.
    ///
    /// Applies to [`Pool`](crate::Pool) (silent give-up) and
    /// [`Persistent`](crate::Persistent) (error returned to the caller).
    pub max_retries: u32,

    /// Number of loads issued when a pool is created.
    pub initial_fill: InitialFill,
}

impl Config {
    /// Returns the retry policy for pools and persistents.
    #[inline]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::bounded(self.max_retries)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Number of initial loads for a pool of the given capacity.
    #[inline]
    pub fn initial_loads(&self, capacity: usize) -> usize {
        match self.initial_fill {
            InitialFill::Capacity => capacity,
            InitialFill::CapacityPlusOne => capacity + 1,
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    /// - `max_retries = 3`
    /// - `initial_fill = InitialFill::Capacity`
    fn default() -> Self {
        Self {
            bus_capacity: 1024,
            max_retries: RetryPolicy::default().max_retries,
            initial_fill: InitialFill::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.bus_capacity, 1024);
        assert_eq!(cfg.retry_policy(), RetryPolicy::bounded(3));
        assert_eq!(cfg.initial_loads(2), 2);
    }

    #[test]
    fn test_sentinels() {
        let cfg = Config {
            bus_capacity: 0,
            max_retries: 0,
            initial_fill: InitialFill::CapacityPlusOne,
        };
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert!(!cfg.retry_policy().allows(1));
        assert_eq!(cfg.initial_loads(2), 3);
    }
}
