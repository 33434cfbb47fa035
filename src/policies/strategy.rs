//! # Initialization strategies.
//!
//! [`InitStrategy`] controls what [`Manager::initialize_all`](crate::Manager::initialize_all)
//! awaits before returning. All strategies **start** the same work; they only
//! differ in what the caller waits for.
//!
//! ```text
//!                 provider init   single slot   pools + persistents
//! EagerAwait      awaited         awaited       awaited
//! PartialAwait    awaited         awaited       spawned (flag set on finish)
//! NoAwait         spawned         forbidden     spawned (flag set on finish)
//! ```

use std::fmt;

/// What `initialize_all` waits for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InitStrategy {
    /// Await everything (default).
    #[default]
    EagerAwait,
    /// Await the provider and the single slot; fill pools in the background.
    PartialAwait,
    /// Await nothing. Cannot be combined with a single-slot resource.
    NoAwait,
}

impl InitStrategy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            InitStrategy::EagerAwait => "eager_await",
            InitStrategy::PartialAwait => "partial_await",
            InitStrategy::NoAwait => "no_await",
        }
    }

    /// True if a single-slot resource may be part of the bootstrap.
    #[inline]
    pub fn allows_single_slot(&self) -> bool {
        !matches!(self, InitStrategy::NoAwait)
    }
}

impl fmt::Display for InitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
