//! Error types used by the preload runtime and resource providers.
//!
//! This module defines two main error enums:
//!
//! - [`PreloadError`]: errors raised by the runtime itself (pools, controllers, registry).
//! - [`LoadError`]: errors raised by a [`Provider`](crate::Provider) while loading a unit.
//!
//! Both types provide helper methods (`as_label`, `as_message`) for logging/metrics
//! and additional utilities such as [`LoadError::is_retryable`].

use thiserror::Error;

use crate::resources::ResourceKind;

/// # Errors produced by the preload runtime.
///
/// Initialization-path errors propagate to the caller of the relevant `initialize_*`
/// call. Steady-state replenishment errors never reach the caller of `take`/`show`;
/// they are reported through the event bus instead.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PreloadError {
    /// Out-of-range probability, malformed key or invalid configuration value.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the input.
        reason: String,
    },

    /// A load cycle exhausted its retry ceiling.
    #[error("loading {kind}/{key} failed after {attempts} attempts: {reason}")]
    LoadFailure {
        /// Family of the resource.
        kind: ResourceKind,
        /// Resource key that failed to load.
        key: String,
        /// Number of attempts issued in this cycle.
        attempts: u32,
        /// Last provider error.
        reason: String,
    },

    /// Initial fill or provider bootstrap failed outside the retry path.
    #[error("initialization failed: {reason}")]
    Initialization {
        /// Underlying failure description.
        reason: String,
    },

    /// A live component already exists for this `(kind, key)` pair.
    #[error("a {kind} component for key {key:?} is already registered")]
    DuplicateKey {
        /// Family of the resource.
        kind: ResourceKind,
        /// Conflicting resource key.
        key: String,
    },

    /// `InitStrategy::NoAwait` was combined with a single-slot resource.
    #[error("strategy {strategy} cannot be used with a single-slot resource")]
    StrategyViolation {
        /// Label of the offending strategy.
        strategy: &'static str,
    },

    /// The component was disposed and can no longer load.
    #[error("{kind} component for key {key:?} is disposed")]
    Disposed {
        /// Family of the resource.
        kind: ResourceKind,
        /// Resource key of the disposed component.
        key: String,
    },

    /// The manager has been shut down and no longer accepts components.
    #[error("manager is shut down")]
    ShutDown,
}

impl PreloadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use preloadvisor::PreloadError;
    ///
    /// let err = PreloadError::InvalidArgument { reason: "chance=1.5".into() };
    /// assert_eq!(err.as_label(), "invalid_argument");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            PreloadError::InvalidArgument { .. } => "invalid_argument",
            PreloadError::LoadFailure { .. } => "load_failure",
            PreloadError::Initialization { .. } => "initialization_failed",
            PreloadError::DuplicateKey { .. } => "duplicate_key",
            PreloadError::StrategyViolation { .. } => "strategy_violation",
            PreloadError::Disposed { .. } => "disposed",
            PreloadError::ShutDown => "shut_down",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            PreloadError::InvalidArgument { reason } => format!("invalid argument: {reason}"),
            PreloadError::LoadFailure {
                kind,
                key,
                attempts,
                reason,
            } => format!("{kind}/{key}: gave up after {attempts} attempts ({reason})"),
            PreloadError::Initialization { reason } => format!("initialization: {reason}"),
            PreloadError::DuplicateKey { kind, key } => format!("duplicate {kind}/{key}"),
            PreloadError::StrategyViolation { strategy } => {
                format!("strategy {strategy} forbids single-slot resources")
            }
            PreloadError::Disposed { kind, key } => format!("{kind}/{key} is disposed"),
            PreloadError::ShutDown => "manager shut down".to_string(),
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        PreloadError::InvalidArgument {
            reason: reason.into(),
        }
    }
}

/// # Errors produced by a resource provider.
///
/// Returned from [`Provider::load`](crate::Provider::load) and
/// [`Provider::initialize`](crate::Provider::initialize).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The request failed (network, internal SDK error, ...).
    #[error("load failed: {reason}")]
    Fail {
        /// The underlying error message.
        reason: String,
    },

    /// The provider had nothing to serve for this request.
    #[error("no fill")]
    NoFill,

    /// The provider is not initialized or has been torn down.
    #[error("provider not ready: {reason}")]
    NotReady {
        /// The underlying error message.
        reason: String,
    },
}

impl LoadError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use preloadvisor::LoadError;
    ///
    /// assert_eq!(LoadError::NoFill.as_label(), "load_no_fill");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            LoadError::Fail { .. } => "load_failed",
            LoadError::NoFill => "load_no_fill",
            LoadError::NotReady { .. } => "load_not_ready",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            LoadError::Fail { reason } => format!("error: {reason}"),
            LoadError::NoFill => "no fill".to_string(),
            LoadError::NotReady { reason } => format!("not ready: {reason}"),
        }
    }

    /// Indicates whether the runtime may issue the load again.
    ///
    /// Returns `true` for [`LoadError::Fail`] and [`LoadError::NoFill`],
    /// `false` for [`LoadError::NotReady`].
    ///
    /// # Example
    /// ```
    /// use preloadvisor::LoadError;
    ///
    /// assert!(LoadError::Fail { reason: "timeout".into() }.is_retryable());
    /// assert!(!LoadError::NotReady { reason: "sdk".into() }.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        matches!(self, LoadError::Fail { .. } | LoadError::NoFill)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        let err = PreloadError::DuplicateKey {
            kind: ResourceKind::Rewarded,
            key: "home".into(),
        };
        assert_eq!(err.as_label(), "duplicate_key");
        assert_eq!(err.as_message(), "duplicate rewarded/home");
        assert_eq!(
            PreloadError::StrategyViolation { strategy: "no_await" }.as_label(),
            "strategy_violation"
        );
    }

    #[test]
    fn test_load_failure_display() {
        let err = PreloadError::LoadFailure {
            kind: ResourceKind::Banner,
            key: "footer".into(),
            attempts: 4,
            reason: "no fill".into(),
        };
        assert_eq!(
            err.to_string(),
            "loading banner/footer failed after 4 attempts: no fill"
        );
    }
}
