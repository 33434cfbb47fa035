//! # Optional lifecycle callbacks.
//!
//! Every callback is optional; invoking an absent one is a no-op. Callbacks are
//! notifications only: disposal of shown units is wired by the runtime and does
//! not depend on any callback being present.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use preloadvisor::Callbacks;
//!
//! let loaded = Arc::new(AtomicUsize::new(0));
//! let counter = loaded.clone();
//! let cbs = Callbacks::new()
//!     .on_loaded(move |_key| { counter.fetch_add(1, Ordering::Relaxed); })
//!     .on_dismissed(|key| println!("{key} dismissed"));
//! # let _ = cbs;
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::LoadError;

use super::key::ResourceKey;

type KeyHook = Arc<dyn Fn(&ResourceKey) + Send + Sync>;
type LoadErrorHook = Arc<dyn Fn(&ResourceKey, &LoadError) + Send + Sync>;
type ReasonHook = Arc<dyn Fn(&ResourceKey, &str) + Send + Sync>;

/// Set of optional lifecycle callbacks attached to a resource configuration.
#[derive(Clone, Default)]
pub struct Callbacks {
    loaded: Option<KeyHook>,
    load_failed: Option<LoadErrorHook>,
    shown: Option<KeyHook>,
    impression: Option<KeyHook>,
    clicked: Option<KeyHook>,
    dismissed: Option<KeyHook>,
    failed_to_show: Option<ReasonHook>,
}

impl Callbacks {
    /// Creates an empty set (every notification is a no-op).
    pub fn new() -> Self {
        Self::default()
    }

    /// Called after a unit is loaded and accepted.
    pub fn on_loaded(mut self, f: impl Fn(&ResourceKey) + Send + Sync + 'static) -> Self {
        self.loaded = Some(Arc::new(f));
        self
    }

    /// Called on every failed load attempt.
    pub fn on_load_failed(
        mut self,
        f: impl Fn(&ResourceKey, &LoadError) + Send + Sync + 'static,
    ) -> Self {
        self.load_failed = Some(Arc::new(f));
        self
    }

    /// Called when the unit became visible.
    pub fn on_shown(mut self, f: impl Fn(&ResourceKey) + Send + Sync + 'static) -> Self {
        self.shown = Some(Arc::new(f));
        self
    }

    /// Called when the provider recorded an impression.
    pub fn on_impression(mut self, f: impl Fn(&ResourceKey) + Send + Sync + 'static) -> Self {
        self.impression = Some(Arc::new(f));
        self
    }

    /// Called when the unit was clicked.
    pub fn on_clicked(mut self, f: impl Fn(&ResourceKey) + Send + Sync + 'static) -> Self {
        self.clicked = Some(Arc::new(f));
        self
    }

    /// Called after the unit was dismissed (the unit is already disposed).
    pub fn on_dismissed(mut self, f: impl Fn(&ResourceKey) + Send + Sync + 'static) -> Self {
        self.dismissed = Some(Arc::new(f));
        self
    }

    /// Called after the unit failed to show (the unit is already disposed).
    pub fn on_failed_to_show(
        mut self,
        f: impl Fn(&ResourceKey, &str) + Send + Sync + 'static,
    ) -> Self {
        self.failed_to_show = Some(Arc::new(f));
        self
    }

    pub(crate) fn loaded(&self, key: &ResourceKey) {
        if let Some(f) = &self.loaded {
            f(key);
        }
    }

    pub(crate) fn load_failed(&self, key: &ResourceKey, err: &LoadError) {
        if let Some(f) = &self.load_failed {
            f(key, err);
        }
    }

    pub(crate) fn shown(&self, key: &ResourceKey) {
        if let Some(f) = &self.shown {
            f(key);
        }
    }

    pub(crate) fn impression(&self, key: &ResourceKey) {
        if let Some(f) = &self.impression {
            f(key);
        }
    }

    pub(crate) fn clicked(&self, key: &ResourceKey) {
        if let Some(f) = &self.clicked {
            f(key);
        }
    }

    pub(crate) fn dismissed(&self, key: &ResourceKey) {
        if let Some(f) = &self.dismissed {
            f(key);
        }
    }

    pub(crate) fn failed_to_show(&self, key: &ResourceKey, reason: &str) {
        if let Some(f) = &self.failed_to_show {
            f(key, reason);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("loaded", &self.loaded.is_some())
            .field("load_failed", &self.load_failed.is_some())
            .field("shown", &self.shown.is_some())
            .field("impression", &self.impression.is_some())
            .field("clicked", &self.clicked.is_some())
            .field("dismissed", &self.dismissed.is_some())
            .field("failed_to_show", &self.failed_to_show.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_absent_callbacks_are_noops() {
        let key = ResourceKey::new("k").unwrap();
        let cbs = Callbacks::new();
        cbs.loaded(&key);
        cbs.load_failed(&key, &LoadError::NoFill);
        cbs.failed_to_show(&key, "boom");
    }

    #[test]
    fn test_present_callbacks_fire() {
        let key = ResourceKey::new("k").unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let h1 = hits.clone();
        let h2 = hits.clone();
        let cbs = Callbacks::new()
            .on_clicked(move |_| {
                h1.fetch_add(1, Ordering::SeqCst);
            })
            .on_failed_to_show(move |k, reason| {
                assert_eq!(k.as_str(), "k");
                assert_eq!(reason, "expired");
                h2.fetch_add(10, Ordering::SeqCst);
            });
        cbs.clicked(&key);
        cbs.failed_to_show(&key, "expired");
        cbs.dismissed(&key);
        assert_eq!(hits.load(Ordering::SeqCst), 11);
    }
}
