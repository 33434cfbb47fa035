//! # Resource identity.
//!
//! A component in the registry is identified by its [`ResourceKind`] (the family)
//! and a [`ResourceKey`] (the external resource id, e.g. a placement id).

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use crate::error::PreloadError;

/// Family of a preloaded resource.
///
/// The family decides which component manages it:
/// - [`Interstitial`](ResourceKind::Interstitial), [`Rewarded`](ResourceKind::Rewarded) → [`Pool`](crate::Pool)
/// - [`AppOpen`](ResourceKind::AppOpen) → [`SingleSlot`](crate::SingleSlot)
/// - [`Banner`](ResourceKind::Banner) → [`Persistent`](crate::Persistent)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// Full-screen unit shown between content transitions.
    Interstitial,
    /// Full-screen unit that reports a [`Reward`](crate::Reward) when consumed.
    Rewarded,
    /// Unit shown while the application comes to the foreground. Single slot.
    AppOpen,
    /// Long-lived unit rendered on an externally owned surface.
    Banner,
}

impl ResourceKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResourceKind::Interstitial => "interstitial",
            ResourceKind::Rewarded => "rewarded",
            ResourceKind::AppOpen => "app_open",
            ResourceKind::Banner => "banner",
        }
    }

    /// True for the families backed by a preload queue.
    #[inline]
    pub fn is_pooled(&self) -> bool {
        matches!(self, ResourceKind::Interstitial | ResourceKind::Rewarded)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Validated, cheaply cloneable resource identifier.
///
/// A key must be non-empty and contain no whitespace or control characters.
///
/// # Example
/// ```
/// use preloadvisor::ResourceKey;
///
/// let key = ResourceKey::new("ca-app-pub-3940256099942544/1033173712").unwrap();
/// assert_eq!(key.as_str(), "ca-app-pub-3940256099942544/1033173712");
/// assert!(ResourceKey::new("").is_err());
/// assert!(ResourceKey::new("two words").is_err());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(Arc<str>);

impl ResourceKey {
    /// Validates and wraps a key.
    pub fn new(key: impl AsRef<str>) -> Result<Self, PreloadError> {
        let key = key.as_ref();
        if key.is_empty() {
            return Err(PreloadError::invalid("resource key is empty"));
        }
        if key.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(PreloadError::invalid(format!(
                "resource key {key:?} contains whitespace or control characters"
            )));
        }
        Ok(Self(Arc::from(key)))
    }

    /// Returns the key as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub(crate) fn shared(&self) -> Arc<str> {
        Arc::clone(&self.0)
    }
}

impl Borrow<str> for ResourceKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<&str> for ResourceKey {
    type Error = PreloadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<String> for ResourceKey {
    type Error = PreloadError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_keys() {
        for bad in ["", " ", "a b", "tab\there", "nl\n"] {
            let err = ResourceKey::new(bad).unwrap_err();
            assert_eq!(err.as_label(), "invalid_argument", "key {bad:?}");
        }
    }

    #[test]
    fn test_borrow_as_str_for_lookups() {
        use std::collections::HashMap;

        let mut map = HashMap::new();
        map.insert(ResourceKey::new("home/top").unwrap(), 1);
        assert_eq!(map.get("home/top"), Some(&1));
        assert_eq!(map.get("home"), None);
    }

    #[test]
    fn test_pooled_families() {
        assert!(ResourceKind::Interstitial.is_pooled());
        assert!(ResourceKind::Rewarded.is_pooled());
        assert!(!ResourceKind::AppOpen.is_pooled());
        assert!(!ResourceKind::Banner.is_pooled());
    }
}
