//! # Per-family resource configurations.
//!
//! Defines the immutable settings a component is created from:
//! - [`PoolConfig`] for queue-backed families ([`Pool`](crate::Pool))
//! - [`SingleSlotConfig`] for the gated single slot ([`SingleSlot`](crate::SingleSlot))
//! - [`PersistentConfig`] for long-lived units ([`Persistent`](crate::Persistent))
//!
//! ## Rules
//! - A config is validated when handed to the [`Manager`](crate::Manager), not on construction.
//! - The config is then owned by the component for its whole life.

use crate::error::PreloadError;
use crate::policies::gate;

use super::{
    callbacks::Callbacks,
    key::{ResourceKey, ResourceKind},
    request::{LoadRequest, LoadTarget, Orientation, UnitSize},
};

/// Configuration of a preload pool.
///
/// ## Example
/// ```rust
/// use preloadvisor::{PoolConfig, ResourceKey, ResourceKind};
///
/// let key = ResourceKey::new("level-end").unwrap();
/// let cfg = PoolConfig::new(ResourceKind::Interstitial, key, 2);
/// assert_eq!(cfg.capacity(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct PoolConfig {
    kind: ResourceKind,
    key: ResourceKey,
    capacity: usize,
    request: LoadRequest,
    callbacks: Callbacks,
}

impl PoolConfig {
    /// Creates a pool configuration with an empty request and no callbacks.
    ///
    /// ### Parameters
    /// - `kind`: pool family ([`ResourceKind::Interstitial`] or [`ResourceKind::Rewarded`])
    /// - `key`: external resource id
    /// - `capacity`: number of ready units to keep (`>= 1`)
    pub fn new(kind: ResourceKind, key: ResourceKey, capacity: usize) -> Self {
        Self {
            kind,
            key,
            capacity,
            request: LoadRequest::default(),
            callbacks: Callbacks::default(),
        }
    }

    /// Returns a new config with the given request template.
    pub fn with_request(mut self, request: LoadRequest) -> Self {
        self.request = request;
        self
    }

    /// Returns a new config with the given callbacks.
    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn request(&self) -> &LoadRequest {
        &self.request
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    pub(crate) fn validate(&self) -> Result<(), PreloadError> {
        if !self.kind.is_pooled() {
            return Err(PreloadError::invalid(format!(
                "{} is not a pooled resource family",
                self.kind
            )));
        }
        if self.capacity == 0 {
            return Err(PreloadError::invalid("pool capacity must be at least 1"));
        }
        Ok(())
    }

    pub(crate) fn target(&self) -> LoadTarget {
        LoadTarget {
            kind: self.kind,
            key: self.key.clone(),
            request: self.request.clone(),
            orientation: None,
            size: None,
        }
    }
}

/// Configuration of the probability-gated single slot.
///
/// Defaults: `load_chance = 1.0`, `show_on_load = false`, portrait orientation.
#[derive(Clone, Debug)]
pub struct SingleSlotConfig {
    key: ResourceKey,
    request: LoadRequest,
    callbacks: Callbacks,
    load_chance: f64,
    show_on_load: bool,
    orientation: Orientation,
}

impl SingleSlotConfig {
    /// Creates a single-slot configuration for `key`.
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            request: LoadRequest::default(),
            callbacks: Callbacks::default(),
            load_chance: 1.0,
            show_on_load: false,
            orientation: Orientation::default(),
        }
    }

    /// Probability in `[0.0, 1.0]` that the unit is loaded at all.
    pub fn with_load_chance(mut self, chance: f64) -> Self {
        self.load_chance = chance;
        self
    }

    /// Show the unit as soon as it is loaded.
    pub fn with_show_on_load(mut self, show: bool) -> Self {
        self.show_on_load = show;
        self
    }

    pub fn with_orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    pub fn with_request(mut self, request: LoadRequest) -> Self {
        self.request = request;
        self
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn load_chance(&self) -> f64 {
        self.load_chance
    }

    pub fn show_on_load(&self) -> bool {
        self.show_on_load
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    pub(crate) fn validate(&self) -> Result<(), PreloadError> {
        gate::check_chance(self.load_chance)
    }

    pub(crate) fn target(&self) -> LoadTarget {
        LoadTarget {
            kind: ResourceKind::AppOpen,
            key: self.key.clone(),
            request: self.request.clone(),
            orientation: Some(self.orientation),
            size: None,
        }
    }
}

/// Configuration of a long-lived persistent unit.
#[derive(Clone, Debug)]
pub struct PersistentConfig {
    key: ResourceKey,
    request: LoadRequest,
    callbacks: Callbacks,
    size: UnitSize,
}

impl PersistentConfig {
    /// Creates a persistent configuration for `key` with the default size.
    pub fn new(key: ResourceKey) -> Self {
        Self {
            key,
            request: LoadRequest::default(),
            callbacks: Callbacks::default(),
            size: UnitSize::default(),
        }
    }

    pub fn with_size(mut self, size: UnitSize) -> Self {
        self.size = size;
        self
    }

    pub fn with_request(mut self, request: LoadRequest) -> Self {
        self.request = request;
        self
    }

    pub fn with_callbacks(mut self, callbacks: Callbacks) -> Self {
        self.callbacks = callbacks;
        self
    }

    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub fn size(&self) -> UnitSize {
        self.size
    }

    pub fn callbacks(&self) -> &Callbacks {
        &self.callbacks
    }

    pub(crate) fn validate(&self) -> Result<(), PreloadError> {
        match self.size {
            UnitSize::Adaptive { width: 0 } | UnitSize::Custom { width: 0, .. } => {
                Err(PreloadError::invalid("unit width must be positive"))
            }
            UnitSize::Custom { height: 0, .. } => {
                Err(PreloadError::invalid("unit height must be positive"))
            }
            _ => Ok(()),
        }
    }

    pub(crate) fn target(&self) -> LoadTarget {
        LoadTarget {
            kind: ResourceKind::Banner,
            key: self.key.clone(),
            request: self.request.clone(),
            orientation: None,
            size: Some(self.size),
        }
    }
}
