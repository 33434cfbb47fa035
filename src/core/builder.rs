use std::sync::Arc;

use crate::{
    core::Config,
    events::Bus,
    resources::Provider,
    subscribers::{Subscribe, SubscriberSet},
};

use super::{manager::Manager, registry::Registry};

/// Builder for constructing a [`Manager`].
pub struct ManagerBuilder<P: Provider> {
    cfg: Config,
    provider: Arc<P>,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<P: Provider> ManagerBuilder<P> {
    /// Creates a new builder with the given configuration and provider.
    pub fn new(cfg: Config, provider: Arc<P>) -> Self {
        Self {
            cfg,
            provider,
            subscribers: Vec::new(),
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive runtime events (loads, dispatches, disposals, etc.)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Adds a single subscriber.
    pub fn with_subscriber(mut self, subscriber: Arc<dyn Subscribe>) -> Self {
        self.subscribers.push(subscriber);
        self
    }

    /// Builds the manager and starts the subscriber listener.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn build(self) -> Arc<Manager<P>> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let subs = Arc::new(SubscriberSet::new(self.subscribers));
        let registry = Registry::new(bus.clone());

        let mgr = Manager::new_internal(self.cfg, bus, subs, registry, self.provider);
        mgr.subscriber_listener();
        mgr
    }
}
