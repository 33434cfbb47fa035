//! # Manager: creates components, owns the registry, drives bootstrap and shutdown.
//!
//! The [`Manager`] owns the event bus, a [`SubscriberSet`], the component
//! [`Registry`] and the [`Provider`]. Every pool and controller is created
//! through it and registers itself under its `(kind, key)`.
//!
//! ## Key responsibilities
//! - create pools, the single slot and persistent controllers from their configs
//! - enforce one live component per `(kind, key)` (via the registry)
//! - run [`initialize_all`](Manager::initialize_all) with an [`InitStrategy`]
//! - forward bus events to the subscriber set
//! - dispose every component on [`shutdown`](Manager::shutdown)
//!
//! ## High-level architecture
//! ```text
//! Manager::builder(cfg, provider).with_subscribers(subs).build()
//!     └─► subscriber_listener(): Bus.subscribe() ─► SubscriberSet::emit(&Event)
//!
//! initialize_all(strategy, Bootstrap { single_slot, pools, persistents }):
//!   NoAwait + single_slot ──► Err(StrategyViolation)        (nothing started)
//!   EagerAwait   : provider.initialize ─► single slot ─► join(pools, persistents) ─► complete
//!   PartialAwait : provider.initialize ─► single slot ─► spawn(join(...) ─► complete)
//!   NoAwait      : spawn(provider.initialize ─► join(...) ─► complete)
//!
//! Component flow:
//!   initialize_pool(cfg)        ─► Pool::new ─► Registry::register ─► Pool::fill
//!   initialize_single_slot(cfg) ─► gate(load_chance) ─► SingleSlot::new ─► register ─► load
//!   initialize_persistent(cfg)  ─► Persistent::new ─► register ─► load (retry, then fail)
//!
//! Shutdown path:
//!   shutdown() ─► Bus.publish(ShutdownRequested)
//!              ─► dispose every registered component (ComponentRemoved, UnitDisposed)
//!              ─► token.cancel() ─► listener drains the bus and exits
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use preloadvisor::{
//!     Bootstrap, Config, InitStrategy, LoadError, LoadTarget, Manager, PoolConfig, Provider,
//!     ResourceKey, ResourceKind, ShowEvent, ShowSession,
//! };
//!
//! struct Echo;
//!
//! #[async_trait::async_trait]
//! impl Provider for Echo {
//!     type Unit = String;
//!
//!     async fn load(&self, target: &LoadTarget) -> Result<String, LoadError> {
//!         Ok(target.key.to_string())
//!     }
//!     fn show(&self, _unit: &String, session: ShowSession) {
//!         session.emit(ShowEvent::Showed);
//!         session.emit(ShowEvent::Dismissed);
//!     }
//!     fn dispose(&self, _unit: &String) {}
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mgr = Manager::builder(Config::default(), Arc::new(Echo)).build();
//!
//!     let key = ResourceKey::new("interstitial-home")?;
//!     let boot = Bootstrap::new().with_pool(PoolConfig::new(ResourceKind::Interstitial, key, 2));
//!     mgr.initialize_all(InitStrategy::EagerAwait, boot).await?;
//!
//!     let pool = mgr.pool_or_none(ResourceKind::Interstitial, "interstitial-home").unwrap();
//!     assert_eq!(pool.units_ready(), 2);
//!     assert!(pool.take(1.0, None)?);
//!
//!     mgr.shutdown().await;
//!     Ok(())
//! }
//! ```

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use futures::future::join_all;
use parking_lot::Mutex;
use tokio::{
    sync::{broadcast, watch},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::PreloadError,
    events::{Bus, Event, EventKind},
    policies::{InitStrategy, gate},
    resources::{PersistentConfig, PoolConfig, Provider, ResourceKind, SingleSlotConfig},
    subscribers::SubscriberSet,
};

use super::{
    builder::ManagerBuilder,
    config::Config,
    persistent::Persistent,
    pool::Pool,
    registry::{Component, Registry},
    single_slot::SingleSlot,
};

/// Set of components started by [`Manager::initialize_all`].
#[derive(Debug, Default)]
pub struct Bootstrap {
    /// Optional single-slot resource (not allowed with [`InitStrategy::NoAwait`]).
    pub single_slot: Option<SingleSlotConfig>,
    /// Pools to create and fill.
    pub pools: Vec<PoolConfig>,
    /// Persistent controllers to create and load.
    pub persistents: Vec<PersistentConfig>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_single_slot(mut self, cfg: SingleSlotConfig) -> Self {
        self.single_slot = Some(cfg);
        self
    }

    pub fn with_pool(mut self, cfg: PoolConfig) -> Self {
        self.pools.push(cfg);
        self
    }

    pub fn with_persistent(mut self, cfg: PersistentConfig) -> Self {
        self.persistents.push(cfg);
        self
    }

    fn validate(&self) -> Result<(), PreloadError> {
        if let Some(slot) = &self.single_slot {
            slot.validate()?;
        }
        for pool in &self.pools {
            pool.validate()?;
        }
        for persistent in &self.persistents {
            persistent.validate()?;
        }
        Ok(())
    }
}

/// Creates and tracks pools and controllers for one [`Provider`].
pub struct Manager<P: Provider> {
    cfg: Config,
    bus: Bus,
    subs: Arc<SubscriberSet>,
    registry: Arc<Registry<P>>,
    provider: Arc<P>,

    me: Weak<Self>,
    closing: AtomicBool,
    token: CancellationToken,
    complete: watch::Sender<bool>,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<P: Provider> Manager<P> {
    /// Creates a builder for configuring the manager.
    pub fn builder(cfg: Config, provider: Arc<P>) -> ManagerBuilder<P> {
        ManagerBuilder::new(cfg, provider)
    }

    /// Internal constructor used by the builder.
    pub(crate) fn new_internal(
        cfg: Config,
        bus: Bus,
        subs: Arc<SubscriberSet>,
        registry: Arc<Registry<P>>,
        provider: Arc<P>,
    ) -> Arc<Self> {
        let (complete, _) = watch::channel(false);
        Arc::new_cyclic(|me| Self {
            cfg,
            bus,
            subs,
            registry,
            provider,
            me: me.clone(),
            closing: AtomicBool::new(false),
            token: CancellationToken::new(),
            complete,
            listener: Mutex::new(None),
        })
    }

    /// Creates a pool, registers it and waits for its initial fill.
    ///
    /// # Errors
    /// - [`PreloadError::InvalidArgument`] for a non-pooled kind or zero capacity.
    /// - [`PreloadError::DuplicateKey`] if a pool for `(kind, key)` is live.
    /// - [`PreloadError::Initialization`] if a load task died; the pool is disposed.
    pub async fn initialize_pool(&self, cfg: PoolConfig) -> Result<Arc<Pool<P>>, PreloadError> {
        cfg.validate()?;
        self.ensure_running()?;

        let pool = Pool::new(
            &cfg,
            Arc::clone(&self.provider),
            self.bus.clone(),
            self.cfg.retry_policy(),
            Arc::downgrade(&self.registry),
        );
        self.registry.register(Component::Pool(Arc::clone(&pool)))?;

        if let Err(e) = pool.fill(self.cfg.initial_loads(pool.capacity())).await {
            pool.dispose();
            return Err(e);
        }
        Ok(pool)
    }

    /// Creates the single slot if the load gate opens.
    ///
    /// Returns `Ok(None)` if the gate is closed, the single load failed, or the
    /// slot was already used in this process.
    ///
    /// # Errors
    /// - [`PreloadError::InvalidArgument`] if `load_chance` is outside `[0.0, 1.0]`.
    /// - [`PreloadError::DuplicateKey`] while a single slot is live.
    pub async fn initialize_single_slot(
        &self,
        cfg: SingleSlotConfig,
    ) -> Result<Option<Arc<SingleSlot<P>>>, PreloadError> {
        cfg.validate()?;
        self.ensure_running()?;

        if let Some(live) = self.registry.single_slot() {
            self.bus.publish(
                Event::new(EventKind::DuplicateRejected)
                    .with_resource(ResourceKind::AppOpen, cfg.key().shared())
                    .with_reason("single_slot_live"),
            );
            return Err(PreloadError::DuplicateKey {
                kind: ResourceKind::AppOpen,
                key: live.key().to_string(),
            });
        }
        if !self.registry.claim_single_slot() {
            return Ok(None);
        }
        if !gate::decide(cfg.load_chance())? {
            self.bus.publish(
                Event::new(EventKind::GateClosed)
                    .with_resource(ResourceKind::AppOpen, cfg.key().shared()),
            );
            return Ok(None);
        }

        let slot = SingleSlot::new(
            &cfg,
            Arc::clone(&self.provider),
            self.bus.clone(),
            Arc::downgrade(&self.registry),
        );
        self.registry
            .register(Component::SingleSlot(Arc::clone(&slot)))?;

        if slot.load().await {
            Ok(Some(slot))
        } else {
            Ok(None)
        }
    }

    /// Creates a persistent controller and loads its unit.
    ///
    /// # Errors
    /// - [`PreloadError::InvalidArgument`] for a zero-sized custom size.
    /// - [`PreloadError::DuplicateKey`] if a controller for `key` is live.
    /// - [`PreloadError::LoadFailure`] if the retry ceiling was exceeded; the
    ///   controller is disposed.
    pub async fn initialize_persistent(
        &self,
        cfg: PersistentConfig,
    ) -> Result<Arc<Persistent<P>>, PreloadError> {
        cfg.validate()?;
        self.ensure_running()?;

        let persistent = Persistent::new(
            &cfg,
            Arc::clone(&self.provider),
            self.bus.clone(),
            self.cfg.retry_policy(),
            Arc::downgrade(&self.registry),
        );
        self.registry
            .register(Component::Persistent(Arc::clone(&persistent)))?;
        persistent.load().await?;
        Ok(persistent)
    }

    /// Bootstraps the provider and every component in `boot`.
    ///
    /// See [`InitStrategy`] for what is awaited. Work started in the background
    /// reports failures as [`EventKind::InitializationFailed`]; the completion
    /// flag is set once it finishes either way.
    ///
    /// # Errors
    /// - [`PreloadError::StrategyViolation`] for `NoAwait` with a single slot.
    /// - [`PreloadError::InvalidArgument`] if any config is invalid (nothing started).
    /// - Any error of the awaited steps.
    pub async fn initialize_all(
        &self,
        strategy: InitStrategy,
        boot: Bootstrap,
    ) -> Result<(), PreloadError> {
        if boot.single_slot.is_some() && !strategy.allows_single_slot() {
            return Err(PreloadError::StrategyViolation {
                strategy: strategy.as_label(),
            });
        }
        boot.validate()?;
        self.ensure_running()?;

        let Bootstrap {
            single_slot,
            pools,
            persistents,
        } = boot;

        match strategy {
            InitStrategy::EagerAwait => {
                self.initialize_provider().await?;
                if let Some(slot) = single_slot {
                    self.initialize_single_slot(slot).await?;
                }
                let res = self.initialize_components(pools, persistents).await;
                self.mark_complete(strategy);
                res
            }
            InitStrategy::PartialAwait => {
                self.initialize_provider().await?;
                if let Some(slot) = single_slot {
                    self.initialize_single_slot(slot).await?;
                }
                let mgr = self.strong()?;
                tokio::spawn(async move {
                    let res = mgr.initialize_components(pools, persistents).await;
                    mgr.finish_background(strategy, res);
                });
                Ok(())
            }
            InitStrategy::NoAwait => {
                let mgr = self.strong()?;
                tokio::spawn(async move {
                    let res = match mgr.initialize_provider().await {
                        Ok(()) => mgr.initialize_components(pools, persistents).await,
                        Err(e) => Err(e),
                    };
                    mgr.finish_background(strategy, res);
                });
                Ok(())
            }
        }
    }

    /// True once every component started by `initialize_all` has settled.
    pub fn is_initialization_complete(&self) -> bool {
        *self.complete.borrow()
    }

    /// Waits until [`is_initialization_complete`](Self::is_initialization_complete).
    pub async fn wait_initialization_complete(&self) {
        let mut rx = self.complete.subscribe();
        let _ = rx.wait_for(|done| *done).await;
    }

    /// Returns the live pool for `(kind, key)`.
    pub fn pool_or_none(&self, kind: ResourceKind, key: &str) -> Option<Arc<Pool<P>>> {
        self.registry.pool(kind, key)
    }

    /// Returns every live pool of `kind`, sorted by key.
    pub fn pools(&self, kind: ResourceKind) -> Vec<Arc<Pool<P>>> {
        self.registry.pools(kind)
    }

    /// Returns the live single slot.
    pub fn single_slot_or_none(&self) -> Option<Arc<SingleSlot<P>>> {
        self.registry.single_slot()
    }

    /// Returns the live persistent controller for `key`.
    pub fn persistent_or_none(&self, key: &str) -> Option<Arc<Persistent<P>>> {
        self.registry.persistent(key)
    }

    /// Returns every live persistent controller, sorted by key.
    pub fn persistents(&self) -> Vec<Arc<Persistent<P>>> {
        self.registry.persistents()
    }

    /// Directory of live components.
    pub fn registry(&self) -> &Registry<P> {
        &self.registry
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Subscribes directly to the event bus.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// True once [`shutdown`](Self::shutdown) was called.
    pub fn is_shut_down(&self) -> bool {
        self.closing.load(Ordering::Acquire)
    }

    /// Disposes every live component and stops the event listener.
    ///
    /// Idempotent. Later `initialize_*` calls fail with [`PreloadError::ShutDown`].
    pub async fn shutdown(&self) {
        if self.closing.swap(true, Ordering::AcqRel) {
            return;
        }
        self.bus.publish(Event::new(EventKind::ShutdownRequested));
        for component in self.registry.snapshot() {
            component.dispose();
        }
        self.token.cancel();

        let listener = self.listener.lock().take();
        if let Some(handle) = listener {
            let _ = handle.await;
        }
    }

    /// Subscribes to the bus and forwards events to the subscriber set.
    ///
    /// Drains pending events after cancellation, then exits.
    pub(crate) fn subscriber_listener(&self) {
        let mut rx = self.bus.subscribe();
        let set = Arc::clone(&self.subs);
        let token = self.token.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    msg = rx.recv() => match msg {
                        Ok(ev) => set.emit(&ev),
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "subscriber listener lagged behind the bus");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = token.cancelled() => break,
                }
            }
        });
        *self.listener.lock() = Some(handle);
    }

    async fn initialize_provider(&self) -> Result<(), PreloadError> {
        let name = self.provider.name();
        match self.provider.initialize().await {
            Ok(()) => {
                self.bus
                    .publish(Event::new(EventKind::ProviderInitialized).with_reason(name));
                Ok(())
            }
            Err(e) => Err(PreloadError::Initialization {
                reason: format!("provider {name}: {e}"),
            }),
        }
    }

    async fn initialize_components(
        &self,
        pools: Vec<PoolConfig>,
        persistents: Vec<PersistentConfig>,
    ) -> Result<(), PreloadError> {
        let pools = join_all(pools.into_iter().map(|cfg| self.initialize_pool(cfg)));
        let persistents = join_all(
            persistents
                .into_iter()
                .map(|cfg| self.initialize_persistent(cfg)),
        );
        let (pools, persistents) = tokio::join!(pools, persistents);

        let first_err = pools
            .into_iter()
            .filter_map(Result::err)
            .chain(persistents.into_iter().filter_map(Result::err))
            .next();
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn finish_background(&self, strategy: InitStrategy, res: Result<(), PreloadError>) {
        if let Err(e) = res {
            tracing::warn!(strategy = strategy.as_label(), error = %e, "background initialization failed");
            self.bus.publish(
                Event::new(EventKind::InitializationFailed).with_reason(e.as_label()),
            );
        }
        self.mark_complete(strategy);
    }

    fn mark_complete(&self, strategy: InitStrategy) {
        self.complete.send_replace(true);
        self.bus.publish(
            Event::new(EventKind::InitializationComplete).with_reason(strategy.as_label()),
        );
    }

    fn ensure_running(&self) -> Result<(), PreloadError> {
        if self.is_shut_down() {
            Err(PreloadError::ShutDown)
        } else {
            Ok(())
        }
    }

    fn strong(&self) -> Result<Arc<Self>, PreloadError> {
        self.me.upgrade().ok_or(PreloadError::ShutDown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::resources::ResourceKey;
    use crate::subscribers::Subscribe;
    use crate::test_support::{MockProvider, ShowMode};
    use async_trait::async_trait;
    use std::time::Duration;
    use tokio::sync::mpsc;

    fn manager() -> (Arc<MockProvider>, Arc<Manager<MockProvider>>) {
        let provider = Arc::new(MockProvider::new());
        let mgr = Manager::builder(Config::default(), provider.clone()).build();
        (provider, mgr)
    }

    fn key(s: &str) -> ResourceKey {
        ResourceKey::new(s).unwrap()
    }

    fn inter(k: &str, capacity: usize) -> PoolConfig {
        PoolConfig::new(ResourceKind::Interstitial, key(k), capacity)
    }

    async fn wait_complete(mgr: &Manager<MockProvider>) {
        tokio::time::timeout(Duration::from_secs(5), mgr.wait_initialization_complete())
            .await
            .expect("initialization never completed");
    }

    #[tokio::test]
    async fn test_duplicate_key_rejected_until_disposed() {
        let (_provider, mgr) = manager();
        let first = mgr.initialize_pool(inter("home", 1)).await.unwrap();

        let err = mgr.initialize_pool(inter("home", 1)).await.unwrap_err();
        assert_eq!(err.as_label(), "duplicate_key");

        // Same key in another family is a different identity.
        mgr.initialize_pool(PoolConfig::new(ResourceKind::Rewarded, key("home"), 1))
            .await
            .unwrap();

        first.dispose();
        assert!(mgr.pool_or_none(ResourceKind::Interstitial, "home").is_none());
        let second = mgr.initialize_pool(inter("home", 1)).await.unwrap();
        assert!(Arc::ptr_eq(
            &second,
            &mgr.pool_or_none(ResourceKind::Interstitial, "home").unwrap()
        ));

        // A stale dispose must not evict the new pool.
        first.dispose();
        assert!(mgr.pool_or_none(ResourceKind::Interstitial, "home").is_some());
    }

    #[tokio::test]
    async fn test_invalid_pool_config() {
        let (provider, mgr) = manager();
        let err = mgr.initialize_pool(inter("zero", 0)).await.unwrap_err();
        assert_eq!(err.as_label(), "invalid_argument");
        let err = mgr
            .initialize_pool(PoolConfig::new(ResourceKind::Banner, key("b"), 1))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "invalid_argument");
        assert_eq!(provider.load_count(), 0);
    }

    #[tokio::test]
    async fn test_end_to_end_take_and_replenish() {
        let (provider, mgr) = manager();
        mgr.initialize_pool(inter("home", 2)).await.unwrap();
        let pool = mgr.pool_or_none(ResourceKind::Interstitial, "home").unwrap();
        assert_eq!(pool.units_ready(), 2);

        assert!(pool.take(1.0, None).unwrap());
        assert_eq!(pool.units_ready(), 1);
        assert_eq!(provider.shown_ids().len(), 1);

        let mut ready = pool.subscribe_ready();
        tokio::time::timeout(Duration::from_secs(5), ready.wait_for(|n| *n == 2))
            .await
            .unwrap()
            .unwrap();

        assert!(!pool.take(0.0, None).unwrap());
        tokio::task::yield_now().await;
        assert_eq!(pool.units_ready(), 2);
        assert_eq!(provider.shown_ids().len(), 1);
    }

    #[tokio::test]
    async fn test_single_slot_closed_gate_issues_no_load() {
        let (provider, mgr) = manager();
        let cfg = SingleSlotConfig::new(key("app-open")).with_load_chance(0.0);
        assert!(mgr.initialize_single_slot(cfg).await.unwrap().is_none());
        assert_eq!(provider.load_count(), 0);
        assert!(mgr.single_slot_or_none().is_none());

        // Not re-creatable in the same process.
        let cfg = SingleSlotConfig::new(key("app-open"));
        assert!(mgr.initialize_single_slot(cfg).await.unwrap().is_none());
        assert_eq!(provider.load_count(), 0);
    }

    #[tokio::test]
    async fn test_single_slot_failure_is_absent_without_retry() {
        let (provider, mgr) = manager();
        provider.fail_always();
        let cfg = SingleSlotConfig::new(key("app-open"));
        assert!(mgr.initialize_single_slot(cfg).await.unwrap().is_none());
        assert_eq!(provider.load_count(), 1);
        assert!(mgr.single_slot_or_none().is_none());
    }

    #[tokio::test]
    async fn test_single_slot_at_most_once() {
        let (provider, mgr) = manager();
        let slot = mgr
            .initialize_single_slot(SingleSlotConfig::new(key("app-open")))
            .await
            .unwrap()
            .unwrap();
        assert!(slot.is_loaded());

        let err = mgr
            .initialize_single_slot(SingleSlotConfig::new(key("other")))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "duplicate_key");

        provider.set_show_mode(ShowMode::Dismiss);
        assert!(slot.show());
        assert!(mgr.single_slot_or_none().is_none());
        assert!(
            mgr.initialize_single_slot(SingleSlotConfig::new(key("app-open")))
                .await
                .unwrap()
                .is_none()
        );
        assert_eq!(provider.load_count(), 1);
    }

    #[tokio::test]
    async fn test_invalid_load_chance() {
        let (provider, mgr) = manager();
        let cfg = SingleSlotConfig::new(key("app-open")).with_load_chance(2.0);
        let err = mgr.initialize_single_slot(cfg).await.unwrap_err();
        assert_eq!(err.as_label(), "invalid_argument");
        assert_eq!(provider.load_count(), 0);
    }

    #[tokio::test]
    async fn test_persistent_exhaustion_unregisters() {
        let (provider, mgr) = manager();
        provider.fail_always();
        let err = mgr
            .initialize_persistent(PersistentConfig::new(key("banner")))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "load_failure");
        assert_eq!(provider.load_count(), 4);
        assert!(mgr.persistent_or_none("banner").is_none());
        assert!(mgr.persistents().is_empty());

        provider.succeed_always();
        let persistent = mgr
            .initialize_persistent(PersistentConfig::new(key("banner")))
            .await
            .unwrap();
        assert!(persistent.unit().is_some());
    }

    #[tokio::test]
    async fn test_no_await_with_single_slot_fails_fast() {
        let (provider, mgr) = manager();
        let boot = Bootstrap::new()
            .with_single_slot(SingleSlotConfig::new(key("app-open")))
            .with_pool(inter("home", 1));

        let err = mgr
            .initialize_all(InitStrategy::NoAwait, boot)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            PreloadError::StrategyViolation {
                strategy: "no_await"
            }
        );
        tokio::task::yield_now().await;
        assert_eq!(provider.init_count(), 0);
        assert_eq!(provider.load_count(), 0);
        assert!(!mgr.is_initialization_complete());
    }

    #[tokio::test]
    async fn test_eager_await_completes_everything() {
        let (provider, mgr) = manager();
        let boot = Bootstrap::new()
            .with_single_slot(SingleSlotConfig::new(key("app-open")))
            .with_pool(inter("a", 2))
            .with_pool(PoolConfig::new(ResourceKind::Rewarded, key("r"), 1))
            .with_persistent(PersistentConfig::new(key("banner")));

        mgr.initialize_all(InitStrategy::EagerAwait, boot)
            .await
            .unwrap();
        assert!(mgr.is_initialization_complete());
        assert_eq!(provider.init_count(), 1);
        assert_eq!(provider.load_count(), 5);
        assert!(mgr.single_slot_or_none().is_some());
        assert_eq!(mgr.pools(ResourceKind::Interstitial).len(), 1);
        assert_eq!(mgr.pools(ResourceKind::Rewarded)[0].units_ready(), 1);
        assert!(mgr.persistent_or_none("banner").unwrap().unit().is_some());
    }

    #[tokio::test]
    async fn test_partial_await_sets_flag_in_background() {
        let (provider, mgr) = manager();
        provider.hold_loads();
        let boot = Bootstrap::new()
            .with_single_slot(SingleSlotConfig::new(key("app-open")))
            .with_pool(inter("a", 2));

        let init = {
            let mgr = mgr.clone();
            tokio::spawn(async move { mgr.initialize_all(InitStrategy::PartialAwait, boot).await })
        };
        // The single slot load is awaited.
        provider.release_loads(1);
        init.await.unwrap().unwrap();
        assert!(mgr.single_slot_or_none().unwrap().is_loaded());
        assert!(!mgr.is_initialization_complete());

        provider.release_loads(2);
        wait_complete(&mgr).await;
        assert_eq!(
            mgr.pool_or_none(ResourceKind::Interstitial, "a")
                .unwrap()
                .units_ready(),
            2
        );
    }

    #[tokio::test]
    async fn test_no_await_sets_flag_in_background() {
        let (provider, mgr) = manager();
        let boot = Bootstrap::new()
            .with_pool(inter("a", 1))
            .with_persistent(PersistentConfig::new(key("banner")));

        mgr.initialize_all(InitStrategy::NoAwait, boot)
            .await
            .unwrap();
        wait_complete(&mgr).await;
        assert_eq!(provider.init_count(), 1);
        assert!(mgr.pool_or_none(ResourceKind::Interstitial, "a").is_some());
        assert!(mgr.persistent_or_none("banner").is_some());
    }

    #[tokio::test]
    async fn test_background_failure_still_completes() {
        let (provider, mgr) = manager();
        provider.fail_init(LoadError::NotReady {
            reason: "sdk offline".into(),
        });
        let mut rx = mgr.subscribe();

        mgr.initialize_all(InitStrategy::NoAwait, Bootstrap::new().with_pool(inter("a", 1)))
            .await
            .unwrap();
        wait_complete(&mgr).await;
        assert_eq!(provider.load_count(), 0);

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert!(kinds.contains(&EventKind::InitializationFailed));
        assert!(kinds.contains(&EventKind::InitializationComplete));
    }

    #[tokio::test]
    async fn test_eager_provider_failure_propagates() {
        let (provider, mgr) = manager();
        provider.fail_init(LoadError::NotReady {
            reason: "sdk offline".into(),
        });
        let err = mgr
            .initialize_all(InitStrategy::EagerAwait, Bootstrap::new().with_pool(inter("a", 1)))
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "initialization_failed");
        assert_eq!(provider.load_count(), 0);
    }

    #[tokio::test]
    async fn test_shutdown_disposes_everything() {
        let (provider, mgr) = manager();
        mgr.initialize_pool(inter("a", 2)).await.unwrap();
        mgr.initialize_persistent(PersistentConfig::new(key("banner")))
            .await
            .unwrap();

        mgr.shutdown().await;
        mgr.shutdown().await;
        assert!(mgr.is_shut_down());
        assert!(mgr.registry().is_empty());
        assert_eq!(provider.disposed_count(), 3);

        let err = mgr.initialize_pool(inter("b", 1)).await.unwrap_err();
        assert_eq!(err, PreloadError::ShutDown);
    }

    struct Forward(mpsc::UnboundedSender<EventKind>);

    #[async_trait]
    impl Subscribe for Forward {
        async fn on_event(&self, ev: &Event) {
            let _ = self.0.send(ev.kind);
        }
    }

    #[tokio::test]
    async fn test_listener_forwards_events_to_subscribers() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let provider = Arc::new(MockProvider::new());
        let mgr = Manager::builder(Config::default(), provider)
            .with_subscribers(vec![Arc::new(Forward(tx))])
            .build();

        mgr.initialize_pool(inter("a", 1)).await.unwrap();
        mgr.shutdown().await;

        let mut kinds = Vec::new();
        while let Ok(Some(kind)) =
            tokio::time::timeout(Duration::from_millis(200), rx.recv()).await
        {
            kinds.push(kind);
        }
        assert_eq!(kinds.first(), Some(&EventKind::ComponentRegistered));
        assert!(kinds.contains(&EventKind::UnitLoaded));
        assert!(kinds.contains(&EventKind::ShutdownRequested));
        assert!(kinds.contains(&EventKind::ComponentRemoved));
    }
}
