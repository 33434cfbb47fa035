//! # Example: Bootstrap Strategies
//!
//! Starts a single slot, two pools and a persistent controller with
//! `InitStrategy::PartialAwait`: the caller waits for the SDK and the single slot
//! only, the rest is filled in the background.
//!
//! Run with: `cargo run --example bootstrap`

use std::{sync::Arc, time::Duration};

use preloadvisor::{
    Bootstrap, Callbacks, Config, InitStrategy, LoadError, LoadTarget, Manager, Orientation,
    PersistentConfig, PoolConfig, Provider, ResourceKey, ResourceKind, ShowEvent, ShowSession,
    SingleSlotConfig, UnitSize,
};

/// Fake SDK with a kind-dependent load latency.
struct FakeSdk;

#[async_trait::async_trait]
impl Provider for FakeSdk {
    type Unit = String;

    async fn initialize(&self) -> Result<(), LoadError> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        println!("[sdk] initialized");
        Ok(())
    }

    async fn load(&self, target: &LoadTarget) -> Result<String, LoadError> {
        let ms = match target.kind {
            ResourceKind::AppOpen => 50,
            ResourceKind::Banner => 150,
            _ => 300,
        };
        tokio::time::sleep(Duration::from_millis(ms)).await;
        Ok(format!("{}:{}", target.kind, target.key))
    }

    fn show(&self, unit: &String, session: ShowSession) {
        println!("[sdk] showing {unit}");
        session.emit(ShowEvent::Showed);
        session.emit(ShowEvent::Dismissed);
    }

    fn dispose(&self, unit: &String) {
        println!("[sdk] disposed {unit}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let mgr = Manager::builder(Config::default(), Arc::new(FakeSdk)).build();

    let loaded = Callbacks::new().on_loaded(|key| println!("[cb] loaded {key}"));
    let boot = Bootstrap::new()
        .with_single_slot(
            SingleSlotConfig::new(ResourceKey::new("app-open")?)
                .with_load_chance(1.0)
                .with_orientation(Orientation::Portrait)
                .with_callbacks(loaded.clone()),
        )
        .with_pool(
            PoolConfig::new(ResourceKind::Interstitial, ResourceKey::new("level-end")?, 2)
                .with_callbacks(loaded.clone()),
        )
        .with_pool(PoolConfig::new(
            ResourceKind::Rewarded,
            ResourceKey::new("extra-life")?,
            1,
        ))
        .with_persistent(
            PersistentConfig::new(ResourceKey::new("footer")?)
                .with_size(UnitSize::Adaptive { width: 360 })
                .with_callbacks(loaded),
        );

    // NoAwait cannot carry a single slot.
    let refused = mgr
        .initialize_all(InitStrategy::NoAwait, Bootstrap::new().with_single_slot(
            SingleSlotConfig::new(ResourceKey::new("app-open")?),
        ))
        .await;
    println!("[main] no_await + single slot: {refused:?}");

    mgr.initialize_all(InitStrategy::PartialAwait, boot).await?;
    println!(
        "[main] returned; complete={}",
        mgr.is_initialization_complete()
    );

    if let Some(slot) = mgr.single_slot_or_none() {
        slot.show();
    }

    mgr.wait_initialization_complete().await;
    println!("[main] complete={}", mgr.is_initialization_complete());
    for kind in [ResourceKind::Interstitial, ResourceKind::Rewarded] {
        for pool in mgr.pools(kind) {
            println!("[main] {kind}/{} ready={}", pool.key(), pool.units_ready());
        }
    }
    for banner in mgr.persistents() {
        println!("[main] banner {} size={:?}", banner.key(), banner.size());
    }

    mgr.shutdown().await;
    Ok(())
}
