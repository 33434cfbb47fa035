//! # Example: Preloaded Pool
//!
//! A rewarded pool of capacity 2 backed by a fake SDK that fails now and then.
//! Every `take` dispatches one unit and schedules one replenishment load;
//! the built-in `LogWriter` prints the lifecycle through `tracing`.
//!
//! Run with: `cargo run --example preload_pool --features logging`

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use preloadvisor::{
    Config, LoadError, LoadTarget, LogWriter, Manager, PoolConfig, Provider, ResourceKey,
    ResourceKind, Reward, ShowEvent, ShowSession, Subscribe,
};

/// Fake SDK: every third load fails, shows complete after a short delay.
#[derive(Default)]
struct FakeSdk {
    loads: AtomicU64,
}

#[async_trait::async_trait]
impl Provider for FakeSdk {
    type Unit = u64;

    fn name(&self) -> &'static str {
        "fake-sdk"
    }

    async fn load(&self, target: &LoadTarget) -> Result<u64, LoadError> {
        let n = self.loads.fetch_add(1, Ordering::Relaxed) + 1;
        tokio::time::sleep(Duration::from_millis(50)).await;
        if n % 3 == 0 {
            return Err(LoadError::Fail {
                reason: format!("{}: network hiccup", target.key),
            });
        }
        Ok(n)
    }

    fn show(&self, unit: &u64, session: ShowSession) {
        println!("[sdk] showing unit #{unit}");
        tokio::spawn(async move {
            session.emit(ShowEvent::Showed);
            session.emit(ShowEvent::Impression);
            tokio::time::sleep(Duration::from_millis(100)).await;
            session.emit(ShowEvent::Consumed(Reward {
                kind: "coins".into(),
                amount: 10,
            }));
            session.emit(ShowEvent::Dismissed);
        });
    }

    fn dispose(&self, unit: &u64) {
        println!("[sdk] disposed unit #{unit}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let subs: Vec<Arc<dyn Subscribe>> = vec![Arc::new(LogWriter::new())];
    let mgr = Manager::builder(Config::default(), Arc::new(FakeSdk::default()))
        .with_subscribers(subs)
        .build();

    let cfg = PoolConfig::new(ResourceKind::Rewarded, ResourceKey::new("rewarded-home")?, 2);
    let pool = mgr.initialize_pool(cfg).await?;
    println!("[main] ready after fill: {}", pool.units_ready());

    for round in 1..=3 {
        let shown = pool.take(
            1.0,
            Some(Box::new(move |r: &Reward| {
                println!("[main] round {round}: earned {} {}", r.amount, r.kind);
            })),
        )?;
        println!("[main] round {round}: shown={shown} ready={}", pool.units_ready());

        let mut ready = pool.subscribe_ready();
        let _ = tokio::time::timeout(Duration::from_secs(2), ready.wait_for(|n| *n == 2)).await;
    }

    // A closed gate never touches the queue.
    let shown = pool.take(0.0, None)?;
    println!("[main] closed gate: shown={shown} ready={}", pool.units_ready());

    tokio::time::sleep(Duration::from_millis(300)).await;
    mgr.shutdown().await;
    Ok(())
}
