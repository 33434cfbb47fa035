//! # One load cycle with bounded retry.
//!
//! Issues loads for a [`LoadTarget`] until one succeeds or the shared failure
//! counter exceeds the [`RetryPolicy`]. Publishes lifecycle events to [`Bus`].
//!
//! ## Event flow
//! ```text
//! attempt 1: LoadStarting → provider.load() ─ Ok  ──► return unit
//!                                           └ Err ──► LoadFailed
//!                                                     ├─ counter <= max ─► RetryScheduled → attempt 2
//!                                                     └─ counter >  max ─► reset counter
//!                                                                          RetriesExhausted
//!                                                                          return LoadFailure
//! ```
//!
//! ## Rules
//! - Retries are issued immediately; there is no delay and no timeout.
//! - The counter is **shared** with every other cycle of the same component.
//! - A non-retryable [`LoadError`](crate::LoadError) ends the cycle at once.
//! - `on_load_failed` fires on **every** failed attempt.
//! - Accepting or discarding the unit is the caller's job.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::{
    error::PreloadError,
    events::{Bus, Event, EventKind},
    policies::RetryPolicy,
    resources::{Callbacks, LoadTarget, Provider},
};

/// Borrowed state needed to run one load cycle.
pub(crate) struct LoadCycle<'a, P: Provider> {
    pub provider: &'a P,
    pub target: &'a LoadTarget,
    pub callbacks: &'a Callbacks,
    pub bus: &'a Bus,
    pub retry: RetryPolicy,
    pub failures: &'a AtomicU32,
}

impl<P: Provider> LoadCycle<'_, P> {
    /// Runs the cycle until a unit is loaded or the ceiling is exceeded.
    pub(crate) async fn run(&self) -> Result<P::Unit, PreloadError> {
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            self.publish(Event::new(EventKind::LoadStarting).with_attempt(attempt));

            let err = match self.provider.load(self.target).await {
                Ok(unit) => return Ok(unit),
                Err(e) => e,
            };

            self.publish(
                Event::new(EventKind::LoadFailed)
                    .with_attempt(attempt)
                    .with_reason(err.to_string()),
            );
            self.callbacks.load_failed(&self.target.key, &err);

            let failures = self.failures.fetch_add(1, Ordering::AcqRel) + 1;
            if !err.is_retryable() || !self.retry.allows(failures) {
                self.failures.store(0, Ordering::Release);
                self.publish(
                    Event::new(EventKind::RetriesExhausted)
                        .with_attempt(attempt)
                        .with_retries(failures)
                        .with_reason(err.as_label()),
                );
                return Err(PreloadError::LoadFailure {
                    kind: self.target.kind,
                    key: self.target.key.to_string(),
                    attempts: attempt,
                    reason: err.to_string(),
                });
            }

            self.publish(
                Event::new(EventKind::RetryScheduled)
                    .with_attempt(attempt)
                    .with_retries(failures),
            );
        }
    }

    fn publish(&self, ev: Event) {
        self.bus
            .publish(ev.with_resource(self.target.kind, self.target.key.shared()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LoadError;
    use crate::resources::{PoolConfig, ResourceKey, ResourceKind};
    use crate::test_support::{MockProvider, Outcome};
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    fn target() -> LoadTarget {
        PoolConfig::new(ResourceKind::Interstitial, ResourceKey::new("k").unwrap(), 1).target()
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let provider = MockProvider::new();
        provider.script([Outcome::Fail, Outcome::Fail, Outcome::Succeed]);
        let failures = AtomicU32::new(0);
        let failed = Arc::new(AtomicUsize::new(0));
        let f = failed.clone();
        let cbs = Callbacks::new().on_load_failed(move |_, _| {
            f.fetch_add(1, Ordering::SeqCst);
        });
        let target = target();
        let bus = Bus::new(64);

        let cycle = LoadCycle {
            provider: &provider,
            target: &target,
            callbacks: &cbs,
            bus: &bus,
            retry: RetryPolicy::default(),
            failures: &failures,
        };
        assert!(cycle.run().await.is_ok());
        assert_eq!(provider.load_count(), 3);
        assert_eq!(failed.load(Ordering::SeqCst), 2);
        // Success does not reset the shared counter.
        assert_eq!(failures.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exhaustion_makes_four_attempts_and_resets_counter() {
        let provider = MockProvider::new();
        provider.fail_always();
        let failures = AtomicU32::new(0);
        let target = target();
        let bus = Bus::new(64);
        let mut rx = bus.subscribe();

        let cycle = LoadCycle {
            provider: &provider,
            target: &target,
            callbacks: &Callbacks::new(),
            bus: &bus,
            retry: RetryPolicy::default(),
            failures: &failures,
        };
        let err = cycle.run().await.unwrap_err();
        assert_eq!(provider.load_count(), 4);
        assert_eq!(failures.load(Ordering::SeqCst), 0);
        assert!(matches!(err, PreloadError::LoadFailure { attempts: 4, .. }));

        let mut kinds = Vec::new();
        while let Ok(ev) = rx.try_recv() {
            kinds.push(ev.kind);
        }
        assert_eq!(kinds.last(), Some(&EventKind::RetriesExhausted));
        assert_eq!(
            kinds.iter().filter(|k| **k == EventKind::RetryScheduled).count(),
            3
        );
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let provider = MockProvider::new();
        provider.script([Outcome::Error(LoadError::NotReady {
            reason: "sdk".into(),
        })]);
        let failures = AtomicU32::new(0);
        let target = target();
        let bus = Bus::new(8);

        let cycle = LoadCycle {
            provider: &provider,
            target: &target,
            callbacks: &Callbacks::new(),
            bus: &bus,
            retry: RetryPolicy::default(),
            failures: &failures,
        };
        assert!(cycle.run().await.is_err());
        assert_eq!(provider.load_count(), 1);
    }
}
