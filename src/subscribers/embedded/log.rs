//! # LogWriter: structured event logger
//!
//! A subscriber that forwards incoming [`Event`]s to [`tracing`]. Install any
//! `tracing` subscriber in the application to see the output.
//!
//! ## Levels
//! - `warn`: retries exhausted, show failures, duplicate keys, background init failures
//! - `info`: registry changes, bootstrap progress
//! - `debug`: everything else

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;
use async_trait::async_trait;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let resource = e.resource.map(|r| r.as_label()).unwrap_or("-");
        let key = e.key.as_deref().unwrap_or("-");
        let reason = e.reason.as_deref().unwrap_or("");

        match e.kind {
            EventKind::RetriesExhausted => {
                tracing::warn!(seq = e.seq, resource, key, attempt = e.attempt, reason, "retries exhausted");
            }
            EventKind::UnitShowFailed => {
                tracing::warn!(seq = e.seq, resource, key, unit = e.unit, reason, "unit failed to show");
            }
            EventKind::DuplicateRejected => {
                tracing::warn!(seq = e.seq, resource, key, "duplicate registration rejected");
            }
            EventKind::InitializationFailed => {
                tracing::warn!(seq = e.seq, resource, key, reason, "initialization failed");
            }
            EventKind::ComponentRegistered => {
                tracing::info!(seq = e.seq, resource, key, "component registered");
            }
            EventKind::ComponentRemoved => {
                tracing::info!(seq = e.seq, resource, key, "component removed");
            }
            EventKind::ProviderInitialized => {
                tracing::info!(seq = e.seq, "provider initialized");
            }
            EventKind::InitializationComplete => {
                tracing::info!(seq = e.seq, strategy = reason, "initialization complete");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(seq = e.seq, "shutdown requested");
            }
            EventKind::LoadFailed => {
                tracing::debug!(seq = e.seq, resource, key, attempt = e.attempt, reason, "load failed");
            }
            EventKind::UnitLoaded | EventKind::UnitDispatched => {
                tracing::debug!(seq = e.seq, kind = ?e.kind, resource, key, unit = e.unit, ready = e.ready);
            }
            _ => {
                tracing::debug!(seq = e.seq, kind = ?e.kind, resource, key, unit = e.unit, attempt = e.attempt, reason);
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
