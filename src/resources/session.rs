//! # Show session: lifecycle reporting for one presentation.
//!
//! A [`ShowSession`] is handed to [`Provider::show`](crate::Provider::show). The
//! provider reports progress with [`ShowSession::emit`]; the session forwards it to
//! the user callbacks and the event bus, and ends the unit's life on
//! [`ShowEvent::Dismissed`] or [`ShowEvent::FailedToShow`].
//!
//! ## Event flow
//! ```text
//! Showed → Impression → Clicked* → WillDismiss → Dismissed ──► dispose + on_dismissed
//!    └──────────────────────────────────────────► FailedToShow ──► dispose + on_failed_to_show
//! Consumed(Reward) may arrive at any point before the end (rewarded families).
//! ```
//!
//! ## Rules
//! - The unit is disposed **before** the user callback runs.
//! - Events emitted after the session ended are ignored.
//! - The consume hook fires at most once.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::events::{Bus, Event, EventKind};

use super::{
    callbacks::Callbacks,
    key::{ResourceKey, ResourceKind},
};

/// Payload delivered when a rewarded unit was consumed to completion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Reward {
    /// Reward type as configured on the provider side (e.g. "coins").
    pub kind: String,
    /// Reward amount.
    pub amount: u32,
}

/// Hook invoked once when the consumer earned the unit's [`Reward`].
pub type ConsumeHook = Box<dyn FnOnce(&Reward) + Send + 'static>;

/// Lifecycle notification reported by a provider while a unit is shown.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ShowEvent {
    Showed,
    Impression,
    Clicked,
    WillDismiss,
    /// Presentation ended normally. Terminal.
    Dismissed,
    /// Presentation could not start or broke. Terminal.
    FailedToShow(String),
    /// Consumer earned the reward.
    Consumed(Reward),
}

struct SessionInner {
    kind: ResourceKind,
    key: ResourceKey,
    unit_id: u64,
    callbacks: Callbacks,
    bus: Bus,
    on_consumed: Mutex<Option<ConsumeHook>>,
    finish: Box<dyn Fn() + Send + Sync>,
    ended: AtomicBool,
}

/// Reporting handle for one presentation of one unit.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct ShowSession {
    inner: Arc<SessionInner>,
}

impl ShowSession {
    pub(crate) fn new(
        kind: ResourceKind,
        key: ResourceKey,
        unit_id: u64,
        callbacks: Callbacks,
        bus: Bus,
        on_consumed: Option<ConsumeHook>,
        finish: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                kind,
                key,
                unit_id,
                callbacks,
                bus,
                on_consumed: Mutex::new(on_consumed),
                finish: Box::new(finish),
                ended: AtomicBool::new(false),
            }),
        }
    }

    /// Reports one lifecycle step.
    pub fn emit(&self, event: ShowEvent) {
        let s = &*self.inner;
        if s.ended.load(Ordering::Acquire) {
            return;
        }
        match event {
            ShowEvent::Showed => {
                self.publish(EventKind::UnitShown, None);
                s.callbacks.shown(&s.key);
            }
            ShowEvent::Impression => {
                self.publish(EventKind::UnitImpression, None);
                s.callbacks.impression(&s.key);
            }
            ShowEvent::Clicked => {
                self.publish(EventKind::UnitClicked, None);
                s.callbacks.clicked(&s.key);
            }
            ShowEvent::WillDismiss => {
                self.publish(EventKind::UnitWillDismiss, None);
            }
            ShowEvent::Dismissed => {
                if self.end() {
                    self.publish(EventKind::UnitDismissed, None);
                    s.callbacks.dismissed(&s.key);
                }
            }
            ShowEvent::FailedToShow(reason) => {
                if self.end() {
                    self.publish(EventKind::UnitShowFailed, Some(&reason));
                    s.callbacks.failed_to_show(&s.key, &reason);
                }
            }
            ShowEvent::Consumed(reward) => {
                let hook = s.on_consumed.lock().take();
                self.publish(
                    EventKind::UnitConsumed,
                    Some(&format!("{} x{}", reward.kind, reward.amount)),
                );
                if let Some(hook) = hook {
                    hook(&reward);
                }
            }
        }
    }

    /// True once a terminal event was reported.
    pub fn is_ended(&self) -> bool {
        self.inner.ended.load(Ordering::Acquire)
    }

    /// Key of the unit being shown.
    pub fn key(&self) -> &ResourceKey {
        &self.inner.key
    }

    /// Marks the session ended and runs the disposal action; `false` if already ended.
    fn end(&self) -> bool {
        if self.inner.ended.swap(true, Ordering::AcqRel) {
            return false;
        }
        (self.inner.finish)();
        true
    }

    fn publish(&self, kind: EventKind, reason: Option<&str>) {
        let s = &*self.inner;
        let mut ev = Event::new(kind)
            .with_resource(s.kind, s.key.shared())
            .with_unit(s.unit_id);
        if let Some(reason) = reason {
            ev = ev.with_reason(reason);
        }
        s.bus.publish(ev);
    }
}

impl fmt::Debug for ShowSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShowSession")
            .field("kind", &self.inner.kind)
            .field("key", &self.inner.key)
            .field("unit", &self.inner.unit_id)
            .field("ended", &self.is_ended())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn session(
        callbacks: Callbacks,
        finished: Arc<AtomicUsize>,
        on_consumed: Option<ConsumeHook>,
    ) -> ShowSession {
        ShowSession::new(
            ResourceKind::Rewarded,
            ResourceKey::new("r").unwrap(),
            7,
            callbacks,
            Bus::new(16),
            on_consumed,
            move || {
                finished.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    #[test]
    fn test_dismiss_disposes_without_callbacks() {
        let finished = Arc::new(AtomicUsize::new(0));
        let s = session(Callbacks::new(), finished.clone(), None);
        s.emit(ShowEvent::Showed);
        s.emit(ShowEvent::Dismissed);
        s.emit(ShowEvent::Dismissed);
        s.emit(ShowEvent::FailedToShow("late".into()));
        assert!(s.is_ended());
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_disposal_happens_before_user_callback() {
        let finished = Arc::new(AtomicUsize::new(0));
        let seen = finished.clone();
        let cbs = Callbacks::new().on_failed_to_show(move |_, _| {
            assert_eq!(seen.load(Ordering::SeqCst), 1);
        });
        let s = session(cbs, finished.clone(), None);
        s.emit(ShowEvent::FailedToShow("expired".into()));
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_consume_hook_fires_once() {
        let finished = Arc::new(AtomicUsize::new(0));
        let earned = Arc::new(AtomicUsize::new(0));
        let e = earned.clone();
        let hook: ConsumeHook = Box::new(move |r: &Reward| {
            e.fetch_add(r.amount as usize, Ordering::SeqCst);
        });
        let s = session(Callbacks::new(), finished, Some(hook));
        let reward = Reward {
            kind: "coins".into(),
            amount: 5,
        };
        s.emit(ShowEvent::Consumed(reward.clone()));
        s.emit(ShowEvent::Consumed(reward));
        assert_eq!(earned.load(Ordering::SeqCst), 5);
    }
}
