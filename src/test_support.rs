//! Scripted provider used by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::error::LoadError;
use crate::resources::{LoadTarget, Provider, Reward, ShowEvent, ShowSession};

/// Result of one scripted load.
#[derive(Clone, Debug)]
pub(crate) enum Outcome {
    Succeed,
    Fail,
    Error(LoadError),
}

/// What the provider does when asked to show a unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum ShowMode {
    /// Report `Showed` and keep the session open until `dismiss_all`.
    Hold,
    /// Report `Showed` then `Dismissed`.
    Dismiss,
    /// Report `FailedToShow`.
    FailToShow,
    /// Report `Showed`, `Consumed` with the given amount, then `Dismissed`.
    Reward(u32),
    /// Report `Showed` and drop the session without ending it.
    Abandon,
}

#[derive(Debug)]
pub(crate) struct MockUnit {
    pub id: u64,
    #[allow(dead_code)]
    pub key: String,
}

pub(crate) struct MockProvider {
    script: Mutex<VecDeque<Outcome>>,
    fail_always: AtomicBool,
    init_error: Mutex<Option<LoadError>>,
    loads: AtomicUsize,
    inits: AtomicUsize,
    next_id: AtomicU64,
    disposed: Mutex<Vec<u64>>,
    shown: Mutex<Vec<u64>>,
    sessions: Mutex<Vec<ShowSession>>,
    show_mode: Mutex<ShowMode>,
    hold: Mutex<Option<Arc<Semaphore>>>,
}

impl MockProvider {
    pub(crate) fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fail_always: AtomicBool::new(false),
            init_error: Mutex::new(None),
            loads: AtomicUsize::new(0),
            inits: AtomicUsize::new(0),
            next_id: AtomicU64::new(1),
            disposed: Mutex::new(Vec::new()),
            shown: Mutex::new(Vec::new()),
            sessions: Mutex::new(Vec::new()),
            show_mode: Mutex::new(ShowMode::Hold),
            hold: Mutex::new(None),
        }
    }

    /// Queues outcomes consumed by the next loads; afterwards loads succeed
    /// (or fail if `fail_always` was called).
    pub(crate) fn script(&self, outcomes: impl IntoIterator<Item = Outcome>) {
        self.script.lock().extend(outcomes);
    }

    pub(crate) fn fail_always(&self) {
        self.fail_always.store(true, Ordering::SeqCst);
    }

    pub(crate) fn succeed_always(&self) {
        self.fail_always.store(false, Ordering::SeqCst);
    }

    pub(crate) fn fail_init(&self, err: LoadError) {
        *self.init_error.lock() = Some(err);
    }

    pub(crate) fn set_show_mode(&self, mode: ShowMode) {
        *self.show_mode.lock() = mode;
    }

    /// Makes every subsequent load wait until `release_loads` hands it a permit.
    pub(crate) fn hold_loads(&self) {
        *self.hold.lock() = Some(Arc::new(Semaphore::new(0)));
    }

    pub(crate) fn release_loads(&self, n: usize) {
        if let Some(sem) = self.hold.lock().as_ref() {
            sem.add_permits(n);
        }
    }

    pub(crate) fn make_unit(&self, key: &str) -> MockUnit {
        MockUnit {
            id: self.next_id.fetch_add(1, Ordering::SeqCst),
            key: key.to_string(),
        }
    }

    pub(crate) fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub(crate) fn init_count(&self) -> usize {
        self.inits.load(Ordering::SeqCst)
    }

    pub(crate) fn disposed_count(&self) -> usize {
        self.disposed.lock().len()
    }

    pub(crate) fn disposed_ids(&self) -> Vec<u64> {
        self.disposed.lock().clone()
    }

    pub(crate) fn shown_ids(&self) -> Vec<u64> {
        self.shown.lock().clone()
    }

    /// Ends every held session with `Dismissed`.
    pub(crate) fn dismiss_all(&self) {
        let sessions: Vec<ShowSession> = self.sessions.lock().drain(..).collect();
        for s in sessions {
            s.emit(ShowEvent::Dismissed);
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    type Unit = MockUnit;

    fn name(&self) -> &'static str {
        "mock"
    }

    async fn initialize(&self) -> Result<(), LoadError> {
        self.inits.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;
        match self.init_error.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    async fn load(&self, target: &LoadTarget) -> Result<MockUnit, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let hold = self.hold.lock().clone();
        if let Some(sem) = hold {
            if let Ok(permit) = sem.acquire().await {
                permit.forget();
            }
        }
        tokio::task::yield_now().await;

        let scripted = self.script.lock().pop_front();
        let outcome = scripted.unwrap_or_else(|| {
            if self.fail_always.load(Ordering::SeqCst) {
                Outcome::Fail
            } else {
                Outcome::Succeed
            }
        });
        match outcome {
            Outcome::Succeed => Ok(self.make_unit(target.key.as_str())),
            Outcome::Fail => Err(LoadError::Fail {
                reason: "scripted failure".into(),
            }),
            Outcome::Error(err) => Err(err),
        }
    }

    fn show(&self, unit: &MockUnit, session: ShowSession) {
        self.shown.lock().push(unit.id);
        let mode = *self.show_mode.lock();
        match mode {
            ShowMode::Hold => {
                session.emit(ShowEvent::Showed);
                self.sessions.lock().push(session);
            }
            ShowMode::Dismiss => {
                session.emit(ShowEvent::Showed);
                session.emit(ShowEvent::Dismissed);
            }
            ShowMode::FailToShow => {
                session.emit(ShowEvent::FailedToShow("mock failure".into()));
            }
            ShowMode::Abandon => {
                session.emit(ShowEvent::Showed);
            }
            ShowMode::Reward(amount) => {
                session.emit(ShowEvent::Showed);
                session.emit(ShowEvent::Consumed(Reward {
                    kind: "coins".into(),
                    amount,
                }));
                session.emit(ShowEvent::Dismissed);
            }
        }
    }

    fn dispose(&self, unit: &MockUnit) {
        self.disposed.lock().push(unit.id);
    }
}
