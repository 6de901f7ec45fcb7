//! Async driver that owns the periodic tick for one engine.
//!
//! The engines are pure state machines; `TimerRunner` gives them a clock.
//! It holds at most one tokio task at a time. Any command that changes state
//! aborts that task and, if the engine is still playing, spawns a fresh one.
//! Each task also carries a generation number, bumped under the engine lock,
//! so a superseded task that was already waiting on the lock never touches
//! the engine again.
//!
//! Must be used from within a tokio runtime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

use super::{PracticeTimer, TimerStatus};
use crate::events::{dispatch, Event, TimerObserver};

const TICK_PERIOD: Duration = Duration::from_secs(1);

pub struct TimerRunner<T: PracticeTimer> {
    engine: Arc<Mutex<T>>,
    observer: Arc<dyn TimerObserver>,
    tick_period: Duration,
    generation: Arc<AtomicU64>,
    handle: Option<JoinHandle<()>>,
}

impl<T: PracticeTimer> TimerRunner<T> {
    pub fn new(engine: T, observer: impl TimerObserver + 'static) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            observer: Arc::new(observer),
            tick_period: TICK_PERIOD,
            generation: Arc::new(AtomicU64::new(0)),
            handle: None,
        }
    }

    /// Override the one-second tick, mainly for fast-forward demos.
    pub fn with_tick_period(mut self, tick_period: Duration) -> Self {
        self.tick_period = tick_period;
        self
    }

    pub fn status(&self) -> TimerStatus {
        lock(&self.engine).status()
    }

    /// Read access to the engine.
    pub fn inspect<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&lock(&self.engine))
    }

    /// Whether a periodic task is currently alive.
    pub fn is_driving(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    pub fn start(&mut self) {
        self.command(|e| e.start());
    }

    pub fn pause(&mut self) {
        self.command(|e| e.pause());
    }

    pub fn resume(&mut self) {
        self.command(|e| e.resume());
    }

    pub fn toggle(&mut self) {
        self.command(|e| e.toggle());
    }

    pub fn reset(&mut self) {
        self.command(|e| e.reset());
    }

    /// Run one engine command, deliver its events and re-sync the ticker.
    ///
    /// Commands that emit nothing are no-ops and leave the ticker alone.
    pub fn command(&mut self, f: impl FnOnce(&mut T) -> Vec<Event>) {
        let (playing, lease) = {
            let mut engine = lock(&self.engine);
            let events = f(&mut engine);
            if events.is_empty() {
                return;
            }
            let lease = self.bump_generation();
            dispatch(self.observer.as_ref(), &events);
            (engine.status() == TimerStatus::Playing, lease)
        };

        self.stop_task();
        if playing {
            let engine = Arc::clone(&self.engine);
            let observer = Arc::clone(&self.observer);
            let period = self.tick_period;
            self.handle = Some(tokio::spawn(drive(engine, observer, period, lease)));
        }
    }

    /// Release the periodic task. Safe to call any number of times, in any state.
    pub fn destroy(&mut self) {
        if self.handle.is_some() {
            debug!("timer runner destroyed");
        }
        {
            let _engine = lock(&self.engine);
            self.bump_generation();
        }
        self.stop_task();
    }

    /// Must be called with the engine locked.
    fn bump_generation(&self) -> Lease {
        let id = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        Lease {
            generation: Arc::clone(&self.generation),
            id,
        }
    }

    fn stop_task(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl<T: PracticeTimer> Drop for TimerRunner<T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

/// Right of one spawned task to drive the engine.
struct Lease {
    generation: Arc<AtomicU64>,
    id: u64,
}

impl Lease {
    /// Only meaningful while the engine lock is held.
    fn is_current(&self) -> bool {
        self.generation.load(Ordering::SeqCst) == self.id
    }
}

async fn drive<T: PracticeTimer>(
    engine: Arc<Mutex<T>>,
    observer: Arc<dyn TimerObserver>,
    period: Duration,
    lease: Lease,
) {
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let gap = {
            let engine = lock(&engine);
            if !lease.is_current() || engine.status() != TimerStatus::Playing {
                return;
            }
            engine.pending_gap()
        };

        match gap {
            Some(gap) => {
                time::sleep(gap).await;
                {
                    let mut engine = lock(&engine);
                    if !lease.is_current() {
                        return;
                    }
                    let events = engine.finish_transition();
                    dispatch(observer.as_ref(), &events);
                }
                ticker.reset();
            }
            None => {
                ticker.tick().await;
                let mut engine = lock(&engine);
                if !lease.is_current() {
                    return;
                }
                let events = engine.tick();
                dispatch(observer.as_ref(), &events);
            }
        }
    }
}

fn lock<T>(engine: &Mutex<T>) -> MutexGuard<'_, T> {
    engine.lock().unwrap_or_else(PoisonError::into_inner)
}
