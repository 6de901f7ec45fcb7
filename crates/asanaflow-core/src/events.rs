use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::timer::{IntervalPhase, IntervalTimerState, SequenceTimerState};

/// Full state carried by a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "profile", rename_all = "snake_case")]
pub enum Snapshot {
    Sequence(SequenceTimerState),
    Interval(IntervalTimerState),
}

/// Every state change in an engine produces one or more events.
///
/// Discrete events are always emitted before the `Tick` that carries the
/// resulting snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Tick {
        snapshot: Snapshot,
    },
    /// A new pose became current.
    PoseChanged {
        index: usize,
        is_last: bool,
    },
    /// The current pose ran out and the gap before `next_index` began.
    TransitionStarted {
        next_index: usize,
    },
    PhaseChanged {
        phase: IntervalPhase,
        round: u32,
    },
    ExerciseChanged {
        index: usize,
    },
    RoundCompleted {
        round: u32,
    },
    Completed,
}

impl Event {
    pub fn is_tick(&self) -> bool {
        matches!(self, Event::Tick { .. })
    }
}

/// Host-side receiver of engine events.
///
/// Every callback defaults to a no-op; `on_event` routes an [`Event`] to the
/// matching callback. Callbacks run while the engine is locked, so they must
/// not call back into the runner that owns it.
pub trait TimerObserver: Send + Sync {
    fn on_event(&self, event: &Event) {
        match event {
            Event::Tick { snapshot } => self.on_tick(snapshot),
            Event::PoseChanged { index, is_last } => self.on_pose_change(*index, *is_last),
            Event::TransitionStarted { next_index } => self.on_transition_start(*next_index),
            Event::PhaseChanged { phase, round } => self.on_phase_change(*phase, *round),
            Event::ExerciseChanged { index } => self.on_exercise_change(*index),
            Event::RoundCompleted { round } => self.on_round_complete(*round),
            Event::Completed => self.on_complete(),
        }
    }

    fn on_tick(&self, _snapshot: &Snapshot) {}
    fn on_pose_change(&self, _index: usize, _is_last: bool) {}
    fn on_transition_start(&self, _next_index: usize) {}
    fn on_phase_change(&self, _phase: IntervalPhase, _round: u32) {}
    fn on_exercise_change(&self, _index: usize) {}
    fn on_round_complete(&self, _round: u32) {}
    fn on_complete(&self) {}
}

/// Event-stream observer: forwards every event down a channel.
impl TimerObserver for UnboundedSender<Event> {
    fn on_event(&self, event: &Event) {
        // Receiver gone means the host stopped listening.
        let _ = self.send(event.clone());
    }
}

/// Closure observer that sees every event.
pub struct FnObserver<F>(pub F);

impl<F> TimerObserver for FnObserver<F>
where
    F: Fn(&Event) + Send + Sync,
{
    fn on_event(&self, event: &Event) {
        (self.0)(event)
    }
}

/// Fan out to several observers in order.
impl<O: TimerObserver> TimerObserver for Vec<O> {
    fn on_event(&self, event: &Event) {
        for observer in self {
            observer.on_event(event);
        }
    }
}

impl TimerObserver for Box<dyn TimerObserver> {
    fn on_event(&self, event: &Event) {
        self.as_ref().on_event(event)
    }
}

/// Deliver a batch to an observer, preserving order.
pub fn dispatch<O: TimerObserver + ?Sized>(observer: &O, events: &[Event]) {
    for event in events {
        observer.on_event(event);
    }
}
