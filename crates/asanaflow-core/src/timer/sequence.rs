//! Pose-by-pose sequence timer.
//!
//! A pure state machine over an ordered list of timed poses with a fixed
//! transition gap between consecutive poses. It owns no timer: the caller
//! invokes [`SequenceTimer::tick`] once per second while playing and
//! [`SequenceTimer::finish_transition`] once the gap has elapsed (see
//! [`TimerRunner`](super::TimerRunner)).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Playing <-> Paused -> Completed
//!           |
//!           +-- (transitioning: pose exhausted, gap pending) --> Playing
//! ```
//!
//! Every command returns the events it produced, discrete events first and a
//! single trailing `Tick`. `elapsed + remaining == total_duration` holds after
//! every command.

use std::time::Duration;

use tracing::{debug, info, trace};

use super::schedule::{
    sequence_total_secs, validate_items, SequenceItem, DEFAULT_TRANSITION_GAP_SECS,
};
use super::state::{SequenceTimerState, TimerStatus};
use super::PracticeTimer;
use crate::error::ValidationError;
use crate::events::{Event, Snapshot};

#[derive(Debug, Clone)]
pub struct SequenceTimer {
    items: Vec<SequenceItem>,
    transition_gap_secs: u64,
    total_duration: u64,
    state: SequenceTimerState,
}

impl SequenceTimer {
    /// Build an engine over `items`, rejecting an empty list, zero durations,
    /// or a total that does not fit in `u64`.
    pub fn new(items: Vec<SequenceItem>, transition_gap_secs: u64) -> Result<Self, ValidationError> {
        validate_items(&items)?;
        let total_duration = sequence_total_secs(&items, transition_gap_secs)?;
        let state = initial_state(&items, total_duration);
        Ok(Self {
            items,
            transition_gap_secs,
            total_duration,
            state,
        })
    }

    pub fn with_default_gap(items: Vec<SequenceItem>) -> Result<Self, ValidationError> {
        Self::new(items, DEFAULT_TRANSITION_GAP_SECS)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> &SequenceTimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn items(&self) -> &[SequenceItem] {
        &self.items
    }

    pub fn current_item(&self) -> &SequenceItem {
        &self.items[self.state.current_item_index]
    }

    pub fn transition_gap_secs(&self) -> u64 {
        self.transition_gap_secs
    }

    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    /// Seconds from the start of the practice to the start of `index`.
    ///
    /// Exact for any pose index; saturates past the end.
    pub fn offset_of(&self, index: usize) -> u64 {
        self.items.iter().take(index).fold(0, |acc: u64, i| {
            acc.saturating_add(i.duration_secs)
                .saturating_add(self.transition_gap_secs)
        })
    }

    /// 0.0 .. 1.0 progress within the current pose.
    pub fn item_progress(&self) -> f64 {
        let total = self.current_item().duration_secs;
        if total == 0 {
            return 0.0;
        }
        1.0 - (self.state.item_time_remaining as f64 / total as f64)
    }

    pub fn snapshot(&self) -> Event {
        Event::Tick {
            snapshot: Snapshot::Sequence(self.state.clone()),
        }
    }

    fn is_last(&self, index: usize) -> bool {
        index + 1 == self.items.len()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        match self.state.status {
            TimerStatus::Playing | TimerStatus::Completed => Vec::new(),
            TimerStatus::Idle | TimerStatus::Paused => {
                self.state.status = TimerStatus::Playing;
                debug!(index = self.state.current_item_index, "sequence playing");
                vec![self.snapshot()]
            }
        }
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Playing {
            return Vec::new();
        }
        self.state.status = TimerStatus::Paused;
        debug!(index = self.state.current_item_index, "sequence paused");
        vec![self.snapshot()]
    }

    pub fn resume(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Paused {
            return Vec::new();
        }
        self.start()
    }

    pub fn toggle(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Playing {
            self.pause()
        } else {
            self.start()
        }
    }

    /// Spend the rest of the current pose instantly and move on.
    ///
    /// The pending gap is not charged; on the last pose this completes.
    pub fn skip_to_next(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Completed {
            return Vec::new();
        }
        let index = self.state.current_item_index;
        if self.is_last(index) {
            return self.complete();
        }
        let spent = self.state.item_time_remaining.min(self.state.total_time_remaining);
        self.state.total_time_elapsed += spent;
        self.state.total_time_remaining -= spent;
        debug!(from = index, to = index + 1, spent, "skip to next pose");
        self.enter_item(index + 1)
    }

    /// Restart the previous pose from its full duration.
    pub fn skip_to_previous(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Completed || self.state.current_item_index == 0 {
            return Vec::new();
        }
        let target = self.state.current_item_index - 1;
        debug!(from = self.state.current_item_index, to = target, "skip to previous pose");
        self.seek(target)
    }

    /// Jump to `index` at its full duration. Out-of-range indices are ignored.
    pub fn go_to_pose(&mut self, index: usize) -> Vec<Event> {
        if self.state.status == TimerStatus::Completed || index >= self.items.len() {
            return Vec::new();
        }
        debug!(from = self.state.current_item_index, to = index, "go to pose");
        self.seek(index)
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.state = initial_state(&self.items, self.total_duration);
        debug!("sequence reset");
        vec![self.snapshot()]
    }

    /// Advance one second. Only counts while playing outside a gap.
    pub fn tick(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Playing || self.state.is_transitioning() {
            return Vec::new();
        }
        let step = self.state.total_time_remaining.min(1);
        self.state.item_time_remaining = self.state.item_time_remaining.saturating_sub(1);
        self.state.total_time_remaining -= step;
        self.state.total_time_elapsed += step;
        trace!(
            index = self.state.current_item_index,
            item_remaining = self.state.item_time_remaining,
            "sequence tick"
        );

        if self.state.item_time_remaining > 0 {
            return vec![self.snapshot()];
        }

        let index = self.state.current_item_index;
        if self.is_last(index) {
            return self.complete();
        }
        let next_index = index + 1;
        self.state.transitioning = Some(next_index);
        debug!(next_index, gap = self.transition_gap_secs, "transition started");
        vec![Event::TransitionStarted { next_index }, self.snapshot()]
    }

    /// Called once the transition gap has been waited out.
    ///
    /// Does nothing unless still playing with a gap pending, so a pause or
    /// reset issued during the gap wins.
    pub fn finish_transition(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Playing {
            return Vec::new();
        }
        let Some(next_index) = self.state.transitioning else {
            return Vec::new();
        };
        let gap = self.transition_gap_secs.min(self.state.total_time_remaining);
        self.state.total_time_elapsed += gap;
        self.state.total_time_remaining -= gap;
        self.enter_item(next_index)
    }

    /// Terminal transition. Folds everything outstanding into elapsed.
    pub fn complete(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Completed {
            return Vec::new();
        }
        self.state.status = TimerStatus::Completed;
        self.state.item_time_remaining = 0;
        self.state.total_time_remaining = 0;
        self.state.total_time_elapsed = self.total_duration;
        self.state.transitioning = None;
        info!(
            poses = self.items.len(),
            total_secs = self.total_duration,
            "sequence completed"
        );
        vec![Event::Completed, self.snapshot()]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn seek(&mut self, index: usize) -> Vec<Event> {
        let elapsed = self.offset_of(index);
        self.state.total_time_elapsed = elapsed;
        self.state.total_time_remaining = self.total_duration - elapsed;
        self.enter_item(index)
    }

    fn enter_item(&mut self, index: usize) -> Vec<Event> {
        self.state.current_item_index = index;
        self.state.item_time_remaining = self.items[index].duration_secs;
        self.state.transitioning = None;
        vec![
            Event::PoseChanged {
                index,
                is_last: self.is_last(index),
            },
            self.snapshot(),
        ]
    }
}

impl PracticeTimer for SequenceTimer {
    fn status(&self) -> TimerStatus {
        self.state.status
    }

    fn snapshot(&self) -> Event {
        SequenceTimer::snapshot(self)
    }

    fn start(&mut self) -> Vec<Event> {
        SequenceTimer::start(self)
    }

    fn pause(&mut self) -> Vec<Event> {
        SequenceTimer::pause(self)
    }

    fn resume(&mut self) -> Vec<Event> {
        SequenceTimer::resume(self)
    }

    fn toggle(&mut self) -> Vec<Event> {
        SequenceTimer::toggle(self)
    }

    fn reset(&mut self) -> Vec<Event> {
        SequenceTimer::reset(self)
    }

    fn tick(&mut self) -> Vec<Event> {
        SequenceTimer::tick(self)
    }

    fn pending_gap(&self) -> Option<Duration> {
        self.state
            .transitioning
            .map(|_| Duration::from_secs(self.transition_gap_secs))
    }

    fn finish_transition(&mut self) -> Vec<Event> {
        SequenceTimer::finish_transition(self)
    }
}

fn initial_state(items: &[SequenceItem], total_duration: u64) -> SequenceTimerState {
    SequenceTimerState {
        status: TimerStatus::Idle,
        current_item_index: 0,
        item_time_remaining: items.first().map(|i| i.duration_secs).unwrap_or(0),
        total_time_remaining: total_duration,
        total_time_elapsed: 0,
        transitioning: None,
    }
}
