//! Work/rest interval timer.
//!
//! Cycles `rounds × exercises` work/rest phase pairs. Phase boundaries are
//! immediate: there is no gap between rest and the next work phase.

use tracing::{debug, info, trace};

use super::schedule::IntervalConfig;
use super::state::{IntervalPhase, IntervalTimerState, TimerStatus};
use super::PracticeTimer;
use crate::error::ValidationError;
use crate::events::{Event, Snapshot};

#[derive(Debug, Clone)]
pub struct IntervalTimer {
    config: IntervalConfig,
    total_duration: u64,
    state: IntervalTimerState,
}

impl IntervalTimer {
    pub fn new(config: IntervalConfig) -> Result<Self, ValidationError> {
        config.validate()?;
        let total_duration = config.total_duration_secs()?;
        let state = initial_state(&config, total_duration);
        Ok(Self {
            config,
            total_duration,
            state,
        })
    }

    pub fn state(&self) -> &IntervalTimerState {
        &self.state
    }

    pub fn status(&self) -> TimerStatus {
        self.state.status
    }

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    pub fn total_duration(&self) -> u64 {
        self.total_duration
    }

    pub fn current_exercise(&self) -> &super::schedule::Exercise {
        &self.config.exercises[self.state.current_exercise_index]
    }

    pub fn snapshot(&self) -> Event {
        Event::Tick {
            snapshot: Snapshot::Interval(self.state.clone()),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        match self.state.status {
            TimerStatus::Playing | TimerStatus::Completed => Vec::new(),
            TimerStatus::Idle | TimerStatus::Paused => {
                self.state.status = TimerStatus::Playing;
                debug!(round = self.state.current_round, "interval playing");
                vec![self.snapshot()]
            }
        }
    }

    pub fn pause(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Playing {
            return Vec::new();
        }
        self.state.status = TimerStatus::Paused;
        debug!(round = self.state.current_round, "interval paused");
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

    pub fn reset(&mut self) -> Vec<Event> {
        self.state = initial_state(&self.config, self.total_duration);
        debug!("interval reset");
        vec![self.snapshot()]
    }

    /// End the current phase now, as if it had run out.
    pub fn skip_phase(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Completed {
            return Vec::new();
        }
        let spent = self.state.phase_time_remaining.min(self.state.total_time_remaining);
        self.state.total_time_elapsed += spent;
        self.state.total_time_remaining -= spent;
        self.state.phase_time_remaining = 0;
        debug!(phase = self.state.phase.as_str(), spent, "skip phase");
        self.advance_phase()
    }

    pub fn tick(&mut self) -> Vec<Event> {
        if self.state.status != TimerStatus::Playing {
            return Vec::new();
        }
        let step = self.state.total_time_remaining.min(1);
        self.state.phase_time_remaining = self.state.phase_time_remaining.saturating_sub(1);
        self.state.total_time_remaining -= step;
        self.state.total_time_elapsed += step;
        trace!(
            phase = self.state.phase.as_str(),
            phase_remaining = self.state.phase_time_remaining,
            "interval tick"
        );

        if self.state.phase_time_remaining == 0 {
            self.advance_phase()
        } else {
            vec![self.snapshot()]
        }
    }

    pub fn complete(&mut self) -> Vec<Event> {
        if self.state.status == TimerStatus::Completed {
            return Vec::new();
        }
        self.state.status = TimerStatus::Completed;
        self.state.phase_time_remaining = 0;
        self.state.total_time_remaining = 0;
        self.state.total_time_elapsed = self.total_duration;
        info!(
            rounds = self.config.rounds,
            total_secs = self.total_duration,
            "interval completed"
        );
        vec![Event::Completed, self.snapshot()]
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance_phase(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match self.state.phase {
            IntervalPhase::Work if self.config.rest_secs > 0 => {
                self.state.phase = IntervalPhase::Rest;
                self.state.phase_time_remaining = self.config.rest_secs;
                events.push(Event::PhaseChanged {
                    phase: IntervalPhase::Rest,
                    round: self.state.current_round,
                });
            }
            // A zero-length rest passes without a phase change of its own.
            IntervalPhase::Work | IntervalPhase::Rest => {
                let next = self.state.current_exercise_index + 1;
                if next >= self.config.exercises.len() {
                    let round = self.state.current_round;
                    events.push(Event::RoundCompleted { round });
                    debug!(round, "round completed");
                    if round >= self.config.rounds {
                        events.extend(self.complete());
                        return events;
                    }
                    self.state.current_round = round + 1;
                    self.state.current_exercise_index = 0;
                } else {
                    self.state.current_exercise_index = next;
                }
                self.state.phase = IntervalPhase::Work;
                self.state.phase_time_remaining = self.config.work_secs;
                events.push(Event::PhaseChanged {
                    phase: IntervalPhase::Work,
                    round: self.state.current_round,
                });
                events.push(Event::ExerciseChanged {
                    index: self.state.current_exercise_index,
                });
            }
        }
        events.push(self.snapshot());
        events
    }
}

impl PracticeTimer for IntervalTimer {
    fn status(&self) -> TimerStatus {
        self.state.status
    }

    fn snapshot(&self) -> Event {
        IntervalTimer::snapshot(self)
    }

    fn start(&mut self) -> Vec<Event> {
        IntervalTimer::start(self)
    }

    fn pause(&mut self) -> Vec<Event> {
        IntervalTimer::pause(self)
    }

    fn resume(&mut self) -> Vec<Event> {
        IntervalTimer::resume(self)
    }

    fn toggle(&mut self) -> Vec<Event> {
        IntervalTimer::toggle(self)
    }

    fn reset(&mut self) -> Vec<Event> {
        IntervalTimer::reset(self)
    }

    fn tick(&mut self) -> Vec<Event> {
        IntervalTimer::tick(self)
    }
}

fn initial_state(config: &IntervalConfig, total_duration: u64) -> IntervalTimerState {
    IntervalTimerState {
        status: TimerStatus::Idle,
        phase: IntervalPhase::Work,
        current_round: 1,
        current_exercise_index: 0,
        phase_time_remaining: config.work_secs,
        total_time_remaining: total_duration,
        total_time_elapsed: 0,
    }
}
