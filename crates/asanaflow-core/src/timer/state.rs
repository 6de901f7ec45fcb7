//! Value snapshots handed to hosts on every tick.

use serde::{Deserialize, Serialize};

use crate::format::progress_pct;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerStatus {
    Idle,
    Playing,
    Paused,
    Completed,
}

impl TimerStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerStatus::Idle => "idle",
            TimerStatus::Playing => "playing",
            TimerStatus::Paused => "paused",
            TimerStatus::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalPhase {
    Work,
    Rest,
}

impl IntervalPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntervalPhase::Work => "work",
            IntervalPhase::Rest => "rest",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceTimerState {
    pub status: TimerStatus,
    pub current_item_index: usize,
    pub item_time_remaining: u64,
    pub total_time_remaining: u64,
    pub total_time_elapsed: u64,
    /// Set while the gap before `next_index` is being waited out.
    /// `status` stays `Playing` for the whole gap.
    #[serde(default)]
    pub transitioning: Option<usize>,
}

impl SequenceTimerState {
    pub fn is_transitioning(&self) -> bool {
        self.transitioning.is_some()
    }

    pub fn total_duration(&self) -> u64 {
        self.total_time_elapsed + self.total_time_remaining
    }

    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.total_time_elapsed, self.total_duration())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTimerState {
    pub status: TimerStatus,
    pub phase: IntervalPhase,
    /// 1-based.
    pub current_round: u32,
    pub current_exercise_index: usize,
    pub phase_time_remaining: u64,
    pub total_time_remaining: u64,
    pub total_time_elapsed: u64,
}

impl IntervalTimerState {
    pub fn total_duration(&self) -> u64 {
        self.total_time_elapsed + self.total_time_remaining
    }

    pub fn progress_pct(&self) -> f64 {
        progress_pct(self.total_time_elapsed, self.total_duration())
    }
}
