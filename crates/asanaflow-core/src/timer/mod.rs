mod interval;
mod runner;
mod schedule;
mod sequence;
mod state;

use std::time::Duration;

use crate::events::Event;

pub use interval::IntervalTimer;
pub use runner::TimerRunner;
pub use schedule::{
    sequence_total_secs, validate_items, Exercise, IntervalConfig, PracticeSequence, SequenceItem,
    DEFAULT_TRANSITION_GAP_SECS,
};
pub use sequence::SequenceTimer;
pub use state::{IntervalPhase, IntervalTimerState, SequenceTimerState, TimerStatus};

/// Operations shared by both timer profiles, as driven by [`TimerRunner`].
pub trait PracticeTimer: Send + 'static {
    fn status(&self) -> TimerStatus;
    fn snapshot(&self) -> Event;
    fn start(&mut self) -> Vec<Event>;
    fn pause(&mut self) -> Vec<Event>;
    fn resume(&mut self) -> Vec<Event>;
    fn toggle(&mut self) -> Vec<Event>;
    fn reset(&mut self) -> Vec<Event>;
    fn tick(&mut self) -> Vec<Event>;

    /// Real-time delay to wait out before `finish_transition`, if one is pending.
    fn pending_gap(&self) -> Option<Duration> {
        None
    }

    fn finish_transition(&mut self) -> Vec<Event> {
        Vec::new()
    }
}
