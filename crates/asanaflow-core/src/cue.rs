//! Audio cue decisions.
//!
//! The engines decide *when* a cue fires; how a tone is produced is up to the
//! [`CuePlayer`] the host plugs in.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::CueConfig;
use crate::events::{Event, TimerObserver};
use crate::timer::IntervalPhase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// A pose ended and the gap to the next one began.
    Transition,
    Work,
    Rest,
    RoundComplete,
    Complete,
}

/// Which cue, if any, an event should sound.
///
/// Ticks and exercise changes are silent; an exercise change always arrives
/// together with a work phase change that already carries the cue.
pub fn cue_for(event: &Event) -> Option<Cue> {
    match event {
        Event::TransitionStarted { .. } => Some(Cue::Transition),
        Event::PhaseChanged {
            phase: IntervalPhase::Work,
            ..
        } => Some(Cue::Work),
        Event::PhaseChanged {
            phase: IntervalPhase::Rest,
            ..
        } => Some(Cue::Rest),
        Event::RoundCompleted { .. } => Some(Cue::RoundComplete),
        Event::Completed => Some(Cue::Complete),
        Event::Tick { .. } | Event::PoseChanged { .. } | Event::ExerciseChanged { .. } => None,
    }
}

/// Fire-and-forget tone sink.
pub trait CuePlayer: Send + Sync {
    fn play(&self, cue: Cue, volume: u32);
}

/// Adapts a [`CuePlayer`] into a [`TimerObserver`].
pub struct CueObserver<P> {
    player: P,
    config: CueConfig,
}

impl<P: CuePlayer> CueObserver<P> {
    pub fn new(player: P, config: CueConfig) -> Self {
        Self { player, config }
    }

    #[cfg(test)]
    fn player(&self) -> &P {
        &self.player
    }
}

impl<P: CuePlayer> TimerObserver for CueObserver<P> {
    fn on_event(&self, event: &Event) {
        if !self.config.enabled {
            return;
        }
        if let Some(cue) = cue_for(event) {
            debug!(?cue, "cue");
            self.player.play(cue, self.config.volume);
        }
    }
}
