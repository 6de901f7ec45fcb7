//! # Asanaflow Core Library
//!
//! Timing core for guided yoga and conditioning practice. Hosts (the CLI, or
//! any UI) build an engine, hand it to a [`TimerRunner`] together with an
//! observer, and render from the snapshots it emits.
//!
//! ## Architecture
//!
//! - **Sequence Timer**: pose-by-pose countdown with a fixed transition gap
//!   between poses, plus skip/seek navigation
//! - **Interval Timer**: work/rest phases over an exercise list, repeated for
//!   a number of rounds
//! - **Runner**: owns the one periodic tick per engine and the transition gap
//!   delay
//! - **Events**: one tagged [`Event`] stream, consumed through
//!   [`TimerObserver`] or a channel
//! - **Cues**: maps events to audio cues for a pluggable [`CuePlayer`]
//!
//! Both engines keep `elapsed + remaining == total` after every operation.

pub mod config;
pub mod cue;
pub mod error;
pub mod events;
pub mod format;
pub mod timer;

pub use config::{Config, CueConfig};
pub use cue::{cue_for, Cue, CueObserver, CuePlayer};
pub use error::{ConfigError, CoreError, Result, ValidationError};
pub use events::{Event, FnObserver, Snapshot, TimerObserver};
pub use format::format_time;
pub use timer::{
    Exercise, IntervalConfig, IntervalPhase, IntervalTimer, IntervalTimerState, PracticeSequence,
    PracticeTimer, SequenceItem, SequenceTimer, SequenceTimerState, TimerRunner, TimerStatus,
};
