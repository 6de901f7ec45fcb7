//! Terminal rendering of engine events.

use asanaflow_core::{
    format_time, Event, IntervalConfig, IntervalPhase, PracticeSequence, Snapshot, TimerStatus,
};

pub struct Renderer {
    /// Pose labels, or exercise names for interval workouts.
    labels: Vec<String>,
    rounds: u32,
}

impl Renderer {
    pub fn for_sequence(practice: &PracticeSequence) -> Self {
        Self {
            labels: practice.items.iter().map(|i| i.label().to_string()).collect(),
            rounds: 1,
        }
    }

    pub fn for_interval(config: &IntervalConfig) -> Self {
        Self {
            labels: config.exercises.iter().map(|e| e.name.clone()).collect(),
            rounds: config.rounds,
        }
    }

    fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("?")
    }

    /// One output line for `event`; JSON lines when `json` is set.
    pub fn render(&self, event: &Event, json: bool) -> Option<String> {
        if json {
            return serde_json::to_string(event).ok();
        }
        let n = self.labels.len();
        let line = match event {
            Event::Tick {
                snapshot: Snapshot::Sequence(s),
            } => {
                let status = if s.is_transitioning() {
                    "transition"
                } else {
                    s.status.as_str()
                };
                format!(
                    "[{status}] {}/{n} {:<24} {}  left {} ({:.0}%)",
                    s.current_item_index + 1,
                    self.label(s.current_item_index),
                    format_time(s.item_time_remaining),
                    format_time(s.total_time_remaining),
                    s.progress_pct(),
                )
            }
            Event::Tick {
                snapshot: Snapshot::Interval(s),
            } => format!(
                "[{}] round {}/{} {:<4} {:<24} {}  left {} ({:.0}%)",
                s.status.as_str(),
                s.current_round,
                self.rounds,
                s.phase.as_str(),
                self.label(s.current_exercise_index),
                format_time(s.phase_time_remaining),
                format_time(s.total_time_remaining),
                s.progress_pct(),
            ),
            Event::PoseChanged { index, is_last } => format!(
                "== pose {}/{n}: {}{}",
                index + 1,
                self.label(*index),
                if *is_last { " (last)" } else { "" }
            ),
            Event::TransitionStarted { next_index } => {
                format!("-> next up: {}", self.label(*next_index))
            }
            Event::PhaseChanged { phase, round } => match phase {
                IntervalPhase::Work => format!("== work (round {round})"),
                IntervalPhase::Rest => format!("== rest (round {round})"),
            },
            Event::ExerciseChanged { index } => format!("== exercise: {}", self.label(*index)),
            Event::RoundCompleted { round } => format!("** round {round} complete"),
            Event::Completed => "** practice complete".to_string(),
        };
        Some(line)
    }
}

/// Whether a snapshot shows a session that is over.
pub fn is_finished(event: &Event) -> bool {
    match event {
        Event::Tick {
            snapshot: Snapshot::Sequence(s),
        } => s.status == TimerStatus::Completed,
        Event::Tick {
            snapshot: Snapshot::Interval(s),
        } => s.status == TimerStatus::Completed,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asanaflow_core::{SequenceItem, SequenceTimer};

    fn practice() -> PracticeSequence {
        PracticeSequence {
            name: "Test".into(),
            transition_gap_secs: 5,
            items: vec![
                SequenceItem::named("tree", "Tree", 30),
                SequenceItem::named("crow", "Crow", 20),
            ],
        }
    }

    #[test]
    fn renders_sequence_tick() {
        let p = practice();
        let renderer = Renderer::for_sequence(&p);
        let timer = SequenceTimer::new(p.items.clone(), p.transition_gap_secs).unwrap();
        let line = renderer.render(&timer.snapshot(), false).unwrap();
        assert!(line.starts_with("[idle] 1/2 Tree"));
        assert!(line.contains("0:30"));
        assert!(line.contains("left 0:55"));
    }

    #[test]
    fn renders_discrete_events() {
        let renderer = Renderer::for_sequence(&practice());
        assert_eq!(
            renderer
                .render(&Event::PoseChanged { index: 1, is_last: true }, false)
                .unwrap(),
            "== pose 2/2: Crow (last)"
        );
        assert_eq!(
            renderer
                .render(&Event::TransitionStarted { next_index: 1 }, false)
                .unwrap(),
            "-> next up: Crow"
        );
    }

    #[test]
    fn json_mode_emits_tagged_events() {
        let renderer = Renderer::for_sequence(&practice());
        let line = renderer.render(&Event::Completed, true).unwrap();
        assert_eq!(line, r#"{"type":"completed"}"#);
    }

    #[test]
    fn completed_snapshot_is_finished() {
        let p = practice();
        let mut timer = SequenceTimer::new(p.items, 5).unwrap();
        assert!(!is_finished(&timer.snapshot()));
        timer.complete();
        assert!(is_finished(&timer.snapshot()));
    }
}
