//! Integration tests for the sequence timer's time bookkeeping.

use asanaflow_core::{Event, SequenceItem, SequenceTimer, TimerStatus};
use proptest::prelude::*;

fn flow(durations: &[u64]) -> SequenceTimer {
    let items = durations
        .iter()
        .enumerate()
        .map(|(i, d)| SequenceItem::new(format!("pose-{i}"), *d))
        .collect();
    SequenceTimer::with_default_gap(items).unwrap()
}

fn pose_changes(events: &[Event]) -> Vec<(usize, bool)> {
    events
        .iter()
        .filter_map(|e| match e {
            Event::PoseChanged { index, is_last } => Some((*index, *is_last)),
            _ => None,
        })
        .collect()
}

#[test]
fn ten_ticks_then_gap_reaches_second_pose_once() {
    let mut t = flow(&[10, 5, 8]);
    assert_eq!(t.total_duration(), 33);

    let mut events = t.start();
    for _ in 0..10 {
        events.extend(t.tick());
    }
    assert!(events.contains(&Event::TransitionStarted { next_index: 1 }));
    events.extend(t.finish_transition());

    assert_eq!(pose_changes(&events), vec![(1, false)]);
    assert_eq!(t.state().current_item_index, 1);
}

#[test]
fn full_practice_by_ticks_visits_every_pose_and_completes_once() {
    let mut t = flow(&[3, 2, 4]);
    let mut events = t.start();
    while t.status() == TimerStatus::Playing {
        let step = t.tick();
        let step = if step.is_empty() {
            t.finish_transition()
        } else {
            step
        };
        events.extend(step);
    }
    assert_eq!(pose_changes(&events), vec![(1, false), (2, true)]);
    assert_eq!(
        events.iter().filter(|e| **e == Event::Completed).count(),
        1
    );
    assert_eq!(t.state().total_time_elapsed, t.total_duration());
    assert_eq!(t.state().total_time_remaining, 0);
}

#[test]
fn skip_at_start_spends_first_pose() {
    let mut t = flow(&[10, 5, 8]);
    t.skip_to_next();
    assert_eq!(t.state().total_time_elapsed, 10);
    assert_eq!(t.state().current_item_index, 1);
}

#[test]
fn skip_on_final_pose_completes_and_zeroes_counters() {
    let mut t = flow(&[10, 5, 8]);
    t.go_to_pose(2);
    let events = t.skip_to_next();
    assert_eq!(events[0], Event::Completed);
    assert_eq!(t.state().item_time_remaining, 0);
    assert_eq!(t.state().total_time_remaining, 0);
    assert_eq!(t.status(), TimerStatus::Completed);
}

#[test]
fn previous_always_restarts_full_duration() {
    let mut t = flow(&[10, 5, 8]);
    t.start();
    for _ in 0..7 {
        t.tick();
    }
    t.skip_to_next();
    t.skip_to_previous();
    assert_eq!(t.state().item_time_remaining, 10);

    for _ in 0..3 {
        t.tick();
    }
    t.go_to_pose(1);
    t.skip_to_previous();
    assert_eq!(t.state().item_time_remaining, 10);
}

#[test]
fn every_command_emits_exactly_one_tick() {
    let mut t = flow(&[2, 2, 2]);
    let batches = vec![
        t.start(),
        t.tick(),
        t.tick(),
        t.finish_transition(),
        t.pause(),
        t.toggle(),
        t.skip_to_next(),
        t.skip_to_previous(),
        t.go_to_pose(2),
        t.skip_to_next(),
        t.reset(),
    ];
    for (i, batch) in batches.iter().enumerate() {
        assert_eq!(
            batch.iter().filter(|e| e.is_tick()).count(),
            1,
            "batch {i}: {batch:?}"
        );
        assert!(batch.last().is_some_and(Event::is_tick), "batch {i}");
    }
}

#[derive(Debug, Clone)]
enum Op {
    Start,
    Pause,
    Resume,
    Toggle,
    Tick,
    FinishTransition,
    Next,
    Previous,
    GoTo(usize),
    Reset,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        1 => Just(Op::Start),
        1 => Just(Op::Pause),
        1 => Just(Op::Resume),
        1 => Just(Op::Toggle),
        8 => Just(Op::Tick),
        2 => Just(Op::FinishTransition),
        1 => Just(Op::Next),
        1 => Just(Op::Previous),
        1 => (0usize..8).prop_map(Op::GoTo),
        1 => Just(Op::Reset),
    ]
}

fn apply(t: &mut SequenceTimer, op: &Op) -> Vec<Event> {
    match op {
        Op::Start => t.start(),
        Op::Pause => t.pause(),
        Op::Resume => t.resume(),
        Op::Toggle => t.toggle(),
        Op::Tick => t.tick(),
        Op::FinishTransition => t.finish_transition(),
        Op::Next => t.skip_to_next(),
        Op::Previous => t.skip_to_previous(),
        Op::GoTo(i) => t.go_to_pose(*i),
        Op::Reset => t.reset(),
    }
}

proptest! {
    #[test]
    fn bookkeeping_holds_under_any_operation_sequence(
        durations in prop::collection::vec(1u64..20, 1..6),
        ops in prop::collection::vec(op(), 0..200),
    ) {
        let mut t = flow(&durations);
        for op in &ops {
            let before = t.status();
            let events = apply(&mut t, op);
            let s = t.state();

            prop_assert_eq!(s.total_time_elapsed + s.total_time_remaining, t.total_duration());
            prop_assert!(s.current_item_index < durations.len());
            prop_assert!(s.item_time_remaining <= durations[s.current_item_index]);
            prop_assert!(events.iter().filter(|e| e.is_tick()).count() <= 1);
            prop_assert!(events.iter().filter(|e| **e == Event::Completed).count() <= 1);

            if before == TimerStatus::Completed && !matches!(op, Op::Reset) {
                prop_assert_eq!(t.status(), TimerStatus::Completed);
                prop_assert!(events.is_empty());
            }
            if s.transitioning.is_some() {
                prop_assert_eq!(s.item_time_remaining, 0);
            }
        }
    }
}
