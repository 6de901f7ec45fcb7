//! Interactive terminal session shared by `sequence` and `interval`.

use std::io::Write;
use std::time::Duration;

use asanaflow_core::{
    format_time, Cue, CueConfig, CueObserver, CuePlayer, Event, IntervalTimer, PracticeTimer,
    SequenceTimer, Snapshot, TimerObserver, TimerRunner,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::unbounded_channel;
use tracing::{info, warn};

use crate::render::{is_finished, Renderer};

/// Engines the terminal session can navigate.
pub trait Navigable: PracticeTimer {
    fn next(&mut self) -> Vec<Event>;

    fn previous(&mut self) -> Vec<Event> {
        Vec::new()
    }

    fn go_to(&mut self, _index: usize) -> Vec<Event> {
        Vec::new()
    }
}

impl Navigable for SequenceTimer {
    fn next(&mut self) -> Vec<Event> {
        self.skip_to_next()
    }

    fn previous(&mut self) -> Vec<Event> {
        self.skip_to_previous()
    }

    fn go_to(&mut self, index: usize) -> Vec<Event> {
        self.go_to_pose(index)
    }
}

impl Navigable for IntervalTimer {
    fn next(&mut self) -> Vec<Event> {
        self.skip_phase()
    }
}

/// One line of stdin input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Control {
    Toggle,
    Next,
    Previous,
    /// Zero-based; the user types a one-based pose number.
    GoTo(usize),
    Reset,
    Quit,
}

pub fn parse_control(line: &str) -> Option<Control> {
    let mut parts = line.split_whitespace();
    let control = match parts.next()? {
        "p" | "pause" | "play" => Control::Toggle,
        "n" | "next" => Control::Next,
        "b" | "back" => Control::Previous,
        "r" | "reset" => Control::Reset,
        "q" | "quit" => Control::Quit,
        "g" | "go" => {
            let number: usize = parts.next()?.parse().ok()?;
            Control::GoTo(number.checked_sub(1)?)
        }
        _ => return None,
    };
    Some(control)
}

pub struct SessionOptions {
    pub tick_period: Duration,
    pub json: bool,
    pub cues: CueConfig,
}

#[derive(Debug, Serialize)]
pub struct SessionSummary {
    pub name: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub completed: bool,
    pub elapsed_secs: u64,
}

/// Rings the terminal bell; any nonzero volume rings once.
struct TerminalBell;

impl CuePlayer for TerminalBell {
    fn play(&self, _cue: Cue, volume: u32) {
        if volume == 0 {
            return;
        }
        let mut err = std::io::stderr();
        let _ = err.write_all(b"\x07");
        let _ = err.flush();
    }
}

pub fn play<T: Navigable>(
    name: &str,
    engine: T,
    renderer: Renderer,
    options: SessionOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let summary = runtime.block_on(run_session(name, engine, &renderer, &options));
    // A pending stdin read would otherwise hold up shutdown.
    runtime.shutdown_background();
    let summary = summary?;

    if options.json {
        let mut json = serde_json::to_value(&summary)?;
        json["type"] = "summary".into();
        println!("{json}");
    } else {
        println!(
            "{}: {} practiced{}",
            summary.name,
            format_time(summary.elapsed_secs),
            if summary.completed { ", complete" } else { "" }
        );
    }
    Ok(())
}

async fn run_session<T: Navigable>(
    name: &str,
    engine: T,
    renderer: &Renderer,
    options: &SessionOptions,
) -> Result<SessionSummary, Box<dyn std::error::Error>> {
    let started_at = Utc::now();
    let (tx, mut rx) = unbounded_channel();
    let observers: Vec<Box<dyn TimerObserver>> = vec![
        Box::new(tx),
        Box::new(CueObserver::new(TerminalBell, options.cues.clone())),
    ];
    let mut runner = TimerRunner::new(engine, observers).with_tick_period(options.tick_period);

    info!(name, "session started");
    runner.start();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    let mut completed = false;
    let mut elapsed_secs = 0;

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if let Some(line) = renderer.render(&event, options.json) {
                    println!("{line}");
                }
                if let Event::Tick { snapshot } = &event {
                    elapsed_secs = elapsed_of(snapshot);
                }
                if is_finished(&event) {
                    completed = true;
                    break;
                }
            }
            line = lines.next_line(), if stdin_open => {
                match line {
                    Ok(Some(line)) => match parse_control(&line) {
                        Some(Control::Quit) => break,
                        Some(control) => apply(&mut runner, control),
                        None => warn!(input = line.trim(), "unrecognised command"),
                    },
                    Ok(None) => stdin_open = false,
                    Err(e) => {
                        warn!(error = %e, "stdin unreadable, controls disabled");
                        stdin_open = false;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted");
                break;
            }
        }
    }

    runner.destroy();
    info!(name, completed, elapsed_secs, "session ended");
    Ok(SessionSummary {
        name: name.to_string(),
        started_at,
        finished_at: Utc::now(),
        completed,
        elapsed_secs,
    })
}

fn apply<T: Navigable>(runner: &mut TimerRunner<T>, control: Control) {
    match control {
        Control::Toggle => runner.toggle(),
        Control::Next => runner.command(|e| e.next()),
        Control::Previous => runner.command(|e| e.previous()),
        Control::GoTo(index) => runner.command(|e| e.go_to(index)),
        Control::Reset => runner.reset(),
        Control::Quit => {}
    }
}

fn elapsed_of(snapshot: &Snapshot) -> u64 {
    match snapshot {
        Snapshot::Sequence(s) => s.total_time_elapsed,
        Snapshot::Interval(s) => s.total_time_elapsed,
    }
}
