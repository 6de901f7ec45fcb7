use std::path::PathBuf;
use std::time::Duration;

use asanaflow_core::{Config, Exercise, IntervalConfig, IntervalTimer};
use clap::Args;

use super::session::{self, SessionOptions};
use crate::render::Renderer;

#[derive(Args)]
pub struct IntervalArgs {
    /// Workout file (.toml or .json); flags below override it
    #[arg(long)]
    file: Option<PathBuf>,
    /// Work phase seconds
    #[arg(long)]
    work: Option<u64>,
    /// Rest phase seconds
    #[arg(long)]
    rest: Option<u64>,
    /// Number of rounds
    #[arg(long)]
    rounds: Option<u32>,
    /// Exercise name, repeatable, in order
    #[arg(long = "exercise")]
    exercises: Vec<String>,
    /// Tick period in milliseconds
    #[arg(long, default_value = "1000")]
    tick_ms: u64,
    /// Print events as JSON lines
    #[arg(long)]
    json: bool,
    /// Disable the terminal bell
    #[arg(long)]
    no_cues: bool,
}

fn build_config(args: &IntervalArgs, config: &Config) -> Result<IntervalConfig, Box<dyn std::error::Error>> {
    let mut workout = match &args.file {
        Some(path) => IntervalConfig::from_path(path)?,
        None => config.interval_config(IntervalConfig::default().exercises),
    };
    if !args.exercises.is_empty() {
        workout.exercises = args.exercises.iter().map(|n| Exercise::new(n.as_str())).collect();
    }
    if let Some(work) = args.work {
        workout.work_secs = work;
    }
    if let Some(rest) = args.rest {
        workout.rest_secs = rest;
    }
    if let Some(rounds) = args.rounds {
        workout.rounds = rounds;
    }
    Ok(workout)
}

pub fn run(args: IntervalArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let workout = build_config(&args, &config)?;

    let engine = IntervalTimer::new(workout.clone())?;
    let renderer = Renderer::for_interval(&workout);
    let mut cues = config.cues.clone();
    cues.enabled &= !args.no_cues;

    session::play(
        "Intervals",
        engine,
        renderer,
        SessionOptions {
            tick_period: Duration::from_millis(args.tick_ms.max(1)),
            json: args.json,
            cues,
        },
    )
}
