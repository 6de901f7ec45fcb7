use std::path::PathBuf;
use std::time::Duration;

use asanaflow_core::{Config, PracticeSequence, SequenceTimer};
use clap::Args;

use super::session::{self, SessionOptions};
use crate::render::Renderer;

#[derive(Args)]
pub struct SequenceArgs {
    /// Practice file (.toml or .json); defaults to a Sun Salutation
    #[arg(long)]
    file: Option<PathBuf>,
    /// Seconds between poses (overrides the practice file and config)
    #[arg(long)]
    gap: Option<u64>,
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

pub fn run(args: SequenceArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let practice = match &args.file {
        Some(path) => PracticeSequence::from_path(path)?,
        None => {
            let mut practice = PracticeSequence::default();
            practice.transition_gap_secs = config.sequence.transition_gap_secs;
            practice
        }
    };
    let gap = args.gap.unwrap_or(practice.transition_gap_secs);

    let engine = SequenceTimer::new(practice.items.clone(), gap)?;
    let renderer = Renderer::for_sequence(&practice);
    let mut cues = config.cues.clone();
    cues.enabled &= !args.no_cues;

    session::play(
        &practice.name,
        engine,
        renderer,
        SessionOptions {
            tick_period: Duration::from_millis(args.tick_ms.max(1)),
            json: args.json,
            cues,
        },
    )
}
