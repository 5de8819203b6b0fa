//! Funny Boat headless driver
//!
//! Plays a seeded session with the built-in autopilot, optionally dumping
//! every presented frame as JSON lines, then records the result in the
//! high-score list of the chosen mode.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::Parser;

use funny_boat::consts::{SIM_DT, TICK_RATE};
use funny_boat::game_loop::{FrameSink, InputEvent, Session, run_realtime};
use funny_boat::sim::{Frame, GameEvent, GameState, Mode, SpriteBank};
use funny_boat::{HighScores, Settings};

#[derive(Parser, Debug)]
#[command(name = "funny-boat")]
#[command(about = "Steamboat arcade simulation, played headless by the autopilot")]
struct Cli {
    /// Hits never cost a heart
    #[arg(long)]
    invincible: bool,
    /// Disable particle effects
    #[arg(long)]
    no_particles: bool,
    /// Configuration directory (defaults to ~/.funnyboat)
    #[arg(long)]
    config_dir: Option<PathBuf>,
    /// RNG seed (defaults to the current time)
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many ticks
    #[arg(long, default_value_t = 60 * TICK_RATE as u64 * 5)]
    ticks: u64,
    /// Play endless mode instead of the story
    #[arg(long)]
    endless: bool,
    /// Pace the simulation against the wall clock
    #[arg(long)]
    realtime: bool,
    /// Write every presented frame to this file as JSON lines
    #[arg(long)]
    frames: Option<PathBuf>,
    /// Name recorded with a high score
    #[arg(long)]
    name: Option<String>,
}

/// Frame dump, one JSON document per line
struct JsonLines {
    out: Option<BufWriter<File>>,
    frames: u64,
}

impl JsonLines {
    fn create(path: Option<&PathBuf>) -> Result<Self> {
        let out = match path {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("creating frame dump {}", path.display()))?;
                Some(BufWriter::new(file))
            }
            None => None,
        };
        Ok(Self { out, frames: 0 })
    }

    fn finish(&mut self) -> Result<()> {
        if let Some(out) = self.out.as_mut() {
            out.flush().context("flushing frame dump")?;
        }
        Ok(())
    }
}

impl FrameSink for JsonLines {
    type Error = anyhow::Error;

    fn present(&mut self, frame: &Frame) -> Result<()> {
        self.frames += 1;
        if let Some(out) = self.out.as_mut() {
            serde_json::to_writer(&mut *out, frame).context("encoding frame")?;
            out.write_all(b"\n").context("writing frame dump")?;
        }
        Ok(())
    }
}

fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let dir = cli.config_dir.clone().unwrap_or_else(Settings::default_dir);
    let mut settings = Settings::load(&dir);
    if cli.invincible {
        settings.invincibility = true;
    }
    if cli.no_particles {
        settings.particles = false;
    }
    if let Some(name) = &cli.name {
        settings.name = name.clone();
    }

    let mode = if cli.endless { Mode::Endless } else { Mode::Story };
    let seed = cli.seed.unwrap_or_else(time_seed);
    log::info!("Funny Boat starting ({:?}, seed {})", mode, seed);

    let state = GameState::new(mode, seed, settings.core_flags(), SpriteBank::placeholder());
    let mut session = Session::new(state).with_autopilot();
    let mut sink = JsonLines::create(cli.frames.as_ref())?;
    let mut events = 0usize;

    if cli.realtime {
        // No live input; the sender only keeps the channel open
        let (_tx, rx) = mpsc::channel::<InputEvent>();
        run_realtime(&mut session, &rx, &mut sink, Some(cli.ticks))?;
        events += session.drain_events().len();
    } else {
        while !session.state.is_over() && session.state.t < cli.ticks {
            session.frame(SIM_DT, &mut sink)?;
            for event in session.drain_events() {
                if matches!(event, GameEvent::PhaseStarted { .. } | GameEvent::BossArrived) {
                    log::debug!("tick {}: {:?}", session.state.t, event);
                }
                events += 1;
            }
        }
    }
    sink.finish()?;

    let state = &session.state;
    let outcome = state.game_over.map_or("Time up", |g| g.message());
    let score = state.final_score();
    println!("{}", outcome.replace('\n', " "));
    println!(
        "score {} after {} ticks ({} frames, {} events, phase {})",
        score,
        state.t,
        sink.frames,
        events,
        state.level.phase()
    );

    let mut scores = HighScores::load(&dir, mode);
    if let Some(rank) = scores.add_score(&settings.name, score) {
        println!("{}: new high score, rank {}", scores.title(), rank);
        scores
            .save(&dir)
            .with_context(|| format!("saving high scores to {}", dir.display()))?;
    }

    Ok(())
}
