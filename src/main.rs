//! Flappy Core headless runner
//!
//! Drives the simulation with the autopilot at a fixed frame rate and reports
//! the session. Useful for soak-testing tuning changes without a renderer.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use flappy_core::sim::GamePhase;
use flappy_core::{GameLoop, Settings, autopilot};

#[derive(Parser, Debug)]
#[command(version, about = "Run the Flappy Core simulation headless")]
struct Args {
    /// Seed for the gap offset RNG
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 60.0)]
    seconds: f32,

    /// Simulated frames per second
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Settings file (JSON); defaults apply to missing fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many finished runs
    #[arg(long)]
    runs: Option<u32>,

    /// Print every frame as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if !(args.fps.is_finite() && args.fps > 0.0) {
        anyhow::bail!("fps must be positive (got {})", args.fps);
    }

    let mut game = GameLoop::initialize(&settings, args.seed)?;
    let dt = 1.0 / args.fps;
    let total_frames = (args.seconds.max(0.0) * args.fps) as u64;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut finished = 0u32;

    for _ in 0..total_frames {
        let tapped = autopilot::decide(game.state());
        let before = game.state().phase;
        let frame = game.update(dt, tapped);

        if args.json {
            serde_json::to_writer(&mut out, &frame)?;
            writeln!(out)?;
        }

        if before == GamePhase::Playing && frame.phase == GamePhase::GameOver {
            finished += 1;
            if args.runs.is_some_and(|limit| finished >= limit) {
                break;
            }
        }
    }
    out.flush()?;
    drop(out);

    let summary = game.shutdown();
    if !args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }
    Ok(())
}
