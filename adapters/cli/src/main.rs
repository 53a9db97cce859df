#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Headless runner for Blind Jump.
//!
//! Plays the game without a window: an autopilot walks the player to each
//! teleporter while draw calls go to a counting target. Every level entered
//! is printed as one summary line.

mod autopilot;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use blind_jump_core::{Event, LevelSummary, WELCOME_BANNER};
use blind_jump_rendering::{DrawCall, PreloadedResources, RenderTarget, ResourceHandler};
use blind_jump_scene::{FrameLoop, LoopReport, Scene, SharedScene, ShutdownSignal};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use crate::autopilot::Autopilot;

/// Command-line options.
#[derive(Debug, Parser)]
#[command(name = "blind-jump")]
#[command(about = "Runs Blind Jump headless and reports every level entered")]
struct Cli {
    /// TOML file overriding the default tuning.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Global seed, overriding the one in the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    frames: u64,
    /// Milliseconds advanced per frame.
    #[arg(long, default_value_t = 16)]
    dt_ms: u64,
    /// Draw from the main thread while logic runs on a worker.
    #[arg(long)]
    threaded: bool,
    /// Leave the player standing instead of walking to each teleporter.
    #[arg(long)]
    idle: bool,
}

/// Render target that only counts submitted calls.
#[derive(Debug, Default)]
struct CountingTarget {
    calls: u64,
}

impl RenderTarget for CountingTarget {
    fn draw(&mut self, _call: DrawCall) {
        self.calls += 1;
    }
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = config::load(cli.config.as_deref())?;
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    info!(seed = config.seed, frames = cli.frames, threaded = cli.threaded, "starting run");

    let resources = PreloadedResources::with_all();
    resources
        .ensure_loaded()
        .context("render resources must be loaded before the frame loop starts")?;

    let frame_loop = FrameLoop::new(Duration::from_millis(cli.dt_ms)).with_max_frames(cli.frames);
    let shutdown = ShutdownSignal::new();
    let mut autopilot = Autopilot::new(!cli.idle);
    let mut target = CountingTarget::default();
    let mut summaries = Vec::new();
    let mut on_event = |event: &Event| record(event, &mut summaries);

    let report = if cli.threaded {
        let scene = SharedScene::new(config).context("failed to start the scene")?;
        frame_loop.run_threaded(
            &scene,
            &mut autopilot,
            &resources,
            &mut target,
            &shutdown,
            &mut on_event,
        )
    } else {
        let mut scene = Scene::new(config).context("failed to start the scene")?;
        frame_loop.run(
            &mut scene,
            &mut autopilot,
            &resources,
            &mut target,
            &shutdown,
            &mut on_event,
        )
    };

    println!("{WELCOME_BANNER}");
    for summary in &summaries {
        println!("{}", describe(summary));
    }
    print_report(&report, target.calls);
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn record(event: &Event, summaries: &mut Vec<LevelSummary>) {
    match event {
        Event::LevelEntered { summary } => summaries.push(summary.clone()),
        Event::TransitionChanged { from, to } => debug!(?from, ?to, "transition"),
        Event::ScreenShake { intensity } => debug!(intensity, "screen shake"),
        Event::RunRestarted => info!("run restarted"),
    }
}

fn describe(summary: &LevelSummary) -> String {
    format!(
        "level {} {:?} layout={:?} attempts={} open_cells={} enemies={} cost={} chest={}",
        summary.level,
        summary.tileset,
        summary.layout,
        summary.attempts,
        summary.open_cells,
        summary.enemies,
        summary.difficulty_cost,
        summary.chest_placed,
    )
}

fn print_report(report: &LoopReport, draw_calls: u64) {
    println!(
        "frames={} rendered={} levels={} draw_calls={}",
        report.frames, report.rendered, report.levels_entered, draw_calls
    );
}
