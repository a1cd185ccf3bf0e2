//! Flurry CLI
//!
//! Run particle scenes headless and inspect the result.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod clock;
mod config;
mod report;

use clock::FrameClock;
use config::{SceneConfig, SCENE_FILE};
use report::{FrameReport, RunSummary};

#[derive(Parser)]
#[command(name = "flurry")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless particle scene runner", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a scene and report statistics
    Run {
        /// Scene file
        #[arg(default_value = SCENE_FILE)]
        scene: PathBuf,

        /// Override the number of frames
        #[arg(short, long)]
        frames: Option<u32>,

        /// Step by wall-clock time instead of the scene's fixed dt
        #[arg(long)]
        realtime: bool,

        /// Log frame statistics every N frames (0 disables)
        #[arg(long, default_value = "60")]
        report_every: u64,

        /// Print the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a scene without simulating it
    Check {
        /// Scene file
        #[arg(default_value = SCENE_FILE)]
        scene: PathBuf,
    },

    /// Write the demo scene
    Init {
        /// Destination file
        #[arg(default_value = SCENE_FILE)]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match cli.command {
        Commands::Run {
            scene,
            frames,
            realtime,
            report_every,
            json,
        } => cmd_run(&scene, frames, realtime, report_every, json),

        Commands::Check { scene } => cmd_check(&scene),

        Commands::Init { path, force } => cmd_init(&path, force),
    }
}

fn warn_if_inert(scene: &SceneConfig, repellers: usize) {
    if scene.emitters.is_empty() {
        warn!("Scene has no emitters; nothing will be simulated");
    }
    if repellers == 0 {
        warn!("Scene has no planes or cylinders; particles will not be repelled");
    }
}

fn cmd_run(
    path: &Path,
    frames: Option<u32>,
    realtime: bool,
    report_every: u64,
    json: bool,
) -> Result<()> {
    let scene = SceneConfig::load(path)?;
    let mut system = scene.build_system()?;
    let frames = frames.unwrap_or(scene.frames);

    info!(
        "Loaded {}: {} solids, {} emitters",
        path.display(),
        scene.solids.len(),
        scene.emitters.len()
    );
    warn_if_inert(&scene, system.handler().repeller_count());

    let mut clock = if realtime {
        FrameClock::realtime()
    } else {
        FrameClock::fixed(scene.dt)
    };
    let mut summary = RunSummary::default();
    debug!(fixed = clock.is_fixed(), frames, "starting frame loop");

    for _ in 0..frames {
        let dt = clock.tick();
        let stats = system.update(dt);
        summary.record(stats);

        if report_every > 0 && clock.frame() % report_every == 0 {
            info!(
                "frame {} t={:.2}s alive={} emitted={} dropped={} culled={}",
                clock.frame(),
                clock.elapsed(),
                stats.alive,
                stats.emitted,
                stats.dropped,
                stats.culled
            );
        }
    }

    let mut final_frame = FrameReport::new();
    system.render(&mut final_frame);

    summary.frames = clock.frame();
    summary.simulated_seconds = clock.elapsed();
    summary.final_frame = final_frame;

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!(
            "Simulated {} frames ({:.2}s): {} emitted, {} dropped, {} culled, peak {} alive",
            summary.frames,
            summary.simulated_seconds,
            summary.emitted,
            summary.dropped,
            summary.culled,
            summary.peak_alive
        );
        info!(
            "Final frame: {} particles, {} trails, mean opacity {:.3}",
            summary.final_frame.particles,
            summary.final_frame.trails,
            summary.final_frame.mean_opacity
        );
    }

    Ok(())
}

fn cmd_check(path: &Path) -> Result<()> {
    let scene = SceneConfig::load(path)?;
    let system = scene.build_system()?;

    info!("Checking scene: {}", path.display());
    for (index, solid) in scene.to_solids().iter().enumerate() {
        debug!("solid #{}: {} at {:?}", index, solid.kind.name(), solid.position);
    }
    for (index, emitter) in system.emitters().iter().enumerate() {
        info!(
            "emitter #{}: {} at {:?}, {}/s, capacity {}",
            index,
            emitter.shape().name(),
            emitter.position(),
            emitter.emission_rate(),
            emitter.max_particles()
        );
    }
    warn_if_inert(&scene, system.handler().repeller_count());

    info!("Scene is valid");
    Ok(())
}

fn cmd_init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    fs::write(path, SceneConfig::demo().to_toml()?)?;

    info!("Scene written to {}", path.display());
    info!("Run `flurry run {}` to simulate it", path.display());
    Ok(())
}
