//! Verlet Pool headless driver
//!
//! Builds a solver from settings, populates a scenario and runs the fixed
//! frame loop, logging diagnostics once per simulated second.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use verlet_pool::Settings;
use verlet_pool::sim::{PhysicsSolver, diagonal_rack, random_scatter};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScenarioKind {
    /// Sixteen balls on a diagonal
    Rack,
    /// Seeded random placement
    Scatter,
}

#[derive(Parser, Debug)]
#[command(about = "Run the ball solver without a window")]
struct Args {
    /// Settings JSON file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, value_enum, default_value = "rack")]
    scenario: ScenarioKind,

    /// Frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Seed for the scatter scenario
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Ball count for the scatter scenario
    #[arg(long, default_value_t = 64)]
    count: u32,

    /// Maximum initial speed per axis for the scatter scenario
    #[arg(long, default_value_t = 0.2)]
    max_speed: f32,

    /// Write the final balls as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let settings = match &args.config {
        Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
        None => Settings::default(),
    };
    let mut solver = PhysicsSolver::with_config(settings.solver_config()?)?;

    match args.scenario {
        ScenarioKind::Rack => diagonal_rack(&mut solver, settings.ball_radius)?,
        ScenarioKind::Scatter => random_scatter(
            &mut solver,
            args.seed,
            args.count,
            settings.ball_radius,
            args.max_speed,
        )?,
    };
    log::info!("Verlet Pool starting: {} balls, {} frames", solver.len(), args.frames);

    let dt = settings.frame_dt();
    let report_every = (1.0 / dt).round().max(1.0) as u32;
    let started = Instant::now();
    let mut deepest = 0.0f32;

    for frame in 1..=args.frames {
        solver.update(dt);
        deepest = deepest.max(solver.max_penetration());

        if frame % report_every == 0 {
            let stats = solver.stats();
            log::info!(
                "t={:.1}s checks={} resolved={} degenerate={} dropped={} energy={:.4} max_pen={:.4}",
                frame as f32 * dt,
                stats.contact_checks,
                stats.contacts_resolved,
                stats.degenerate,
                stats.dropped_inserts,
                solver.kinetic_energy(),
                deepest
            );
            deepest = 0.0;
        }
    }

    let elapsed = started.elapsed();
    log::info!(
        "Simulated {} frames in {:.3}s ({:.1} frames/s)",
        args.frames,
        elapsed.as_secs_f64(),
        args.frames as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );

    if let Some(path) = &args.dump {
        let json = serde_json::to_string_pretty(solver.balls())?;
        fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Final state written to {}", path.display());
    }

    Ok(())
}
