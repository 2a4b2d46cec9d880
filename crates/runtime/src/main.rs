#![deny(clippy::all, clippy::pedantic)]
//! # Physics Runtime
//!
//! Headless driver for the physics engine. Loads a JSON scene (or the
//! built-in projectile launch), advances it on a fixed timestep and logs
//! per-body telemetry through `tracing`. Set `RUST_LOG=debug` to see the
//! per-tick summaries emitted by the engine itself.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use physics::stepper::{DEFAULT_DT, DEFAULT_MAX_STEPS};
use physics::transform::sync_transforms;
use physics::{FixedStepper, PhysicsWorld};
use scene::{default_launch_scene, Scene};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options
#[derive(Parser, Debug)]
#[command(name = "runtime_main", about = "Run a physics scene without a renderer")]
struct Args {
    /// JSON scene file; the built-in projectile launch when omitted
    #[arg(long)]
    scene: Option<PathBuf>,
    /// Number of physics ticks to run
    #[arg(long, default_value_t = 300)]
    ticks: u64,
    /// Simulation speed multiplier
    #[arg(long, default_value_t = 1.0)]
    speed: f32,
    /// Fixed tick length in seconds
    #[arg(long, default_value_t = DEFAULT_DT)]
    dt: f32,
    /// Log body telemetry every N ticks, 0 to disable
    #[arg(long, default_value_t = 60)]
    report_every: u64,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_ansi(io::stdout().is_terminal())
        .init();
    run(&Args::parse())
}

fn run(args: &Args) -> Result<()> {
    ensure!(args.speed.is_finite() && args.speed > 0.0, "speed must be positive, got {}", args.speed);
    ensure!(args.dt.is_finite() && args.dt > 0.0, "dt must be positive, got {}", args.dt);

    let scene = match &args.scene {
        Some(path) => {
            let json = fs::read_to_string(path).with_context(|| format!("cannot read scene {}", path.display()))?;
            Scene::from_str(&json).with_context(|| format!("cannot load scene {}", path.display()))?
        }
        None => {
            info!("Running in headless mode with the default launch scene.");
            default_launch_scene()
        }
    };
    let mut world = scene.into_world()?.world;
    let mut stepper = FixedStepper::new(args.dt).with_speed(args.speed);

    info!(
        bodies = world.len(),
        ticks = args.ticks,
        dt = args.dt,
        speed = args.speed,
        "Starting simulation loop"
    );

    // Headless: every frame is one nominal tick of wall time
    let mut alpha = 0.0;
    let mut last_report = 0;
    while world.tick() < args.ticks {
        // Never step past the requested tick count
        let remaining = args.ticks - world.tick();
        stepper.max_steps = u32::try_from(remaining).map_or(DEFAULT_MAX_STEPS, |r| r.min(DEFAULT_MAX_STEPS));
        let report = stepper.advance(&mut world, args.dt);
        alpha = report.alpha;
        if args.report_every > 0 && world.tick() >= last_report + args.report_every {
            last_report = world.tick();
            report_bodies(&world);
        }
    }

    let transforms = sync_transforms(&world, alpha);
    let summary = world.debug_info();
    info!(
        tick = summary.tick,
        bodies = summary.num_bodies,
        statics = summary.num_static,
        contacts = summary.contacts_last_tick,
        kinetic_energy = summary.total_kinetic_energy,
        transforms = transforms.len(),
        "Simulation finished"
    );
    Ok(())
}

fn report_bodies(world: &PhysicsWorld) {
    for body in world.bodies().filter(|b| !b.is_static()) {
        let stats = body.flight_stats();
        let forces = body.force_debug();
        info!(
            tick = world.tick(),
            body = %body.handle(),
            position = ?body.position(),
            speed = body.speed(),
            kinetic_energy = body.kinetic_energy(),
            flight_time = stats.flight_time,
            distance = stats.distance_traveled,
            in_contact = body.in_contact(),
            net_force = ?forces.total(),
            drag = forces.drag.length(),
            magnus = forces.magnus.length(),
            "body"
        );
    }
}
