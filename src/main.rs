//! Cartographer binary: explore the bundled mock world and save a navmesh.
//!
//! The real emulator lives behind the [`GameInterface`] boundary; this
//! binary wires the scheduler to the deterministic simulated world so a
//! whole run is reproducible from a seed.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use cartographer::config::CartographerConfig;
use cartographer::error::Result;
use cartographer::explore::{GameInterface, GameSpawner, SessionConfig};
use cartographer::io::save_navmesh;
use cartographer::scheduler::{Scheduler, ThreadDispatcher};
use cartographer::sim::{MockWorldConfig, MockWorldSpawner};

/// Build a navmesh of a game world by playing it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override worker count
    #[arg(long)]
    workers: Option<usize>,

    /// Override random seed (0 = entropy)
    #[arg(long)]
    seed: Option<u64>,

    /// Override global time budget in seconds
    #[arg(long)]
    time_budget: Option<u64>,

    /// Override navmesh output path
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cartographer=info".parse().unwrap()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            info!("loading configuration from {path:?}");
            CartographerConfig::load(path)?
        }
        None if Path::new("cartographer.toml").exists() => {
            info!("loading configuration from cartographer.toml");
            CartographerConfig::load(Path::new("cartographer.toml"))?
        }
        None => {
            info!("using default configuration");
            CartographerConfig::default()
        }
    };
    if let Some(workers) = args.workers {
        config.run.workers = workers;
    }
    if let Some(seed) = args.seed {
        config.run.seed = seed;
    }
    if let Some(secs) = args.time_budget {
        config.run.time_budget_secs = secs;
    }
    if let Some(output) = args.output {
        config.output.navmesh_path = output.display().to_string();
    }
    config.validate()?;

    info!("cartographer v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "{} roms, {} workers, {} steps/worker, {}s budget, seed {}",
        config.roms.len(),
        config.run.workers,
        config.run.steps_per_worker,
        config.run.time_budget_secs,
        config.run.seed
    );

    let world_config = MockWorldConfig {
        width: config.sim.width,
        height: config.sim.height,
        wall_density: config.sim.wall_density,
        flake_chance: config.sim.flake_chance,
        ..Default::default()
    };
    let spawner = MockWorldSpawner::new(world_config, config.run.seed);

    // The spawn cell comes from observing a freshly spawned game, the same
    // way a real run would read it out of the first emulator.
    let mut probe = spawner.spawn(&config.roms[0])?;
    let origin = probe.current_position()?;
    drop(probe);
    info!("origin at {origin}");

    let session = SessionConfig {
        step_budget: config.run.steps_per_worker,
        wander_steps: config.session.wander_steps,
        reroute_limit: config.session.reroute_limit,
    };
    let dispatcher = ThreadDispatcher::new(spawner, session, config.run.seed);
    let rng = if config.run.seed == 0 {
        StdRng::from_os_rng()
    } else {
        StdRng::seed_from_u64(config.run.seed)
    };

    let scheduler = Scheduler::new(
        dispatcher,
        rng,
        origin,
        config.roms.clone(),
        config.run.workers,
        config.run.steps_per_worker,
    )?;

    info!("starting exploration...");
    let summary = scheduler.run(Duration::from_secs(config.run.time_budget_secs));

    info!(
        "explored {} vertices, {} edges in {} batches ({} results, {} incomplete, {} conflicts, {:.1}s)",
        summary.mesh.vertex_count(),
        summary.mesh.edge_count(),
        summary.batches,
        summary.results,
        summary.incomplete_results,
        summary.conflicts,
        summary.elapsed.as_secs_f32()
    );
    info!(
        "frontier remaining: {} incomplete vertices",
        summary.mesh.incomplete_vertices().len()
    );

    let navmesh_path = Path::new(&config.output.navmesh_path);
    if let Some(parent) = navmesh_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    save_navmesh(&summary.mesh, navmesh_path)?;
    info!("navmesh saved to {navmesh_path:?}");

    Ok(())
}
