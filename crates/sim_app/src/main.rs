//! # sim_app — simulation host
//!
//! Loads a world definition, registers the gameplay systems, and drives the
//! fixed-timestep tick loop.
//!
//! ## Startup sequence
//!
//! 1. Initialise structured logging.
//! 2. Load the world (the only filesystem-touching step; it completes or
//!    fails before the first tick).
//! 3. Deliver load-time lifecycle events to registered systems.
//! 4. Enter the tick loop.

mod pose_feed;
mod tick_loop;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sim_ecs::{EntityStore, Scheduler};
use sim_loader::WorldLoader;
use sim_systems::{AiStateMachine, MovementIntegrator};

use pose_feed::PoseFeed;
use tick_loop::{TickConfig, TickLoop};

/// Command-line settings: asset root, world document, optional tick cap.
struct Args {
    root: String,
    world: String,
    max_ticks: u64,
}

fn parse_args() -> Args {
    let mut args = std::env::args().skip(1);
    Args {
        root: args.next().unwrap_or_else(|| "assets".to_string()),
        world: args.next().unwrap_or_else(|| "world.json".to_string()),
        max_ticks: args.next().and_then(|s| s.parse().ok()).unwrap_or(0),
    }
}

fn main() -> Result<()> {
    // Initialise structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("sim_app=info".parse()?))
        .init();

    let args = parse_args();
    info!(root = args.root, world = args.world, "simulation host starting");

    let mut store = EntityStore::new();
    let mut loader = WorldLoader::new(&args.root);
    let world = loader.load_world(&mut store, &args.world)?;
    info!(
        world = world.name,
        entities = world.entities.len(),
        fog = world.ambient.fog_color,
        "world loaded"
    );

    let mut scheduler = Scheduler::new();
    scheduler.add_system(Box::new(MovementIntegrator::new()));
    scheduler.add_system(Box::new(AiStateMachine::new()));
    scheduler.add_system(Box::new(PoseFeed::new()));

    // Hand the load-time component events to the systems (the pose feed
    // builds its drawables here) before the first tick runs.
    scheduler.flush_events(&mut store);

    let config = TickConfig {
        tick_rate: 60.0,
        max_ticks: args.max_ticks,
    };
    let mut tick_loop = TickLoop::new(config, scheduler);
    tick_loop.run(&mut store);

    info!("simulation host shut down");
    Ok(())
}
