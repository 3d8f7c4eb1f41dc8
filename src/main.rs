//! Headless voxel world runner
//!
//! Drives the engine end to end without a GPU: generates terrain around a
//! moving viewer, builds chunk meshes into a counting sink, and reports
//! streaming throughput. Useful for profiling and for soak-testing worlds.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use rand::RngExt;

use voxelcore::{
    BlockRegistry, ChunkManager, EngineConfig, NullRenderSink, SaveError, SavedWorld,
    TerrainGenerator, World, WorldType, load_config, load_world, save_world,
};

/// Seconds of simulated time per scheduler tick (20 Hz).
const TICK_SECONDS: f32 = 0.05;

/// Chunked voxel world engine
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// World seed; a number is used directly, other text is hashed, and an
    /// empty or missing value picks a random seed
    #[arg(long)]
    seed: Option<String>,

    /// Terrain profile to generate (default, flat, amplified)
    #[arg(long)]
    world_type: Option<String>,

    /// View radius in chunks around the viewer
    #[arg(long)]
    radius: Option<i32>,

    /// Streaming ticks to run after the initial load completes
    #[arg(long, default_value_t = 240)]
    ticks: u32,

    /// Viewer travel speed along +X, in blocks per second
    #[arg(long, default_value_t = 24.0)]
    speed: f32,

    /// Engine configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// World file to restore before streaming starts
    #[arg(long)]
    load: Option<PathBuf>,

    /// World file to write modified chunks into on exit
    #[arg(long)]
    save: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        tracing::error!("Fatal: {}", err);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), SaveError> {
    let config = match &args.config {
        Some(path) => load_config(path),
        None => EngineConfig::default(),
    };

    let seed_text = args.seed.unwrap_or_else(|| config.world.seed.clone());
    let world_type = match &args.world_type {
        Some(name) => WorldType::from_name(name),
        None => config.world.world_type,
    };
    let generator = if seed_text.is_empty() {
        TerrainGenerator::new(rand::rng().random::<u32>(), world_type)
    } else {
        TerrainGenerator::from_seed_str(&seed_text, world_type)
    };

    let mut world = World::with_day_length(generator, config.world.day_length_secs);
    if let Some(path) = &args.load {
        let saved = load_world(path)?;
        tracing::info!(
            "Restoring {:?}: seed {}, {} modified chunks",
            path,
            saved.seed,
            saved.chunks.len()
        );
        let generator = TerrainGenerator::new(saved.seed, saved.world_type);
        world = World::with_day_length(generator, config.world.day_length_secs);
        world.set_time_of_day(saved.time_of_day);
        for chunk in saved.restore_chunks() {
            world.add_chunk(chunk);
        }
    }
    tracing::info!(
        "World ready: seed {}, type {:?}",
        world.seed(),
        world.generator.world_type()
    );

    let view_radius = args.radius.unwrap_or(config.streaming.view_radius).max(0);
    let initial_radius = config.streaming.initial_radius.min(view_radius);
    let mut manager = ChunkManager::new(
        BlockRegistry::new(),
        view_radius,
        config.streaming.budget_ms,
        config.streaming.max_dirty_per_tick,
    );
    let mut sink = NullRenderSink::new();

    let spawn = world.spawn_position();
    let (spawn_cx, _) = World::split_coord(spawn.x.floor() as i32);
    let (spawn_cz, _) = World::split_coord(spawn.z.floor() as i32);
    tracing::info!(
        "Spawn at ({:.1}, {:.1}, {:.1}) in chunk ({}, {})",
        spawn.x,
        spawn.y,
        spawn.z,
        spawn_cx,
        spawn_cz
    );

    let load_start = Instant::now();
    manager.begin_initial_load(&mut world, &mut sink, (spawn_cx, spawn_cz), initial_radius);
    let mut last_percent = manager.progress_percent();
    while manager.loading() {
        manager.tick(&mut world, &mut sink, spawn.x, spawn.z);
        let percent = manager.progress_percent();
        if percent != last_percent {
            tracing::debug!("Initial load {}%", percent);
            last_percent = percent;
        }
    }
    tracing::info!(
        "Initial load done in {:.2}s: {} chunks, {} meshes",
        load_start.elapsed().as_secs_f32(),
        world.chunk_count(),
        sink.active_meshes()
    );

    let mut viewer_x = spawn.x;
    let run_start = Instant::now();
    for tick in 1..=args.ticks {
        viewer_x += args.speed * TICK_SECONDS;
        world.update(TICK_SECONDS);
        manager.tick(&mut world, &mut sink, viewer_x, spawn.z);
        if tick % 60 == 0 {
            tracing::info!(
                "Tick {}: viewer x {:.0}, {} chunks, {} meshes, {} queued",
                tick,
                viewer_x,
                world.chunk_count(),
                sink.active_meshes(),
                manager.queued_count()
            );
        }
    }
    tracing::info!(
        "Ran {} ticks in {:.2}s: {} uploads, {} removals, clock {:.0}, weather {:?}",
        args.ticks,
        run_start.elapsed().as_secs_f32(),
        sink.uploads,
        sink.removals,
        world.time_of_day(),
        world.weather()
    );

    if let Some(path) = &args.save {
        let saved = SavedWorld::from_world(&world);
        save_world(path, &saved)?;
        tracing::info!("Saved {} modified chunks to {:?}", saved.chunks.len(), path);
    }

    Ok(())
}
