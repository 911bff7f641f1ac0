//! Headless streaming demo: a viewer flies across the world while chunks
//! load, mesh, and unload around it, with per-tick statistics.
//!
//! Run with `cargo run -p strata-demo -- --ticks 120 --world-kind overworld`.
//! `RUST_LOG` controls verbosity.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use glam::{IVec3, Mat4, Vec3};
use tracing::info;
use tracing_subscriber::EnvFilter;

use strata_voxel::{Block, BlockColor, BlockType};
use strata_world::{ChunkManager, TaskCategory, World, WorldConfig};

#[derive(Parser, Debug)]
#[command(about = "Headless voxel chunk streaming demo")]
struct Args {
    /// RON config file; defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the world seed.
    #[arg(long)]
    seed: Option<u32>,

    /// Override the generator: height-field, density-field, or overworld.
    #[arg(long)]
    world_kind: Option<String>,

    /// Override the streaming radius in chunks.
    #[arg(long)]
    radius: Option<i32>,

    /// Simulation ticks to run.
    #[arg(long, default_value_t = 100)]
    ticks: u32,

    /// Viewer speed in blocks per tick along +X.
    #[arg(long, default_value_t = 4.0)]
    speed: f32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => WorldConfig::load(path)?,
        None => WorldConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(kind) = &args.world_kind {
        config.world_kind = kind.clone();
    }
    if let Some(radius) = args.radius {
        config.load_radius = radius;
    }

    let world = World::new(&config)?;
    let mut manager = ChunkManager::new(world.clone());

    let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 1000.0);
    let mut viewer = Vec3::new(0.0, 48.0, 0.0);
    let started = Instant::now();

    for tick in 0..args.ticks {
        viewer.x += args.speed;
        manager.load_around(viewer.as_ivec3(), config.load_radius);
        manager.sweep_pending_unloads();

        // Look along the direction of travel.
        let view = Mat4::look_at_rh(viewer, viewer + Vec3::X, Vec3::Y);
        let draws = manager.visible_chunks(&(projection * view));
        let triangles: usize = draws.iter().map(|d| d.mesh.triangle_count()).sum();

        if tick % 10 == 0 || tick + 1 == args.ticks {
            info!(
                tick,
                viewer = ?viewer.as_ivec3(),
                loaded = world.loaded_count(),
                loading = world.loading_count(),
                pending_unload = manager.pending_unload_count(),
                visible = draws.len(),
                triangles,
                gen_queue = world.worker_pool().queued(TaskCategory::Generation),
                mesh_queue = world.worker_pool().queued(TaskCategory::Meshing),
                "tick"
            );
        }
        // Drop a marker block under the viewer now and then; the edit
        // dirties the chunk and it re-meshes in the background.
        if tick % 25 == 24 {
            let pos = viewer.as_ivec3() - IVec3::new(0, 8, 0);
            let placed = world.set_block(
                pos,
                Block::new(BlockType::Stone, BlockColor::Rgba([255, 255, 255, 255])),
            );
            info!(?pos, placed, "placed marker block");
        }
        std::thread::sleep(Duration::from_millis(10));
    }

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        generated = world.generated_count(),
        loaded = world.loaded_count(),
        "demo finished"
    );
    Ok(())
}
