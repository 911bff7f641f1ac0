//! The shared world handle: loaded chunks, in-flight loads, and the
//! background generation and meshing pipelines.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::mapref::one::{Ref, RefMut};
use dashmap::{DashMap, DashSet};
use glam::{IVec3, UVec3};
use tracing::{debug, info};

use strata_mesh::{BlockSource, DEFAULT_LIGHT, FaceShading, build_chunk_mesh};
use strata_voxel::{Block, ChunkCoord, ColorPalette, PaletteError, StorageMode};
use strata_worldgen::{WorldGenError, WorldGenerator};

use crate::chunk::Chunk;
use crate::config::WorldConfig;
use crate::tasks::{TaskCategory, WorkerPool};

/// Errors constructing a world from configuration.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    #[error(transparent)]
    WorldGen(#[from] WorldGenError),
    #[error(transparent)]
    Palette(#[from] PaletteError),
}

struct WorldInner {
    dims: UVec3,
    generator: WorldGenerator,
    palette: Arc<ColorPalette>,
    storage_mode: StorageMode,
    shading: FaceShading,
    /// Chunks with published block data.
    loaded: DashMap<ChunkCoord, Chunk>,
    /// Claims for in-flight generation. A claim clears strictly after the
    /// chunk publishes, so a requested coordinate is always observable in
    /// at least one of the two maps.
    loading: DashSet<ChunkCoord>,
    pool: WorkerPool,
    generated: AtomicU64,
}

/// A cheaply cloneable handle to the voxel world.
///
/// The frame thread drives loading and meshing through this handle;
/// background workers publish results into the shared maps.
#[derive(Clone)]
pub struct World {
    inner: Arc<WorldInner>,
}

impl World {
    /// Builds a world from configuration.
    ///
    /// Fails fast on an unknown world kind or a malformed palette file; a
    /// missing palette file falls back to the built-in palette.
    pub fn new(config: &WorldConfig) -> Result<Self, WorldError> {
        let kind = config.world_kind.parse()?;
        let palette = match &config.palette_path {
            Some(path) => ColorPalette::load(path)?,
            None => ColorPalette::default(),
        };
        let dims = config.dims();
        let generator = WorldGenerator::new(kind, config.seed, dims, palette.len());
        let shading = if config.directional_shading {
            FaceShading::directional(DEFAULT_LIGHT)
        } else {
            FaceShading::None
        };
        let default_threads = WorkerPool::default_threads();
        let pick = |configured: usize| {
            if configured == 0 {
                default_threads
            } else {
                configured
            }
        };
        let pool = WorkerPool::new(pick(config.generation_workers), pick(config.meshing_workers));
        info!(
            seed = config.seed,
            kind = ?kind,
            dims = ?dims,
            palette_entries = palette.len(),
            "world created"
        );
        Ok(Self {
            inner: Arc::new(WorldInner {
                dims,
                generator,
                palette: Arc::new(palette),
                storage_mode: config.storage_mode,
                shading,
                loaded: DashMap::new(),
                loading: DashSet::new(),
                pool,
                generated: AtomicU64::new(0),
            }),
        })
    }

    /// Chunk dimensions in blocks.
    pub fn dims(&self) -> UVec3 {
        self.inner.dims
    }

    /// The shared color palette.
    pub fn palette(&self) -> &Arc<ColorPalette> {
        &self.inner.palette
    }

    /// The background worker pool, for queue statistics.
    pub fn worker_pool(&self) -> &WorkerPool {
        &self.inner.pool
    }

    pub fn chunk_is_loaded(&self, coord: ChunkCoord) -> bool {
        self.inner.loaded.contains_key(&coord)
    }

    pub fn chunk_is_loading(&self, coord: ChunkCoord) -> bool {
        self.inner.loading.contains(&coord)
    }

    /// Total generation passes performed.
    pub fn generated_count(&self) -> u64 {
        self.inner.generated.load(Ordering::Relaxed)
    }

    pub fn loaded_count(&self) -> usize {
        self.inner.loaded.len()
    }

    pub fn loading_count(&self) -> usize {
        self.inner.loading.len()
    }

    /// Coordinates of every loaded chunk.
    pub fn loaded_coords(&self) -> Vec<ChunkCoord> {
        self.inner.loaded.iter().map(|entry| entry.coord()).collect()
    }

    /// Coordinates of every chunk with a load in flight.
    pub fn loading_coords(&self) -> Vec<ChunkCoord> {
        self.inner.loading.iter().map(|entry| *entry).collect()
    }

    /// Requests a background load of the chunk at `coord`.
    ///
    /// The loading claim is an atomic set insert, so concurrent duplicate
    /// requests collapse into one generation pass. Requesting an
    /// already-loaded coordinate regenerates it; the fresh chunk replaces
    /// the published one on completion, discarding any edits.
    pub fn load_chunk(&self, coord: ChunkCoord) {
        if !self.inner.loading.insert(coord) {
            return;
        }
        let weak = Arc::downgrade(&self.inner);
        self.inner.pool.submit(TaskCategory::Generation, move || {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            let blocks = inner
                .generator
                .generate_chunk(coord, inner.dims, inner.storage_mode);
            inner.generated.fetch_add(1, Ordering::Relaxed);
            // Publish before clearing the claim; a replaced chunk's mesh
            // is released by drop.
            inner.loaded.insert(coord, Chunk::new(coord, blocks));
            inner.loading.remove(&coord);
            debug!(?coord, "chunk generated");
        });
    }

    /// Removes and drops a loaded chunk, releasing its mesh. Returns
    /// whether the chunk was present.
    pub fn unload_chunk(&self, coord: ChunkCoord) -> bool {
        let removed = self.inner.loaded.remove(&coord).is_some();
        if removed {
            debug!(?coord, "chunk unloaded");
        }
        removed
    }

    /// Shared read access to a loaded chunk. The guard borrows from the
    /// map; hold it briefly.
    pub fn get_chunk(&self, coord: ChunkCoord) -> Option<Ref<'_, ChunkCoord, Chunk>> {
        self.inner.loaded.get(&coord)
    }

    /// Exclusive access to a loaded chunk.
    pub fn get_chunk_mut(&self, coord: ChunkCoord) -> Option<RefMut<'_, ChunkCoord, Chunk>> {
        self.inner.loaded.get_mut(&coord)
    }

    /// The block at a world position.
    ///
    /// Reads the loaded chunk when present and otherwise evaluates the
    /// generator at the single point; it never waits for a chunk load.
    pub fn get_block(&self, world_pos: IVec3) -> Block {
        let coord = ChunkCoord::from_world_pos(world_pos, self.inner.dims);
        if let Some(chunk) = self.inner.loaded.get(&coord) {
            let local = ChunkCoord::local_of(world_pos, self.inner.dims);
            chunk.blocks().get(local.x, local.y, local.z)
        } else {
            self.inner.generator.generate_block(world_pos)
        }
    }

    /// Writes one block if its chunk is loaded, marking the chunk dirty.
    /// Returns whether a chunk was edited.
    pub fn set_block(&self, world_pos: IVec3, block: Block) -> bool {
        let coord = ChunkCoord::from_world_pos(world_pos, self.inner.dims);
        match self.inner.loaded.get_mut(&coord) {
            Some(mut chunk) => {
                chunk.set_block(ChunkCoord::local_of(world_pos, self.inner.dims), block);
                true
            }
            None => false,
        }
    }

    /// Drives the mesh pipeline one step: applies finished builds and
    /// schedules a build for every dirty chunk with none in flight.
    /// Called once per frame.
    pub fn prepare_meshes(&self) {
        for mut entry in self.inner.loaded.iter_mut() {
            entry.poll_mesh();
            let coord = entry.coord();
            if let Some((snapshot, result_tx)) = entry.begin_build() {
                let weak = Arc::downgrade(&self.inner);
                self.inner.pool.submit(TaskCategory::Meshing, move || {
                    let Some(inner) = weak.upgrade() else {
                        return;
                    };
                    let world = World { inner };
                    let result = build_chunk_mesh(
                        &snapshot,
                        coord,
                        &world,
                        &world.inner.palette,
                        &world.inner.shading,
                    );
                    let _ = result_tx.send(result);
                });
            }
        }
    }

    pub(crate) fn chunks(&self) -> &DashMap<ChunkCoord, Chunk> {
        &self.inner.loaded
    }
}

impl BlockSource for World {
    fn block_at(&self, world_pos: IVec3) -> Block {
        self.get_block(world_pos)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
