//! Height-field terrain: a 2D layered-noise surface with solid ground below.

use glam::{IVec3, UVec3};
use strata_voxel::{Block, BlockType, ChunkBlocks, ChunkCoord, StorageMode};

use crate::fbm::{FbmParams, FbmSampler};
use crate::generator::local_gradient_color;

/// Base surface elevation in world blocks.
const BASE_HEIGHT: f64 = 32.0;
/// Peak-to-base amplitude applied to the noise sample.
const HEIGHT_AMPLITUDE: f64 = 20.0;

/// 2D fractal-noise height-field generator.
///
/// Each `(x, z)` column has a surface height `BASE_HEIGHT +
/// HEIGHT_AMPLITUDE * noise(x, z)`; blocks strictly below the surface are
/// solid stone, everything at or above is air.
pub struct HeightFieldWorld {
    sampler: FbmSampler,
    dims: UVec3,
}

impl HeightFieldWorld {
    pub fn new(seed: u32, dims: UVec3) -> Self {
        Self {
            sampler: FbmSampler::new(seed, FbmParams::default()),
            dims,
        }
    }

    fn surface_height(&self, world_x: i32, world_z: i32) -> f64 {
        BASE_HEIGHT + HEIGHT_AMPLITUDE * self.sampler.sample2(world_x as f64, world_z as f64)
    }

    fn block_at(&self, world: IVec3, solid: bool) -> Block {
        if solid {
            Block {
                block_type: BlockType::Stone,
                color: local_gradient_color(ChunkCoord::local_of(world, self.dims), self.dims),
            }
        } else {
            Block::AIR
        }
    }

    pub fn generate_chunk(&self, coord: ChunkCoord, dims: UVec3, mode: StorageMode) -> ChunkBlocks {
        let mut blocks = ChunkBlocks::new(dims, mode);
        let base = coord.world_base(dims);
        for z in 0..dims.z {
            for x in 0..dims.x {
                // One noise sample serves the whole column.
                let height = self.surface_height(base.x + x as i32, base.z + z as i32);
                for y in 0..dims.y {
                    let world = base + IVec3::new(x as i32, y as i32, z as i32);
                    let block = self.block_at(world, (world.y as f64) < height);
                    if !block.is_air() {
                        blocks.set(x, y, z, block);
                    }
                }
            }
        }
        blocks
    }

    pub fn generate_block(&self, world_pos: IVec3) -> Block {
        let height = self.surface_height(world_pos.x, world_pos.z);
        self.block_at(world_pos, (world_pos.y as f64) < height)
    }
}
