//! Density-field terrain: 3D noise with a sign-threshold solidity rule.

use glam::{IVec3, UVec3};
use strata_voxel::{Block, BlockType, ChunkBlocks, ChunkCoord, StorageMode};

use crate::fbm::{FbmParams, FbmSampler};
use crate::generator::local_gradient_color;

/// 3D noise generator producing caves, overhangs, and floating islands.
///
/// A block is solid where the density sample at its world position is
/// non-positive.
pub struct DensityFieldWorld {
    sampler: FbmSampler,
    dims: UVec3,
}

impl DensityFieldWorld {
    pub fn new(seed: u32, dims: UVec3) -> Self {
        Self {
            sampler: FbmSampler::new(
                seed,
                FbmParams {
                    octaves: 1,
                    ..FbmParams::default()
                },
            ),
            dims,
        }
    }

    fn block_at(&self, world: IVec3) -> Block {
        let density = self
            .sampler
            .sample3(world.x as f64, world.y as f64, world.z as f64);
        if density <= 0.0 {
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
            for y in 0..dims.y {
                for x in 0..dims.x {
                    let world = base + IVec3::new(x as i32, y as i32, z as i32);
                    let block = self.block_at(world);
                    if !block.is_air() {
                        blocks.set(x, y, z, block);
                    }
                }
            }
        }
        blocks
    }

    pub fn generate_block(&self, world_pos: IVec3) -> Block {
        self.block_at(world_pos)
    }
}
