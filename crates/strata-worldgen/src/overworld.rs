//! Overworld terrain: domain-warped density noise with palette-indexed colors.

use glam::{DVec3, IVec3, UVec3};
use strata_voxel::{Block, BlockColor, BlockType, ChunkBlocks, ChunkCoord, StorageMode};

use crate::fbm::{FbmParams, FbmSampler};

/// How far (in world blocks) the warp offsets displace the density lookup.
const WARP_STRENGTH: f64 = 24.0;

/// Domain-warped 3D density generator.
///
/// Three independent fractal samplers produce a per-axis offset vector that
/// displaces the density lookup position, bending the terrain into folded,
/// organic shapes. Solid blocks carry palette-indexed colors spread over the
/// chunk diagonal.
pub struct OverworldWorld {
    density: FbmSampler,
    warp: [FbmSampler; 3],
    dims: UVec3,
    palette_len: usize,
}

impl OverworldWorld {
    pub fn new(seed: u32, dims: UVec3, palette_len: usize) -> Self {
        let params = FbmParams::default();
        Self {
            density: FbmSampler::new(seed, params),
            warp: [
                FbmSampler::new(seed.wrapping_add(1), params),
                FbmSampler::new(seed.wrapping_add(2), params),
                FbmSampler::new(seed.wrapping_add(3), params),
            ],
            dims,
            palette_len: palette_len.max(1),
        }
    }

    fn warped_density(&self, p: DVec3) -> f64 {
        let offset = DVec3::new(
            self.warp[0].sample3(p.x, p.y, p.z),
            self.warp[1].sample3(p.x, p.y, p.z),
            self.warp[2].sample3(p.x, p.y, p.z),
        ) * WARP_STRENGTH;
        let q = p + offset;
        self.density.sample3(q.x, q.y, q.z)
    }

    /// Palette index ramped over the local-space diagonal of the chunk.
    fn palette_index(&self, local: UVec3) -> u8 {
        let span = (self.dims.x + self.dims.y + self.dims.z).saturating_sub(3).max(1);
        let along = local.x + local.y + local.z;
        ((self.palette_len as u32 - 1) * along / span).min(255) as u8
    }

    fn block_at(&self, world: IVec3) -> Block {
        let p = DVec3::new(world.x as f64, world.y as f64, world.z as f64);
        if self.warped_density(p) <= 0.0 {
            Block {
                block_type: BlockType::Stone,
                color: BlockColor::Palette(
                    self.palette_index(ChunkCoord::local_of(world, self.dims)),
                ),
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
