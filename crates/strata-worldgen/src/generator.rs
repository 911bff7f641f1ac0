//! The closed set of world generator variants and their shared contract.
//!
//! Every variant is a pure function of `(seed, world_block_position)`:
//! [`WorldGenerator::generate_chunk`] bakes the field into a block store and
//! [`WorldGenerator::generate_block`] evaluates the same field at a single
//! point, with exact agreement between the two. Neighboring chunk contents
//! never influence generation; cross-chunk relationships are resolved at
//! mesh time instead.

use std::str::FromStr;

use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};
use strata_voxel::{Block, BlockColor, ChunkBlocks, ChunkCoord, StorageMode};

use crate::density_field::DensityFieldWorld;
use crate::height_field::HeightFieldWorld;
use crate::overworld::OverworldWorld;

/// World generation errors.
#[derive(Debug, thiserror::Error)]
pub enum WorldGenError {
    /// The configured world type selector matched no known variant.
    #[error("unknown world kind {0:?} (expected height-field, density-field, or overworld)")]
    UnknownWorldKind(String),
}

/// Selector for the generator variant. Parsed from configuration; an
/// unknown selector is a fatal construction error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorldKind {
    /// 2D noise height-field terrain.
    HeightField,
    /// 3D noise density-field terrain.
    DensityField,
    /// Domain-warped density terrain with palette-indexed colors.
    Overworld,
}

impl FromStr for WorldKind {
    type Err = WorldGenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "height-field" => Ok(Self::HeightField),
            "density-field" => Ok(Self::DensityField),
            "overworld" => Ok(Self::Overworld),
            other => Err(WorldGenError::UnknownWorldKind(other.to_string())),
        }
    }
}

/// A world generator variant.
pub enum WorldGenerator {
    /// One noise sample per (x, z) column; solid below the height surface.
    HeightField(HeightFieldWorld),
    /// One noise sample per block; solid where the sample is non-positive.
    DensityField(DensityFieldWorld),
    /// Density rule sampled through a domain-warp network.
    Overworld(OverworldWorld),
}

impl WorldGenerator {
    /// Creates the generator for `kind`.
    ///
    /// `dims` fixes the chunk dimensions the generator derives local block
    /// colors from; `palette_len` is consulted by the overworld variant's
    /// palette-index coloring.
    pub fn new(kind: WorldKind, seed: u32, dims: UVec3, palette_len: usize) -> Self {
        match kind {
            WorldKind::HeightField => Self::HeightField(HeightFieldWorld::new(seed, dims)),
            WorldKind::DensityField => Self::DensityField(DensityFieldWorld::new(seed, dims)),
            WorldKind::Overworld => Self::Overworld(OverworldWorld::new(seed, dims, palette_len)),
        }
    }

    /// Fills every block of the chunk at `coord` from the noise field.
    pub fn generate_chunk(&self, coord: ChunkCoord, dims: UVec3, mode: StorageMode) -> ChunkBlocks {
        match self {
            Self::HeightField(g) => g.generate_chunk(coord, dims, mode),
            Self::DensityField(g) => g.generate_chunk(coord, dims, mode),
            Self::Overworld(g) => g.generate_chunk(coord, dims, mode),
        }
    }

    /// Evaluates the field at a single world-space block position.
    ///
    /// Agrees exactly with the value [`generate_chunk`](Self::generate_chunk)
    /// bakes for the chunk containing `world_pos`.
    pub fn generate_block(&self, world_pos: IVec3) -> Block {
        match self {
            Self::HeightField(g) => g.generate_block(world_pos),
            Self::DensityField(g) => g.generate_block(world_pos),
            Self::Overworld(g) => g.generate_block(world_pos),
        }
    }
}

/// RGB gradient over the local block position, the reference coloring for
/// the non-palette variants. Alpha is always opaque.
pub(crate) fn local_gradient_color(local: UVec3, dims: UVec3) -> BlockColor {
    let channel = |v: u32, d: u32| ((v * 256 / d).min(255)) as u8;
    BlockColor::Rgba([
        channel(local.x, dims.x),
        channel(local.y, dims.y),
        channel(local.z, dims.z),
        255,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_kind_parses_known_selectors() {
        assert_eq!(
            "height-field".parse::<WorldKind>().expect("parses"),
            WorldKind::HeightField
        );
        assert_eq!(
            "density-field".parse::<WorldKind>().expect("parses"),
            WorldKind::DensityField
        );
        assert_eq!(
            "overworld".parse::<WorldKind>().expect("parses"),
            WorldKind::Overworld
        );
    }

    #[test]
    fn test_unknown_selector_is_fatal() {
        let err = "flatgrass".parse::<WorldKind>().expect_err("must fail");
        assert!(err.to_string().contains("flatgrass"));
    }

    #[test]
    fn test_local_gradient_color_spans_chunk() {
        let dims = UVec3::splat(16);
        assert_eq!(
            local_gradient_color(UVec3::new(0, 0, 0), dims),
            BlockColor::Rgba([0, 0, 0, 255])
        );
        assert_eq!(
            local_gradient_color(UVec3::new(15, 8, 1), dims),
            BlockColor::Rgba([240, 128, 16, 255])
        );
    }

    /// Exhaustive chunk-vs-single-point agreement for every variant,
    /// including a chunk at negative coordinates.
    #[test]
    fn test_generate_block_agrees_with_generate_chunk() {
        let dims = UVec3::splat(8);
        let coords = [ChunkCoord::new(0, 0, 0), ChunkCoord::new(-2, 1, -3)];
        let generators = [
            WorldGenerator::new(WorldKind::HeightField, 42, dims, 8),
            WorldGenerator::new(WorldKind::DensityField, 42, dims, 8),
            WorldGenerator::new(WorldKind::Overworld, 42, dims, 8),
        ];
        for generator in &generators {
            for &coord in &coords {
                let chunk = generator.generate_chunk(coord, dims, StorageMode::Dense);
                let base = coord.world_base(dims);
                for z in 0..dims.z {
                    for y in 0..dims.y {
                        for x in 0..dims.x {
                            let world = base + IVec3::new(x as i32, y as i32, z as i32);
                            assert_eq!(
                                generator.generate_block(world),
                                chunk.get(x, y, z),
                                "divergence at {world:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_generation_is_seed_deterministic() {
        let dims = UVec3::splat(8);
        let a = WorldGenerator::new(WorldKind::HeightField, 7, dims, 8);
        let b = WorldGenerator::new(WorldKind::HeightField, 7, dims, 8);
        let coord = ChunkCoord::new(3, 0, -1);
        let chunk_a = a.generate_chunk(coord, dims, StorageMode::Dense);
        let chunk_b = b.generate_chunk(coord, dims, StorageMode::Palette);
        for z in 0..dims.z {
            for y in 0..dims.y {
                for x in 0..dims.x {
                    assert_eq!(chunk_a.get(x, y, z), chunk_b.get(x, y, z));
                }
            }
        }
    }
}
