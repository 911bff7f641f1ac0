//! Chunk-sized block containers: a dense grid and the palette-compressed
//! alternative, behind one bounds-checked accessor surface.

use glam::{IVec3, UVec3};
use serde::{Deserialize, Serialize};

use crate::block::Block;
use crate::storage::VoxelStorage;

/// Which backing store a chunk's blocks use.
///
/// `Dense` stores one [`Block`] per voxel; `Palette` trades re-packing CPU
/// cost for memory via [`VoxelStorage`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StorageMode {
    /// One full block value per voxel.
    #[default]
    Dense,
    /// Palette-compressed indices per voxel.
    Palette,
}

#[derive(Clone, Debug)]
enum Store {
    Dense(Vec<Block>),
    Palette(VoxelStorage),
}

/// A fixed-size 3D block container sized exactly to its dimensions.
///
/// Local coordinates are always in `[0, dim)` per axis; out-of-range access
/// is a precondition violation and panics rather than corrupting state.
/// Layout is x-fastest: `index = x + y * dx + z * dx * dy`.
#[derive(Clone, Debug)]
pub struct ChunkBlocks {
    dims: UVec3,
    store: Store,
}

impl ChunkBlocks {
    /// Creates an all-air container with the given dimensions and backing.
    pub fn new(dims: UVec3, mode: StorageMode) -> Self {
        let volume = (dims.x * dims.y * dims.z) as usize;
        let store = match mode {
            StorageMode::Dense => Store::Dense(vec![Block::AIR; volume]),
            StorageMode::Palette => Store::Palette(VoxelStorage::new(volume, Block::AIR)),
        };
        Self { dims, store }
    }

    /// Chunk dimensions in blocks.
    pub fn dims(&self) -> UVec3 {
        self.dims
    }

    /// Total number of voxels.
    pub fn volume(&self) -> usize {
        (self.dims.x * self.dims.y * self.dims.z) as usize
    }

    /// Returns `true` if the (possibly negative) local position lies inside
    /// the chunk bounds.
    pub fn contains_local(&self, local: IVec3) -> bool {
        local.x >= 0
            && local.y >= 0
            && local.z >= 0
            && (local.x as u32) < self.dims.x
            && (local.y as u32) < self.dims.y
            && (local.z as u32) < self.dims.z
    }

    /// Returns the block at the given local position.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside `[0, dim)`.
    pub fn get(&self, x: u32, y: u32, z: u32) -> Block {
        let index = self.linear(x, y, z);
        match &self.store {
            Store::Dense(blocks) => blocks[index],
            Store::Palette(storage) => storage.get(index),
        }
    }

    /// Sets the block at the given local position.
    ///
    /// # Panics
    ///
    /// Panics if any coordinate is outside `[0, dim)`.
    pub fn set(&mut self, x: u32, y: u32, z: u32, block: Block) {
        let index = self.linear(x, y, z);
        match &mut self.store {
            Store::Dense(blocks) => blocks[index] = block,
            Store::Palette(storage) => storage.set(index, block),
        }
    }

    fn linear(&self, x: u32, y: u32, z: u32) -> usize {
        assert!(
            x < self.dims.x && y < self.dims.y && z < self.dims.z,
            "local position ({x}, {y}, {z}) outside chunk dims {:?}",
            self.dims
        );
        (x + y * self.dims.x + z * self.dims.x * self.dims.y) as usize
    }
}
