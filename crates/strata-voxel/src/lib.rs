//! Voxel data model: blocks, chunk coordinates, palette-compressed storage,
//! and the color palette configuration consumed by mesh color decoding.

pub mod bit_packed;
pub mod block;
pub mod coords;
pub mod grid;
pub mod palette;
pub mod storage;

pub use bit_packed::BitPackedArray;
pub use block::{Block, BlockColor, BlockType};
pub use coords::ChunkCoord;
pub use grid::{ChunkBlocks, StorageMode};
pub use palette::{ColorPalette, PaletteError};
pub use storage::VoxelStorage;
