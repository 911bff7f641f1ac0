//! Palette-compressed voxel storage.
//!
//! Stores one narrow palette index per voxel instead of a full [`Block`]
//! value. The palette tracks a reference count per entry; freed entries are
//! reused before the palette grows. Growth adds one index bit (doubling the
//! palette capacity) and re-packs every existing index into the new width
//! bit-exactly before the old array is dropped.

use crate::bit_packed::BitPackedArray;
use crate::block::Block;

#[derive(Clone, Copy, Debug)]
struct PaletteEntry {
    /// Number of voxels currently referencing this entry. Zero means free.
    ref_count: u32,
    block: Block,
}

impl PaletteEntry {
    const FREE: Self = Self {
        ref_count: 0,
        block: Block::AIR,
    };
}

/// Compact backing store for a chunk's blocks.
///
/// Invariant: every voxel's packed index references a palette slot with
/// `ref_count >= 1`, and the palette always holds exactly `2^index_bits`
/// slots.
#[derive(Clone, Debug)]
pub struct VoxelStorage {
    palette: Vec<PaletteEntry>,
    indices: BitPackedArray,
    index_bits: u8,
    len: usize,
}

impl VoxelStorage {
    /// Creates storage for `len` voxels, all set to `fill`.
    pub fn new(len: usize, fill: Block) -> Self {
        let index_bits = 1;
        let mut palette = vec![PaletteEntry::FREE; 1 << index_bits];
        palette[0] = PaletteEntry {
            ref_count: len as u32,
            block: fill,
        };
        Self {
            palette,
            indices: BitPackedArray::new(index_bits, len),
            index_bits,
            len,
        }
    }

    /// Returns the block at the given voxel index.
    pub fn get(&self, index: usize) -> Block {
        self.palette[self.indices.get(index) as usize].block
    }

    /// Sets the block at the given voxel index.
    pub fn set(&mut self, index: usize, block: Block) {
        let current = self.indices.get(index) as usize;
        if self.palette[current].block == block {
            return;
        }
        self.palette[current].ref_count -= 1;

        // Reuse an existing entry holding an equal block.
        if let Some(existing) = self
            .palette
            .iter()
            .position(|e| e.ref_count > 0 && e.block == block)
        {
            self.palette[existing].ref_count += 1;
            self.indices.set(index, existing as u16);
            return;
        }

        // The displaced entry may now be free; claim it in place and the
        // packed index stays valid as-is.
        if self.palette[current].ref_count == 0 {
            self.palette[current] = PaletteEntry {
                ref_count: 1,
                block,
            };
            return;
        }

        let slot = self.free_slot();
        self.palette[slot] = PaletteEntry {
            ref_count: 1,
            block,
        };
        self.indices.set(index, slot as u16);
    }

    /// Number of voxels.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the store holds no voxels.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Current bits per packed index.
    pub fn index_bits(&self) -> u8 {
        self.index_bits
    }

    /// Number of palette slots currently referenced by at least one voxel.
    pub fn palette_len(&self) -> usize {
        self.palette.iter().filter(|e| e.ref_count > 0).count()
    }

    /// Total palette capacity (`2^index_bits`).
    pub fn palette_capacity(&self) -> usize {
        self.palette.len()
    }

    /// Bytes used by the packed index array.
    pub fn storage_bytes(&self) -> usize {
        self.indices.storage_bytes()
    }

    /// Reclaims free palette slots and narrows the index width.
    pub fn shrink(&mut self) {
        // TODO: rebuild the palette without free slots and re-pack indices at
        // ceil(log2(palette_len)) width; nothing calls for the memory yet.
    }

    /// Finds a free palette slot, growing the palette if none exists.
    fn free_slot(&mut self) -> usize {
        match self.palette.iter().position(|e| e.ref_count == 0) {
            Some(slot) => slot,
            None => self.grow(),
        }
    }

    /// Adds one index bit, re-packing all existing indices into the new
    /// width. Returns the first newly-freed slot.
    fn grow(&mut self) -> usize {
        let first_new = self.palette.len();
        self.index_bits += 1;
        let mut wider = BitPackedArray::new(self.index_bits, self.len);
        for i in 0..self.len {
            wider.set(i, self.indices.get(i));
        }
        self.indices = wider;
        self.palette.resize(1 << self.index_bits, PaletteEntry::FREE);
        first_new
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
