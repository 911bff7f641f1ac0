//! Chunk-space coordinates and conversions between world, chunk, and local space.
//!
//! A world-space block position decomposes as
//! `world = chunk_coord * chunk_dims + local`, with `local` in `[0, dim)` per
//! axis. Floor division keeps the decomposition correct for negative
//! world coordinates.

use glam::{IVec3, UVec3};

/// Identifies a chunk's position in chunk space (not block space).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Chunk-grid X coordinate.
    pub x: i32,
    /// Chunk-grid Y coordinate.
    pub y: i32,
    /// Chunk-grid Z coordinate.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a new chunk coordinate.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the chunk containing the given world-space block position.
    pub fn from_world_pos(world: IVec3, dims: UVec3) -> Self {
        Self {
            x: world.x.div_euclid(dims.x as i32),
            y: world.y.div_euclid(dims.y as i32),
            z: world.z.div_euclid(dims.z as i32),
        }
    }

    /// Returns the local offset of a world-space position within its chunk.
    ///
    /// Each component is in `[0, dim)`.
    pub fn local_of(world: IVec3, dims: UVec3) -> UVec3 {
        UVec3::new(
            world.x.rem_euclid(dims.x as i32) as u32,
            world.y.rem_euclid(dims.y as i32) as u32,
            world.z.rem_euclid(dims.z as i32) as u32,
        )
    }

    /// World-space position of this chunk's minimum corner.
    pub fn world_base(self, dims: UVec3) -> IVec3 {
        IVec3::new(
            self.x * dims.x as i32,
            self.y * dims.y as i32,
            self.z * dims.z as i32,
        )
    }

    /// Returns this coordinate offset by `(dx, dy, dz)` chunks.
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// Squared Euclidean distance to another chunk coordinate, in chunks.
    pub fn distance_sq(self, other: Self) -> u64 {
        let dx = (self.x - other.x) as i64;
        let dy = (self.y - other.y) as i64;
        let dz = (self.z - other.z) as i64;
        (dx * dx + dy * dy + dz * dz) as u64
    }
}
