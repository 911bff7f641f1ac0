//! The concurrency boundary of the voxel world: chunk lifecycle, background
//! generation and meshing, streaming policy, and frustum culling.

pub mod chunk;
pub mod chunk_manager;
pub mod config;
pub mod frustum;
pub mod tasks;
pub mod world;

pub use chunk::Chunk;
pub use chunk_manager::{ChunkDraw, ChunkManager};
pub use config::{ConfigError, WorldConfig};
pub use frustum::{Aabb, Frustum};
pub use tasks::{TaskCategory, WorkerPool};
pub use world::{World, WorldError};
