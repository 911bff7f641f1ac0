//! Deterministic world generation: noise-driven block fields evaluated per
//! chunk or per single world position, with exact agreement between the two.

pub mod density_field;
pub mod fbm;
pub mod generator;
pub mod height_field;
pub mod overworld;

pub use density_field::DensityFieldWorld;
pub use fbm::{FbmParams, FbmSampler};
pub use generator::{WorldGenError, WorldGenerator, WorldKind};
pub use height_field::HeightFieldWorld;
pub use overworld::OverworldWorld;
