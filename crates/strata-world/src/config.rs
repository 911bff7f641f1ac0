//! World configuration with RON persistence.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use strata_voxel::StorageMode;

/// Errors loading or parsing a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file from disk.
    #[error("failed to read config: {0}")]
    Read(#[source] std::io::Error),

    /// Failed to parse RON content.
    #[error("failed to parse config: {0}")]
    Parse(#[source] ron::error::SpannedError),
}

/// Everything needed to construct a [`World`](crate::World) and drive its
/// streaming policy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WorldConfig {
    /// World seed; every generator variant is deterministic in it.
    pub seed: u32,
    /// Generator selector: `height-field`, `density-field`, or `overworld`.
    pub world_kind: String,
    /// Blocks per chunk along x, y, z.
    pub chunk_dims: [u32; 3],
    /// Dense block array or palette-compressed storage.
    pub storage_mode: StorageMode,
    /// Optional palette file (one `RRGGBB` hex line per entry). A missing
    /// file falls back to the built-in palette; `None` skips loading.
    pub palette_path: Option<PathBuf>,
    /// Generation worker threads. Zero selects a CPU-based default.
    pub generation_workers: usize,
    /// Meshing worker threads. Zero selects a CPU-based default.
    pub meshing_workers: usize,
    /// Apply per-face directional brightness to mesh colors.
    pub directional_shading: bool,
    /// Streaming radius in chunks around the viewer.
    pub load_radius: i32,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            world_kind: "height-field".to_string(),
            chunk_dims: [16, 16, 16],
            storage_mode: StorageMode::Dense,
            palette_path: None,
            generation_workers: 0,
            meshing_workers: 0,
            directional_shading: true,
            load_radius: 4,
        }
    }
}

impl WorldConfig {
    /// Loads a RON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        ron::from_str(&contents).map_err(ConfigError::Parse)
    }

    /// Chunk dimensions as a vector.
    pub fn dims(&self) -> glam::UVec3 {
        glam::UVec3::from_array(self.chunk_dims)
    }
}
