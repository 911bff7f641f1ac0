//! Face-culled chunk mesh extraction: cube face geometry, directional
//! shading, and the builder that turns a block grid into vertex buffers.

pub mod buffers;
pub mod builder;
pub mod face;

pub use buffers::{MeshBuffers, MeshError};
pub use builder::{BlockSource, build_chunk_mesh};
pub use face::{CUBE_CORNERS, DEFAULT_LIGHT, FACE_TRIANGLES, FaceDirection, FaceShading};
