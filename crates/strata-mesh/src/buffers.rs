//! Mesh output buffers in GPU-upload layout.

/// Meshing errors.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The chunk produced more unique vertices than a 16-bit index buffer
    /// can address.
    #[error("chunk mesh requires {required} vertices, exceeding the 16-bit index limit of {limit}")]
    VertexOverflow {
        /// Unique vertices the mesh would have needed.
        required: usize,
        /// Maximum addressable vertices.
        limit: usize,
    },
}

/// The output of a chunk meshing pass: flat vertex positions, 16-bit
/// triangle indices, and per-vertex RGBA colors.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshBuffers {
    /// Vertex positions in chunk-local space, three floats per vertex.
    pub positions: Vec<f32>,
    /// Triangle indices, three per triangle.
    pub indices: Vec<u16>,
    /// Vertex colors, four bytes (RGBA) per vertex.
    pub colors: Vec<u8>,
}

impl MeshBuffers {
    /// Maximum unique vertices addressable by the index buffer.
    pub const MAX_VERTICES: usize = 1 << 16;

    /// Creates empty buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of unique vertices.
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// True when the mesh contains no geometry.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Appends one vertex. The caller keeps vertex count below
    /// [`MAX_VERTICES`](Self::MAX_VERTICES).
    pub(crate) fn push_vertex(&mut self, position: [f32; 3], color: [u8; 4]) {
        debug_assert!(self.vertex_count() < Self::MAX_VERTICES);
        self.positions.extend_from_slice(&position);
        self.colors.extend_from_slice(&color);
    }
}
