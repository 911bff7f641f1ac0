//! Cube face geometry tables and per-face directional shading.

use glam::{IVec3, Vec3};

/// One of the six cardinal directions a block face can point.
///
/// The `repr(u8)` discriminant indexes [`FACE_TRIANGLES`] and the shading
/// multiplier table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FaceDirection {
    /// +Y direction (top).
    PosY = 0,
    /// −Y direction (bottom).
    NegY = 1,
    /// +Z direction.
    PosZ = 2,
    /// −Z direction.
    NegZ = 3,
    /// +X direction.
    PosX = 4,
    /// −X direction.
    NegX = 5,
}

impl FaceDirection {
    /// All six directions, in discriminant order.
    pub const ALL: [FaceDirection; 6] = [
        Self::PosY,
        Self::NegY,
        Self::PosZ,
        Self::NegZ,
        Self::PosX,
        Self::NegX,
    ];

    /// Returns the unit normal for this face direction.
    pub fn normal(self) -> Vec3 {
        match self {
            Self::PosY => Vec3::new(0.0, 1.0, 0.0),
            Self::NegY => Vec3::new(0.0, -1.0, 0.0),
            Self::PosZ => Vec3::new(0.0, 0.0, 1.0),
            Self::NegZ => Vec3::new(0.0, 0.0, -1.0),
            Self::PosX => Vec3::new(1.0, 0.0, 0.0),
            Self::NegX => Vec3::new(-1.0, 0.0, 0.0),
        }
    }

    /// Returns the face-adjacent neighbor offset for this direction.
    pub fn offset(self) -> IVec3 {
        match self {
            Self::PosY => IVec3::new(0, 1, 0),
            Self::NegY => IVec3::new(0, -1, 0),
            Self::PosZ => IVec3::new(0, 0, 1),
            Self::NegZ => IVec3::new(0, 0, -1),
            Self::PosX => IVec3::new(1, 0, 0),
            Self::NegX => IVec3::new(-1, 0, 0),
        }
    }
}

/// The eight corners of a unit cube, in the fixed order the triangle table
/// references them.
pub const CUBE_CORNERS: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 1.0, 0.0],
    [1.0, 0.0, 1.0],
    [0.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
];

/// Corner indices for the two triangles of each face, indexed by
/// [`FaceDirection`] discriminant. Winding faces outward.
pub const FACE_TRIANGLES: [[usize; 6]; 6] = [
    [6, 7, 2, 2, 7, 4], // +Y
    [0, 1, 3, 3, 1, 5], // -Y
    [7, 6, 5, 5, 6, 3], // +Z
    [2, 4, 0, 0, 4, 1], // -Z
    [4, 7, 1, 1, 7, 5], // +X
    [6, 2, 3, 3, 2, 0], // -X
];

/// Default directional light for shaded meshes, pointing down and slightly
/// sideways so every face direction gets a distinct brightness.
pub const DEFAULT_LIGHT: Vec3 = Vec3::new(-0.4, -1.0, -0.6);

/// How per-face brightness is applied to vertex colors.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FaceShading {
    /// Flat block colors. Adjacent faces of a block can share corner
    /// vertices because every face carries the same color.
    None,
    /// One brightness multiplier per face direction, precomputed from a
    /// static light. Faces no longer share vertices.
    Directional([f32; 6]),
}

impl FaceShading {
    /// Per-face Lambertian brightness floor.
    const AMBIENT: f32 = 0.35;

    /// Builds the six multipliers for a directional light shining along
    /// `light`. Each multiplier is `AMBIENT + (1 - AMBIENT) * max(0, n . -l)`
    /// and stays within `[AMBIENT, 1]`.
    pub fn directional(light: Vec3) -> Self {
        let towards_light = -light.normalize();
        let mut multipliers = [0.0f32; 6];
        for direction in FaceDirection::ALL {
            let diffuse = direction.normal().dot(towards_light).max(0.0);
            multipliers[direction as usize] = Self::AMBIENT + (1.0 - Self::AMBIENT) * diffuse;
        }
        Self::Directional(multipliers)
    }

    /// The brightness multiplier for `direction`, 1.0 when unshaded.
    pub fn multiplier(&self, direction: FaceDirection) -> f32 {
        match self {
            Self::None => 1.0,
            Self::Directional(multipliers) => multipliers[direction as usize],
        }
    }
}
