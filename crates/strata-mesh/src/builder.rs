//! Face-culling mesh extraction over a chunk's block grid.

use glam::IVec3;

use strata_voxel::{Block, ChunkBlocks, ChunkCoord, ColorPalette};

use crate::buffers::{MeshBuffers, MeshError};
use crate::face::{CUBE_CORNERS, FACE_TRIANGLES, FaceDirection, FaceShading};

/// Resolves blocks at arbitrary world positions, used for neighbors that
/// fall outside the chunk being meshed.
///
/// Implementations must never report a missing neighbor as solid; doing so
/// would punch permanent holes into chunk boundaries.
pub trait BlockSource {
    /// The block at a world-space position.
    fn block_at(&self, world_pos: IVec3) -> Block;
}

/// Builds the mesh for one chunk.
///
/// Every solid block tests its six face-adjacent neighbors and emits a face
/// only where the neighbor is air. In-chunk neighbors read `blocks`
/// directly; out-of-chunk neighbors go through `source` at world
/// coordinates. With [`FaceShading::None`] a block's corner vertices are
/// shared between its faces; with directional shading each face emits its
/// own four vertices so the per-face brightness stays exact.
///
/// A fully enclosed or fully empty chunk produces empty buffers. A chunk
/// needing more than [`MeshBuffers::MAX_VERTICES`] unique vertices fails
/// with [`MeshError::VertexOverflow`].
pub fn build_chunk_mesh(
    blocks: &ChunkBlocks,
    coord: ChunkCoord,
    source: &dyn BlockSource,
    palette: &ColorPalette,
    shading: &FaceShading,
) -> Result<MeshBuffers, MeshError> {
    let dims = blocks.dims();
    let base = coord.world_base(dims);
    let mut buffers = MeshBuffers::new();

    for z in 0..dims.z {
        for y in 0..dims.y {
            for x in 0..dims.x {
                let block = blocks.get(x, y, z);
                if block.is_air() {
                    continue;
                }
                let local = IVec3::new(x as i32, y as i32, z as i32);

                let mut exposed = [false; 6];
                let mut any_exposed = false;
                for direction in FaceDirection::ALL {
                    let neighbor_local = local + direction.offset();
                    let neighbor = if blocks.contains_local(neighbor_local) {
                        blocks.get(
                            neighbor_local.x as u32,
                            neighbor_local.y as u32,
                            neighbor_local.z as u32,
                        )
                    } else {
                        source.block_at(base + neighbor_local)
                    };
                    if neighbor.is_air() {
                        exposed[direction as usize] = true;
                        any_exposed = true;
                    }
                }
                if !any_exposed {
                    continue;
                }

                let color = block.color.resolve(palette);
                match shading {
                    FaceShading::None => {
                        emit_shared_corners(&mut buffers, local, &exposed, color)?;
                    }
                    FaceShading::Directional(_) => {
                        emit_per_face(&mut buffers, local, &exposed, color, shading)?;
                    }
                }
            }
        }
    }
    Ok(buffers)
}

/// Emits the exposed faces of one block with corner vertices shared across
/// the block's faces. An isolated cube lands at 8 vertices, 36 indices.
fn emit_shared_corners(
    buffers: &mut MeshBuffers,
    local: IVec3,
    exposed: &[bool; 6],
    color: [u8; 4],
) -> Result<(), MeshError> {
    const UNMAPPED: usize = usize::MAX;
    let start = buffers.vertex_count();
    let mut corner_map = [UNMAPPED; 8];
    let mut added = 0usize;

    for direction in FaceDirection::ALL {
        if !exposed[direction as usize] {
            continue;
        }
        for &corner in &FACE_TRIANGLES[direction as usize] {
            if corner_map[corner] == UNMAPPED {
                if start + added >= MeshBuffers::MAX_VERTICES {
                    return Err(MeshError::VertexOverflow {
                        required: start + added + 1,
                        limit: MeshBuffers::MAX_VERTICES,
                    });
                }
                corner_map[corner] = added;
                added += 1;
                buffers.push_vertex(corner_position(local, corner), color);
            }
            buffers.indices.push((start + corner_map[corner]) as u16);
        }
    }
    Ok(())
}

/// Emits the exposed faces of one block with four dedicated vertices per
/// face, each carrying that face's brightness. An isolated cube lands at
/// 24 vertices, 36 indices.
fn emit_per_face(
    buffers: &mut MeshBuffers,
    local: IVec3,
    exposed: &[bool; 6],
    color: [u8; 4],
    shading: &FaceShading,
) -> Result<(), MeshError> {
    const UNMAPPED: usize = usize::MAX;
    for direction in FaceDirection::ALL {
        if !exposed[direction as usize] {
            continue;
        }
        let shaded = scale_rgb(color, shading.multiplier(direction));
        let start = buffers.vertex_count();
        let mut corner_map = [UNMAPPED; 8];
        let mut added = 0usize;
        for &corner in &FACE_TRIANGLES[direction as usize] {
            if corner_map[corner] == UNMAPPED {
                if start + added >= MeshBuffers::MAX_VERTICES {
                    return Err(MeshError::VertexOverflow {
                        required: start + added + 1,
                        limit: MeshBuffers::MAX_VERTICES,
                    });
                }
                corner_map[corner] = added;
                added += 1;
                buffers.push_vertex(corner_position(local, corner), shaded);
            }
            buffers.indices.push((start + corner_map[corner]) as u16);
        }
    }
    Ok(())
}

fn corner_position(local: IVec3, corner: usize) -> [f32; 3] {
    let c = CUBE_CORNERS[corner];
    [
        local.x as f32 + c[0],
        local.y as f32 + c[1],
        local.z as f32 + c[2],
    ]
}

/// Scales RGB by the face multiplier, leaving alpha untouched.
fn scale_rgb(color: [u8; 4], multiplier: f32) -> [u8; 4] {
    let scale = |c: u8| (c as f32 * multiplier).round() as u8;
    [scale(color[0]), scale(color[1]), scale(color[2]), color[3]]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use glam::UVec3;
    use strata_voxel::{BlockColor, BlockType, StorageMode};

    use crate::face::DEFAULT_LIGHT;

    struct AllAir;

    impl BlockSource for AllAir {
        fn block_at(&self, _world_pos: IVec3) -> Block {
            Block::AIR
        }
    }

    struct AllSolid;

    impl BlockSource for AllSolid {
        fn block_at(&self, _world_pos: IVec3) -> Block {
            stone([1, 2, 3, 255])
        }
    }

    fn stone(rgba: [u8; 4]) -> Block {
        Block::new(BlockType::Stone, BlockColor::Rgba(rgba))
    }

    fn chunk(dims: u32) -> ChunkBlocks {
        ChunkBlocks::new(UVec3::splat(dims), StorageMode::Dense)
    }

    #[test]
    fn test_empty_chunk_produces_empty_mesh() {
        let blocks = chunk(4);
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllAir,
            &ColorPalette::default(),
            &FaceShading::None,
        )
        .expect("meshing succeeds");
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_enclosed_chunk_produces_empty_mesh() {
        // Every block is solid and so is the entire surrounding world, so
        // no face has an air neighbor.
        let mut blocks = chunk(4);
        for z in 0..4 {
            for y in 0..4 {
                for x in 0..4 {
                    blocks.set(x, y, z, stone([10, 20, 30, 255]));
                }
            }
        }
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllSolid,
            &ColorPalette::default(),
            &FaceShading::None,
        )
        .expect("meshing succeeds");
        assert!(mesh.is_empty());
    }

    #[test]
    fn test_isolated_block_shares_corner_vertices() {
        let mut blocks = chunk(4);
        blocks.set(1, 1, 1, stone([200, 100, 50, 255]));
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllAir,
            &ColorPalette::default(),
            &FaceShading::None,
        )
        .expect("meshing succeeds");
        assert_eq!(mesh.vertex_count(), 8, "corner sharing across faces");
        assert_eq!(mesh.indices.len(), 36, "6 faces, 2 triangles each");
        assert_eq!(&mesh.colors[0..4], &[200, 100, 50, 255]);
    }

    #[test]
    fn test_isolated_block_with_directional_shading() {
        let mut blocks = chunk(4);
        blocks.set(1, 1, 1, stone([200, 200, 200, 255]));
        let shading = FaceShading::directional(DEFAULT_LIGHT);
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllAir,
            &ColorPalette::default(),
            &shading,
        )
        .expect("meshing succeeds");
        assert_eq!(mesh.vertex_count(), 24, "4 dedicated vertices per face");
        assert_eq!(mesh.indices.len(), 36);
        // The first face emitted is +Y; its vertices carry the top multiplier.
        let top = shading.multiplier(FaceDirection::PosY);
        let expected = (200.0 * top).round() as u8;
        assert_eq!(mesh.colors[0], expected);
        assert_eq!(mesh.colors[3], 255, "alpha is never scaled");
    }

    #[test]
    fn test_shared_face_between_neighbors_is_culled() {
        let mut blocks = chunk(4);
        blocks.set(1, 1, 1, stone([255, 255, 255, 255]));
        blocks.set(2, 1, 1, stone([255, 255, 255, 255]));
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllAir,
            &ColorPalette::default(),
            &FaceShading::None,
        )
        .expect("meshing succeeds");
        // 10 of the 12 faces survive; each block still touches all 8 of
        // its corners through its remaining faces.
        assert_eq!(mesh.indices.len(), 60);
        assert_eq!(mesh.vertex_count(), 16);
    }

    #[test]
    fn test_out_of_chunk_neighbors_cull_boundary_faces() {
        // A block in the chunk's minimum corner: the three faces pointing
        // out of the chunk see solid world blocks and are culled.
        let mut blocks = chunk(4);
        blocks.set(0, 0, 0, stone([255, 255, 255, 255]));
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(-1, 2, 0),
            &AllSolid,
            &ColorPalette::default(),
            &FaceShading::None,
        )
        .expect("meshing succeeds");
        assert_eq!(mesh.indices.len(), 18, "only +Y, +Z, +X remain");
        assert_eq!(mesh.vertex_count(), 7);
    }

    #[test]
    fn test_palette_colors_resolve_through_palette() {
        let palette = ColorPalette::from_colors(vec![[9, 9, 9, 255], [40, 80, 120, 255]]);
        let mut blocks = chunk(4);
        blocks.set(1, 1, 1, Block::new(BlockType::Stone, BlockColor::Palette(1)));
        let mesh = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllAir,
            &palette,
            &FaceShading::None,
        )
        .expect("meshing succeeds");
        assert_eq!(&mesh.colors[0..4], &[40, 80, 120, 255]);
    }

    #[test]
    fn test_vertex_overflow_is_reported() {
        // A 32^3 checkerboard of isolated cubes needs 16384 * 8 vertices,
        // twice what a 16-bit index buffer can address.
        let mut blocks = chunk(32);
        for z in 0..32 {
            for y in 0..32 {
                for x in 0..32 {
                    if (x + y + z) % 2 == 0 {
                        blocks.set(x, y, z, stone([255, 255, 255, 255]));
                    }
                }
            }
        }
        let err = build_chunk_mesh(
            &blocks,
            ChunkCoord::new(0, 0, 0),
            &AllAir,
            &ColorPalette::default(),
            &FaceShading::None,
        )
        .expect_err("must overflow");
        let MeshError::VertexOverflow { required, limit } = err;
        assert_eq!(limit, MeshBuffers::MAX_VERTICES);
        assert!(required > limit);
    }
}
