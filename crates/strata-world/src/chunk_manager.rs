//! Streaming policy: which chunks load, which unload, and which draw.

use std::sync::Arc;

use glam::{IVec3, Mat4, Vec3};
use rustc_hash::FxHashSet;
use tracing::debug;

use strata_mesh::MeshBuffers;
use strata_voxel::ChunkCoord;

use crate::frustum::{Aabb, Frustum};
use crate::world::World;

/// One chunk ready to draw this frame.
#[derive(Clone)]
pub struct ChunkDraw {
    pub coord: ChunkCoord,
    /// World-space translation of the chunk's minimum corner.
    pub translation: Vec3,
    pub mesh: Arc<MeshBuffers>,
}

/// Keeps the set of loaded chunks matched to a viewer position.
///
/// Owns no block data; it only directs [`World`] loads and unloads. Chunks
/// still generating when they leave the radius cannot be cancelled; they
/// enter the pending set and are unloaded as soon as their load completes.
pub struct ChunkManager {
    world: World,
    /// Last applied `(center, radius)`, for early exit when the viewer
    /// stays within one chunk.
    last_applied: Option<(ChunkCoord, i32)>,
    pending_unload: FxHashSet<ChunkCoord>,
}

impl ChunkManager {
    pub fn new(world: World) -> Self {
        Self {
            world,
            last_applied: None,
            pending_unload: FxHashSet::default(),
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Chunks queued for unload once their in-flight load finishes.
    pub fn pending_unload_count(&self) -> usize {
        self.pending_unload.len()
    }

    /// Aligns the loaded set to the inclusive cube of `radius` chunks
    /// around the viewer.
    ///
    /// Missing chunks inside the cube are requested nearest-first. Loaded
    /// chunks outside it unload immediately unless their loading claim has
    /// not cleared yet; those, and chunks still generating, are deferred to
    /// [`sweep_pending_unloads`](Self::sweep_pending_unloads).
    /// A repeat call with an unchanged center chunk and radius is free.
    pub fn load_around(&mut self, viewer_world_pos: IVec3, radius: i32) {
        let dims = self.world.dims();
        let center = ChunkCoord::from_world_pos(viewer_world_pos, dims);
        if self.last_applied == Some((center, radius)) {
            return;
        }
        self.last_applied = Some((center, radius));

        let in_cube = |coord: ChunkCoord| {
            (coord.x - center.x).abs() <= radius
                && (coord.y - center.y).abs() <= radius
                && (coord.z - center.z).abs() <= radius
        };

        let mut to_load = Vec::new();
        for dz in -radius..=radius {
            for dy in -radius..=radius {
                for dx in -radius..=radius {
                    let coord = center.offset(dx, dy, dz);
                    // A chunk re-entering the radius must not be torn down
                    // when its old load completes.
                    self.pending_unload.remove(&coord);
                    if !self.world.chunk_is_loaded(coord) && !self.world.chunk_is_loading(coord) {
                        to_load.push(coord);
                    }
                }
            }
        }
        to_load.sort_by_key(|coord| coord.distance_sq(center));
        let requested = to_load.len();
        for coord in to_load {
            self.world.load_chunk(coord);
        }

        // Snapshot the loading set before the loaded map: a load publishes
        // before clearing its claim, so every departed coordinate shows up
        // in at least one of the two passes.
        for coord in self.world.loading_coords() {
            if !in_cube(coord) {
                self.pending_unload.insert(coord);
            }
        }
        let mut unloaded = 0usize;
        for coord in self.world.loaded_coords() {
            if in_cube(coord) {
                continue;
            }
            // A coordinate still carrying its loading claim is mid-publish;
            // unloading it now would discard a delivery the claim still
            // vouches for. The sweep takes it once the claim clears.
            if self.world.chunk_is_loading(coord) {
                self.pending_unload.insert(coord);
            } else if self.world.unload_chunk(coord) {
                unloaded += 1;
            }
        }
        debug!(
            ?center,
            radius,
            requested,
            unloaded,
            deferred = self.pending_unload.len(),
            "streaming pass"
        );
    }

    /// Unloads every pending chunk whose load has since completed. Called
    /// once per tick.
    pub fn sweep_pending_unloads(&mut self) {
        self.pending_unload.retain(|&coord| {
            if self.world.chunk_is_loading(coord) {
                return true;
            }
            self.world.unload_chunk(coord);
            false
        });
    }

    /// Drives the mesh pipeline and returns the draw list for this frame:
    /// every loaded chunk whose bounding box intersects the frustum and
    /// that has a mesh.
    pub fn visible_chunks(&self, view_projection: &Mat4) -> Vec<ChunkDraw> {
        let frustum = Frustum::from_view_projection(view_projection);
        self.world.prepare_meshes();

        let dims = self.world.dims().as_vec3();
        let mut draws = Vec::new();
        for entry in self.world.chunks().iter() {
            let coord = entry.coord();
            let min = coord.world_base(self.world.dims()).as_vec3();
            if !frustum.intersects(&Aabb::new(min, min + dims)) {
                continue;
            }
            if let Some(mesh) = entry.mesh() {
                draws.push(ChunkDraw {
                    coord,
                    translation: min,
                    mesh,
                });
            }
        }
        draws
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::config::WorldConfig;

    fn test_world() -> World {
        World::new(&WorldConfig {
            seed: 42,
            world_kind: "height-field".to_string(),
            chunk_dims: [8, 8, 8],
            generation_workers: 4,
            meshing_workers: 2,
            directional_shading: false,
            ..WorldConfig::default()
        })
        .expect("world")
    }

    fn wait_until(deadline_ms: u64, mut done: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_millis(deadline_ms);
        while Instant::now() < deadline {
            if done() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(2));
        }
        done()
    }

    #[test]
    fn test_radius_cube_loads_exactly() {
        let world = test_world();
        let mut manager = ChunkManager::new(world.clone());
        manager.load_around(IVec3::new(0, 0, 0), 2);
        assert!(
            wait_until(5000, || world.loaded_count() == 125 && world.loading_count() == 0),
            "expected the full 5x5x5 cube, got {} loaded / {} loading",
            world.loaded_count(),
            world.loading_count()
        );
        assert_eq!(world.generated_count(), 125);

        // Re-applying the same viewer position performs no further work.
        manager.load_around(IVec3::new(1, 1, 1), 2);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(world.generated_count(), 125);
        assert_eq!(world.loaded_count(), 125);
    }

    #[test]
    fn test_moving_viewer_unloads_departed_chunks() {
        let world = test_world();
        let mut manager = ChunkManager::new(world.clone());
        manager.load_around(IVec3::new(0, 0, 0), 1);
        assert!(wait_until(5000, || world.loaded_count() == 27
            && world.loading_count() == 0));

        // Ten chunks along +X: the old cube leaves entirely.
        manager.load_around(IVec3::new(80, 0, 0), 1);
        manager.sweep_pending_unloads();
        assert!(wait_until(5000, || {
            manager.sweep_pending_unloads();
            world.loaded_count() == 27
                && world.loading_count() == 0
                && manager.pending_unload_count() == 0
        }));
        for coord in world.loaded_coords() {
            assert!(
                (coord.x - 10).abs() <= 1 && coord.y.abs() <= 1 && coord.z.abs() <= 1,
                "stale chunk {coord:?} survived the move"
            );
        }
    }

    #[test]
    fn test_pending_unload_rescued_on_reentry() {
        let world = test_world();
        let mut manager = ChunkManager::new(world.clone());
        manager.load_around(IVec3::new(0, 0, 0), 1);
        // Leave and come straight back; whatever was still loading must
        // not be swept once it re-enters the radius.
        manager.load_around(IVec3::new(800, 0, 0), 1);
        manager.load_around(IVec3::new(0, 0, 0), 1);
        assert!(wait_until(5000, || {
            manager.sweep_pending_unloads();
            world.loading_count() == 0 && manager.pending_unload_count() == 0
        }));
        let origin_cube_loaded = (-1..=1).all(|x| {
            (-1..=1).all(|y| {
                (-1..=1).all(|z| world.chunk_is_loaded(ChunkCoord::new(x, y, z)))
            })
        });
        assert!(origin_cube_loaded, "re-entered chunks must stay loaded");
    }

    #[test]
    fn test_rapid_reentry_leaves_no_holes() {
        let world = test_world();
        let mut manager = ChunkManager::new(world.clone());
        // Leaving and returning while loads are mid-publish must never
        // tear down a delivery the radius still wants; a discarded one
        // would leave a permanent gap, since the settled manager never
        // re-requests the coordinate.
        for round in 0..40 {
            manager.load_around(IVec3::new(0, 0, 0), 1);
            manager.load_around(IVec3::new(800, 0, 0), 1);
            manager.load_around(IVec3::new(0, 0, 0), 1);
            assert!(wait_until(5000, || {
                manager.sweep_pending_unloads();
                world.loading_count() == 0 && manager.pending_unload_count() == 0
            }));
            for x in -1..=1 {
                for y in -1..=1 {
                    for z in -1..=1 {
                        assert!(
                            world.chunk_is_loaded(ChunkCoord::new(x, y, z)),
                            "round {round}: chunk ({x}, {y}, {z}) missing after re-entry"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_visible_chunks_respect_frustum() {
        let world = test_world();
        let mut manager = ChunkManager::new(world.clone());
        // Viewer above the terrain looking straight down: the chunks under
        // the camera are visible, those behind it are not.
        let eye = Vec3::new(4.0, 120.0, 4.0);
        manager.load_around(IVec3::new(4, 28, 4), 2);
        assert!(wait_until(5000, || world.loading_count() == 0));

        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0);
        let view = Mat4::look_at_rh(eye, eye - Vec3::Y, Vec3::Z);
        let view_projection = projection * view;
        assert!(wait_until(5000, || {
            !manager.visible_chunks(&view_projection).is_empty()
        }));

        let draws = manager.visible_chunks(&view_projection);
        for draw in &draws {
            assert!(
                draw.translation.y < eye.y,
                "chunk {:?} is behind the camera",
                draw.coord
            );
            assert!(!draw.mesh.is_empty());
        }
    }
}
