//! View-frustum culling for chunk bounding boxes.

use glam::{Mat4, Vec3, Vec4};

const LEFT: usize = 0;
const RIGHT: usize = 1;
const BOTTOM: usize = 2;
const TOP: usize = 3;
const NEAR: usize = 4;
const FAR: usize = 5;

/// An axis-aligned bounding box in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vec3,
    /// Maximum corner.
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }
}

/// A view frustum as six inward-pointing planes extracted from a combined
/// view-projection matrix.
#[derive(Clone, Debug)]
pub struct Frustum {
    /// Left, right, bottom, top, near, far. Each `Vec4(a, b, c, d)` holds
    /// the normalized inward normal `(a, b, c)` and distance term `d`.
    planes: [Vec4; 6],
}

impl Frustum {
    /// Extracts the planes with the Gribb-Hartmann method.
    ///
    /// Assumes zero-to-one clip depth (`Mat4::perspective_rh` and friends):
    /// the near plane comes from row 2 alone, the far plane from
    /// row 3 − row 2.
    pub fn from_view_projection(vp: &Mat4) -> Self {
        let rows = [vp.row(0), vp.row(1), vp.row(2), vp.row(3)];

        let mut planes = [Vec4::ZERO; 6];
        planes[LEFT] = rows[3] + rows[0];
        planes[RIGHT] = rows[3] - rows[0];
        planes[BOTTOM] = rows[3] + rows[1];
        planes[TOP] = rows[3] - rows[1];
        planes[NEAR] = rows[2];
        planes[FAR] = rows[3] - rows[2];

        for plane in &mut planes {
            let len = plane.truncate().length();
            if len > 0.0 {
                *plane /= len;
            }
        }

        Self { planes }
    }

    /// Tests whether an AABB is at least partially inside the frustum.
    ///
    /// Per plane, only the positive vertex (the corner furthest along the
    /// plane normal) is tested; if that corner is behind the plane the
    /// whole box is outside. Conservative: near frustum corners a fully
    /// outside box can pass, but a box touching the volume never culls.
    pub fn intersects(&self, aabb: &Aabb) -> bool {
        for plane in &self.planes {
            let normal = plane.truncate();
            let p = Vec3::new(
                if normal.x >= 0.0 { aabb.max.x } else { aabb.min.x },
                if normal.y >= 0.0 { aabb.max.y } else { aabb.min.y },
                if normal.z >= 0.0 { aabb.max.z } else { aabb.min.z },
            );
            if normal.dot(p) + plane.w < 0.0 {
                return false;
            }
        }
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Camera at the origin looking down −Z.
    fn test_frustum() -> Frustum {
        let projection = Mat4::perspective_rh(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 1000.0);
        let view = Mat4::look_at_rh(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y);
        Frustum::from_view_projection(&(projection * view))
    }

    fn unit_box_at(center: Vec3) -> Aabb {
        Aabb::new(center - Vec3::splat(0.5), center + Vec3::splat(0.5))
    }

    #[test]
    fn test_box_ahead_of_camera_is_visible() {
        let frustum = test_frustum();
        assert!(frustum.intersects(&unit_box_at(Vec3::new(0.0, 0.0, -10.0))));
    }

    #[test]
    fn test_box_behind_camera_is_culled() {
        let frustum = test_frustum();
        assert!(!frustum.intersects(&unit_box_at(Vec3::new(0.0, 0.0, 10.0))));
    }

    #[test]
    fn test_boxes_outside_side_planes_are_culled() {
        let frustum = test_frustum();
        // 90 degree FOV: at depth 10 the frustum spans +/-10 per axis.
        assert!(!frustum.intersects(&unit_box_at(Vec3::new(30.0, 0.0, -10.0))));
        assert!(!frustum.intersects(&unit_box_at(Vec3::new(-30.0, 0.0, -10.0))));
        assert!(!frustum.intersects(&unit_box_at(Vec3::new(0.0, 30.0, -10.0))));
        assert!(!frustum.intersects(&unit_box_at(Vec3::new(0.0, -30.0, -10.0))));
    }

    #[test]
    fn test_box_beyond_far_plane_is_culled() {
        let frustum = test_frustum();
        assert!(!frustum.intersects(&unit_box_at(Vec3::new(0.0, 0.0, -1500.0))));
    }

    #[test]
    fn test_straddling_box_is_kept() {
        let frustum = test_frustum();
        // Straddles the left plane at depth 10.
        let straddling = Aabb::new(Vec3::new(8.0, -1.0, -11.0), Vec3::new(14.0, 1.0, -9.0));
        assert!(frustum.intersects(&straddling));
        // Encloses the whole frustum.
        let huge = Aabb::new(Vec3::splat(-5000.0), Vec3::splat(5000.0));
        assert!(frustum.intersects(&huge));
    }
}
