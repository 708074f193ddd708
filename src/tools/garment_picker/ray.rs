use bevy::prelude::*;

/// Picking volume for a garment root, merged from its mesh descendants once
/// the GLB scene has instantiated. `center` is in the root's local space so
/// the volume follows the orbit without recomputation.
#[derive(Component, Debug, Clone, Copy)]
pub struct PickBounds {
    pub center: Vec3,
    pub size: Vec3,
}

/// Ray test against a garment's oriented picking volume. The ray is taken
/// into the root's local space and slab-tested against the half-extents.
pub fn ray_hits_garment(
    origin: Vec3,
    dir: Vec3,
    root: &GlobalTransform,
    bounds: &PickBounds,
) -> Option<f32> {
    let inv = root.compute_matrix().inverse();
    let o_local = inv.transform_point3(origin) - bounds.center;
    let d_local = inv.transform_vector3(dir);
    let he = bounds.size * 0.5;
    ray_aabb_hit_t(o_local, d_local, -he, he)
}

/// Slab test against an axis-aligned box in the ray's own space. Returns the
/// nearest non-negative hit distance, or the exit distance when the origin is
/// inside the box.
pub fn ray_aabb_hit_t(ray_origin: Vec3, ray_direction: Vec3, min: Vec3, max: Vec3) -> Option<f32> {
    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;

    for axis in 0..3 {
        let o = ray_origin[axis];
        let d = ray_direction[axis];
        if d.abs() < f32::EPSILON {
            // Parallel to this slab: either always inside it or never.
            if o < min[axis] || o > max[axis] {
                return None;
            }
            continue;
        }
        let t0 = (min[axis] - o) / d;
        let t1 = (max[axis] - o) / d;
        let (near, far) = if t0 <= t1 { (t0, t1) } else { (t1, t0) };
        t_enter = t_enter.max(near);
        t_exit = t_exit.min(far);
        if t_enter > t_exit {
            return None;
        }
    }

    if t_exit < 0.0 {
        return None;
    }
    Some(if t_enter >= 0.0 { t_enter } else { t_exit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ray_through_box_hits_front_face() {
        let t = ray_aabb_hit_t(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert_eq!(t, Some(4.0));
    }

    #[test]
    fn origin_inside_box_returns_exit_distance() {
        let t = ray_aabb_hit_t(
            Vec3::ZERO,
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert_eq!(t, Some(1.0));
    }

    #[test]
    fn ray_missing_box_returns_none() {
        let t = ray_aabb_hit_t(
            Vec3::new(5.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn box_behind_ray_returns_none() {
        let t = ray_aabb_hit_t(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::splat(-1.0),
            Vec3::splat(1.0),
        );
        assert!(t.is_none());
    }

    #[test]
    fn garment_volume_follows_root_transform() {
        let root = GlobalTransform::from(Transform::from_xyz(2.0, 0.0, 0.0));
        let bounds = PickBounds {
            center: Vec3::ZERO,
            size: Vec3::splat(1.0),
        };
        let hit = ray_hits_garment(
            Vec3::new(2.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            &root,
            &bounds,
        );
        assert!(hit.is_some());
        let miss = ray_hits_garment(
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(0.0, 0.0, -1.0),
            &root,
            &bounds,
        );
        assert!(miss.is_none());
    }
}
