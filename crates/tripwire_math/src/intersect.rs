//! Overlap tests between world-space axis-aligned boxes and spheres
//!
//! Box tests use inclusive bounds: boxes that share a face overlap.
//! Tests involving a sphere use a strict comparison: a sphere that only
//! touches the other shape does not overlap it. Inputs are not guarded
//! against NaN or infinities.

use crate::vector::Vec3;

/// Box-box overlap on all three axes (touching faces count)
#[inline]
pub fn aabb_aabb(a_min: Vec3, a_max: Vec3, b_min: Vec3, b_max: Vec3) -> bool {
    a_min.x <= b_max.x
        && a_max.x >= b_min.x
        && a_min.y <= b_max.y
        && a_max.y >= b_min.y
        && a_min.z <= b_max.z
        && a_max.z >= b_min.z
}

/// Sphere-sphere overlap (exact tangency does not count)
#[inline]
pub fn sphere_sphere(a_center: Vec3, a_radius: f32, b_center: Vec3, b_radius: f32) -> bool {
    let radius_sum = a_radius + b_radius;
    a_center.distance_squared(b_center) < radius_sum * radius_sum
}

/// Box-sphere overlap
///
/// Accumulates the squared distance from the sphere center to the nearest
/// point of the box, axis by axis, and compares it against the squared radius.
pub fn aabb_sphere(box_min: Vec3, box_max: Vec3, center: Vec3, radius: f32) -> bool {
    let dist_sq = axis_gap_sq(center.x, box_min.x, box_max.x)
        + axis_gap_sq(center.y, box_min.y, box_max.y)
        + axis_gap_sq(center.z, box_min.z, box_max.z);

    dist_sq < radius * radius
}

#[inline]
fn axis_gap_sq(value: f32, min: f32, max: f32) -> f32 {
    if value < min {
        (min - value) * (min - value)
    } else if value > max {
        (value - max) * (value - max)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(center: Vec3) -> (Vec3, Vec3) {
        (center - Vec3::splat(0.5), center + Vec3::splat(0.5))
    }

    #[test]
    fn test_aabb_overlap() {
        let (a_min, a_max) = unit_box_at(Vec3::ZERO);
        let (b_min, b_max) = unit_box_at(Vec3::new(0.5, 0.0, 0.0));
        assert!(aabb_aabb(a_min, a_max, b_min, b_max));

        let (c_min, c_max) = unit_box_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(!aabb_aabb(a_min, a_max, c_min, c_max));
    }

    #[test]
    fn test_aabb_touching_faces_count() {
        let (a_min, a_max) = unit_box_at(Vec3::ZERO);
        let (b_min, b_max) = unit_box_at(Vec3::new(1.0, 0.0, 0.0));
        assert!(aabb_aabb(a_min, a_max, b_min, b_max));
    }

    #[test]
    fn test_aabb_symmetry() {
        let boxes = [
            unit_box_at(Vec3::ZERO),
            unit_box_at(Vec3::new(0.9, 0.2, -0.3)),
            unit_box_at(Vec3::new(3.0, 0.0, 0.0)),
            (Vec3::new(-2.0, -0.1, -0.1), Vec3::new(2.0, 0.1, 0.1)),
        ];
        for (a_min, a_max) in boxes {
            for (b_min, b_max) in boxes {
                assert_eq!(
                    aabb_aabb(a_min, a_max, b_min, b_max),
                    aabb_aabb(b_min, b_max, a_min, a_max)
                );
            }
        }
    }

    #[test]
    fn test_aabb_separated_on_single_axis() {
        let (a_min, a_max) = unit_box_at(Vec3::ZERO);
        let (b_min, b_max) = unit_box_at(Vec3::new(0.0, 0.0, 1.01));
        assert!(!aabb_aabb(a_min, a_max, b_min, b_max));
    }

    #[test]
    fn test_sphere_tangency_does_not_count() {
        assert!(!sphere_sphere(Vec3::ZERO, 1.0, Vec3::new(3.0, 0.0, 0.0), 2.0));
        assert!(sphere_sphere(Vec3::ZERO, 1.0, Vec3::new(2.999, 0.0, 0.0), 2.0));
    }

    #[test]
    fn test_sphere_contained() {
        assert!(sphere_sphere(Vec3::ZERO, 5.0, Vec3::new(1.0, 1.0, 1.0), 0.1));
    }

    #[test]
    fn test_aabb_sphere_inside_box() {
        let (min, max) = unit_box_at(Vec3::ZERO);
        assert!(aabb_sphere(min, max, Vec3::ZERO, 0.01));
    }

    #[test]
    fn test_aabb_sphere_face_distance() {
        let (min, max) = unit_box_at(Vec3::ZERO);
        // Center 1.0 from the +X face
        assert!(!aabb_sphere(min, max, Vec3::new(1.5, 0.0, 0.0), 1.0));
        assert!(aabb_sphere(min, max, Vec3::new(1.49, 0.0, 0.0), 1.0));
    }

    #[test]
    fn test_aabb_sphere_corner_distance() {
        let (min, max) = unit_box_at(Vec3::ZERO);
        // Nearest point is the corner (0.5, 0.5, 0.5); gap is sqrt(0.5) ~ 0.707
        let center = Vec3::new(1.0, 1.0, 0.5);
        assert!(!aabb_sphere(min, max, center, 0.7));
        assert!(aabb_sphere(min, max, center, 0.71));
    }
}
