//! Bounding volumes in world space

use crate::intersect;
use crate::vector::Vec3;

/// Axis-Aligned Bounding Box
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AABB {
    pub min: Vec3,
    pub max: Vec3,
}

impl AABB {
    /// Create from min and max points
    #[inline]
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create from center and full extents
    #[inline]
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let min = center - size * 0.5;
        Self { min, max: min + size }
    }

    /// Get the center point
    #[inline]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the size (full extents)
    #[inline]
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Check if a point lies inside or on the boundary
    #[inline]
    pub fn contains_point(&self, point: Vec3) -> bool {
        point.x >= self.min.x && point.x <= self.max.x
            && point.y >= self.min.y && point.y <= self.max.y
            && point.z >= self.min.z && point.z <= self.max.z
    }

    /// Closest point on or inside the box
    #[inline]
    pub fn closest_point(&self, point: Vec3) -> Vec3 {
        point.max(self.min).min(self.max)
    }

    /// Box-box overlap (inclusive)
    #[inline]
    pub fn intersects(&self, other: &AABB) -> bool {
        intersect::aabb_aabb(self.min, self.max, other.min, other.max)
    }

    /// Box-sphere overlap (strict)
    #[inline]
    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        intersect::aabb_sphere(self.min, self.max, sphere.center, sphere.radius)
    }
}

/// Bounding sphere
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    #[inline]
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere-sphere overlap (strict)
    #[inline]
    pub fn intersects(&self, other: &Sphere) -> bool {
        intersect::sphere_sphere(self.center, self.radius, other.center, other.radius)
    }

    /// Sphere-box overlap (strict)
    #[inline]
    pub fn intersects_aabb(&self, aabb: &AABB) -> bool {
        aabb.intersects_sphere(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center_size() {
        let aabb = AABB::from_center_size(Vec3::new(1.0, 2.0, 3.0), Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.min, Vec3::new(0.0, 0.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(aabb.center(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(aabb.size(), Vec3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_closest_point() {
        let aabb = AABB::from_center_size(Vec3::ZERO, Vec3::ONE);
        assert_eq!(aabb.closest_point(Vec3::new(3.0, 0.2, -4.0)), Vec3::new(0.5, 0.2, -0.5));
        assert!(aabb.contains_point(aabb.closest_point(Vec3::new(9.0, 9.0, 9.0))));
    }

    #[test]
    fn test_sphere_box_both_ways() {
        let aabb = AABB::from_center_size(Vec3::ZERO, Vec3::ONE);
        let sphere = Sphere::new(Vec3::new(1.0, 0.0, 0.0), 0.6);
        assert!(aabb.intersects_sphere(&sphere));
        assert!(sphere.intersects_aabb(&aabb));
    }
}
