//! Trigger area shapes
//!
//! Areas are declared in the owning entity's local space. Only the anchor
//! point follows the entity's world pose; box extents and sphere radii are
//! used as declared and never rotated or scaled.

use serde::{Deserialize, Serialize};
use tripwire_math::{aabb_aabb, aabb_sphere, sphere_sphere, Vec3, AABB};

/// A single sub-shape of a trigger volume
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerArea {
    /// Axis-aligned box centered on `position`
    Box {
        /// Local anchor
        position: Vec3,
        /// Full extents
        scale: Vec3,
    },
    /// Sphere centered on `position`
    Sphere {
        /// Local anchor
        position: Vec3,
        radius: f32,
    },
}

impl TriggerArea {
    /// Unit box at the local origin
    pub const UNIT_BOX: Self = Self::Box {
        position: Vec3::ZERO,
        scale: Vec3::ONE,
    };

    pub fn unit_box() -> Self {
        Self::UNIT_BOX
    }

    /// Box with full extents `scale` centered on `position`
    pub fn cuboid(position: Vec3, scale: Vec3) -> Self {
        Self::Box { position, scale }
    }

    pub fn sphere(position: Vec3, radius: f32) -> Self {
        Self::Sphere { position, radius }
    }

    /// Local anchor of the area
    #[inline]
    pub fn position(&self) -> Vec3 {
        match *self {
            Self::Box { position, .. } | Self::Sphere { position, .. } => position,
        }
    }

    /// World-space box for a box area anchored at `anchor`
    pub fn world_aabb(&self, anchor: Vec3) -> Option<AABB> {
        match *self {
            Self::Box { scale, .. } => Some(AABB::from_center_size(anchor, scale)),
            Self::Sphere { .. } => None,
        }
    }

    /// Overlap test between two areas placed at their world anchors
    pub fn intersects(&self, anchor: Vec3, other: &TriggerArea, other_anchor: Vec3) -> bool {
        match (*self, *other) {
            (Self::Box { scale: a, .. }, Self::Box { scale: b, .. }) => {
                let a = AABB::from_center_size(anchor, a);
                let b = AABB::from_center_size(other_anchor, b);
                aabb_aabb(a.min, a.max, b.min, b.max)
            }
            (Self::Box { scale, .. }, Self::Sphere { radius, .. }) => {
                let b = AABB::from_center_size(anchor, scale);
                aabb_sphere(b.min, b.max, other_anchor, radius)
            }
            (Self::Sphere { radius, .. }, Self::Box { scale, .. }) => {
                let b = AABB::from_center_size(other_anchor, scale);
                aabb_sphere(b.min, b.max, anchor, radius)
            }
            (Self::Sphere { radius: a, .. }, Self::Sphere { radius: b, .. }) => {
                sphere_sphere(anchor, a, other_anchor, b)
            }
        }
    }
}

impl Default for TriggerArea {
    fn default() -> Self {
        Self::UNIT_BOX
    }
}
