//! Rigid pose (position + rotation) without scale

use crate::quaternion::Quat;
use crate::vector::Vec3;

/// World-space position and rotation of an entity
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Pose {
    /// Identity pose
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    #[inline]
    pub const fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    #[inline]
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// Map a point expressed in this pose's local frame to the parent frame
    #[inline]
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }

    /// Compose a child pose expressed relative to this one
    #[inline]
    pub fn then(&self, child: &Pose) -> Pose {
        Pose {
            position: self.transform_point(child.position),
            rotation: self.rotation * child.rotation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::IDENTITY
    }
}
