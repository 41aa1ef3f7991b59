//! Debug visualization of trigger volumes

use serde::{Deserialize, Serialize};
use tripwire_ecs::Entity;
use tripwire_math::Vec3;

use crate::area::TriggerArea;

/// RGB color with components in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DebugColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl DebugColor {
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// RGBA with the given alpha
    #[inline]
    pub fn with_alpha(self, alpha: f32) -> [f32; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

/// Geometry of a debug shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugShapeKind {
    /// Box with full extents
    Box { size: Vec3 },
    Sphere { radius: f32 },
}

impl From<&TriggerArea> for DebugShapeKind {
    fn from(area: &TriggerArea) -> Self {
        match *area {
            TriggerArea::Box { scale, .. } => Self::Box { size: scale },
            TriggerArea::Sphere { radius, .. } => Self::Sphere { radius },
        }
    }
}

/// One draw request for the renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DebugShape {
    /// Helper entity owned by the trigger system for this shape
    pub handle: Entity,
    /// Volume this shape visualizes
    pub owner: Entity,
    pub kind: DebugShapeKind,
    /// World-space center
    pub position: Vec3,
    pub rgba: [f32; 4],
}
