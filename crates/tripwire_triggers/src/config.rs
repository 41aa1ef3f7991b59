//! Trigger system configuration

use serde::{Deserialize, Serialize};
use tripwire_math::Vec3;

use crate::area::TriggerArea;
use crate::debug::DebugColor;
use crate::layers::PLAYER_LAYER_ID;

/// Alpha applied to every debug shape by default
pub const DEFAULT_DEBUG_ALPHA: f32 = 75.0 / 255.0;

/// Trigger system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Start with debug drawing enabled
    pub debug_draw: bool,

    /// Layer mask of the built-in observer volume
    pub observer_layer: u8,

    /// Shape of the built-in observer volume
    pub observer_area: TriggerArea,

    pub observer_color: DebugColor,

    /// Color of volumes registered without one
    pub default_color: DebugColor,

    /// Color used for disabled volumes
    pub inactive_color: DebugColor,

    pub debug_alpha: f32,
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debug_draw: false,
            observer_layer: PLAYER_LAYER_ID,
            observer_area: TriggerArea::cuboid(
                Vec3::new(0.0, 0.15, 0.0),
                Vec3::new(0.65, 1.92, 0.65),
            ),
            observer_color: DebugColor::GREEN,
            default_color: DebugColor::RED,
            inactive_color: DebugColor::BLACK,
            debug_alpha: DEFAULT_DEBUG_ALPHA,
        }
    }
}

impl TriggerConfig {
    pub fn with_debug_draw(mut self, enabled: bool) -> Self {
        self.debug_draw = enabled;
        self
    }

    pub fn with_observer_layer(mut self, layer: u8) -> Self {
        self.observer_layer = layer;
        self
    }

    pub fn with_observer_area(mut self, area: TriggerArea) -> Self {
        self.observer_area = area;
        self
    }

    pub fn with_observer_color(mut self, color: DebugColor) -> Self {
        self.observer_color = color;
        self
    }

    pub fn with_default_color(mut self, color: DebugColor) -> Self {
        self.default_color = color;
        self
    }

    pub fn with_inactive_color(mut self, color: DebugColor) -> Self {
        self.inactive_color = color;
        self
    }

    pub fn with_debug_alpha(mut self, alpha: f32) -> Self {
        self.debug_alpha = alpha;
        self
    }
}
