//! Per-entity trigger volume state

use serde::{Deserialize, Serialize};

use crate::area::TriggerArea;
use crate::debug::DebugColor;
use crate::error::Result;
use crate::layers::{accepts, IntoMask};

/// Persistent state of one trigger-enabled entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerVolume {
    /// Disabled volumes take no part in overlap tests
    pub active: bool,
    /// Layers this volume belongs to
    pub layer_mask: u8,
    /// Layers this volume reports overlaps with
    pub triggered_by_mask: u8,
    /// Never empty
    areas: Vec<TriggerArea>,
    /// Falls back to the system's configured default when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_color: Option<DebugColor>,
}

impl TriggerVolume {
    /// Create an active volume with a single unit box
    pub fn new(layer_mask: impl IntoMask, triggered_by_mask: impl IntoMask) -> Result<Self> {
        Ok(Self::from_masks(
            layer_mask.into_mask()?,
            triggered_by_mask.into_mask()?,
        ))
    }

    /// Same as [`new`](Self::new) for already-narrowed masks
    pub fn from_masks(layer_mask: u8, triggered_by_mask: u8) -> Self {
        Self {
            active: true,
            layer_mask,
            triggered_by_mask,
            areas: vec![TriggerArea::UNIT_BOX],
            debug_color: None,
        }
    }

    /// Replace the areas; an empty list falls back to a unit box
    pub fn with_areas(mut self, areas: impl Into<Vec<TriggerArea>>) -> Self {
        self.set_areas(areas.into());
        self
    }

    pub fn with_debug_color(mut self, color: DebugColor) -> Self {
        self.debug_color = Some(color);
        self
    }

    pub fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[inline]
    pub fn areas(&self) -> &[TriggerArea] {
        &self.areas
    }

    pub fn set_areas(&mut self, areas: Vec<TriggerArea>) {
        self.areas = if areas.is_empty() {
            vec![TriggerArea::UNIT_BOX]
        } else {
            areas
        };
    }

    /// Whether this volume reports overlaps with `other`
    #[inline]
    pub fn is_triggered_by(&self, other: &TriggerVolume) -> bool {
        accepts(self.triggered_by_mask, other.layer_mask)
    }
}
