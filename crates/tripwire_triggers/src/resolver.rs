//! Local-to-world resolution of trigger area anchors

use tripwire_math::{Pose, Vec3};

use crate::area::TriggerArea;

/// World-space anchor for each area, index-aligned with `areas`
pub fn resolve_world_positions(pose: &Pose, areas: &[TriggerArea]) -> Vec<Vec3> {
    areas
        .iter()
        .map(|area| pose.transform_point(area.position()))
        .collect()
}
