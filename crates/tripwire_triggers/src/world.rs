//! Collaborators the trigger system depends on
//!
//! The system never reaches into a concrete scene. Poses, entity liveness,
//! component presence and debug rendering all come through these traits.

use tripwire_ecs::{Entity, Scene};
use tripwire_math::Pose;

use crate::debug::DebugShape;

/// Resolves world poses through the transform hierarchy
pub trait PoseSource {
    /// World pose of `entity`; identity if it has no transform
    fn world_pose(&self, entity: Entity) -> Pose;
}

/// Entity lifetime and trigger component presence
pub trait EntityStore {
    fn is_alive(&self, entity: Entity) -> bool;

    fn has_trigger_volume(&self, entity: Entity) -> bool;

    fn attach_trigger_volume(&mut self, entity: Entity);

    fn detach_trigger_volume(&mut self, entity: Entity);

    /// Create a helper entity (used for debug shape handles)
    fn spawn(&mut self) -> Entity;

    fn despawn(&mut self, entity: Entity);

    /// Entity that carries the built-in observer volume, if any
    fn local_observer(&self) -> Option<Entity> {
        None
    }
}

/// Sink for debug draw requests
pub trait DebugRenderer {
    fn draw_debug_shapes(&mut self, _shapes: &[DebugShape]) {}
}

/// Everything a [`TriggerSystem`](crate::TriggerSystem) needs from its world
pub trait TriggerWorld: PoseSource + EntityStore + DebugRenderer {}

impl<T: PoseSource + EntityStore + DebugRenderer> TriggerWorld for T {}

impl PoseSource for Scene {
    fn world_pose(&self, entity: Entity) -> Pose {
        Scene::world_pose(self, entity)
    }
}

impl EntityStore for Scene {
    fn is_alive(&self, entity: Entity) -> bool {
        Scene::is_alive(self, entity)
    }

    fn has_trigger_volume(&self, entity: Entity) -> bool {
        Scene::has_trigger_volume(self, entity)
    }

    fn attach_trigger_volume(&mut self, entity: Entity) {
        Scene::attach_trigger_volume(self, entity);
    }

    fn detach_trigger_volume(&mut self, entity: Entity) {
        Scene::detach_trigger_volume(self, entity);
    }

    fn spawn(&mut self) -> Entity {
        Scene::spawn(self)
    }

    fn despawn(&mut self, entity: Entity) {
        Scene::despawn(self, entity);
    }

    fn local_observer(&self) -> Option<Entity> {
        Some(self.player())
    }
}

impl DebugRenderer for Scene {}
