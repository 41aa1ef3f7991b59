//! Reference in-memory scene: entity store plus a parent/child transform hierarchy
//!
//! Each entity may carry a [`LocalTransform`] relative to its parent. World
//! poses are resolved on demand by walking the ancestor chain, so they are
//! always consistent with the latest local edits. Scale is not modelled.

use tripwire_math::{Pose, Quat, Vec3};

use crate::entity::Entity;
use crate::error::{Result, SceneError};

/// Transform relative to the parent (or the world when there is no parent)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LocalTransform {
    pub position: Vec3,
    pub rotation: Quat,
    pub parent: Option<Entity>,
}

impl LocalTransform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_parent(mut self, parent: Entity) -> Self {
        self.parent = Some(parent);
        self
    }

    fn local_pose(&self) -> Pose {
        Pose::new(self.position, self.rotation)
    }
}

/// Per-slot storage. A vacant slot keeps only its generation.
#[derive(Debug, Default)]
struct Slot {
    generation: u32,
    alive: bool,
    transform: Option<LocalTransform>,
    trigger_volume: bool,
}

/// Entity store with transforms and trigger-volume presence markers
#[derive(Debug)]
pub struct Scene {
    slots: Vec<Slot>,
    /// Vacated slots, reused most recent first
    vacant: Vec<u32>,
    live: usize,
    player: Entity,
}

impl Scene {
    /// Create a scene with a player entity at the origin
    pub fn new() -> Self {
        let mut scene = Self {
            slots: Vec::new(),
            vacant: Vec::new(),
            live: 0,
            player: Entity::new(0, 0),
        };
        scene.player = scene.spawn_at(Vec3::ZERO);
        scene
    }

    /// The local player avatar
    #[inline]
    pub fn player(&self) -> Entity {
        self.player
    }

    /// Spawn an entity without a transform
    pub fn spawn(&mut self) -> Entity {
        let index = match self.vacant.pop() {
            Some(index) => index,
            None => {
                self.slots.push(Slot::default());
                (self.slots.len() - 1) as u32
            }
        };

        let slot = &mut self.slots[index as usize];
        slot.alive = true;
        self.live += 1;
        Entity::new(index, slot.generation)
    }

    /// Spawn an entity with a root transform at `position`
    pub fn spawn_at(&mut self, position: Vec3) -> Entity {
        let entity = self.spawn();
        self.slots[entity.slot() as usize].transform =
            Some(LocalTransform::from_position(position));
        entity
    }

    /// Destroy an entity and vacate its slot. Returns false if the entity
    /// was already dead.
    ///
    /// Children become roots and keep their local transform unchanged, so
    /// their world pose jumps by whatever the parent contributed.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Some(slot) = self.slot_mut(entity) else {
            return false;
        };
        *slot = Slot {
            generation: slot.generation.wrapping_add(1),
            ..Slot::default()
        };
        self.vacant.push(entity.slot());
        self.live -= 1;

        for transform in self.slots.iter_mut().filter_map(|s| s.transform.as_mut()) {
            if transform.parent == Some(entity) {
                transform.parent = None;
            }
        }

        log::trace!("Despawned entity {}", entity);
        true
    }

    #[inline]
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.slot(entity).is_some()
    }

    /// Number of live entities, player included
    #[inline]
    pub fn entity_count(&self) -> usize {
        self.live
    }

    /// Replace the whole local transform
    pub fn set_transform(&mut self, entity: Entity, transform: LocalTransform) -> Result<()> {
        if !self.is_alive(entity) {
            return Err(SceneError::EntityNotFound { entity });
        }
        if let Some(parent) = transform.parent {
            self.check_parent(entity, parent)?;
        }
        *self.transform_mut(entity)? = transform;
        Ok(())
    }

    pub fn transform(&self, entity: Entity) -> Option<&LocalTransform> {
        self.slot(entity).and_then(|s| s.transform.as_ref())
    }

    /// Set the local position, creating a root transform if needed
    pub fn set_position(&mut self, entity: Entity, position: Vec3) -> Result<()> {
        self.transform_mut(entity)?.position = position;
        Ok(())
    }

    /// Set the local rotation, creating a root transform if needed
    pub fn set_rotation(&mut self, entity: Entity, rotation: Quat) -> Result<()> {
        self.transform_mut(entity)?.rotation = rotation;
        Ok(())
    }

    /// Re-parent an entity, or detach it with `None`
    pub fn set_parent(&mut self, child: Entity, parent: Option<Entity>) -> Result<()> {
        if let Some(parent) = parent {
            self.check_parent(child, parent)?;
        }
        self.transform_mut(child)?.parent = parent;
        Ok(())
    }

    pub fn parent(&self, entity: Entity) -> Option<Entity> {
        self.transform(entity).and_then(|t| t.parent)
    }

    /// Resolve the world pose through the ancestor chain.
    ///
    /// Entities without a transform resolve to the identity pose.
    pub fn world_pose(&self, entity: Entity) -> Pose {
        let mut chain = Vec::new();
        let mut current = self.transform(entity);
        while let Some(transform) = current {
            chain.push(transform.local_pose());
            current = transform.parent.and_then(|p| self.transform(p));
        }

        chain
            .iter()
            .rev()
            .fold(Pose::IDENTITY, |world, local| world.then(local))
    }

    #[inline]
    pub fn world_position(&self, entity: Entity) -> Vec3 {
        self.world_pose(entity).position
    }

    #[inline]
    pub fn world_rotation(&self, entity: Entity) -> Quat {
        self.world_pose(entity).rotation
    }

    /// Mark the entity as carrying a trigger volume
    pub fn attach_trigger_volume(&mut self, entity: Entity) {
        if let Some(slot) = self.slot_mut(entity) {
            slot.trigger_volume = true;
        }
    }

    /// Strip the trigger volume marker
    pub fn detach_trigger_volume(&mut self, entity: Entity) {
        if let Some(slot) = self.slot_mut(entity) {
            slot.trigger_volume = false;
        }
    }

    #[inline]
    pub fn has_trigger_volume(&self, entity: Entity) -> bool {
        self.slot(entity).is_some_and(|s| s.trigger_volume)
    }

    fn slot(&self, entity: Entity) -> Option<&Slot> {
        self.slots
            .get(entity.slot() as usize)
            .filter(|s| s.alive && s.generation == entity.generation())
    }

    fn slot_mut(&mut self, entity: Entity) -> Option<&mut Slot> {
        self.slots
            .get_mut(entity.slot() as usize)
            .filter(|s| s.alive && s.generation == entity.generation())
    }

    fn transform_mut(&mut self, entity: Entity) -> Result<&mut LocalTransform> {
        let slot = self
            .slot_mut(entity)
            .ok_or(SceneError::EntityNotFound { entity })?;
        Ok(slot.transform.get_or_insert_with(LocalTransform::default))
    }

    fn check_parent(&self, child: Entity, parent: Entity) -> Result<()> {
        if !self.is_alive(parent) {
            return Err(SceneError::EntityNotFound { entity: parent });
        }

        // Walk up from the requested parent; meeting the child means a loop
        let mut current = Some(parent);
        while let Some(ancestor) = current {
            if ancestor == child {
                return Err(SceneError::CycleDetected { child, parent });
            }
            current = self.parent(ancestor);
        }
        Ok(())
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
