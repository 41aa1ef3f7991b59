//! Trigger registry: per-entity volumes, callbacks and collision sets
//!
//! The per-tick tracking pass lives in [`tracker`](crate::tracker); this
//! module owns the state it reads and the public mutation API.

use std::collections::{BTreeMap, BTreeSet};

use tripwire_ecs::Entity;

use crate::area::TriggerArea;
use crate::config::TriggerConfig;
use crate::debug::DebugColor;
use crate::error::{Result, TriggerError};
use crate::events::{TriggerCallback, TriggerEvent, TriggerEventKind};
use crate::layers::IntoMask;
use crate::tracker::PendingDispatch;
use crate::volume::TriggerVolume;
use crate::world::TriggerWorld;

/// A registered volume plus bookkeeping for safe callback reinstallation
#[derive(Debug)]
pub(crate) struct Registration {
    pub(crate) volume: TriggerVolume,
    /// Bumped on every (re-)add
    pub(crate) revision: u64,
    /// Bumped whenever the enter callback is replaced or cleared
    pub(crate) enter_version: u64,
    pub(crate) exit_version: u64,
}

/// The trigger system
///
/// Owns the world it reads poses and entity lifetimes from. Reach it
/// between ticks through [`world`](Self::world) and
/// [`world_mut`](Self::world_mut).
pub struct TriggerSystem<W: TriggerWorld> {
    pub(crate) world: W,
    pub(crate) config: TriggerConfig,
    pub(crate) volumes: BTreeMap<Entity, Registration>,
    pub(crate) active_collisions: BTreeMap<Entity, BTreeSet<Entity>>,
    pub(crate) on_enter: BTreeMap<Entity, TriggerCallback<W>>,
    pub(crate) on_exit: BTreeMap<Entity, TriggerCallback<W>>,
    pub(crate) debug_handles: BTreeMap<Entity, Vec<Entity>>,
    pub(crate) debug_draw: bool,
    pub(crate) observer: Option<Entity>,
    pub(crate) events: Vec<TriggerEvent>,
    pub(crate) pending: Option<PendingDispatch>,
    next_revision: u64,
}

impl<W: TriggerWorld> TriggerSystem<W> {
    /// Create a trigger system with the default configuration
    pub fn new(world: W) -> Self {
        Self::build(world, TriggerConfig::default())
    }

    /// Create a trigger system with a custom configuration
    pub fn with_config(world: W, config: TriggerConfig) -> Result<Self> {
        if config.observer_layer == 0 {
            return Err(TriggerError::InvalidArgument(
                "observer layer mask must not be empty".into(),
            ));
        }
        if !(0.0..=1.0).contains(&config.debug_alpha) {
            return Err(TriggerError::InvalidArgument(format!(
                "debug alpha {} is outside 0..=1",
                config.debug_alpha
            )));
        }
        Ok(Self::build(world, config))
    }

    fn build(world: W, config: TriggerConfig) -> Self {
        let mut system = Self {
            world,
            debug_draw: config.debug_draw,
            config,
            volumes: BTreeMap::new(),
            active_collisions: BTreeMap::new(),
            on_enter: BTreeMap::new(),
            on_exit: BTreeMap::new(),
            debug_handles: BTreeMap::new(),
            observer: None,
            events: Vec::new(),
            pending: None,
            next_revision: 0,
        };

        if let Some(observer) = system.world.local_observer() {
            let volume = TriggerVolume::from_masks(system.config.observer_layer, 0)
                .with_areas(vec![system.config.observer_area])
                .with_debug_color(system.config.observer_color);
            system.add_trigger(observer, volume);
            system.observer = Some(observer);
        }

        system
    }

    #[inline]
    pub fn world(&self) -> &W {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut W {
        &mut self.world
    }

    /// Consume the system and return its world
    pub fn into_world(self) -> W {
        self.world
    }

    #[inline]
    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    /// The built-in observer entity, while its volume is registered
    pub fn observer(&self) -> Option<Entity> {
        self.observer.filter(|e| self.volumes.contains_key(e))
    }

    /// Register (or replace) the trigger volume of `entity`.
    ///
    /// Replacing resets the entity's own collision set and callbacks, so
    /// partners still overlapping it are reported as entering again on the
    /// next tick. Partners' sets are left untouched.
    pub fn add_trigger(&mut self, entity: Entity, volume: TriggerVolume) {
        if !self.world.is_alive(entity) {
            log::warn!("Adding trigger to dead entity {}; it will be reaped next tick", entity);
        }

        self.next_revision += 1;
        let revision = self.next_revision;
        let replaced = self
            .volumes
            .insert(
                entity,
                Registration {
                    volume,
                    revision,
                    enter_version: 0,
                    exit_version: 0,
                },
            )
            .is_some();

        self.active_collisions.insert(entity, BTreeSet::new());
        if let Some(pending) = self.pending.as_mut() {
            pending.forget_subject(entity);
        }
        self.on_enter.remove(&entity);
        self.on_exit.remove(&entity);
        self.despawn_debug_handles(entity);
        self.world.attach_trigger_volume(entity);

        if replaced {
            log::debug!("Replaced trigger on {}", entity);
        } else {
            log::debug!("Added trigger to {}", entity);
        }
    }

    /// Register a trigger whose enter callback removes it on the first enter
    pub fn one_time_trigger<F>(&mut self, entity: Entity, volume: TriggerVolume, mut on_enter: F)
    where
        F: FnMut(&mut TriggerSystem<W>, Entity) + 'static,
    {
        self.add_trigger(entity, volume);
        self.on_enter.insert(
            entity,
            Box::new(move |system: &mut TriggerSystem<W>, partner| {
                // Already gone if something else removed it earlier this pass
                if system.remove_trigger(entity).is_ok() {
                    on_enter(system, partner);
                }
            }),
        );
    }

    /// Unregister the trigger of `entity`.
    ///
    /// The entity's own exit callback fires for every partner it was
    /// colliding with, then each partner's exit callback fires with the
    /// removed entity.
    pub fn remove_trigger(&mut self, entity: Entity) -> Result<()> {
        if !self.volumes.contains_key(&entity) {
            return Err(TriggerError::UnregisteredEntity(entity));
        }
        self.world.detach_trigger_volume(entity);
        self.purge(entity);
        log::debug!("Removed trigger from {}", entity);
        Ok(())
    }

    /// Drop all state of `entity` and synthesize its exit events.
    ///
    /// During dispatch, a pair whose enter is still queued gets no exit,
    /// and a pair whose exit is still queued gets it now.
    pub(crate) fn purge(&mut self, entity: Entity) {
        self.volumes.remove(&entity);
        let mut own = self.active_collisions.remove(&entity).unwrap_or_default();
        let mut own_exit = self.on_exit.remove(&entity);
        self.on_enter.remove(&entity);
        self.despawn_debug_handles(entity);

        let mut tracking = BTreeSet::new();
        for (&other, collisions) in self.active_collisions.iter_mut() {
            if collisions.remove(&entity) {
                tracking.insert(other);
            }
        }

        if let Some(pending) = self.pending.as_mut() {
            pending.settle(entity, &mut own, &mut tracking);
        }

        for partner in own {
            if !self.volumes.contains_key(&partner) {
                continue;
            }
            self.events.push(TriggerEvent::exit(entity, partner));
            if let Some(callback) = own_exit.as_mut() {
                callback(self, partner);
            }
        }

        for other in tracking {
            if !self.volumes.contains_key(&other) {
                continue;
            }
            self.events.push(TriggerEvent::exit(other, entity));
            self.invoke(TriggerEventKind::Exit, other, entity);
        }
    }

    /// Run the callback of `subject` for one transition.
    ///
    /// The callback is taken out while it runs and put back only if the
    /// subject kept the same registration and nobody replaced it meanwhile.
    pub(crate) fn invoke(&mut self, kind: TriggerEventKind, subject: Entity, partner: Entity) {
        let Some(registration) = self.volumes.get(&subject) else {
            return;
        };
        let revision = registration.revision;
        let version = match kind {
            TriggerEventKind::Enter => registration.enter_version,
            TriggerEventKind::Exit => registration.exit_version,
        };

        let Some(mut callback) = self.callbacks_mut(kind).remove(&subject) else {
            return;
        };
        callback(self, partner);

        let unchanged = self.volumes.get(&subject).is_some_and(|r| {
            r.revision == revision
                && version
                    == match kind {
                        TriggerEventKind::Enter => r.enter_version,
                        TriggerEventKind::Exit => r.exit_version,
                    }
        });
        if unchanged {
            self.callbacks_mut(kind).entry(subject).or_insert(callback);
        }
    }

    fn callbacks_mut(
        &mut self,
        kind: TriggerEventKind,
    ) -> &mut BTreeMap<Entity, TriggerCallback<W>> {
        match kind {
            TriggerEventKind::Enter => &mut self.on_enter,
            TriggerEventKind::Exit => &mut self.on_exit,
        }
    }

    fn registration(&self, entity: Entity) -> Result<&Registration> {
        self.volumes
            .get(&entity)
            .ok_or(TriggerError::UnregisteredEntity(entity))
    }

    fn registration_mut(&mut self, entity: Entity) -> Result<&mut Registration> {
        self.volumes
            .get_mut(&entity)
            .ok_or(TriggerError::UnregisteredEntity(entity))
    }

    /// Whether `entity` has a registered trigger volume
    #[inline]
    pub fn contains(&self, entity: Entity) -> bool {
        self.volumes.contains_key(&entity)
    }

    /// Number of registered volumes, observer included
    #[inline]
    pub fn trigger_count(&self) -> usize {
        self.volumes.len()
    }

    pub fn volume(&self, entity: Entity) -> Option<&TriggerVolume> {
        self.volumes.get(&entity).map(|r| &r.volume)
    }

    pub fn enable_trigger(&mut self, entity: Entity, enabled: bool) -> Result<()> {
        self.registration_mut(entity)?.volume.active = enabled;
        Ok(())
    }

    pub fn is_trigger_enabled(&self, entity: Entity) -> Result<bool> {
        Ok(self.registration(entity)?.volume.active)
    }

    pub fn layer_mask(&self, entity: Entity) -> Result<u8> {
        Ok(self.registration(entity)?.volume.layer_mask)
    }

    pub fn set_layer_mask(&mut self, entity: Entity, mask: impl IntoMask) -> Result<()> {
        let mask = mask.into_mask()?;
        self.registration_mut(entity)?.volume.layer_mask = mask;
        Ok(())
    }

    pub fn triggered_by_mask(&self, entity: Entity) -> Result<u8> {
        Ok(self.registration(entity)?.volume.triggered_by_mask)
    }

    pub fn set_triggered_by_mask(&mut self, entity: Entity, mask: impl IntoMask) -> Result<()> {
        let mask = mask.into_mask()?;
        self.registration_mut(entity)?.volume.triggered_by_mask = mask;
        Ok(())
    }

    pub fn areas(&self, entity: Entity) -> Result<&[TriggerArea]> {
        Ok(self.registration(entity)?.volume.areas())
    }

    /// Replace the areas; an empty list installs a unit box
    pub fn set_areas(&mut self, entity: Entity, areas: impl Into<Vec<TriggerArea>>) -> Result<()> {
        self.registration_mut(entity)?.volume.set_areas(areas.into());
        Ok(())
    }

    pub fn set_debug_color(&mut self, entity: Entity, color: DebugColor) -> Result<()> {
        self.registration_mut(entity)?.volume.debug_color = Some(color);
        Ok(())
    }

    pub fn set_on_enter<F>(&mut self, entity: Entity, callback: F) -> Result<()>
    where
        F: FnMut(&mut TriggerSystem<W>, Entity) + 'static,
    {
        self.registration_mut(entity)?.enter_version += 1;
        self.on_enter.insert(entity, Box::new(callback));
        Ok(())
    }

    pub fn clear_on_enter(&mut self, entity: Entity) -> Result<()> {
        self.registration_mut(entity)?.enter_version += 1;
        self.on_enter.remove(&entity);
        Ok(())
    }

    pub fn set_on_exit<F>(&mut self, entity: Entity, callback: F) -> Result<()>
    where
        F: FnMut(&mut TriggerSystem<W>, Entity) + 'static,
    {
        self.registration_mut(entity)?.exit_version += 1;
        self.on_exit.insert(entity, Box::new(callback));
        Ok(())
    }

    pub fn clear_on_exit(&mut self, entity: Entity) -> Result<()> {
        self.registration_mut(entity)?.exit_version += 1;
        self.on_exit.remove(&entity);
        Ok(())
    }

    /// Whether an enter callback is installed.
    ///
    /// Reports `false` for the callback that is currently running.
    pub fn has_on_enter_callback(&self, entity: Entity) -> Result<bool> {
        self.registration(entity)?;
        Ok(self.on_enter.contains_key(&entity))
    }

    pub fn has_on_exit_callback(&self, entity: Entity) -> Result<bool> {
        self.registration(entity)?;
        Ok(self.on_exit.contains_key(&entity))
    }

    /// Partners `entity` was overlapping as of the last completed tick
    pub fn active_collisions(&self, entity: Entity) -> Result<&BTreeSet<Entity>> {
        self.active_collisions
            .get(&entity)
            .ok_or(TriggerError::UnregisteredEntity(entity))
    }

    pub fn is_colliding(&self, subject: Entity, partner: Entity) -> bool {
        self.active_collisions
            .get(&subject)
            .is_some_and(|set| set.contains(&partner))
    }

    /// Events dispatched since the start of the last tick
    #[inline]
    pub fn events(&self) -> &[TriggerEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<TriggerEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn enable_debug_draw(&mut self, enabled: bool) {
        self.debug_draw = enabled;
        if !enabled {
            let handles = std::mem::take(&mut self.debug_handles);
            for handle in handles.into_values().flatten() {
                self.world.despawn(handle);
            }
        }
    }

    #[inline]
    pub fn is_debug_draw_enabled(&self) -> bool {
        self.debug_draw
    }

    /// Debug handles currently owned for `entity`
    pub fn debug_handles(&self, entity: Entity) -> &[Entity] {
        self.debug_handles
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    fn despawn_debug_handles(&mut self, entity: Entity) {
        if let Some(handles) = self.debug_handles.remove(&entity) {
            for handle in handles {
                self.world.despawn(handle);
            }
        }
    }
}
