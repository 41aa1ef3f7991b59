//! Per-tick collision tracking
//!
//! Each tick runs, in order:
//!
//! 1. reap volumes whose entity died or lost its trigger component
//! 2. resolve world anchors for every active volume
//! 3. compute each subject's overlap set (mask-filtered, exhaustive)
//! 4. diff against the previous sets into enter/exit queues
//! 5. dispatch the queued callbacks
//! 6. emit debug shapes when debug drawing is on

use std::collections::{BTreeMap, BTreeSet};

use tripwire_ecs::{priority, Entity, Schedule};
use tripwire_math::Vec3;

use crate::debug::{DebugShape, DebugShapeKind};
use crate::events::{TriggerEvent, TriggerEventKind};
use crate::layers::accepts;
use crate::resolver::resolve_world_positions;
use crate::system::TriggerSystem;
use crate::volume::TriggerVolume;
use crate::world::TriggerWorld;

type Anchors = BTreeMap<Entity, Vec<Vec3>>;

/// Transitions of the running dispatch pass that no callback has seen yet
#[derive(Debug, Default)]
pub(crate) struct PendingDispatch {
    /// Entities removed by a callback during this pass
    removed: BTreeSet<Entity>,
    enters: BTreeSet<(Entity, Entity)>,
    exits: BTreeSet<(Entity, Entity)>,
}

impl PendingDispatch {
    fn new(entered: &[TriggerEvent], exited: &[TriggerEvent]) -> Self {
        Self {
            removed: BTreeSet::new(),
            enters: entered.iter().map(|e| (e.subject, e.partner)).collect(),
            exits: exited.iter().map(|e| (e.subject, e.partner)).collect(),
        }
    }

    /// Claim `event` for delivery. False if a removal already settled it.
    fn take(&mut self, event: &TriggerEvent) -> bool {
        let pair = (event.subject, event.partner);
        let queued = match event.kind {
            TriggerEventKind::Enter => self.enters.remove(&pair),
            TriggerEventKind::Exit => self.exits.remove(&pair),
        };
        queued && !self.removed.contains(&event.subject) && !self.removed.contains(&event.partner)
    }

    /// Drop queued transitions of a subject whose collision set was reset
    pub(crate) fn forget_subject(&mut self, entity: Entity) {
        self.enters.retain(|&(subject, _)| subject != entity);
        self.exits.retain(|&(subject, _)| subject != entity);
    }

    /// Settle every queued transition involving `entity`, which is being
    /// removed.
    ///
    /// `own` and `tracking` arrive as the post-diff partners of `entity`
    /// and the volumes tracking it. They leave holding only the pairs whose
    /// callbacks saw an enter and have not yet seen the matching exit.
    pub(crate) fn settle(
        &mut self,
        entity: Entity,
        own: &mut BTreeSet<Entity>,
        tracking: &mut BTreeSet<Entity>,
    ) {
        self.removed.insert(entity);

        self.enters.retain(|&(subject, partner)| {
            if subject == entity {
                own.remove(&partner);
            } else if partner == entity {
                tracking.remove(&subject);
            } else {
                return true;
            }
            false
        });
        self.exits.retain(|&(subject, partner)| {
            if subject == entity {
                own.insert(partner);
            } else if partner == entity {
                tracking.insert(subject);
            } else {
                return true;
            }
            false
        });
    }
}

impl<W: TriggerWorld> TriggerSystem<W> {
    /// Run one tick of trigger tracking
    pub fn update(&mut self) {
        self.events.clear();

        self.reap();

        let anchors = self.resolve_anchors();
        let (entered, exited) = self.diff_collisions(&anchors);

        log::trace!(
            "Trigger tick: {} volumes, {} entered, {} exited",
            self.volumes.len(),
            entered.len(),
            exited.len()
        );

        self.dispatch(entered, exited);
        self.update_debug_draw();
    }

    /// Register [`update`](Self::update) on a schedule at trigger priority
    pub fn add_to_schedule(schedule: &mut Schedule<Self>)
    where
        W: 'static,
    {
        schedule.add_system("triggers", priority::TRIGGER, |system: &mut Self, _dt| {
            system.update()
        });
    }

    fn reap(&mut self) {
        let dead: Vec<Entity> = self
            .volumes
            .keys()
            .copied()
            .filter(|&e| !self.world.is_alive(e) || !self.world.has_trigger_volume(e))
            .collect();

        for entity in dead {
            log::debug!("Reaping trigger of {}", entity);
            self.purge(entity);
        }
    }

    fn resolve_anchors(&self) -> Anchors {
        self.volumes
            .iter()
            .filter(|(_, r)| r.volume.active)
            .map(|(&entity, r)| {
                let pose = self.world.world_pose(entity);
                (entity, resolve_world_positions(&pose, r.volume.areas()))
            })
            .collect()
    }

    fn diff_collisions(&mut self, anchors: &Anchors) -> (Vec<TriggerEvent>, Vec<TriggerEvent>) {
        let observer_layer = self.observer_layer_sharers();

        let mut current = BTreeMap::new();
        for (&subject, registration) in &self.volumes {
            let overlaps =
                self.overlaps_of(subject, &registration.volume, anchors, observer_layer.as_ref());
            current.insert(subject, overlaps);
        }

        let mut entered = Vec::new();
        let mut exited = Vec::new();
        for (subject, overlaps) in current {
            let previous = self.active_collisions.entry(subject).or_default();
            exited.extend(
                previous
                    .difference(&overlaps)
                    .map(|&partner| TriggerEvent::exit(subject, partner)),
            );
            entered.extend(
                overlaps
                    .difference(previous)
                    .map(|&partner| TriggerEvent::enter(subject, partner)),
            );
            *previous = overlaps;
        }

        (entered, exited)
    }

    /// The observer plus every other active volume sharing its layer
    fn observer_layer_sharers(&self) -> Option<(Entity, Vec<Entity>)> {
        let observer = self.observer()?;
        let layer = self.config.observer_layer;
        let sharers = self
            .volumes
            .iter()
            .filter(|(&e, r)| {
                e != observer && r.volume.active && accepts(layer, r.volume.layer_mask)
            })
            .map(|(&e, _)| e)
            .collect();
        Some((observer, sharers))
    }

    fn overlaps_of(
        &self,
        subject: Entity,
        volume: &TriggerVolume,
        anchors: &Anchors,
        observer_layer: Option<&(Entity, Vec<Entity>)>,
    ) -> BTreeSet<Entity> {
        let mut overlaps = BTreeSet::new();
        if !volume.active || volume.triggered_by_mask == 0 {
            return overlaps;
        }
        let Some(subject_anchors) = anchors.get(&subject) else {
            return overlaps;
        };

        // Only the observer can match; skip the full scan
        if let Some(&(observer, ref sharers)) = observer_layer {
            let shortcut = volume.triggered_by_mask == self.config.observer_layer
                && sharers.iter().all(|&e| e == subject);
            if shortcut {
                if observer != subject
                    && self.overlaps_pair(volume, subject_anchors, observer, anchors)
                {
                    overlaps.insert(observer);
                }
                return overlaps;
            }
        }

        for &other in self.volumes.keys() {
            if other != subject && self.overlaps_pair(volume, subject_anchors, other, anchors) {
                overlaps.insert(other);
            }
        }
        overlaps
    }

    fn overlaps_pair(
        &self,
        volume: &TriggerVolume,
        subject_anchors: &[Vec3],
        other: Entity,
        anchors: &Anchors,
    ) -> bool {
        let Some(target) = self.volumes.get(&other).map(|r| &r.volume) else {
            return false;
        };
        if !target.active || !volume.is_triggered_by(target) {
            return false;
        }
        let Some(target_anchors) = anchors.get(&other) else {
            return false;
        };

        volume
            .areas()
            .iter()
            .zip(subject_anchors)
            .any(|(area, &anchor)| {
                target
                    .areas()
                    .iter()
                    .zip(target_anchors)
                    .any(|(other, &other_anchor)| area.intersects(anchor, other, other_anchor))
            })
    }

    fn dispatch(&mut self, entered: Vec<TriggerEvent>, exited: Vec<TriggerEvent>) {
        self.pending = Some(PendingDispatch::new(&entered, &exited));

        for event in entered.into_iter().chain(exited) {
            let deliver = match self.pending.as_mut() {
                Some(pending) => pending.take(&event),
                None => true,
            };
            if !deliver || !self.contains(event.subject) {
                continue;
            }

            self.events.push(event);
            self.invoke(event.kind, event.subject, event.partner);
        }

        self.pending = None;
    }

    fn update_debug_draw(&mut self) {
        if !self.debug_draw {
            return;
        }

        let alpha = self.config.debug_alpha;
        let mut shapes = Vec::new();

        for (&entity, registration) in &self.volumes {
            let volume = &registration.volume;
            let areas = volume.areas();

            let handles = self.debug_handles.entry(entity).or_default();
            while handles.len() > areas.len() {
                if let Some(handle) = handles.pop() {
                    self.world.despawn(handle);
                }
            }
            while handles.len() < areas.len() {
                handles.push(self.world.spawn());
            }

            let color = if volume.active {
                volume.debug_color.unwrap_or(self.config.default_color)
            } else {
                self.config.inactive_color
            };
            let pose = self.world.world_pose(entity);
            let positions = resolve_world_positions(&pose, areas);

            for ((area, &position), &handle) in areas.iter().zip(&positions).zip(handles.iter()) {
                shapes.push(DebugShape {
                    handle,
                    owner: entity,
                    kind: DebugShapeKind::from(area),
                    position,
                    rgba: color.with_alpha(alpha),
                });
            }
        }

        self.world.draw_debug_shapes(&shapes);
    }
}
