use std::sync::Arc;

use parking_lot::Mutex;
use tripwire_ecs::{priority, Entity, Schedule, Scene};
use tripwire_math::{Pose, Vec3};
use tripwire_triggers::prelude::*;
use tripwire_triggers::TriggerEventKind::{Enter, Exit};

type Log = Arc<Mutex<Vec<(TriggerEventKind, Entity, Entity)>>>;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Trigger system over a scene whose player stands far from the origin
fn fresh() -> TriggerSystem<Scene> {
    init_logging();
    let mut triggers = TriggerSystem::new(Scene::new());
    let player = triggers.world().player();
    triggers
        .world_mut()
        .set_position(player, Vec3::new(100.0, 0.0, 0.0))
        .unwrap();
    triggers
}

fn record<W: TriggerWorld + 'static>(triggers: &mut TriggerSystem<W>, log: &Log, entity: Entity) {
    let enters = Arc::clone(log);
    triggers
        .set_on_enter(entity, move |_, other| {
            enters.lock().push((Enter, entity, other))
        })
        .unwrap();

    let exits = Arc::clone(log);
    triggers
        .set_on_exit(entity, move |_, other| {
            exits.lock().push((Exit, entity, other))
        })
        .unwrap();
}

/// Every exit in `log` must close an enter of the same pair
fn assert_balanced(log: &Log) {
    let mut open = std::collections::BTreeSet::new();
    for &(kind, subject, partner) in log.lock().iter() {
        match kind {
            Enter => assert!(open.insert((subject, partner)), "{subject} entered {partner} twice"),
            Exit => assert!(
                open.remove(&(subject, partner)),
                "{subject} left {partner} without entering"
            ),
        }
    }
}

fn spawn_box(triggers: &mut TriggerSystem<Scene>, at: Vec3, layer: u8, by: u8) -> Entity {
    let entity = triggers.world_mut().spawn_at(at);
    triggers.add_trigger(entity, TriggerVolume::new(layer, by).unwrap());
    entity
}

#[test]
fn test_two_boxes_enter_then_exit() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::new(0.5, 0.0, 0.0), LAYER_2, LAYER_1);
    record(&mut triggers, &log, a);
    record(&mut triggers, &log, b);

    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, a, b), (Enter, b, a)]);

    log.lock().clear();
    triggers
        .world_mut()
        .set_position(b, Vec3::new(2.0, 0.0, 0.0))
        .unwrap();
    triggers.update();
    assert_eq!(*log.lock(), vec![(Exit, a, b), (Exit, b, a)]);
}

#[test]
fn test_enter_fires_once_while_overlapping() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::new(-5.0, 0.0, 0.0), LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, a);

    triggers.update();
    assert!(log.lock().is_empty());

    triggers.world_mut().set_position(a, Vec3::ZERO).unwrap();
    for _ in 0..5 {
        triggers.update();
    }
    assert_eq!(*log.lock(), vec![(Enter, a, b)]);

    triggers
        .world_mut()
        .set_position(a, Vec3::new(-5.0, 0.0, 0.0))
        .unwrap();
    for _ in 0..3 {
        triggers.update();
    }
    assert_eq!(*log.lock(), vec![(Enter, a, b), (Exit, a, b)]);
}

#[test]
fn test_zero_triggered_by_mask_reports_nothing() {
    let mut triggers = fresh();
    let log = Log::default();

    let deaf = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, NO_LAYERS);
    let loud = spawn_box(&mut triggers, Vec3::ZERO, ALL_LAYERS, ALL_LAYERS);
    record(&mut triggers, &log, deaf);

    triggers.update();
    assert!(log.lock().is_empty());
    assert!(triggers.active_collisions(deaf).unwrap().is_empty());
    assert!(triggers.is_colliding(loud, deaf));
}

#[test]
fn test_remove_trigger_fires_own_then_partner_exits() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, a);
    record(&mut triggers, &log, b);
    triggers.update();
    log.lock().clear();

    triggers.remove_trigger(a).unwrap();
    assert_eq!(*log.lock(), vec![(Exit, a, b), (Exit, b, a)]);
    assert!(!triggers.is_colliding(b, a));

    log.lock().clear();
    for _ in 0..3 {
        triggers.update();
    }
    assert!(log.lock().is_empty());
    assert_eq!(
        triggers.remove_trigger(a),
        Err(TriggerError::UnregisteredEntity(a))
    );
}

#[test]
fn test_despawned_entity_is_reaped_like_removal() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, a);
    record(&mut triggers, &log, b);
    triggers.update();
    log.lock().clear();

    triggers.world_mut().despawn(a);
    triggers.update();

    assert_eq!(*log.lock(), vec![(Exit, a, b), (Exit, b, a)]);
    assert!(!triggers.contains(a));
    assert!(triggers.events().iter().all(|e| e.is_exit()));
    assert_eq!(triggers.events().len(), 2);
}

#[test]
fn test_detached_component_is_reaped() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, b);
    triggers.update();
    log.lock().clear();

    triggers.world_mut().detach_trigger_volume(a);
    triggers.update();

    assert_eq!(*log.lock(), vec![(Exit, b, a)]);
    assert!(!triggers.contains(a));
    assert!(triggers.world().is_alive(a));
}

#[test]
fn test_layer_mask_validation() {
    let mut triggers = fresh();
    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);

    assert!(matches!(
        triggers.set_layer_mask(a, 256),
        Err(TriggerError::InvalidArgument(_))
    ));
    assert!(matches!(
        triggers.set_layer_mask(a, -1),
        Err(TriggerError::InvalidArgument(_))
    ));
    assert!(matches!(
        triggers.set_triggered_by_mask(a, 2.5),
        Err(TriggerError::InvalidArgument(_))
    ));
    assert_eq!(triggers.layer_mask(a), Ok(LAYER_1));

    triggers.set_layer_mask(a, 0).unwrap();
    assert_eq!(triggers.layer_mask(a), Ok(0));
}

#[test]
fn test_one_time_trigger_removes_itself() {
    let mut triggers = fresh();
    let log = Log::default();

    let walker = spawn_box(&mut triggers, Vec3::new(-5.0, 0.0, 0.0), LAYER_2, LAYER_1);
    record(&mut triggers, &log, walker);

    let pickup = triggers.world_mut().spawn_at(Vec3::ZERO);
    let hits = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&hits);
    triggers.one_time_trigger(
        pickup,
        TriggerVolume::new(LAYER_1, LAYER_2).unwrap(),
        move |system, other| {
            assert!(!system.contains(pickup));
            sink.lock().push(other);
        },
    );

    triggers.update();
    assert!(hits.lock().is_empty());

    triggers.world_mut().set_position(walker, Vec3::ZERO).unwrap();
    triggers.update();
    assert_eq!(*hits.lock(), vec![walker]);
    assert!(!triggers.contains(pickup));

    // Walker dispatches first, then sees the pickup leave when it removes itself
    assert_eq!(
        *log.lock(),
        vec![(Enter, walker, pickup), (Exit, walker, pickup)]
    );

    triggers.update();
    assert_eq!(hits.lock().len(), 1);
}

#[test]
fn test_callback_removing_partner_during_dispatch() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, b);

    let a_log = Arc::clone(&log);
    triggers
        .set_on_enter(a, move |system, other| {
            a_log.lock().push((Enter, a, other));
            system.remove_trigger(other).unwrap();
        })
        .unwrap();
    let a_exit = Arc::clone(&log);
    triggers
        .set_on_exit(a, move |_, other| a_exit.lock().push((Exit, a, other)))
        .unwrap();

    triggers.update();

    // b's enter was still queued when it was removed, so b hears nothing
    assert_eq!(*log.lock(), vec![(Enter, a, b), (Exit, a, b)]);
    assert_balanced(&log);
    assert!(!triggers.contains(b));
    assert_eq!(triggers.has_on_enter_callback(a), Ok(true));

    log.lock().clear();
    triggers.update();
    assert!(log.lock().is_empty());
}

#[test]
fn test_watcher_of_removed_one_time_trigger_stays_balanced() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = triggers.world_mut().spawn_at(Vec3::ZERO);
    let b = triggers.world_mut().spawn_at(Vec3::ZERO);
    for (entity, layer, by) in [(a, LAYER_2, LAYER_3), (b, LAYER_3, LAYER_2)] {
        let sink = Arc::clone(&log);
        triggers.one_time_trigger(
            entity,
            TriggerVolume::new(layer, by).unwrap(),
            move |_, other| sink.lock().push((Enter, entity, other)),
        );
    }
    let watcher = spawn_box(&mut triggers, Vec3::ZERO, LAYER_4, LAYER_2);
    record(&mut triggers, &log, watcher);

    triggers.update();

    // a claims the pair first; b and the watcher never saw a arrive
    assert_eq!(*log.lock(), vec![(Enter, a, b)]);
    assert_balanced(&log);
    assert!(!triggers.contains(a));
    assert!(triggers.contains(b));
    assert!(!triggers.is_colliding(watcher, a));

    triggers.update();
    assert_eq!(log.lock().len(), 1);
}

#[test]
fn test_queued_exit_is_delivered_when_partner_is_removed() {
    let mut triggers = fresh();
    let log = Log::default();

    let target = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, 0);
    let leaver = spawn_box(&mut triggers, Vec3::ZERO, LAYER_3, LAYER_2);
    record(&mut triggers, &log, leaver);

    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, leaver, target)]);

    // Same tick: leaver walks off while a newcomer removes the target
    triggers
        .world_mut()
        .set_position(leaver, Vec3::new(5.0, 0.0, 0.0))
        .unwrap();
    let remover = spawn_box(&mut triggers, Vec3::ZERO, LAYER_4, LAYER_2);
    triggers
        .set_on_enter(remover, |system, other| system.remove_trigger(other).unwrap())
        .unwrap();

    triggers.update();
    assert_eq!(
        *log.lock(),
        vec![(Enter, leaver, target), (Exit, leaver, target)]
    );
    assert_balanced(&log);
    assert!(!triggers.contains(target));
}

#[test]
fn test_mask_change_in_callback_applies_next_tick() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, b);

    triggers
        .set_on_enter(a, move |system, _| system.set_layer_mask(a, 0).unwrap())
        .unwrap();

    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, b, a)]);

    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, b, a), (Exit, b, a)]);
}

#[test]
fn test_readding_resets_own_collisions() {
    let mut triggers = fresh();
    let log = Log::default();

    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, LAYER_1);
    record(&mut triggers, &log, a);
    record(&mut triggers, &log, b);
    triggers.update();
    log.lock().clear();

    triggers.add_trigger(a, TriggerVolume::new(LAYER_1, LAYER_2).unwrap());
    record(&mut triggers, &log, a);
    triggers.update();

    assert_eq!(*log.lock(), vec![(Enter, a, b)]);
}

#[test]
fn test_observer_volume() {
    let mut triggers = fresh();
    let log = Log::default();
    let player = triggers.world().player();
    assert_eq!(triggers.observer(), Some(player));

    let zone = triggers.world_mut().spawn_at(Vec3::ZERO);
    triggers.add_trigger(
        zone,
        TriggerVolume::new(LAYER_4, PLAYER_LAYER_ID)
            .unwrap()
            .with_areas(vec![TriggerArea::sphere(Vec3::ZERO, 2.0)]),
    );
    record(&mut triggers, &log, zone);

    triggers.update();
    assert!(log.lock().is_empty());

    triggers
        .world_mut()
        .set_position(player, Vec3::new(1.0, 0.0, 0.0))
        .unwrap();
    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, zone, player)]);
    assert!(triggers.active_collisions(player).unwrap().is_empty());

    triggers
        .world_mut()
        .set_position(player, Vec3::new(100.0, 0.0, 0.0))
        .unwrap();
    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, zone, player), (Exit, zone, player)]);
}

#[test]
fn test_anchor_follows_parent_pose() {
    let mut triggers = fresh();
    let log = Log::default();

    let carrier = triggers.world_mut().spawn_at(Vec3::new(-10.0, 0.0, 0.0));
    let sensor = spawn_box(&mut triggers, Vec3::new(1.0, 0.0, 0.0), LAYER_1, LAYER_2);
    triggers
        .world_mut()
        .set_parent(sensor, Some(carrier))
        .unwrap();
    let target = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, 0);
    record(&mut triggers, &log, sensor);

    triggers.update();
    assert!(log.lock().is_empty());

    triggers
        .world_mut()
        .set_position(carrier, Vec3::new(-1.0, 0.0, 0.0))
        .unwrap();
    triggers.update();
    assert_eq!(*log.lock(), vec![(Enter, sensor, target)]);
}

#[test]
fn test_events_are_queryable() {
    let mut triggers = fresh();
    let a = spawn_box(&mut triggers, Vec3::ZERO, LAYER_1, LAYER_2);
    let b = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, 0);

    triggers.update();
    assert_eq!(triggers.events(), &[TriggerEvent::enter(a, b)]);

    let drained = triggers.drain_events();
    assert_eq!(drained.len(), 1);
    assert!(triggers.events().is_empty());

    let json = serde_json::to_value(drained[0]).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "kind": "Enter",
            "subject": { "slot": 1, "generation": 0 },
            "partner": { "slot": 2, "generation": 0 },
        })
    );
    let parsed: TriggerEvent = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, drained[0]);
}

/// Scene wrapper that keeps whatever the trigger system asks it to draw
#[derive(Default)]
struct DrawingScene {
    scene: Scene,
    frames: Vec<Vec<DebugShape>>,
}

impl PoseSource for DrawingScene {
    fn world_pose(&self, entity: Entity) -> Pose {
        self.scene.world_pose(entity)
    }
}

impl EntityStore for DrawingScene {
    fn is_alive(&self, entity: Entity) -> bool {
        self.scene.is_alive(entity)
    }

    fn has_trigger_volume(&self, entity: Entity) -> bool {
        self.scene.has_trigger_volume(entity)
    }

    fn attach_trigger_volume(&mut self, entity: Entity) {
        self.scene.attach_trigger_volume(entity);
    }

    fn detach_trigger_volume(&mut self, entity: Entity) {
        self.scene.detach_trigger_volume(entity);
    }

    fn spawn(&mut self) -> Entity {
        self.scene.spawn()
    }

    fn despawn(&mut self, entity: Entity) {
        self.scene.despawn(entity);
    }

    fn local_observer(&self) -> Option<Entity> {
        Some(self.scene.player())
    }
}

impl DebugRenderer for DrawingScene {
    fn draw_debug_shapes(&mut self, shapes: &[DebugShape]) {
        self.frames.push(shapes.to_vec());
    }
}

#[test]
fn test_debug_draw_tracks_areas() {
    init_logging();
    let config = TriggerConfig::default().with_debug_draw(true);
    let mut triggers = TriggerSystem::with_config(DrawingScene::default(), config).unwrap();
    assert!(triggers.is_debug_draw_enabled());
    let baseline = triggers.world().scene.entity_count();

    let zone = triggers.world_mut().scene.spawn_at(Vec3::new(0.0, 0.0, 5.0));
    triggers.add_trigger(
        zone,
        TriggerVolume::new(LAYER_2, LAYER_1)
            .unwrap()
            .with_areas(vec![
                TriggerArea::unit_box(),
                TriggerArea::sphere(Vec3::new(0.0, 2.0, 0.0), 0.5),
            ])
            .with_debug_color(DebugColor::BLUE),
    );

    triggers.update();
    let frame = triggers.world().frames.last().cloned().unwrap();
    assert_eq!(frame.len(), 3);
    assert_eq!(triggers.debug_handles(zone).len(), 2);
    assert_eq!(triggers.world().scene.entity_count(), baseline + 1 + 3);

    let sphere = frame
        .iter()
        .find(|s| s.owner == zone && matches!(s.kind, DebugShapeKind::Sphere { .. }))
        .unwrap();
    assert_eq!(sphere.position, Vec3::new(0.0, 2.0, 5.0));
    assert_eq!(sphere.rgba, DebugColor::BLUE.with_alpha(75.0 / 255.0));

    let player = triggers.world().scene.player();
    let observer_shape = frame.iter().find(|s| s.owner == player).unwrap();
    assert_eq!(observer_shape.rgba[..3], [0.0, 1.0, 0.0]);

    triggers.enable_trigger(zone, false).unwrap();
    triggers.set_areas(zone, vec![TriggerArea::unit_box()]).unwrap();
    triggers.update();
    let frame = triggers.world().frames.last().cloned().unwrap();
    assert_eq!(frame.len(), 2);
    assert_eq!(triggers.debug_handles(zone).len(), 1);
    let zone_shape = frame.iter().find(|s| s.owner == zone).unwrap();
    assert_eq!(zone_shape.rgba[..3], [0.0, 0.0, 0.0]);

    triggers.enable_debug_draw(false);
    assert!(triggers.debug_handles(zone).is_empty());
    assert_eq!(triggers.world().scene.entity_count(), baseline + 1);

    let frames = triggers.world().frames.len();
    triggers.update();
    assert_eq!(triggers.world().frames.len(), frames);
}

#[test]
fn test_debug_draw_uses_configured_default_color() {
    init_logging();
    let config = TriggerConfig::default()
        .with_debug_draw(true)
        .with_default_color(DebugColor::BLUE)
        .with_debug_alpha(0.5);
    let mut triggers = TriggerSystem::with_config(DrawingScene::default(), config).unwrap();

    let plain = triggers.world_mut().scene.spawn();
    triggers.add_trigger(plain, TriggerVolume::new(LAYER_2, 0).unwrap());
    let tinted = triggers.world_mut().scene.spawn();
    triggers.add_trigger(
        tinted,
        TriggerVolume::new(LAYER_2, 0)
            .unwrap()
            .with_debug_color(DebugColor::WHITE),
    );

    triggers.update();
    let frame = triggers.world().frames.last().cloned().unwrap();
    let color_of = |owner| frame.iter().find(|s| s.owner == owner).unwrap().rgba;
    assert_eq!(color_of(plain), [0.0, 0.0, 1.0, 0.5]);
    assert_eq!(color_of(tinted), [1.0, 1.0, 1.0, 0.5]);

    triggers.set_debug_color(plain, DebugColor::GREEN).unwrap();
    triggers.update();
    let frame = triggers.world().frames.last().cloned().unwrap();
    let shape = frame.iter().find(|s| s.owner == plain).unwrap();
    assert_eq!(shape.rgba, DebugColor::GREEN.with_alpha(0.5));
}

#[test]
fn test_removal_despawns_debug_handles() {
    let config = TriggerConfig::default().with_debug_draw(true);
    let mut triggers = TriggerSystem::with_config(Scene::new(), config).unwrap();
    let zone = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, 0);

    triggers.update();
    let handles = triggers.debug_handles(zone).to_vec();
    assert_eq!(handles.len(), 1);

    triggers.remove_trigger(zone).unwrap();
    assert!(!triggers.world().is_alive(handles[0]));
}

#[test]
fn test_config_round_trip() {
    let config = TriggerConfig::default()
        .with_debug_draw(true)
        .with_observer_layer(LAYER_3)
        .with_observer_area(TriggerArea::sphere(Vec3::new(0.0, 1.0, 0.0), 0.5));

    let json = serde_json::to_string(&config).unwrap();
    let parsed: TriggerConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, config);

    let partial: TriggerConfig = serde_json::from_str(r#"{ "debug_draw": true }"#).unwrap();
    assert!(partial.debug_draw);
    assert_eq!(partial.observer_layer, PLAYER_LAYER_ID);

    assert!(serde_json::from_str::<TriggerConfig>(r#"{ "observer_layer": 256 }"#).is_err());
}

#[test]
fn test_schedule_runs_movers_before_triggers() {
    let mut triggers = fresh();
    let log = Log::default();

    let mover = spawn_box(&mut triggers, Vec3::new(-5.0, 0.0, 0.0), LAYER_1, LAYER_2);
    let goal = spawn_box(&mut triggers, Vec3::ZERO, LAYER_2, 0);
    record(&mut triggers, &log, mover);

    let mut schedule: Schedule<TriggerSystem<Scene>> = Schedule::new();
    TriggerSystem::add_to_schedule(&mut schedule);
    schedule.add_system("slide", priority::TWEEN, move |system, dt| {
        let scene = system.world_mut();
        let x = scene.world_position(mover).x + 5.0 * dt;
        scene.set_position(mover, Vec3::new(x, 0.0, 0.0)).unwrap();
    });

    let names: Vec<&str> = schedule.system_names().collect();
    assert_eq!(names, vec!["slide", "triggers"]);

    schedule.run(&mut triggers, 0.5);
    assert!(log.lock().is_empty());
    schedule.run(&mut triggers, 0.5);
    assert_eq!(*log.lock(), vec![(Enter, mover, goal)]);
}
