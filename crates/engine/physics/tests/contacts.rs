//! Walls, ceilings, trigger volumes and the commit flush

mod common;

use std::cell::RefCell;
use std::rc::Rc;

use common::{assert_close, Harness, DT};
use devices::Key;
use math::Vector;
use mesh::primitives::cuboid;
use meshwalk_physics::{
    BodyId, CharacterControllerConfig, Command, ContactEvent, ContactHandler, PhysicsWorld,
};
use world::{CommandQueue, Simulated};

#[derive(Debug, Default, Clone, PartialEq)]
struct Tally {
    entered: Vec<BodyId>,
    left: Vec<BodyId>,
}

/// Handler that records volume callbacks into shared storage
struct Recorder(Rc<RefCell<Tally>>);

impl ContactHandler for Recorder {
    fn on_volume_start_touch(&mut self, body: BodyId) {
        self.0.borrow_mut().entered.push(body);
    }

    fn on_volume_end_touch(&mut self, body: BodyId) {
        self.0.borrow_mut().left.push(body);
    }
}

fn count(events: &[ContactEvent], pick: impl Fn(&ContactEvent) -> bool) -> usize {
    events.iter().filter(|e| pick(e)).count()
}

#[test]
fn test_wall_blocks_and_slides() {
    let mut harness = Harness::new();
    harness.add_ground();
    let wall = harness.add_surface(
        cuboid(Vector::new(10.0, -20.0, 0.0), Vector::new(12.0, 20.0, 10.0)).unwrap(),
        Vector::ZERO,
    );
    let config = CharacterControllerConfig::default();
    let mut controller = harness.add_controller(Vector::new(8.0, 0.0, 0.0), config.clone());
    let id = controller.body();
    harness.step(&mut controller);

    // Forward and left: diagonally into the wall
    controller.input_mut().press(Key::W);
    controller.input_mut().press(Key::A);
    let tangential = config.walk_speed * std::f64::consts::FRAC_1_SQRT_2 * DT;

    let mut events = Vec::new();
    let mut previous = harness.body(id).position;
    for _ in 0..12 {
        let report = harness.step(&mut controller);
        events.extend(report.events);
        let position = harness.body(id).position;
        assert!(position.x <= 10.0 + 1e-9, "penetrated the wall at {position}");
        // The along-wall part of the motion always survives
        assert_close(position.y - previous.y, tangential, 1e-9);
        previous = position;
    }

    assert_close(previous.x, 8.0 + 3.0 * tangential, 1e-9);
    assert!(harness.body(id).walls.contains(&wall));
    assert_eq!(
        count(&events, |e| matches!(e, ContactEvent::WallCollide { surface, .. } if *surface == wall)),
        1
    );
}

#[test]
fn test_wall_contact_fires_again_after_leaving() {
    let mut harness = Harness::new();
    harness.add_ground();
    let wall = harness.add_surface(
        cuboid(Vector::new(10.0, -20.0, 0.0), Vector::new(12.0, 20.0, 10.0)).unwrap(),
        Vector::ZERO,
    );
    let mut controller =
        harness.add_controller(Vector::new(9.0, 0.0, 0.0), CharacterControllerConfig::default());
    harness.step(&mut controller);

    let hits = |reports: Vec<meshwalk_physics::TickReport>| {
        reports
            .iter()
            .flat_map(|r| r.events.iter())
            .filter(|e| matches!(e, ContactEvent::WallCollide { surface, .. } if *surface == wall))
            .count()
    };

    controller.input_mut().press(Key::W);
    assert_eq!(hits(harness.run(&mut controller, 3)), 1);

    controller.input_mut().release(Key::W);
    controller.input_mut().press(Key::S);
    assert_eq!(hits(harness.run(&mut controller, 3)), 0);

    controller.input_mut().release(Key::S);
    controller.input_mut().press(Key::W);
    assert_eq!(hits(harness.run(&mut controller, 6)), 1);
}

#[test]
fn test_ramp_low_edge_is_walked_onto_not_collided() {
    let mut harness = Harness::new();
    harness.add_ground();
    let ramp = harness.add_surface(
        mesh::primitives::wedge(Vector::new(5.0, -5.0, 0.0), Vector::new(25.0, 5.0, 5.0)).unwrap(),
        Vector::ZERO,
    );
    let mut controller = harness.add_controller(Vector::ZERO, CharacterControllerConfig::default());
    let id = controller.body();
    harness.step(&mut controller);

    controller.input_mut().press(Key::W);
    let reports = harness.run(&mut controller, 10);
    let events: Vec<ContactEvent> = reports.into_iter().flat_map(|r| r.events).collect();

    assert_eq!(count(&events, |e| matches!(e, ContactEvent::WallCollide { .. })), 0);
    let body = harness.body(id);
    assert_eq!(body.floor, Some(ramp));
    assert!(body.position.x > 5.0);
    assert_close(body.position.z, (body.position.x - 5.0) * 0.25, 1e-9);
}

#[test]
fn test_ceiling_stops_rising_body() {
    let mut harness = Harness::new();
    let ground = harness.add_ground();
    let ceiling = harness.add_surface(
        cuboid(Vector::new(-10.0, -10.0, 8.0), Vector::new(10.0, 10.0, 9.0)).unwrap(),
        Vector::ZERO,
    );
    let mut controller = harness.add_controller(Vector::ZERO, CharacterControllerConfig::default());
    let id = controller.body();
    harness.step(&mut controller);

    controller.input_mut().press(Key::Space);
    let mut events = Vec::new();
    for _ in 0..20 {
        let report = harness.step(&mut controller);
        events.extend(report.events);
        let body = harness.body(id);
        assert!(body.head() <= 8.0 + 1e-9, "head went through the ceiling");
    }

    assert_eq!(
        count(&events, |e| matches!(e, ContactEvent::CeilingCollide { surface, .. } if *surface == ceiling)),
        1
    );
    assert_eq!(harness.body(id).floor, Some(ground));
}

#[test]
fn test_jump_into_low_ceiling_snaps_back_to_floor() {
    let mut harness = Harness::new();
    let ground = harness.add_ground();
    let ceiling = harness.add_surface(
        cuboid(Vector::new(-10.0, -10.0, 7.0), Vector::new(10.0, 10.0, 8.0)).unwrap(),
        Vector::ZERO,
    );
    let mut controller = harness.add_controller(Vector::ZERO, CharacterControllerConfig::default());
    let id = controller.body();
    harness.step(&mut controller);

    controller.input_mut().press(Key::Space);
    let report = harness.step(&mut controller);

    let body = harness.body(id);
    assert_eq!(body.floor, Some(ground));
    assert_eq!(body.position, Vector::ZERO);
    assert_eq!(body.velocity, Vector::ZERO);
    assert_eq!(body.vertical_velocity, 0.0);
    assert_eq!(
        report.events,
        vec![ContactEvent::CeilingCollide { body: id, surface: ceiling }]
    );
}

#[test]
fn test_walking_under_low_ceiling_is_blocked() {
    let mut harness = Harness::new();
    harness.add_ground();
    // Ramp rising along +X under a low slab
    let ramp = harness.add_surface(
        mesh::primitives::wedge(Vector::new(2.0, -10.0, 0.0), Vector::new(10.0, 10.0, 2.0)).unwrap(),
        Vector::ZERO,
    );
    let slab = harness.add_surface(
        cuboid(Vector::new(2.0, -10.0, 7.0), Vector::new(30.0, 10.0, 8.0)).unwrap(),
        Vector::ZERO,
    );
    let mut controller = harness.add_controller(Vector::ZERO, CharacterControllerConfig::default());
    let id = controller.body();
    harness.step(&mut controller);

    controller.input_mut().press(Key::W);
    let reports = harness.run(&mut controller, 30);
    let events: Vec<ContactEvent> = reports.into_iter().flat_map(|r| r.events).collect();

    let body = harness.body(id);
    assert!(body.is_grounded());
    assert!(body.head() <= 7.0 + 1e-9);
    assert!(body.position.x < 10.0);
    assert!(count(&events, |e| matches!(e, ContactEvent::CeilingCollide { surface, .. } if *surface == slab)) >= 1);
    assert_eq!(body.floor, Some(ramp));
}

#[test]
fn test_volume_enter_and_exit_fire_once() {
    let mut harness = Harness::new();
    harness.add_ground();
    let volume = harness.add_volume(
        cuboid(Vector::new(5.0, -5.0, 0.0), Vector::new(10.0, 5.0, 10.0)).unwrap(),
        Vector::ZERO,
    );
    let tally = Rc::new(RefCell::new(Tally::default()));
    harness
        .world
        .surface_mut(volume)
        .unwrap()
        .set_handler(Box::new(Recorder(Rc::clone(&tally))));

    let mut controller = harness.add_controller(Vector::ZERO, CharacterControllerConfig::default());
    let id = controller.body();
    harness.step(&mut controller);

    controller.input_mut().press(Key::W);
    let mut events = Vec::new();
    let mut inside_ticks = 0;
    for _ in 0..20 {
        let report = harness.step(&mut controller);
        events.extend(report.events);
        if harness.body(id).volumes.contains(&volume) {
            inside_ticks += 1;
        }
    }

    // Volumes never block
    assert_close(harness.body(id).position.x, 16.0, 1e-9);
    assert!(inside_ticks > 0);
    assert_eq!(
        events,
        vec![
            ContactEvent::VolumeStartTouch { body: id, surface: volume },
            ContactEvent::VolumeEndTouch { body: id, surface: volume },
        ]
    );
    assert_eq!(
        *tally.borrow(),
        Tally {
            entered: vec![id],
            left: vec![id],
        }
    );
}

#[test]
fn test_disabled_surface_is_ignored() {
    let mut harness = Harness::new();
    let ground = harness.add_ground();
    harness.world.surface_mut(ground).unwrap().set_enabled(false);
    let mut passive = harness.add_passive(Vector::new(0.0, 0.0, 1.0));
    let id = passive.body();

    harness.run(&mut passive, 10);

    assert!(!harness.body(id).is_grounded());
    assert!(harness.body(id).position.z < 0.0);
}

#[test]
fn test_cancelled_scan_leaves_world_untouched() {
    let mut harness = Harness::new();
    harness.add_ground();
    let mut controller =
        harness.add_controller(Vector::new(0.0, 0.0, 4.0), CharacterControllerConfig::default());
    let id = controller.body();
    let before = harness.body(id).clone();
    let entity = before.entity;

    controller.input_mut().press(Key::W);
    controller.scan(&harness.world, DT, DT);
    assert!(controller.pending().is_some());
    controller.cancel();

    let mut queue = CommandQueue::new();
    controller.update(&mut queue);
    assert!(queue.is_empty());
    let report = harness.world.apply(&mut queue);

    assert_eq!(report.applied, 0);
    assert_eq!(harness.body(id), &before);
    assert_eq!(harness.world.scene().position(entity), Some(before.position));
}

#[test]
fn test_discarded_queue_leaves_world_untouched() {
    let mut harness = Harness::new();
    let mut first = harness.add_passive(Vector::new(0.0, 0.0, 10.0));
    let mut second = harness.add_passive(Vector::new(5.0, 0.0, 10.0));

    first.scan(&harness.world, DT, DT);
    second.scan(&harness.world, DT, DT);
    let mut queue = CommandQueue::new();
    first.update(&mut queue);
    second.update(&mut queue);
    assert_eq!(queue.len(), 2);

    assert_eq!(queue.discard(), 2);
    assert_eq!(harness.world.apply(&mut queue).applied, 0);
    assert_eq!(harness.body(first.body()).vertical_velocity, 0.0);
    assert_eq!(harness.body(second.body()).vertical_velocity, 0.0);
}

#[test]
fn test_bodies_in_one_tick_see_the_pre_tick_world() {
    let mut harness = Harness::new();
    let mut first = harness.add_passive(Vector::new(0.0, 0.0, 10.0));
    let mut second = harness.add_passive(Vector::new(5.0, 0.0, 10.0));

    let mut objects: [&mut dyn Simulated<PhysicsWorld, Command>; 2] = [&mut first, &mut second];
    let report = harness.world.tick(&mut objects, DT, DT);

    assert_eq!(report.applied, 2);
    let a = harness.body(first.body());
    let b = harness.body(second.body());
    assert_eq!(a.vertical_velocity, b.vertical_velocity);
    assert_eq!(a.position.z, b.position.z);
}

#[test]
fn test_passive_body_below_kill_height_is_removable() {
    let mut harness = Harness::new();
    let id = harness.add_passive(Vector::new(0.0, 0.0, 0.0)).body();
    let mut passive = meshwalk_physics::PassiveBody::new(id).with_kill_height(-5.0);

    let mut ticks = 0;
    while !passive.ready_to_remove() && ticks < 50 {
        harness.step(&mut passive);
        ticks += 1;
    }
    assert!(passive.ready_to_remove());
    assert!(ticks < 50);
}
