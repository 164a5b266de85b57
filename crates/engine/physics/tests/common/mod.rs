//! Scene building helpers shared by the integration tests

#![allow(dead_code)]

use math::{Rotation, Vector};
use mesh::primitives::cuboid;
use mesh::Mesh;
use meshwalk_physics::{
    BodyId, CharacterController, CharacterControllerConfig, Command, PassiveBody, PhysicsBody,
    PhysicsConfig, PhysicsWorld, SurfaceId, TickReport,
};
use world::{Entity, Simulated};

/// Fixed step used by most tests
pub const DT: f64 = 0.05;

pub struct Harness {
    pub world: PhysicsWorld,
    pub time: f64,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            world: PhysicsWorld::new(PhysicsConfig::default()),
            time: 0.0,
        }
    }

    /// Solid surface whose entity sits at `position`
    pub fn add_surface(&mut self, mesh: Mesh, position: Vector) -> SurfaceId {
        self.add_rotated_surface(mesh, position, Rotation::ZERO)
    }

    pub fn add_rotated_surface(&mut self, mesh: Mesh, position: Vector, rotation: Rotation) -> SurfaceId {
        let entity = self
            .world
            .scene_mut()
            .spawn(Entity::with_transform(position, rotation));
        self.world.add_surface(entity, mesh).unwrap()
    }

    pub fn add_volume(&mut self, mesh: Mesh, position: Vector) -> SurfaceId {
        let entity = self.world.scene_mut().spawn(Entity::at_position(position));
        self.world.add_volume(entity, mesh).unwrap()
    }

    /// Large flat floor with its top at `z = 0`
    pub fn add_ground(&mut self) -> SurfaceId {
        let mesh = cuboid(Vector::new(-50.0, -50.0, -1.0), Vector::new(50.0, 50.0, 0.0)).unwrap();
        self.add_surface(mesh, Vector::ZERO)
    }

    pub fn add_controller(&mut self, position: Vector, config: CharacterControllerConfig) -> CharacterController {
        let entity = self.world.scene_mut().spawn(Entity::at_position(position));
        let body = self.world.add_body(entity, config.height).unwrap();
        CharacterController::new(body, config)
    }

    pub fn add_passive(&mut self, position: Vector) -> PassiveBody {
        let entity = self.world.scene_mut().spawn(Entity::at_position(position));
        PassiveBody::new(self.world.add_body(entity, 6.0).unwrap())
    }

    pub fn body(&self, id: BodyId) -> &PhysicsBody {
        self.world.body(id).unwrap()
    }

    /// Advance one tick of `dt` with a single object
    pub fn step_by(&mut self, object: &mut dyn Simulated<PhysicsWorld, Command>, dt: f64) -> TickReport {
        self.time += dt;
        self.world.tick(&mut [object], dt, self.time)
    }

    pub fn step(&mut self, object: &mut dyn Simulated<PhysicsWorld, Command>) -> TickReport {
        self.step_by(object, DT)
    }

    /// Run `ticks` steps, collecting every report
    pub fn run(&mut self, object: &mut dyn Simulated<PhysicsWorld, Command>, ticks: usize) -> Vec<TickReport> {
        (0..ticks).map(|_| self.step(object)).collect()
    }
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
