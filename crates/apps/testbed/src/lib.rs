//! Headless physics testbed
//!
//! Builds a small demo course (ground, ramp, wall, an overhead bridge and a
//! trigger volume), places a character controller on it and replays a
//! timeline of input events at a fixed step. Trajectory samples and contact
//! events go to the log.
//!
//! Runs are configured from TOML; every field is optional:
//!
//! ```toml
//! dt = 0.02
//! duration = 6.0
//!
//! [controller]
//! walk_speed = 12.0
//!
//! [[script]]
//! time = 0.0
//! event = { Press = { Key = "W" } }
//! ```

use devices::{Button, InputBackend, InputEvent, Key, ScriptedBackend, TimedInput};
use math::Vector;
use mesh::primitives::{cuboid, wedge};
use meshwalk_physics::{
    BodyId, CharacterController, CharacterControllerConfig, Command, ContactEvent, ContactHandler,
    ControllerBindings, PhysicsBody, PhysicsConfig, PhysicsError, PhysicsWorld, SurfaceId,
    TickReport,
};
use serde::{Deserialize, Serialize};
use world::{Entity, EntityId, Simulated};

/// Settings for one scripted run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TestbedConfig {
    pub physics: PhysicsConfig,
    pub controller: CharacterControllerConfig,
    pub bindings: ControllerBindings,
    /// Fixed step in seconds
    pub dt: f64,
    /// Run length in seconds; one second past the last scripted input when unset
    pub duration: Option<f64>,
    /// Seconds between trajectory log lines
    pub log_interval: f64,
    pub script: Vec<TimedInput>,
}

impl Default for TestbedConfig {
    fn default() -> Self {
        Self {
            physics: PhysicsConfig::default(),
            controller: CharacterControllerConfig::default(),
            bindings: ControllerBindings::default(),
            dt: 1.0 / 60.0,
            duration: None,
            log_interval: 0.25,
            script: default_script(),
        }
    }
}

impl TestbedConfig {
    /// Parse a config from TOML text
    pub fn from_toml(text: &str) -> meshwalk_physics::Result<Self> {
        meshwalk_physics::from_toml_str(text)
    }

    /// Load a config from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> meshwalk_physics::Result<Self> {
        meshwalk_physics::load_toml(path)
    }

    /// Total simulated time for this config
    pub fn run_duration(&self) -> f64 {
        self.duration.unwrap_or_else(|| {
            let last = self.script.iter().map(|input| input.time).fold(0.0, f64::max);
            last + 1.0
        })
    }
}

fn press(time: f64, key: Key) -> TimedInput {
    TimedInput::new(time, InputEvent::Press(Button::Key(key)))
}

fn release(time: f64, key: Key) -> TimedInput {
    TimedInput::new(time, InputEvent::Release(Button::Key(key)))
}

/// Walk up the ramp, jump near its top, turn left and walk through the
/// trigger into the wall
pub fn default_script() -> Vec<TimedInput> {
    vec![
        press(0.0, Key::W),
        press(1.5, Key::Space),
        release(1.6, Key::Space),
        release(2.5, Key::W),
        press(2.5, Key::Left),
        release(3.1, Key::Left),
        press(3.1, Key::W),
        release(5.1, Key::W),
    ]
}

/// Surfaces of the demo course
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoCourse {
    pub ground: SurfaceId,
    pub ramp: SurfaceId,
    pub wall: SurfaceId,
    pub bridge: SurfaceId,
    pub trigger: SurfaceId,
}

impl DemoCourse {
    /// Build the course into `world`
    ///
    /// The player starts at the origin facing +X. The ramp rises from
    /// `x = 10` to `x = 30`, the wall runs along `y = 30` and the trigger
    /// volume spans `10 <= y <= 20`.
    pub fn build(world: &mut PhysicsWorld) -> meshwalk_physics::Result<Self> {
        let ground = add_solid(world, Vector::new(-60.0, -60.0, -1.0), Vector::new(60.0, 60.0, 0.0))?;
        let ramp = {
            let entity = world.scene_mut().spawn(Entity::new());
            world.add_surface(entity, wedge(Vector::new(10.0, -5.0, 0.0), Vector::new(30.0, 5.0, 5.0))?)?
        };
        let wall = add_solid(world, Vector::new(-60.0, 30.0, 0.0), Vector::new(60.0, 32.0, 12.0))?;
        let bridge = add_solid(world, Vector::new(30.0, -5.0, 12.0), Vector::new(50.0, 5.0, 13.0))?;

        let entity = world.scene_mut().spawn(Entity::new());
        let trigger = world.add_volume(
            entity,
            cuboid(Vector::new(20.0, 10.0, 0.0), Vector::new(60.0, 20.0, 10.0))?,
        )?;
        world
            .surface_mut(trigger)?
            .set_handler(Box::new(TriggerAlarm { name: "trigger" }));

        Ok(Self {
            ground,
            ramp,
            wall,
            bridge,
            trigger,
        })
    }

    /// Human-readable name of a course surface
    pub fn name_of(&self, surface: SurfaceId) -> &'static str {
        match surface {
            s if s == self.ground => "ground",
            s if s == self.ramp => "ramp",
            s if s == self.wall => "wall",
            s if s == self.bridge => "bridge",
            s if s == self.trigger => "trigger",
            _ => "unknown",
        }
    }
}

fn add_solid(world: &mut PhysicsWorld, min: Vector, max: Vector) -> meshwalk_physics::Result<SurfaceId> {
    let entity = world.scene_mut().spawn(Entity::new());
    world.add_surface(entity, cuboid(min, max)?)
}

/// Logs bodies entering and leaving a volume
struct TriggerAlarm {
    name: &'static str,
}

impl ContactHandler for TriggerAlarm {
    fn on_volume_start_touch(&mut self, body: BodyId) {
        tracing::info!(volume = self.name, %body, "entered volume");
    }

    fn on_volume_end_touch(&mut self, body: BodyId) {
        tracing::info!(volume = self.name, %body, "left volume");
    }
}

/// Outcome of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub ticks: usize,
    pub elapsed: f64,
    pub events: Vec<ContactEvent>,
    pub final_body: PhysicsBody,
    /// World position of the eye entity attached above the body
    pub eye: Vector,
}

impl RunSummary {
    /// Number of events matching `predicate`
    pub fn count(&self, predicate: impl Fn(&ContactEvent) -> bool) -> usize {
        self.events.iter().filter(|event| predicate(event)).count()
    }
}

/// A world, its player and the input script driving it
pub struct Testbed {
    world: PhysicsWorld,
    course: DemoCourse,
    controller: CharacterController,
    eye: EntityId,
    backend: ScriptedBackend,
    dt: f64,
    log_interval: f64,
    time: f64,
}

impl Testbed {
    /// Build the demo course and spawn the player at the origin
    pub fn new(config: &TestbedConfig) -> meshwalk_physics::Result<Self> {
        let mut world = PhysicsWorld::new(config.physics);
        let course = DemoCourse::build(&mut world)?;

        let player = world.scene_mut().spawn(Entity::at_position(Vector::ZERO));
        let eye = world.scene_mut().spawn_child(
            player,
            Entity::at_position(Vector::new(0.0, 0.0, config.controller.height)),
        )?;
        let body = world.add_body(player, config.controller.height)?;
        let controller = CharacterController::new(body, config.controller.clone())
            .with_bindings(config.bindings.clone());

        Ok(Self {
            world,
            course,
            controller,
            eye,
            backend: ScriptedBackend::new(config.script.clone()),
            dt: config.dt,
            log_interval: config.log_interval,
            time: 0.0,
        })
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn course(&self) -> &DemoCourse {
        &self.course
    }

    pub fn controller(&self) -> &CharacterController {
        &self.controller
    }

    /// Seconds simulated so far
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn player(&self) -> meshwalk_physics::Result<&PhysicsBody> {
        let id = self.controller.body();
        self.world.body(id).ok_or(PhysicsError::UnknownBody(id))
    }

    /// Apply due input and advance one fixed step
    pub fn step(&mut self) -> TickReport {
        self.backend.poll(self.controller.input_mut(), self.time);
        self.time += self.dt;
        let mut objects: [&mut dyn Simulated<PhysicsWorld, Command>; 1] = [&mut self.controller];
        self.world.tick(&mut objects, self.dt, self.time)
    }

    /// Step until `duration` seconds have been simulated
    pub fn run(&mut self, duration: f64) -> meshwalk_physics::Result<RunSummary> {
        let mut ticks = 0;
        let mut events = Vec::new();
        let mut next_sample = 0.0;

        while self.time + self.dt * 0.5 < duration {
            let report = self.step();
            ticks += 1;

            for event in &report.events {
                tracing::info!(
                    time = self.time,
                    surface = self.course.name_of(event.surface()),
                    ?event,
                    "contact"
                );
            }
            events.extend(report.events);

            if self.time >= next_sample {
                let body = self.player()?;
                tracing::info!(
                    time = %format!("{:.2}", self.time),
                    position = %body.position,
                    speed = %format!("{:.2}", body.total_velocity().magnitude()),
                    grounded = body.is_grounded(),
                    "player"
                );
                next_sample += self.log_interval;
            }
        }

        let final_body = self.player()?.clone();
        let eye = self
            .world
            .scene()
            .position(self.eye)
            .unwrap_or(final_body.position);
        Ok(RunSummary {
            ticks,
            elapsed: self.time,
            events,
            final_body,
            eye,
        })
    }
}
