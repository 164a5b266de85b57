//! Input-driven control of a physics body
//!
//! The controller turns look axes into yaw/pitch deltas, walk axes into a
//! desired velocity and the jump button into an impulse along the floor
//! normal. The adjusted body is then handed to the integrator, so collision
//! resolution sees the player's intent for this tick.

use std::f64::consts::FRAC_PI_2;

use devices::{Axis, AxisExpr, Button, ButtonEvent, InputState, Key};
use math::{greater_or_close, Rotation, Vector};
use serde::{Deserialize, Serialize};
use world::{CommandQueue, Simulated};

use crate::body::{BodyId, PhysicsBody};
use crate::command::Command;
use crate::integrator::Proposal;
use crate::surface::SurfacePoint;
use crate::world::PhysicsWorld;

/// How look axes become rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LookMode {
    /// Turn by the axis change since the last read (mouse-like)
    Delta,
    /// Turn at a rate proportional to the axis value (stick-like)
    #[default]
    Rate,
}

/// Configuration for character controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterControllerConfig {
    /// Ground speed at full input, units per second
    pub walk_speed: f64,
    /// Fraction of walk speed available while airborne
    pub air_control: f64,
    /// Jump impulse along the floor normal
    pub jump_velocity: f64,
    /// Steepest walkable slope in degrees; `None` makes every floor a slide
    pub max_walk_angle: Option<f64>,
    /// Idle decay constant while grounded
    pub ground_friction: f64,
    /// Idle decay constant while airborne
    pub air_drag: f64,
    pub look_mode: LookMode,
    /// Radians per unit of axis change (delta) or per second at full
    /// deflection (rate)
    pub look_sensitivity: f64,
    /// Vertical extent of the body
    pub height: f64,
}

impl Default for CharacterControllerConfig {
    fn default() -> Self {
        Self {
            walk_speed: 16.0,
            air_control: 0.5,
            jump_velocity: 32.0,
            max_walk_angle: Some(45.0),
            ground_friction: 12.0,
            air_drag: 0.5,
            look_mode: LookMode::Rate,
            look_sensitivity: 2.5,
            height: 6.0,
        }
    }
}

impl CharacterControllerConfig {
    /// Cosine of the steepest walkable slope, if slopes are walkable at all
    pub fn min_walk_normal_z(&self) -> Option<f64> {
        self.max_walk_angle.map(|degrees| degrees.to_radians().cos())
    }
}

/// Inputs a controller reads each tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerBindings {
    /// Positive turns right
    pub look_x: Axis,
    /// Positive looks up
    pub look_y: Axis,
    /// Positive strafes right
    pub walk_x: Axis,
    /// Positive walks forward
    pub walk_y: Axis,
    pub jump: Button,
}

impl Default for ControllerBindings {
    fn default() -> Self {
        Self {
            look_x: AxisExpr::analog(0).plus(AxisExpr::key_pair(Key::Right, Key::Left)).into(),
            look_y: AxisExpr::analog(1).plus(AxisExpr::key_pair(Key::Up, Key::Down)).into(),
            walk_x: AxisExpr::analog(2).plus(AxisExpr::key_pair(Key::D, Key::A)).into(),
            walk_y: AxisExpr::analog(3).plus(AxisExpr::key_pair(Key::W, Key::S)).into(),
            jump: Button::Key(Key::Space),
        }
    }
}

/// Player-controlled body
///
/// Owns the input snapshot it reads; backends write into it through
/// [`CharacterController::input_mut`] before each tick.
#[derive(Debug)]
pub struct CharacterController {
    body: BodyId,
    config: CharacterControllerConfig,
    bindings: ControllerBindings,
    input: InputState,
    pending: Option<(Proposal, Rotation)>,
    removable: bool,
}

impl CharacterController {
    /// Create a controller for an existing body
    ///
    /// # Arguments
    /// * `body` - Body in the world this controller drives
    /// * `config` - Movement tuning
    pub fn new(body: BodyId, config: CharacterControllerConfig) -> Self {
        Self {
            body,
            config,
            bindings: ControllerBindings::default(),
            input: InputState::new(),
            pending: None,
            removable: false,
        }
    }

    pub fn with_bindings(mut self, bindings: ControllerBindings) -> Self {
        self.bindings = bindings;
        self
    }

    pub fn body(&self) -> BodyId {
        self.body
    }

    pub fn config(&self) -> &CharacterControllerConfig {
        &self.config
    }

    pub fn bindings(&self) -> &ControllerBindings {
        &self.bindings
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.input
    }

    /// Proposal and rotation delta from the last scan, if not yet queued
    pub fn pending(&self) -> Option<&(Proposal, Rotation)> {
        self.pending.as_ref()
    }

    /// Rotation delta for this tick from the look axes
    fn look(&mut self, current: Rotation, elapsed: f64) -> Rotation {
        let x = self.bindings.look_x.read(&self.input);
        let y = self.bindings.look_y.read(&self.input);
        let amount = |value: f64, change: f64| match self.config.look_mode {
            LookMode::Delta => change * self.config.look_sensitivity,
            LookMode::Rate => value * self.config.look_sensitivity * elapsed,
        };
        let yaw = -amount(x.value, x.change);

        // Negative pitch tilts the nose up
        let pitch = current.pitch();
        let target = (pitch - amount(y.value, y.change)).clamp(-FRAC_PI_2, FRAC_PI_2);
        Rotation::new(0.0, target - pitch, yaw)
    }

    /// Desired world-space velocity from the walk axes, facing `yaw`
    fn desired_velocity(&mut self, yaw: f64) -> Vector {
        let x = self.bindings.walk_x.read(&self.input).value;
        let y = self.bindings.walk_y.read(&self.input).value;
        let mut local = Vector::new(y, -x, 0.0);
        if local.magnitude() > 1.0 {
            local = local.normalize();
        }
        local.rotate_2d(yaw) * self.config.walk_speed
    }

    fn walk_grounded(&self, state: &mut PhysicsBody, floor: SurfacePoint, desired: Vector, gravity: f64, elapsed: f64) {
        let normal = floor.normal;
        let walkable = self
            .config
            .min_walk_normal_z()
            .is_some_and(|min| greater_or_close(normal.z, min));
        let idle = desired == Vector::ZERO;

        if walkable {
            if idle {
                state.velocity = state.velocity * (-self.config.ground_friction * elapsed).exp();
            } else {
                let projected = desired.project_onto_plane(normal);
                // Climbing loses speed with the projection; level or downhill keeps full speed
                state.velocity = if projected.z > 0.0 {
                    projected
                } else {
                    projected.set_magnitude(desired.magnitude())
                };
            }
        } else {
            let slide = (Vector::Z * gravity).project_onto_plane(normal);
            state.velocity = state.velocity + slide * elapsed + desired * elapsed;
            if idle {
                state.velocity = state.velocity * (-self.config.ground_friction * elapsed).exp();
            }
        }
    }

    /// Steer by `desired * air_control` per second without braking below the
    /// speed carried into the air
    fn walk_airborne(&self, state: &mut PhysicsBody, desired: Vector, elapsed: f64) {
        if desired == Vector::ZERO {
            state.velocity = state.velocity * (-self.config.air_drag * elapsed).exp();
            return;
        }
        let current = state.velocity.horizontal();
        let steer = desired.horizontal() * self.config.air_control;
        let steered = current + steer * elapsed;
        let limit = current.magnitude().max(steer.magnitude());
        state.velocity = if steered.magnitude() > limit {
            steered.set_magnitude(limit)
        } else {
            steered
        };
    }

    /// Leave the floor with an impulse along its normal
    fn jump(&self, state: &mut PhysicsBody, floor: SurfacePoint) {
        let impulse = floor.normal * self.config.jump_velocity;
        state.vertical_velocity = impulse.z + state.velocity.z;
        state.velocity = Vector::new(state.velocity.x + impulse.x, state.velocity.y + impulse.y, 0.0);
        state.jumped_from = state.floor.take();
        tracing::debug!(body = %self.body, velocity = %state.total_velocity(), "jump");
    }
}

impl Simulated<PhysicsWorld, Command> for CharacterController {
    fn scan(&mut self, world: &PhysicsWorld, elapsed: f64, _total: f64) {
        let Some(body) = world.body(self.body) else {
            self.pending = None;
            self.removable = true;
            return;
        };

        let rotation = self.look(body.rotation, elapsed);
        let desired = self.desired_velocity(body.rotation.z + rotation.z);
        let jump = self.input.take_button_event(self.bindings.jump) == ButtonEvent::Pressed;

        let mut state = body.clone();
        let floor = state
            .floor
            .and_then(|id| world.active_surface(id))
            .filter(|s| s.is_solid())
            .and_then(|s| s.top_point_at(state.position));
        let integrator = world.integrator();

        match floor {
            Some(point) => {
                self.walk_grounded(&mut state, point, desired, integrator.gravity(), elapsed);
                if jump {
                    self.jump(&mut state, point);
                }
            }
            None => self.walk_airborne(&mut state, desired, elapsed),
        }

        let proposal = integrator.scan(self.body, &state, world, elapsed);
        self.pending = Some((proposal, rotation));
    }

    fn update(&mut self, queue: &mut CommandQueue<Command>) {
        let Some((proposal, rotation)) = self.pending.take() else {
            return;
        };
        let body = proposal.body;
        queue.extend(proposal.into_commands());
        if rotation != Rotation::ZERO {
            queue.push(Command::Rotate { body, delta: rotation });
        }
    }

    fn cancel(&mut self) {
        self.pending = None;
    }

    fn ready_to_remove(&self) -> bool {
        self.removable
    }
}
