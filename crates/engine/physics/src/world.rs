//! The physics world
//!
//! [`PhysicsWorld`] owns the scene tree, the collision surfaces derived from
//! scene entities and the bodies moving among them. [`PhysicsWorld::tick`]
//! drives one two-phase step: every object scans the unchanged world, then
//! the queued commands are applied in a single flush.

use std::collections::BTreeMap;

use math::Vector;
use mesh::Mesh;
use world::{CommandQueue, EntityId, Scene, SceneError, Simulated};

use crate::body::{BodyId, PhysicsBody};
use crate::command::Command;
use crate::config::PhysicsConfig;
use crate::contact::ContactEvent;
use crate::error::{PhysicsError, Result};
use crate::integrator::Integrator;
use crate::surface::{CollisionSurface, SurfaceId};

/// What a commit flush did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    /// Contact events delivered, in queue order
    pub events: Vec<ContactEvent>,
    /// Number of commands applied
    pub applied: usize,
}

impl TickReport {
    /// Events concerning one body
    pub fn events_for(&self, body: BodyId) -> impl Iterator<Item = &ContactEvent> {
        self.events.iter().filter(move |e| e.body() == body)
    }
}

/// Physics simulation world
///
/// Owns the scene, the collision surfaces derived from scene entities and
/// the bodies moving among them. Bodies and surfaces change only through
/// [`PhysicsWorld::apply`].
#[derive(Debug, Default)]
pub struct PhysicsWorld {
    scene: Scene,
    surfaces: BTreeMap<SurfaceId, CollisionSurface>,
    bodies: BTreeMap<BodyId, PhysicsBody>,
    config: PhysicsConfig,
    next_surface: usize,
    next_body: usize,
}

impl PhysicsWorld {
    /// Create an empty world
    pub fn new(config: PhysicsConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Create a world around an existing scene
    pub fn with_scene(scene: Scene, config: PhysicsConfig) -> Self {
        Self {
            scene,
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn integrator(&self) -> Integrator {
        Integrator::new(&self.config)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Mutable scene access for setup between ticks
    ///
    /// Transform changes reach the surfaces on the next
    /// [`PhysicsWorld::sync_surfaces`].
    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    /// Attach collision geometry to a scene entity
    ///
    /// # Arguments
    /// * `entity` - Entity whose transform places the mesh
    /// * `mesh` - Convex mesh in the entity's local frame
    ///
    /// # Returns
    /// Handle to a solid, enabled surface
    pub fn add_surface(&mut self, entity: EntityId, mesh: Mesh) -> Result<SurfaceId> {
        let node = self
            .scene
            .get(entity)
            .ok_or(SceneError::UnknownEntity(entity))?;
        let surface = CollisionSurface::new(entity, mesh, node.position, node.rotation);
        let id = SurfaceId(self.next_surface);
        self.next_surface += 1;
        self.surfaces.insert(id, surface);
        tracing::debug!(surface = %id, %entity, "added surface");
        Ok(id)
    }

    /// Attach a non-solid trigger volume to a scene entity
    pub fn add_volume(&mut self, entity: EntityId, mesh: Mesh) -> Result<SurfaceId> {
        let id = self.add_surface(entity, mesh)?;
        self.surface_mut(id)?.set_solid(false);
        Ok(id)
    }

    pub fn remove_surface(&mut self, id: SurfaceId) -> Result<CollisionSurface> {
        self.surfaces
            .remove(&id)
            .ok_or(PhysicsError::UnknownSurface(id))
    }

    pub fn surface(&self, id: SurfaceId) -> Option<&CollisionSurface> {
        self.surfaces.get(&id)
    }

    pub fn surface_mut(&mut self, id: SurfaceId) -> Result<&mut CollisionSurface> {
        self.surfaces
            .get_mut(&id)
            .ok_or(PhysicsError::UnknownSurface(id))
    }

    /// A surface if it exists and is enabled
    pub fn active_surface(&self, id: SurfaceId) -> Option<&CollisionSurface> {
        self.surfaces.get(&id).filter(|s| s.is_enabled())
    }

    /// Every enabled surface, in id order
    pub fn active_surfaces(&self) -> impl Iterator<Item = (SurfaceId, &CollisionSurface)> {
        self.surfaces
            .iter()
            .filter(|(_, s)| s.is_enabled())
            .map(|(id, s)| (*id, s))
    }

    /// Push entity transforms into their surfaces
    ///
    /// Surfaces whose entity no longer exists are disabled.
    pub fn sync_surfaces(&mut self) {
        for (id, surface) in self.surfaces.iter_mut() {
            match self.scene.get(surface.entity()) {
                Some(node) => surface.set_transform(node.position, node.rotation),
                None if surface.is_enabled() => {
                    tracing::warn!(surface = %id, entity = %surface.entity(), "surface entity removed, disabling");
                    surface.set_enabled(false);
                }
                None => {}
            }
        }
    }

    /// Create a body for a scene entity, starting airborne at the entity's
    /// position
    pub fn add_body(&mut self, entity: EntityId, height: f64) -> Result<BodyId> {
        let node = self
            .scene
            .get(entity)
            .ok_or(SceneError::UnknownEntity(entity))?;
        let mut body = PhysicsBody::new(entity, node.position, height);
        body.rotation = node.rotation;
        let id = BodyId(self.next_body);
        self.next_body += 1;
        self.bodies.insert(id, body);
        tracing::debug!(body = %id, %entity, "added body");
        Ok(id)
    }

    pub fn remove_body(&mut self, id: BodyId) -> Result<PhysicsBody> {
        self.bodies.remove(&id).ok_or(PhysicsError::UnknownBody(id))
    }

    pub fn body(&self, id: BodyId) -> Option<&PhysicsBody> {
        self.bodies.get(&id)
    }

    /// Mutable body access for setup between ticks
    pub fn body_mut(&mut self, id: BodyId) -> Result<&mut PhysicsBody> {
        self.bodies.get_mut(&id).ok_or(PhysicsError::UnknownBody(id))
    }

    pub fn bodies(&self) -> impl Iterator<Item = (BodyId, &PhysicsBody)> {
        self.bodies.iter().map(|(id, b)| (*id, b))
    }

    /// Run one full tick
    ///
    /// Every object scans the world as it was at the start of the tick,
    /// then every object queues its commands, then the queue is flushed
    /// once.
    pub fn tick(
        &mut self,
        objects: &mut [&mut dyn Simulated<PhysicsWorld, Command>],
        elapsed: f64,
        total: f64,
    ) -> TickReport {
        self.sync_surfaces();
        for object in objects.iter_mut() {
            object.scan(self, elapsed, total);
        }
        let mut queue = CommandQueue::new();
        for object in objects.iter_mut() {
            object.update(&mut queue);
        }
        self.apply(&mut queue)
    }

    /// Flush a command queue against the world
    pub fn apply(&mut self, queue: &mut CommandQueue<Command>) -> TickReport {
        let mut report = TickReport::default();
        report.applied = queue.flush(|command| self.apply_command(command, &mut report.events));
        report
    }

    fn apply_command(&mut self, command: Command, events: &mut Vec<ContactEvent>) {
        match command {
            Command::CommitBody { body, state } => {
                let Some(slot) = self.bodies.get_mut(&body) else {
                    tracing::warn!(%body, "commit for missing body");
                    return;
                };
                let delta = state.position - slot.position;
                *slot = *state;
                if delta != Vector::ZERO {
                    if let Err(err) = self.scene.translate(slot.entity, delta, true) {
                        tracing::warn!(%body, %err, "body entity missing from scene");
                    }
                }
            }
            Command::Rotate { body, delta } => {
                let Some(slot) = self.bodies.get_mut(&body) else {
                    tracing::warn!(%body, "rotation for missing body");
                    return;
                };
                match self.scene.rotate(slot.entity, delta, true) {
                    Ok(()) => {
                        if let Some(rotation) = self.scene.rotation(slot.entity) {
                            slot.rotation = rotation;
                        }
                    }
                    Err(err) => tracing::warn!(%body, %err, "body entity missing from scene"),
                }
            }
            Command::Notify(event) => {
                let surface = event.surface();
                match self.surfaces.get_mut(&surface) {
                    Some(target) => {
                        tracing::debug!(?event, "contact");
                        if let Some(handler) = target.handler_mut() {
                            event.dispatch(handler);
                        }
                    }
                    None => tracing::warn!(%surface, "contact event for missing surface"),
                }
                events.push(event);
            }
        }
    }
}
