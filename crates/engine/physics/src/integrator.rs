//! Scan phase of the physics tick
//!
//! [`Integrator::scan`] reads a body and the world's active surfaces and
//! returns a [`Proposal`]: the body's state after this tick plus the contact
//! events the tick produced. Nothing is mutated; the proposal becomes
//! commands that the world applies during the commit flush.
//!
//! Resolution order within a tick is fixed: walls, floors, ceilings,
//! volumes, then gravity. Each stage works on the target position left by
//! the previous one.

use std::collections::BTreeSet;

use math::{greater_or_close, is_close, less_or_close, Vector};

use crate::body::{BodyId, PhysicsBody};
use crate::command::Command;
use crate::config::PhysicsConfig;
use crate::contact::ContactEvent;
use crate::surface::{CollisionSurface, SurfaceId, SurfacePoint};
use crate::world::PhysicsWorld;

/// Body state proposed by a scan, not yet applied
#[derive(Debug, Clone, PartialEq)]
pub struct Proposal {
    pub body: BodyId,
    pub state: PhysicsBody,
    pub events: Vec<ContactEvent>,
}

impl Proposal {
    /// Commands that apply this proposal: the body update first, then one
    /// notification per event
    pub fn into_commands(self) -> impl Iterator<Item = Command> {
        let commit = Command::CommitBody {
            body: self.body,
            state: Box::new(self.state),
        };
        std::iter::once(commit).chain(self.events.into_iter().map(Command::Notify))
    }
}

/// Moves bodies through the world's collision surfaces
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integrator {
    gravity: f64,
}

impl Integrator {
    pub fn new(config: &PhysicsConfig) -> Self {
        Self {
            gravity: config.gravity,
        }
    }

    pub fn gravity(&self) -> f64 {
        self.gravity
    }

    /// Propose the state of `body` after `elapsed` seconds
    pub fn scan(&self, id: BodyId, body: &PhysicsBody, world: &PhysicsWorld, elapsed: f64) -> Proposal {
        let mut scan = Scan::begin(id, body, world, elapsed);
        scan.follow_floor();
        scan.resolve_walls();
        scan.resolve_floors();
        scan.resolve_ceilings();
        scan.resolve_volumes();
        scan.finish(self.gravity, elapsed)
    }
}

/// Keep the horizontal part of `motion` and solve Z so it runs along the
/// plane with normal `normal`
fn along_plane(motion: Vector, normal: Vector) -> Vector {
    let z = -(normal.x * motion.x + normal.y * motion.y) / normal.z;
    Vector::new(motion.x, motion.y, z)
}

fn solid_surfaces(world: &PhysicsWorld) -> impl Iterator<Item = (SurfaceId, &CollisionSurface)> {
    world.active_surfaces().filter(|(_, s)| s.is_solid())
}

fn crosses(before: f64, after: f64) -> bool {
    (less_or_close(before, 0.0) && greater_or_close(after, 0.0))
        || (greater_or_close(before, 0.0) && less_or_close(after, 0.0))
}

struct Scan<'a> {
    id: BodyId,
    body: &'a PhysicsBody,
    world: &'a PhysicsWorld,
    start: Vector,
    motion: Vector,
    /// Floor sample under the start position while grounded
    floor_point: Option<SurfacePoint>,
    next: PhysicsBody,
    events: Vec<ContactEvent>,
}

impl<'a> Scan<'a> {
    fn begin(id: BodyId, body: &'a PhysicsBody, world: &'a PhysicsWorld, elapsed: f64) -> Self {
        let mut next = body.clone();
        next.jumped_from = None;
        next.walls.clear();
        next.ceilings.clear();

        let mut events = Vec::new();
        if let (None, Some(surface)) = (body.floor, body.jumped_from) {
            events.push(ContactEvent::FloorEndTouch { body: id, surface });
        }

        Self {
            id,
            body,
            world,
            start: body.position,
            motion: body.total_velocity() * elapsed,
            floor_point: None,
            next,
            events,
        }
    }

    fn target(&self) -> Vector {
        self.start + self.motion
    }

    fn event(&mut self, event: ContactEvent) {
        self.events.push(event);
    }

    /// Drop the floor and carry the along-slope speed into vertical speed
    fn leave_floor(&mut self, floor: SurfaceId) {
        self.next.floor = None;
        self.next.vertical_velocity += self.next.velocity.z;
        self.next.velocity = self.next.velocity.horizontal();
        self.floor_point = None;
        self.event(ContactEvent::FloorEndTouch {
            body: self.id,
            surface: floor,
        });
    }

    /// Settle onto `surface` at `point`, carrying momentum onto its plane
    fn land(&mut self, surface: SurfaceId, point: SurfacePoint) {
        let carried = self.next.velocity + Vector::Z * self.next.vertical_velocity;
        self.next.velocity = carried.project_onto_plane(point.normal);
        self.next.vertical_velocity = 0.0;
        self.next.floor = Some(surface);
        self.motion.z = point.height - self.start.z;
        self.event(ContactEvent::FloorStartTouch {
            body: self.id,
            surface,
        });
    }

    /// Grounded bodies move along the plane of the face under them
    fn follow_floor(&mut self) {
        let Some(floor) = self.body.floor else {
            return;
        };
        let point = self
            .world
            .active_surface(floor)
            .filter(|s| s.is_solid())
            .and_then(|s| s.top_point_at(self.start));
        match point {
            Some(point) => {
                self.motion = along_plane(self.motion, point.normal);
                self.floor_point = Some(point);
            }
            None => self.leave_floor(floor),
        }
    }

    fn set_horizontal_motion(&mut self, horizontal: Vector) {
        let horizontal = horizontal.horizontal();
        self.motion = match self.floor_point {
            Some(point) => along_plane(horizontal, point.normal),
            None => horizontal.with_z(self.motion.z),
        };
    }

    /// Whether the body's vertical span overlaps the solid part of
    /// `surface` around `target`
    ///
    /// Feet at or above the top under `target` mean the surface is a floor
    /// candidate. Otherwise the top is the plane of that face extended back
    /// to the start position, so a body at the low edge of a ramp is above
    /// it.
    fn overlaps_vertically(&self, surface: &CollisionSurface, target: Vector) -> bool {
        let (lo, hi) = surface.z_range();
        let top_point = surface.top_point_at(target);
        if top_point.is_some_and(|point| greater_or_close(target.z, point.height)) {
            return false;
        }
        let top = match top_point {
            Some(point) => surface
                .top_plane_height(point.face, self.start)
                .unwrap_or(point.height),
            None => hi,
        };
        let bottom = surface
            .bottom_point_at(target)
            .map(|p| p.height)
            .unwrap_or(lo);
        let z = self.start.z;
        !greater_or_close(z, top) && !less_or_close(z + self.body.height, bottom)
    }

    fn resolve_walls(&mut self) {
        for (id, surface) in solid_surfaces(self.world) {
            if Some(id) == self.next.floor {
                continue;
            }
            let target = self.target();
            if !surface.is_strictly_in_bounds(target) || surface.is_strictly_in_bounds(self.start) {
                continue;
            }
            if !self.overlaps_vertically(surface, target) {
                continue;
            }
            let Some(normal) = surface.nearest_bounds_normal(self.start) else {
                continue;
            };

            let tangent = Vector::new(-normal.y, normal.x, 0.0);
            let slide = |v: Vector| tangent * v.horizontal().dot(tangent);
            self.set_horizontal_motion(slide(self.motion));
            let mut velocity = slide(self.next.velocity);
            if surface.is_strictly_in_bounds(self.target()) {
                self.set_horizontal_motion(Vector::ZERO);
                velocity = Vector::ZERO;
            }
            self.next.velocity = match self.floor_point {
                Some(point) => along_plane(velocity, point.normal),
                None => velocity,
            };

            self.next.walls.insert(id);
            if !self.body.walls.contains(&id) {
                tracing::debug!(body = %self.id, surface = %id, "wall contact");
                self.event(ContactEvent::WallCollide {
                    body: self.id,
                    surface: id,
                });
            }
        }
    }

    fn resolve_floors(&mut self) {
        match (self.next.floor, self.floor_point) {
            (Some(floor), Some(point)) => self.resolve_grounded(floor, point),
            _ => self.resolve_airborne(),
        }
    }

    /// Latch the highest floor the feet crossed from above this tick
    fn resolve_airborne(&mut self) {
        let target = self.target();
        let mut best: Option<(SurfaceId, SurfacePoint)> = None;
        for (id, surface) in solid_surfaces(self.world) {
            let Some(point) = surface.top_point_at(target) else {
                continue;
            };
            let before = surface
                .top_plane_height(point.face, self.start)
                .unwrap_or(point.height);
            if !greater_or_close(self.start.z, before) || !less_or_close(target.z, point.height) {
                continue;
            }
            if best.map_or(true, |(_, b)| point.height > b.height) {
                best = Some((id, point));
            }
        }
        if let Some((id, point)) = best {
            tracing::debug!(body = %self.id, surface = %id, height = point.height, "landed");
            self.land(id, point);
        }
    }

    /// Stay on the current floor, hand off to a neighbour, crest a ridge or
    /// walk off the edge
    fn resolve_grounded(&mut self, floor: SurfaceId, old: SurfacePoint) {
        let Some(current) = self.world.active_surface(floor) else {
            return;
        };
        let target = self.target();
        let new = current.top_point_at(target);

        // Current floor at the old (a) and new (b) positions
        let a = old.height;
        let b = new.map(|p| p.height).unwrap_or_else(|| {
            current
                .top_plane_height(old.face, target)
                .unwrap_or(target.z)
        });

        let mut hand_off: Option<(SurfaceId, SurfacePoint)> = None;
        for (id, candidate) in solid_surfaces(self.world) {
            if id == floor {
                continue;
            }
            let Some(d) = candidate.top_point_at(target) else {
                continue;
            };
            // Candidate at the old (c) and new (d) positions
            let c = candidate
                .top_plane_height(d.face, self.start)
                .unwrap_or(d.height);
            let before = c - a;
            let after = d.height - b;
            let accept = if is_close(before, 0.0) && is_close(after, 0.0) {
                new.is_none()
            } else {
                crosses(before, after)
            };
            if accept && hand_off.map_or(true, |(_, best)| d.height > best.height) {
                hand_off = Some((id, d));
            }
        }

        if let Some((id, point)) = hand_off {
            if self.is_crest(old.normal, point.normal) {
                self.crest(floor, old.normal);
                return;
            }
            tracing::debug!(body = %self.id, from = %floor, to = %id, "floor hand-off");
            self.event(ContactEvent::FloorEndTouch {
                body: self.id,
                surface: floor,
            });
            self.land(id, point);
            self.floor_point = Some(point);
            return;
        }

        let Some(new) = new else {
            tracing::debug!(body = %self.id, surface = %floor, "left floor");
            self.leave_floor(floor);
            return;
        };

        if new.face != old.face {
            if self.is_crest(old.normal, new.normal) {
                self.crest(floor, old.normal);
                return;
            }
            self.next.velocity = self.next.velocity.project_onto_plane(new.normal);
        }
        self.motion.z = new.height - self.start.z;
        self.floor_point = Some(new);
    }

    /// Moving uphill on the face behind and downhill on the face ahead
    fn is_crest(&self, behind: Vector, ahead: Vector) -> bool {
        let horizontal = self.next.velocity.horizontal();
        let climbing = !greater_or_close(horizontal.dot(behind), 0.0);
        let descending = !less_or_close(horizontal.dot(ahead), 0.0);
        climbing && descending
    }

    /// Leave `floor` over a crest, still rising at the rate of `slope`
    fn crest(&mut self, floor: SurfaceId, slope: Vector) {
        let horizontal = self.next.velocity.horizontal();
        let rise = -(slope.x * horizontal.x + slope.y * horizontal.y) / slope.z;
        self.next.floor = None;
        self.next.velocity = horizontal;
        self.next.vertical_velocity = rise;
        self.floor_point = None;
        tracing::debug!(body = %self.id, surface = %floor, "crested ridge");
        self.event(ContactEvent::FloorEndTouch {
            body: self.id,
            surface: floor,
        });
    }

    fn resolve_ceilings(&mut self) {
        for (id, surface) in solid_surfaces(self.world) {
            if Some(id) == self.next.floor {
                continue;
            }
            let target = self.target();
            let Some(point) = surface.bottom_point_at(target) else {
                continue;
            };
            let before = surface
                .bottom_plane_height(point.face, self.start)
                .unwrap_or(point.height);
            let head_before = self.start.z + self.body.height;
            let head_after = target.z + self.body.height;
            if !less_or_close(head_before, before) || less_or_close(head_after, point.height) {
                continue;
            }

            self.next.ceilings.insert(id);
            if !self.body.ceilings.contains(&id) {
                tracing::debug!(body = %self.id, surface = %id, "ceiling contact");
                self.event(ContactEvent::CeilingCollide {
                    body: self.id,
                    surface: id,
                });
            }

            if let Some(floor) = self.body.jumped_from {
                // Jumped straight into a ceiling: back onto the floor, at rest
                self.motion = Vector::ZERO;
                self.next.floor = Some(floor);
                self.next.velocity = Vector::ZERO;
                self.next.vertical_velocity = 0.0;
                self.events.retain(|e| {
                    !matches!(e, ContactEvent::FloorEndTouch { surface, .. } if *surface == floor)
                });
            } else if self.body.floor.is_some() {
                // Walking into a low ceiling: stay put on the original floor
                self.motion = Vector::ZERO;
                self.next.floor = self.body.floor;
                self.next.velocity = Vector::ZERO;
                self.next.vertical_velocity = 0.0;
                self.events.retain(|e| {
                    !matches!(
                        e,
                        ContactEvent::FloorStartTouch { .. } | ContactEvent::FloorEndTouch { .. }
                    )
                });
            } else {
                self.next.vertical_velocity = self.next.vertical_velocity.min(0.0);
                self.motion.z = point.height - self.body.height - self.start.z;
            }
        }
    }

    fn resolve_volumes(&mut self) {
        let target = self.target();
        let mut inside = BTreeSet::new();
        let world = self.world;
        for (id, surface) in world.active_surfaces() {
            if surface.is_solid() || !surface.is_in_bounds(target) {
                continue;
            }
            let (bottom, top) = surface.height_range_at(target);
            if less_or_close(bottom, target.z + self.body.height) && greater_or_close(top, target.z) {
                inside.insert(id);
            }
        }

        for &id in inside.difference(&self.body.volumes) {
            tracing::debug!(body = %self.id, surface = %id, "entered volume");
            self.events.push(ContactEvent::VolumeStartTouch {
                body: self.id,
                surface: id,
            });
        }
        for &id in self.body.volumes.difference(&inside) {
            tracing::debug!(body = %self.id, surface = %id, "left volume");
            self.events.push(ContactEvent::VolumeEndTouch {
                body: self.id,
                surface: id,
            });
        }
        self.next.volumes = inside;
    }

    fn finish(mut self, gravity: f64, elapsed: f64) -> Proposal {
        self.next.position = self.start + self.motion;
        if self.next.floor.is_none() {
            self.next.vertical_velocity += gravity * elapsed;
        }
        tracing::trace!(
            body = %self.id,
            position = %self.next.position,
            velocity = %self.next.velocity,
            vertical = self.next.vertical_velocity,
            grounded = self.next.floor.is_some(),
            "proposal"
        );
        Proposal {
            body: self.id,
            state: self.next,
            events: self.events,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_along_plane_keeps_horizontal_motion() {
        let normal = Vector::new(-1.0, 0.0, 1.0).normalize();
        let motion = along_plane(Vector::new(2.0, 1.0, 0.0), normal);
        assert!(motion.is_close(Vector::new(2.0, 1.0, 2.0)));
    }

    #[test]
    fn test_crossing_predicate() {
        assert!(crosses(-1.0, 1.0));
        assert!(crosses(1.0, -1.0));
        assert!(crosses(0.0, 2.0));
        assert!(!crosses(-1.0, -0.5));
        assert!(!crosses(2.0, 3.0));
    }
}
