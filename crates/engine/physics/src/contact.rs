//! Contact events and per-surface callbacks

use crate::body::BodyId;
use crate::surface::SurfaceId;

/// Contact transition detected during a scan
///
/// Each event fires once per transition: wall and ceiling events on the
/// tick contact begins, touch events on entering and leaving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactEvent {
    WallCollide { body: BodyId, surface: SurfaceId },
    FloorStartTouch { body: BodyId, surface: SurfaceId },
    FloorEndTouch { body: BodyId, surface: SurfaceId },
    CeilingCollide { body: BodyId, surface: SurfaceId },
    VolumeStartTouch { body: BodyId, surface: SurfaceId },
    VolumeEndTouch { body: BodyId, surface: SurfaceId },
}

impl ContactEvent {
    pub fn body(&self) -> BodyId {
        match *self {
            ContactEvent::WallCollide { body, .. }
            | ContactEvent::FloorStartTouch { body, .. }
            | ContactEvent::FloorEndTouch { body, .. }
            | ContactEvent::CeilingCollide { body, .. }
            | ContactEvent::VolumeStartTouch { body, .. }
            | ContactEvent::VolumeEndTouch { body, .. } => body,
        }
    }

    pub fn surface(&self) -> SurfaceId {
        match *self {
            ContactEvent::WallCollide { surface, .. }
            | ContactEvent::FloorStartTouch { surface, .. }
            | ContactEvent::FloorEndTouch { surface, .. }
            | ContactEvent::CeilingCollide { surface, .. }
            | ContactEvent::VolumeStartTouch { surface, .. }
            | ContactEvent::VolumeEndTouch { surface, .. } => surface,
        }
    }

    /// Invoke the matching callback on `handler`
    pub fn dispatch(&self, handler: &mut dyn ContactHandler) {
        match *self {
            ContactEvent::WallCollide { body, .. } => handler.on_wall_collide(body),
            ContactEvent::FloorStartTouch { body, .. } => handler.on_floor_start_touch(body),
            ContactEvent::FloorEndTouch { body, .. } => handler.on_floor_end_touch(body),
            ContactEvent::CeilingCollide { body, .. } => handler.on_ceiling_collide(body),
            ContactEvent::VolumeStartTouch { body, .. } => handler.on_volume_start_touch(body),
            ContactEvent::VolumeEndTouch { body, .. } => handler.on_volume_end_touch(body),
        }
    }
}

/// Callbacks a surface runs when bodies touch it
///
/// Called during the commit flush, never during a scan.
pub trait ContactHandler {
    fn on_wall_collide(&mut self, _body: BodyId) {}
    fn on_floor_start_touch(&mut self, _body: BodyId) {}
    fn on_floor_end_touch(&mut self, _body: BodyId) {}
    fn on_ceiling_collide(&mut self, _body: BodyId) {}
    fn on_volume_start_touch(&mut self, _body: BodyId) {}
    fn on_volume_end_touch(&mut self, _body: BodyId) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Counter {
        walls: usize,
        entered: usize,
    }

    impl ContactHandler for Counter {
        fn on_wall_collide(&mut self, _body: BodyId) {
            self.walls += 1;
        }

        fn on_volume_start_touch(&mut self, _body: BodyId) {
            self.entered += 1;
        }
    }

    #[test]
    fn test_dispatch_calls_matching_callback() {
        let mut counter = Counter::default();
        let body = BodyId(0);
        let surface = SurfaceId(3);

        ContactEvent::WallCollide { body, surface }.dispatch(&mut counter);
        ContactEvent::VolumeStartTouch { body, surface }.dispatch(&mut counter);
        ContactEvent::FloorEndTouch { body, surface }.dispatch(&mut counter);

        assert_eq!(counter.walls, 1);
        assert_eq!(counter.entered, 1);
    }

    #[test]
    fn test_event_accessors() {
        let event = ContactEvent::CeilingCollide {
            body: BodyId(1),
            surface: SurfaceId(2),
        };
        assert_eq!(event.body(), BodyId(1));
        assert_eq!(event.surface(), SurfaceId(2));
    }
}
