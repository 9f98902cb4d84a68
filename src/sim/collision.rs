//! Wall reflection and click hit-testing
//!
//! Bodies only interact with the arena walls (no body-body collisions).
//! Hit-testing works in screen pixels against an approximate sprite box.

use glam::{Vec2, Vec3};

use super::body::{Arena, Body, BodyId, BodyTable};
use crate::consts::HIT_PIXELS_PER_UNIT;

/// Which axes reflected during a bounce check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WallBounce {
    pub x: bool,
    pub y: bool,
}

impl WallBounce {
    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Clamp-then-flip on one axis. Returns true if the axis reflected.
///
/// The position lands exactly on the wall, so a single crossing flips the
/// velocity sign exactly once.
#[inline]
pub fn reflect_axis(pos: &mut f32, vel: &mut f32, half_extent: f32) -> bool {
    if pos.abs() > half_extent {
        *vel = -*vel;
        *pos = pos.signum() * half_extent;
        true
    } else {
        false
    }
}

/// Reflect a body off the arena walls, each axis independently
pub fn bounce_off_walls(body: &mut Body, arena: &Arena) -> WallBounce {
    WallBounce {
        x: reflect_axis(&mut body.pos.x, &mut body.vel.x, arena.half_width),
        y: reflect_axis(&mut body.pos.y, &mut body.vel.y, arena.half_height),
    }
}

/// World-to-screen projection used for hit-testing
pub trait ScreenProjection {
    /// Pixel position of a world point, `None` if it cannot be projected
    /// (behind the camera or degenerate)
    fn world_to_pixel(&self, world: Vec3) -> Option<Vec2>;
}

/// Approximate on-screen bounds of a sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBox {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl ScreenBox {
    /// Inclusive point-in-box test
    pub fn contains(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_size.x && d.y <= self.half_size.y
    }
}

/// Screen box for a body (`scale * 100` pixels per unit)
pub fn sprite_screen_box<P: ScreenProjection + ?Sized>(
    body: &Body,
    projection: &P,
) -> Option<ScreenBox> {
    if !body.pos.is_finite() || !body.scale.is_finite() {
        return None;
    }
    let center = projection.world_to_pixel(body.pos.extend(0.0))?;
    if !center.is_finite() {
        return None;
    }
    Some(ScreenBox {
        center,
        half_size: body.scale.abs() * HIT_PIXELS_PER_UNIT / 2.0,
    })
}

/// First body (in table order) whose box contains the pixel point.
///
/// Overlaps resolve by insertion order, so the target (inserted first) wins
/// ties against decoys created after it.
pub fn hit_test<P: ScreenProjection + ?Sized>(
    bodies: &BodyTable,
    point_px: Vec2,
    projection: &P,
) -> Option<BodyId> {
    if bodies.is_empty() {
        log::debug!("Hit-test with no bodies registered");
        return None;
    }
    bodies
        .iter()
        .find(|body| {
            sprite_screen_box(body, projection)
                .map(|b| b.contains(point_px))
                .unwrap_or(false)
        })
        .map(|body| body.id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::test_body;

    /// Orthographic stand-in: 100 px per world unit, origin at (400, 300)
    struct Flat;

    impl ScreenProjection for Flat {
        fn world_to_pixel(&self, world: Vec3) -> Option<Vec2> {
            Some(Vec2::new(400.0 + world.x * 100.0, 300.0 - world.y * 100.0))
        }
    }

    /// Projects nothing (everything behind the camera)
    struct Behind;

    impl ScreenProjection for Behind {
        fn world_to_pixel(&self, _world: Vec3) -> Option<Vec2> {
            None
        }
    }

    #[test]
    fn test_reflect_axis_clamps_and_flips() {
        let mut pos = 5.02;
        let mut vel = 0.02;
        assert!(reflect_axis(&mut pos, &mut vel, 5.0));
        assert_eq!(pos, 5.0);
        assert_eq!(vel, -0.02);

        let mut pos = -5.5;
        let mut vel = -0.01;
        assert!(reflect_axis(&mut pos, &mut vel, 5.0));
        assert_eq!(pos, -5.0);
        assert_eq!(vel, 0.01);
    }

    #[test]
    fn test_on_wall_is_inside() {
        let mut pos = 5.0;
        let mut vel = 0.02;
        assert!(!reflect_axis(&mut pos, &mut vel, 5.0));
        assert_eq!(vel, 0.02);
    }

    #[test]
    fn test_bounce_axes_independent() {
        let arena = Arena::new(10.0, 4.0);
        let mut body = test_body(1, Vec2::new(5.01, 1.0), Vec2::new(0.02, 0.02), false);
        let bounce = bounce_off_walls(&mut body, &arena);
        assert_eq!(bounce, WallBounce { x: true, y: false });
        assert_eq!(body.vel, Vec2::new(-0.02, 0.02));

        let mut corner = test_body(2, Vec2::new(-6.0, 3.0), Vec2::new(-0.01, 0.01), false);
        let bounce = bounce_off_walls(&mut corner, &arena);
        assert!(bounce.x && bounce.y);
        assert_eq!(corner.pos, Vec2::new(-5.0, 2.0));
    }

    #[test]
    fn test_hit_test_inside_and_outside() {
        let mut bodies = BodyTable::new();
        // scale 0.5 -> 50px box centered at (400, 300)
        bodies.push(test_body(1, Vec2::ZERO, Vec2::ZERO, true));

        assert_eq!(hit_test(&bodies, Vec2::new(410.0, 290.0), &Flat), Some(BodyId(1)));
        assert_eq!(hit_test(&bodies, Vec2::new(425.0, 300.0), &Flat), Some(BodyId(1)));
        assert_eq!(hit_test(&bodies, Vec2::new(426.0, 300.0), &Flat), None);
    }

    #[test]
    fn test_overlap_resolves_by_insertion_order() {
        let mut bodies = BodyTable::new();
        bodies.push(test_body(7, Vec2::ZERO, Vec2::ZERO, false));
        bodies.push(test_body(1, Vec2::new(0.1, 0.0), Vec2::ZERO, true));

        // Point covered by both boxes
        let hit = hit_test(&bodies, Vec2::new(405.0, 300.0), &Flat);
        assert_eq!(hit, Some(BodyId(7)));
    }

    #[test]
    fn test_unprojectable_bodies_never_match() {
        let mut bodies = BodyTable::new();
        bodies.push(test_body(1, Vec2::ZERO, Vec2::ZERO, true));
        assert_eq!(hit_test(&bodies, Vec2::new(400.0, 300.0), &Behind), None);

        let mut bodies = BodyTable::new();
        bodies.push(test_body(1, Vec2::new(f32::NAN, 0.0), Vec2::ZERO, true));
        assert_eq!(hit_test(&bodies, Vec2::new(400.0, 300.0), &Flat), None);
    }

    #[test]
    fn test_empty_table_is_no_match() {
        let bodies = BodyTable::new();
        assert_eq!(hit_test(&bodies, Vec2::ZERO, &Flat), None);
    }
}
