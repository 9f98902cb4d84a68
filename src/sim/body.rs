//! Body physics table and arena bounds
//!
//! Bodies are pure simulation data keyed by `BodyId`. The renderer keeps its
//! own per-id texture handles and only reads this table.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::assets::ImageId;

/// Stable body handle, allocated sequentially per round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Untinted sprite color
pub const NO_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// One moving, clickable sprite
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub id: BodyId,
    pub image: ImageId,
    pub pos: Vec2,
    /// World units per tick
    pub vel: Vec2,
    /// Displayed size (X already includes the image aspect ratio)
    pub scale: Vec2,
    /// Image width / height
    pub aspect: f32,
    /// Cosmetic sprite rotation (radians)
    pub spin: f32,
    pub tint: [f32; 4],
    pub is_target: bool,
}

impl Body {
    /// Set a uniform scale, preserving the image aspect ratio
    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec2::new(scale * self.aspect, scale);
    }

    /// Whether the body can take part in a tick this frame
    pub fn is_finite(&self) -> bool {
        self.pos.is_finite() && self.vel.is_finite()
    }
}

/// Rectangular world region bodies bounce within (centered on the origin)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub half_width: f32,
    pub half_height: f32,
}

impl Arena {
    /// Arena from full boundary sizes
    pub fn new(size_x: f32, size_y: f32) -> Self {
        Self {
            half_width: size_x / 2.0,
            half_height: size_y / 2.0,
        }
    }

    /// Fixed world width, height derived from the viewport aspect ratio
    pub fn from_viewport(world_width: f32, width: f32, height: f32) -> Self {
        let aspect = if width > 0.0 && height > 0.0 {
            width / height
        } else {
            1.0
        };
        Self::new(world_width, world_width / aspect)
    }

    pub fn contains(&self, pos: Vec2, epsilon: f32) -> bool {
        pos.x.abs() <= self.half_width + epsilon && pos.y.abs() <= self.half_height + epsilon
    }
}

/// Insertion-ordered body storage (target first, then decoys)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BodyTable {
    bodies: Vec<Body>,
    next_id: u32,
}

impl BodyTable {
    pub fn new() -> Self {
        Self {
            bodies: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new body ID
    pub fn next_body_id(&mut self) -> BodyId {
        // Default-constructed tables start at 0; keep ids non-zero
        self.next_id = self.next_id.max(1);
        let id = BodyId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a body; order is the hit-test tie-break order
    pub fn push(&mut self, body: Body) {
        self.bodies.push(body);
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.iter().find(|b| b.id == id)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.iter_mut().find(|b| b.id == id)
    }

    pub fn target(&self) -> Option<&Body> {
        self.bodies.iter().find(|b| b.is_target)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }
}

#[cfg(test)]
pub(crate) fn test_body(id: u32, pos: Vec2, vel: Vec2, is_target: bool) -> Body {
    Body {
        id: BodyId(id),
        image: id as ImageId,
        pos,
        vel,
        scale: Vec2::splat(0.5),
        aspect: 1.0,
        spin: 0.0,
        tint: NO_TINT,
        is_target,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arena_from_viewport() {
        let arena = Arena::from_viewport(20.0, 1600.0, 800.0);
        assert_eq!(arena.half_width, 10.0);
        assert_eq!(arena.half_height, 5.0);

        // Degenerate viewport falls back to square
        let arena = Arena::from_viewport(20.0, 0.0, 0.0);
        assert_eq!(arena.half_height, 10.0);
    }

    #[test]
    fn test_ids_are_sequential() {
        let mut table = BodyTable::new();
        let a = table.next_body_id();
        let b = table.next_body_id();
        assert_eq!(a, BodyId(1));
        assert_eq!(b, BodyId(2));

        let mut table = BodyTable::default();
        assert_eq!(table.next_body_id(), BodyId(1));
    }

    #[test]
    fn test_lookup_and_order() {
        let mut table = BodyTable::new();
        table.push(test_body(1, Vec2::ZERO, Vec2::ZERO, true));
        table.push(test_body(2, Vec2::ONE, Vec2::ZERO, false));

        assert_eq!(table.target().map(|b| b.id), Some(BodyId(1)));
        assert_eq!(table.get(BodyId(2)).map(|b| b.pos), Some(Vec2::ONE));
        assert!(table.get(BodyId(9)).is_none());
        let order: Vec<_> = table.iter().map(|b| b.id.0).collect();
        assert_eq!(order, vec![1, 2]);
    }

    #[test]
    fn test_uniform_scale_keeps_aspect() {
        let mut body = test_body(1, Vec2::ZERO, Vec2::ZERO, true);
        body.aspect = 2.0;
        body.set_uniform_scale(1.5);
        assert_eq!(body.scale, Vec2::new(3.0, 1.5));
    }
}
