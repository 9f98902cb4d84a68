//! Pointer input in viewport pixels

use glam::Vec2;

use crate::pixel_to_ndc;

/// A click or tap, relative to the canvas' top-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerInput {
    pub x: f32,
    pub y: f32,
    /// Viewport size the coordinates were measured against
    pub width: f32,
    pub height: f32,
}

impl PointerInput {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn pixel(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Normalized device coordinates, `None` for an empty viewport
    pub fn to_ndc(&self) -> Option<Vec2> {
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let ndc = pixel_to_ndc(self.pixel(), Vec2::new(self.width, self.height));
        ndc.is_finite().then_some(ndc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_ndc() {
        let p = PointerInput::new(400.0, 300.0, 800.0, 600.0);
        assert_eq!(p.to_ndc(), Some(Vec2::ZERO));

        let top_left = PointerInput::new(0.0, 0.0, 800.0, 600.0);
        assert_eq!(top_left.to_ndc(), Some(Vec2::new(-1.0, 1.0)));

        assert_eq!(PointerInput::new(1.0, 1.0, 0.0, 600.0).to_ndc(), None);
    }
}
