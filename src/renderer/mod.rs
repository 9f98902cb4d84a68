//! Rendering module
//!
//! `SpriteSurface` is the seam between the round orchestrator and whatever
//! draws the sprites: the WebGPU pipeline in the browser, or the headless
//! surface used by tests and the native demo.

pub mod camera;
pub mod sprite_pipeline;
pub mod vertex;

pub use camera::Camera;
pub use sprite_pipeline::SpriteRenderState;
pub use vertex::SpriteInstance;

use std::collections::HashMap;

use crate::GameError;
use crate::assets::{ImageId, SpriteImage};
use crate::sim::{BodyId, BodyTable};

/// Something that can display the body table
pub trait SpriteSurface {
    /// Attach a loaded image to a body
    fn register(&mut self, id: BodyId, image: &SpriteImage);

    /// Viewport size changed (pixels)
    fn resize(&mut self, width: u32, height: u32);

    /// Draw every registered body, in table order
    fn draw(&mut self, bodies: &BodyTable, camera: &Camera, time_ms: f64) -> Result<(), GameError>;
}

/// Surface that records instead of drawing
#[derive(Debug, Default, Clone)]
pub struct HeadlessSurface {
    pub registered: HashMap<BodyId, ImageId>,
    pub size: (u32, u32),
    pub frames: u64,
    /// Instances built for the most recent frame
    pub last_frame: Vec<SpriteInstance>,
}

impl HeadlessSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            size: (width, height),
            ..Default::default()
        }
    }
}

impl SpriteSurface for HeadlessSurface {
    fn register(&mut self, id: BodyId, image: &SpriteImage) {
        self.registered.insert(id, image.image);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.size = (width, height);
        }
    }

    fn draw(&mut self, bodies: &BodyTable, _camera: &Camera, _time_ms: f64) -> Result<(), GameError> {
        self.frames += 1;
        self.last_frame = bodies
            .iter()
            .filter(|b| self.registered.contains_key(&b.id))
            .map(SpriteInstance::from_body)
            .collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::test_body;
    use glam::Vec2;

    #[test]
    fn test_headless_draws_registered_in_order() {
        let mut surface = HeadlessSurface::new(800, 600);
        let mut bodies = BodyTable::new();
        bodies.push(test_body(1, Vec2::ZERO, Vec2::ZERO, true));
        bodies.push(test_body(2, Vec2::ONE, Vec2::ZERO, false));
        bodies.push(test_body(3, Vec2::NEG_ONE, Vec2::ZERO, false));

        surface.register(BodyId(3), &SpriteImage::solid(3, 1, 1, [255; 4]));
        surface.register(BodyId(1), &SpriteImage::solid(1, 1, 1, [255; 4]));

        let camera = Camera::new(800.0, 600.0);
        surface.draw(&bodies, &camera, 0.0).unwrap();
        assert_eq!(surface.frames, 1);
        let positions: Vec<_> = surface.last_frame.iter().map(|i| i.position).collect();
        assert_eq!(positions, vec![[0.0, 0.0], [-1.0, -1.0]]);
    }

    #[test]
    fn test_headless_ignores_empty_resize() {
        let mut surface = HeadlessSurface::new(800, 600);
        surface.resize(0, 10);
        assert_eq!(surface.size, (800, 600));
        surface.resize(1024, 768);
        assert_eq!(surface.size, (1024, 768));
    }
}
