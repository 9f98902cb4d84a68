//! Flower Finder - find the lost flower among drifting decoys
//!
//! Core modules:
//! - `sim`: Simulation (body motion, wall bounces, hit-testing, round state)
//! - `renderer`: Camera projection and the WebGPU sprite pipeline
//! - `platform`: Pointer input and browser integration
//! - `assets`: Flower image catalog
//! - `game`: Round orchestration

pub mod assets;
pub mod error;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::GameError;
pub use game::{ClickOutcome, Game, GameUi};
pub use settings::{GameConfig, Level};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Speed constant; each velocity axis is drawn from ±SPEED/2 per tick
    pub const BODY_SPEED: f32 = 0.05;

    /// Displayed size multiplier applied to every sprite
    pub const SPRITE_BASE_SCALE: f32 = 0.5;
    /// Fallback scale range when no scale factor is configured
    pub const MIN_RANDOM_SCALE: f32 = 0.5;
    pub const MAX_RANDOM_SCALE: f32 = 1.0;
    /// Decoy size variation (±20%)
    pub const DECOY_SCALE_JITTER: f32 = 0.2;

    /// Cosmetic rotation per tick (radians), alternating direction by index
    pub const SPIN_STEP: f32 = 0.005;

    /// Target highlight when found
    pub const WIN_SCALE_BOOST: f32 = 1.2;
    pub const WIN_TINT: [f32; 4] = [1.0, 1.0, 0.0, 1.0]; // Yellow
    pub const PULSE_AMPLITUDE: f32 = 0.1;
    /// Pulse angular rate per millisecond
    pub const PULSE_RATE: f64 = 0.005;

    /// Approximate on-screen pixels per unit of sprite scale (hit boxes)
    pub const HIT_PIXELS_PER_UNIT: f32 = 100.0;

    /// Camera (perspective, looking down -Z at the arena plane)
    pub const CAMERA_FOV_DEGREES: f32 = 60.0;
    pub const CAMERA_NEAR: f32 = 0.1;
    pub const CAMERA_FAR: f32 = 1000.0;
    pub const CAMERA_DISTANCE: f32 = 10.0;

    /// Arena width in world units; height follows the viewport aspect
    pub const BASE_ARENA_WIDTH: f32 = 20.0;

    /// Sprites the GPU instance buffer holds before it first grows
    pub const INITIAL_SPRITE_CAPACITY: usize = 256;
}

/// Convert a viewport pixel position to normalized device coordinates
#[inline]
pub fn pixel_to_ndc(px: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(2.0 * (px.x / viewport.x) - 1.0, 1.0 - 2.0 * (px.y / viewport.y))
}

/// Convert normalized device coordinates to a viewport pixel position
#[inline]
pub fn ndc_to_pixel(ndc: Vec2, viewport: Vec2) -> Vec2 {
    Vec2::new(
        (ndc.x * 0.5 + 0.5) * viewport.x,
        (-ndc.y * 0.5 + 0.5) * viewport.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ndc_corners() {
        let viewport = Vec2::new(800.0, 600.0);

        let top_left = pixel_to_ndc(Vec2::ZERO, viewport);
        assert_eq!(top_left, Vec2::new(-1.0, 1.0));

        let bottom_right = pixel_to_ndc(viewport, viewport);
        assert_eq!(bottom_right, Vec2::new(1.0, -1.0));

        let center = pixel_to_ndc(viewport / 2.0, viewport);
        assert!(center.length() < 1e-6);
    }

    #[test]
    fn test_ndc_pixel_inverse() {
        let viewport = Vec2::new(1024.0, 768.0);
        let px = Vec2::new(300.0, 700.0);
        let back = ndc_to_pixel(pixel_to_ndc(px, viewport), viewport);
        assert!((back - px).length() < 1e-3);
    }
}
