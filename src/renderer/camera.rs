//! Perspective camera and world-to-screen projection

use glam::{Mat4, Vec2, Vec3, Vec4};

use crate::consts::*;
use crate::ndc_to_pixel;
use crate::sim::ScreenProjection;

/// Fixed perspective camera on the +Z axis looking at the arena plane
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub width: f32,
    pub height: f32,
    pub fov_y: f32,
    pub eye: Vec3,
}

impl Camera {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
            fov_y: CAMERA_FOV_DEGREES.to_radians(),
            eye: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
        }
    }

    /// Update the viewport; zero sizes are ignored
    pub fn resize(&mut self, width: f32, height: f32) {
        if width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    pub fn viewport(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn view_proj(&self) -> Mat4 {
        let proj = Mat4::perspective_rh(self.fov_y, self.aspect(), CAMERA_NEAR, CAMERA_FAR);
        let view = Mat4::look_at_rh(self.eye, Vec3::ZERO, Vec3::Y);
        proj * view
    }

    /// World point to NDC, `None` behind the camera or when degenerate
    pub fn project_ndc(&self, world: Vec3) -> Option<Vec3> {
        let clip = self.view_proj() * Vec4::new(world.x, world.y, world.z, 1.0);
        if clip.w <= f32::EPSILON || !clip.is_finite() {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        ndc.is_finite().then_some(ndc)
    }
}

impl ScreenProjection for Camera {
    fn world_to_pixel(&self, world: Vec3) -> Option<Vec2> {
        let ndc = self.project_ndc(world)?;
        Some(ndc_to_pixel(ndc.truncate(), self.viewport()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(800.0, 600.0);
        let px = camera.world_to_pixel(Vec3::ZERO).unwrap();
        assert!((px - Vec2::new(400.0, 300.0)).length() < 1e-3);
    }

    #[test]
    fn test_y_up_is_screen_up() {
        let camera = Camera::new(800.0, 600.0);
        let up = camera.world_to_pixel(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        let right = camera.world_to_pixel(Vec3::new(1.0, 0.0, 0.0)).unwrap();
        assert!(up.y < 300.0);
        assert!(right.x > 400.0);
    }

    #[test]
    fn test_visible_edge_maps_to_viewport_edge() {
        let camera = Camera::new(800.0, 400.0);
        let half_h = CAMERA_DISTANCE * (camera.fov_y / 2.0).tan();
        let half = Vec2::new(half_h * camera.aspect(), half_h);
        let edge = camera.world_to_pixel(Vec3::new(half.x, half.y, 0.0)).unwrap();
        assert!((edge - Vec2::new(800.0, 0.0)).length() < 0.5);
    }

    #[test]
    fn test_behind_camera_is_none() {
        let camera = Camera::new(800.0, 600.0);
        assert!(camera.project_ndc(Vec3::new(0.0, 0.0, 20.0)).is_none());
        assert!(camera.project_ndc(Vec3::new(f32::NAN, 0.0, 0.0)).is_none());
    }

    #[test]
    fn test_resize_changes_aspect_only() {
        let mut camera = Camera::new(800.0, 600.0);
        camera.resize(1600.0, 800.0);
        assert_eq!(camera.aspect(), 2.0);
        camera.resize(0.0, 100.0);
        assert_eq!(camera.viewport(), Vec2::new(1600.0, 800.0));
    }
}
