//! Pinhole camera for ray generation.

use fogray_math::{Ray, Vec3};

use crate::RenderConfig;

/// Camera at a fixed eye point looking down +Z.
///
/// Pixel offsets from the image center are scaled by `projection_scale` onto
/// an image plane one unit in front of the eye. Pixel rows grow downward
/// while world Y grows upward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub image_width: u32,
    pub image_height: u32,
    pub projection_scale: f32,
}

impl Camera {
    pub fn new(eye: Vec3, image_width: u32, image_height: u32, projection_scale: f32) -> Self {
        Self {
            eye,
            image_width,
            image_height,
            projection_scale,
        }
    }

    pub fn from_config(config: &RenderConfig) -> Self {
        Self::new(
            config.eye,
            config.width,
            config.height,
            config.projection_scale,
        )
    }

    /// Unit ray through the continuous pixel position (x, y).
    ///
    /// Integer coordinates address the top-left corner of a pixel, so
    /// callers add a sub-pixel offset in [0, 1) to sample inside it.
    pub fn get_ray(&self, x: f32, y: f32) -> Ray {
        let half_width = self.image_width as f32 / 2.0;
        let half_height = self.image_height as f32 / 2.0;

        let direction = Vec3::new(
            (x - half_width) * self.projection_scale,
            (half_height - y) * self.projection_scale,
            1.0,
        );

        Ray::new(self.eye, direction).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, -800.0), 100, 80, 0.01);
        let ray = camera.get_ray(50.0, 40.0);

        assert_eq!(ray.origin, Vec3::new(0.0, 0.0, -800.0));
        assert!((ray.direction - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_corner_rays() {
        let camera = Camera::new(Vec3::ZERO, 100, 80, 0.01);

        // Top-left pixel points left and up
        let top_left = camera.get_ray(0.0, 0.0);
        assert!(top_left.direction.x < 0.0);
        assert!(top_left.direction.y > 0.0);

        // Bottom-right pixel points right and down
        let bottom_right = camera.get_ray(100.0, 80.0);
        assert!(bottom_right.direction.x > 0.0);
        assert!(bottom_right.direction.y < 0.0);

        assert!((top_left.direction.length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_from_config() {
        let config = RenderConfig::default().with_resolution(64, 48);
        let camera = Camera::from_config(&config);

        assert_eq!(camera.image_width, 64);
        assert_eq!(camera.image_height, 48);
        assert_eq!(camera.eye, config.eye);
    }
}
