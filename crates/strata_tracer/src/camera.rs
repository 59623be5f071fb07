//! Pinhole camera for primary ray generation.

use crate::Ray;
use strata_math::Vec3;

/// Look-at pinhole camera.
#[derive(Debug, Clone)]
pub struct Camera {
    pub image_width: u32,
    pub image_height: u32,

    look_from: Vec3,
    look_at: Vec3,
    vup: Vec3,
    /// Vertical field of view in degrees
    vfov: f32,

    // Cached values (set by initialize())
    pixel00_loc: Vec3,
    pixel_delta_u: Vec3,
    pixel_delta_v: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            image_width: 800,
            image_height: 450,
            look_from: Vec3::ZERO,
            look_at: Vec3::new(0.0, 0.0, -1.0),
            vup: Vec3::Y,
            vfov: 90.0,
            pixel00_loc: Vec3::ZERO,
            pixel_delta_u: Vec3::ZERO,
            pixel_delta_v: Vec3::ZERO,
        }
    }

    pub fn with_resolution(mut self, width: u32, height: u32) -> Self {
        self.image_width = width.max(1);
        self.image_height = height.max(1);
        self
    }

    pub fn with_position(mut self, look_from: Vec3, look_at: Vec3, vup: Vec3) -> Self {
        self.look_from = look_from;
        self.look_at = look_at;
        self.vup = vup;
        self
    }

    pub fn with_fov(mut self, vfov: f32) -> Self {
        self.vfov = vfov;
        self
    }

    /// Compute the image plane. Must be called after the last `with_*` and
    /// before generating rays.
    pub fn initialize(&mut self) {
        let h = (self.vfov.to_radians() / 2.0).tan();
        let viewport_height = 2.0 * h;
        let viewport_width = viewport_height * (self.image_width as f32 / self.image_height as f32);

        let w = (self.look_from - self.look_at).normalize();
        let u = self.vup.cross(w).normalize();
        let v = w.cross(u);

        // Image plane one unit in front of the eye, rows running downward
        let viewport_u = viewport_width * u;
        let viewport_v = -viewport_height * v;
        self.pixel_delta_u = viewport_u / self.image_width as f32;
        self.pixel_delta_v = viewport_v / self.image_height as f32;
        self.pixel00_loc = self.look_from - w - viewport_u / 2.0 - viewport_v / 2.0;
    }

    /// Ray through pixel `(x, y)` at sub-pixel offset `(du, dv)` in [0, 1).
    pub fn get_ray(&self, x: u32, y: u32, du: f32, dv: f32) -> Ray {
        let target = self.pixel00_loc
            + (x as f32 + du) * self.pixel_delta_u
            + (y as f32 + dv) * self.pixel_delta_v;
        Ray::new(self.look_from, target - self.look_from)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_camera() -> Camera {
        let mut camera = Camera::new()
            .with_resolution(100, 100)
            .with_position(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), Vec3::Y)
            .with_fov(90.0);
        camera.initialize();
        camera
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let ray = square_camera().get_ray(50, 50, 0.0, 0.0);
        assert_eq!(ray.origin, Vec3::ZERO);
        assert!((ray.direction - -Vec3::Z).length() < 1e-5);
    }

    #[test]
    fn test_corner_rays_span_fov() {
        let camera = square_camera();

        // 90° vertical fov: the top-left corner sits at (-1, 1, -1)
        let corner = camera.get_ray(0, 0, 0.0, 0.0);
        let expected = Vec3::new(-1.0, 1.0, -1.0).normalize();
        assert!((corner.direction - expected).length() < 1e-5);

        // Rows grow downward
        let bottom = camera.get_ray(0, 99, 0.5, 0.5);
        assert!(bottom.direction.y < 0.0);
    }
}
