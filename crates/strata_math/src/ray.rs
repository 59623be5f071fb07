use crate::Vec3;

/// A ray in 3D space: an origin and a unit-length direction.
///
/// The same type doubles as a "surface ray" on hits, where the origin is the
/// intersection point and the direction is the surface normal.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray. The direction is normalized.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize(),
        }
    }

    /// Create a ray from a direction the caller already knows is unit length.
    #[inline]
    pub fn from_unit(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Get the point along the ray at parameter t.
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Mirror `incoming` about this ray's direction, keeping this origin.
    ///
    /// `self` is expected to be a surface ray (origin on the surface,
    /// direction along the normal).
    pub fn reflect(&self, incoming: &Ray) -> Ray {
        let d = incoming.direction;
        let n = self.direction;
        Ray::from_unit(self.origin, d - 2.0 * d.dot(n) * n)
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_normalizes_direction() {
        let ray = Ray::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(ray.direction, Vec3::new(0.0, 0.6, 0.8));
    }

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_reflect_about_normal() {
        let surface = Ray::new(Vec3::new(1.0, 0.0, 0.0), Vec3::Y);
        let incoming = Ray::new(Vec3::new(0.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let reflected = surface.reflect(&incoming);

        assert_eq!(reflected.origin, surface.origin);
        assert!((reflected.direction - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-6);
    }
}
