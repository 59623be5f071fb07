//! Sphere primitive.

use crate::{gen_f32, Color, Hittable, Material};
use rand::RngCore;
use std::f32::consts::PI;
use strata_math::{Aabb, Interval, Ray, Vec3};

/// A sphere with a uniform color and material.
#[derive(Debug, Clone)]
pub struct Sphere {
    center: Vec3,
    radius: f32,
    color: Color,
    material: Material,
    bbox: Aabb,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, color: Color, material: Material) -> Self {
        let radius = radius.max(0.0);
        let rvec = Vec3::splat(radius);
        let bbox = Aabb::from_points(center - rvec, center + rvec);

        Self {
            center,
            radius,
            color,
            material,
            bbox,
        }
    }
}

impl Hittable for Sphere {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        // Direction is unit length, so the quadratic's `a` term is 1
        let oc = self.center - ray.origin;
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrtd = discriminant.sqrt();

        [h - sqrtd, h + sqrtd]
            .into_iter()
            .find(|&root| ray_t.surrounds(root))
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        (p - self.center) / self.radius
    }

    fn color(&self, _p: Vec3) -> Color {
        self.color
    }

    fn material(&self, _p: Vec3) -> Material {
        self.material
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let z = 1.0 - 2.0 * gen_f32(rng);
        let r = (1.0 - z * z).max(0.0).sqrt();
        let phi = 2.0 * PI * gen_f32(rng);
        self.center + self.radius * Vec3::new(r * phi.cos(), r * phi.sin(), z)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
