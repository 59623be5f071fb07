//! Triangle primitive.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use crate::{gen_f32, Color, Hittable, Material};
use rand::RngCore;
use strata_math::{Aabb, Interval, Ray, Vec3};

/// A flat triangle with a uniform color and material.
#[derive(Debug, Clone)]
pub struct Triangle {
    v0: Vec3,
    edge1: Vec3,
    edge2: Vec3,
    /// Unit face normal, winding order v0 -> v1 -> v2
    normal: Vec3,
    color: Color,
    material: Material,
    bbox: Aabb,
}

impl Triangle {
    pub fn new(v0: Vec3, v1: Vec3, v2: Vec3, color: Color, material: Material) -> Self {
        let edge1 = v1 - v0;
        let edge2 = v2 - v0;
        let normal = edge1.cross(edge2).normalize_or_zero();
        let bbox = Aabb::surrounding(&Aabb::from_points(v0, v1), &Aabb::from_points(v0, v2));

        Self {
            v0,
            edge1,
            edge2,
            normal,
            color,
            material,
            bbox,
        }
    }
}

impl Hittable for Triangle {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let h = ray.direction.cross(self.edge2);
        let a = self.edge1.dot(h);

        // Ray is parallel to the triangle
        if a.abs() < 1e-8 {
            return None;
        }

        let f = 1.0 / a;
        let s = ray.origin - self.v0;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(self.edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * self.edge2.dot(q);
        ray_t.surrounds(t).then_some(t)
    }

    fn normal_at(&self, _p: Vec3) -> Vec3 {
        self.normal
    }

    fn color(&self, _p: Vec3) -> Color {
        self.color
    }

    fn material(&self, _p: Vec3) -> Material {
        self.material
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        let r = gen_f32(rng).sqrt();
        let s = gen_f32(rng);
        self.v0 + self.edge1 * (r * (1.0 - s)) + self.edge2 * (r * s)
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
