//! Axis-aligned box primitive.

use crate::{gen_f32, Color, Hittable, Material};
use rand::RngCore;
use strata_math::{Aabb, Interval, Ray, Vec3};

/// A solid axis-aligned box.
#[derive(Debug, Clone)]
pub struct Cube {
    min: Vec3,
    max: Vec3,
    color: Color,
    material: Material,
    bbox: Aabb,
}

impl Cube {
    pub fn new(a: Vec3, b: Vec3, color: Color, material: Material) -> Self {
        let min = a.min(b);
        let max = a.max(b);

        Self {
            min,
            max,
            color,
            material,
            bbox: Aabb::from_points(min, max),
        }
    }

    /// Area of one face perpendicular to each axis.
    fn face_areas(&self) -> Vec3 {
        let d = self.max - self.min;
        Vec3::new(d.y * d.z, d.z * d.x, d.x * d.y)
    }
}

impl Hittable for Cube {
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        let inv = ray.direction.recip();
        let t0 = (self.min - ray.origin) * inv;
        let t1 = (self.max - ray.origin) * inv;
        let near = t0.min(t1).max_element();
        let far = t0.max(t1).min_element();

        if near > far {
            return None;
        }
        [near, far].into_iter().find(|&t| ray_t.surrounds(t))
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        // The face whose plane is closest to `p` wins
        let to_min = (p - self.min).abs();
        let to_max = (self.max - p).abs();
        let mut best = (f32::INFINITY, Vec3::ZERO);
        for axis in 0..3 {
            let mut unit = Vec3::ZERO;
            unit[axis] = 1.0;
            if to_min[axis] < best.0 {
                best = (to_min[axis], -unit);
            }
            if to_max[axis] < best.0 {
                best = (to_max[axis], unit);
            }
        }
        best.1
    }

    fn color(&self, _p: Vec3) -> Color {
        self.color
    }

    fn material(&self, _p: Vec3) -> Material {
        self.material
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        // Pick an axis pair of faces by area, then a side, then a point on it
        let areas = self.face_areas();
        let mut pick = gen_f32(rng) * areas.element_sum();
        let mut axis = 2;
        for i in 0..3 {
            if pick < areas[i] {
                axis = i;
                break;
            }
            pick -= areas[i];
        }

        let size = self.max - self.min;
        let mut p = self.min + size * Vec3::new(gen_f32(rng), gen_f32(rng), gen_f32(rng));
        p[axis] = if gen_f32(rng) < 0.5 {
            self.min[axis]
        } else {
            self.max[axis]
        };
        p
    }

    fn bounding_box(&self) -> Aabb {
        self.bbox
    }
}
