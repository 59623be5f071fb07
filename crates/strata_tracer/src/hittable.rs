//! Hittable trait and the Hit record returned by scene queries.

use crate::{Color, Material, Shape};
use rand::RngCore;
use strata_math::{Aabb, Interval, Ray, Vec3};

/// Capability every shape in a scene provides.
///
/// Intersection only reports the ray parameter; the normal is derived
/// afterwards for the nearest hit alone, so shadow queries never pay for it.
pub trait Hittable: Send + Sync {
    /// Ray parameter of the nearest intersection strictly inside `ray_t`.
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32>;

    /// Outward unit normal at a point on the surface.
    fn normal_at(&self, p: Vec3) -> Vec3;

    /// Surface color at `p`. For emitters this is the emitted radiance.
    fn color(&self, p: Vec3) -> Color;

    /// Material at `p`.
    fn material(&self, p: Vec3) -> Material;

    /// Uniformly distributed point on the surface.
    fn random_point(&self, rng: &mut dyn RngCore) -> Vec3;

    fn bounding_box(&self) -> Aabb;
}

/// Record of a ray-shape intersection.
#[derive(Debug, Clone, Copy)]
pub struct Hit<'a> {
    /// Shape that was hit
    pub shape: &'a Shape,
    /// Ray parameter of the intersection
    pub t: f32,
    /// Origin at the hit point, direction along the normal facing the
    /// incoming ray
    pub surface: Ray,
    /// Whether the query ray arrived on the outward side of the surface
    pub front_face: bool,
}

impl<'a> Hit<'a> {
    /// Resolve the surface ray for a hit at parameter `t` along `ray`.
    pub fn new(shape: &'a Shape, ray: &Ray, t: f32) -> Self {
        let p = ray.at(t);
        let outward = shape.normal_at(p);
        // Normal always points against the ray
        let front_face = ray.direction.dot(outward) < 0.0;
        let normal = if front_face { outward } else { -outward };

        Self {
            shape,
            t,
            surface: Ray::from_unit(p, normal),
            front_face,
        }
    }

    #[inline]
    pub fn point(&self) -> Vec3 {
        self.surface.origin
    }

    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.surface.direction
    }
}
