//! Closed set of shapes a scene can hold.
//!
//! Using an enum instead of `Box<dyn Hittable>` keeps shapes `Clone`, lets
//! the BVH store them inline in its leaves, and avoids a vtable call per
//! primitive test.

use crate::{Color, Cube, Hittable, Material, Sphere, Triangle};
use rand::RngCore;
use strata_math::{Aabb, Interval, Ray, Vec3};

#[derive(Debug, Clone)]
pub enum Shape {
    Sphere(Sphere),
    Triangle(Triangle),
    Cube(Cube),
}

macro_rules! dispatch {
    ($self:ident, $s:ident => $body:expr) => {
        match $self {
            Shape::Sphere($s) => $body,
            Shape::Triangle($s) => $body,
            Shape::Cube($s) => $body,
        }
    };
}

impl Hittable for Shape {
    #[inline]
    fn hit(&self, ray: &Ray, ray_t: Interval) -> Option<f32> {
        dispatch!(self, s => s.hit(ray, ray_t))
    }

    fn normal_at(&self, p: Vec3) -> Vec3 {
        dispatch!(self, s => s.normal_at(p))
    }

    fn color(&self, p: Vec3) -> Color {
        dispatch!(self, s => s.color(p))
    }

    fn material(&self, p: Vec3) -> Material {
        dispatch!(self, s => s.material(p))
    }

    fn random_point(&self, rng: &mut dyn RngCore) -> Vec3 {
        dispatch!(self, s => s.random_point(rng))
    }

    #[inline]
    fn bounding_box(&self) -> Aabb {
        dispatch!(self, s => s.bounding_box())
    }
}

impl From<Sphere> for Shape {
    fn from(s: Sphere) -> Self {
        Shape::Sphere(s)
    }
}

impl From<Triangle> for Shape {
    fn from(t: Triangle) -> Self {
        Shape::Triangle(t)
    }
}

impl From<Cube> for Shape {
    fn from(c: Cube) -> Self {
        Shape::Cube(c)
    }
}
