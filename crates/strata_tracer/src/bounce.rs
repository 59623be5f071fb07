//! Bounce decision: picks the outgoing ray at a surface hit.
//!
//! The integrator draws the three uniforms and hands them over; what they
//! mean (lobe choice, direction within the lobe) belongs entirely to the
//! [`Bounce`] implementation.

use crate::{Hit, Material};
use std::f32::consts::PI;
use strata_math::{orthonormal_basis, Ray, Vec3};

/// Outcome of a bounce.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scattered {
    /// Outgoing ray, starting at the hit point
    pub ray: Ray,
    /// True for a specular continuation, false for a diffuse one
    pub reflected: bool,
}

/// Chooses how a path continues at a surface.
pub trait Bounce: Send + Sync {
    /// `p`, `u` and `v` are independent uniform draws in [0, 1).
    fn bounce(
        &self,
        incoming: &Ray,
        hit: &Hit,
        material: &Material,
        p: f32,
        u: f32,
        v: f32,
    ) -> Scattered;
}

/// Default bounce model.
///
/// `p` picks the lobe: below the material's reflectance the path reflects
/// into a cone of half-angle `gloss` around the mirror direction, otherwise
/// it takes a cosine-weighted direction over the normal's hemisphere.
/// `u` and `v` place the direction inside the chosen lobe.
#[derive(Debug, Clone, Copy, Default)]
pub struct SurfaceBounce;

impl Bounce for SurfaceBounce {
    fn bounce(
        &self,
        incoming: &Ray,
        hit: &Hit,
        material: &Material,
        p: f32,
        u: f32,
        v: f32,
    ) -> Scattered {
        let cos_theta = -incoming.direction.dot(hit.normal());

        if p < material.reflectance(cos_theta) {
            let mirror = hit.surface.reflect(incoming);
            Scattered {
                ray: cone_sample(&mirror, material.gloss, u, v),
                reflected: true,
            }
        } else {
            Scattered {
                ray: cosine_sample(&hit.surface, u, v),
                reflected: false,
            }
        }
    }
}

/// Cosine-weighted direction over the hemisphere around `normal.direction`.
pub fn cosine_sample(normal: &Ray, u: f32, v: f32) -> Ray {
    let radius = u.sqrt();
    let phi = 2.0 * PI * v;
    let local = Vec3::new(radius * phi.cos(), radius * phi.sin(), (1.0 - u).max(0.0).sqrt());
    Ray::new(normal.origin, to_world(local, normal.direction))
}

/// Uniform direction inside a cone of half-angle `theta` around `axis`.
///
/// A zero angle returns `axis` untouched.
pub fn cone_sample(axis: &Ray, theta: f32, u: f32, v: f32) -> Ray {
    if theta <= 0.0 {
        return *axis;
    }
    let cos_t = 1.0 - u * (1.0 - theta.min(PI).cos());
    let sin_t = (1.0 - cos_t * cos_t).max(0.0).sqrt();
    let phi = 2.0 * PI * v;
    let local = Vec3::new(sin_t * phi.cos(), sin_t * phi.sin(), cos_t);
    Ray::new(axis.origin, to_world(local, axis.direction))
}

fn to_world(local: Vec3, w: Vec3) -> Vec3 {
    let (a, b) = orthonormal_basis(w);
    a * local.x + b * local.y + w * local.z
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, Hittable, Shape, Sphere};
    use strata_math::Interval;

    fn floor_hit<'a>(shape: &'a Shape, incoming: &Ray) -> Hit<'a> {
        let t = shape.hit(incoming, Interval::beyond(0.001)).unwrap();
        Hit::new(shape, incoming, t)
    }

    fn big_sphere(material: Material) -> Shape {
        // Top of the sphere sits at y = 0 with normal +Y
        Sphere::new(Vec3::new(0.0, -100.0, 0.0), 100.0, Color::ONE, material).into()
    }

    #[test]
    fn test_mirror_reflects_exactly() {
        let shape = big_sphere(Material::mirror());
        let incoming = Ray::new(Vec3::new(-1.0, 1.0, 0.0), Vec3::new(1.0, -1.0, 0.0));
        let hit = floor_hit(&shape, &incoming);

        let out = SurfaceBounce.bounce(&incoming, &hit, &Material::mirror(), 0.99, 0.3, 0.7);
        assert!(out.reflected);
        assert!((out.ray.direction - Vec3::new(1.0, 1.0, 0.0).normalize()).length() < 1e-4);
        assert_eq!(out.ray.origin, hit.point());
    }

    #[test]
    fn test_diffuse_stays_in_hemisphere() {
        let material = Material::diffuse();
        let shape = big_sphere(material);
        let incoming = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let hit = floor_hit(&shape, &incoming);

        for i in 0..16 {
            let u = i as f32 / 16.0;
            let v = (i * 7 % 16) as f32 / 16.0;
            let out = SurfaceBounce.bounce(&incoming, &hit, &material, 0.0, u, v);
            assert!(!out.reflected);
            assert!(out.ray.direction.dot(hit.normal()) >= 0.0);
            assert!((out.ray.direction.length() - 1.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_lobe_choice_follows_p() {
        let material = Material::diffuse().with_reflectivity(0.25);
        let shape = big_sphere(material);
        let incoming = Ray::new(Vec3::new(0.0, 1.0, 0.0), -Vec3::Y);
        let hit = floor_hit(&shape, &incoming);

        assert!(SurfaceBounce.bounce(&incoming, &hit, &material, 0.2, 0.5, 0.5).reflected);
        assert!(!SurfaceBounce.bounce(&incoming, &hit, &material, 0.3, 0.5, 0.5).reflected);
    }

    #[test]
    fn test_cone_sample_within_angle() {
        let axis = Ray::new(Vec3::ZERO, Vec3::new(0.3, 0.9, -0.1));
        let theta = 0.2;
        for i in 0..10 {
            let out = cone_sample(&axis, theta, i as f32 / 10.0, 0.37);
            let angle = out.direction.dot(axis.direction).clamp(-1.0, 1.0).acos();
            assert!(angle <= theta + 1e-3);
        }
        assert_eq!(cone_sample(&axis, 0.0, 0.5, 0.5), axis);
    }
}
