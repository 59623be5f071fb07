//! Strata - stratified CPU path tracing
//!
//! A Monte Carlo path tracer that combines next-event estimation at diffuse
//! vertices with a specular shortcut onto lights, and stratifies the first
//! bounce of every camera sample.
//!
//! Build a scene with [`SceneBuilder`], compile it into an immutable
//! [`Scene`], then call [`Scene::sample`] per camera ray or hand it to
//! [`render`] together with a [`Camera`].

mod bounce;
mod bucket;
mod bvh;
mod camera;
mod cube;
mod hittable;
mod integrator;
mod material;
mod renderer;
mod scene;
mod shape;
mod sphere;
mod triangle;

pub use bounce::{cone_sample, cosine_sample, Bounce, Scattered, SurfaceBounce};
pub use bucket::{generate_buckets, render_bucket, Bucket, BucketResult};
pub use bvh::BvhNode;
pub use camera::Camera;
pub use cube::Cube;
pub use hittable::{Hit, Hittable};
pub use integrator::strata_per_axis;
pub use material::{Color, Material};
pub use renderer::{color_to_rgba, render, render_pixel, ImageBuffer, RenderConfig};
pub use scene::{EmptyLightPolicy, IntegratorConfig, Scene, SceneBuilder, SceneError, SceneResult};
pub use shape::Shape;
pub use sphere::Sphere;
pub use triangle::Triangle;

/// Re-export Vec3 and common math types from strata_math
pub use strata_math::{Aabb, Interval, Ray, Vec3};

use rand::{Rng, RngCore};

/// Uniform draw in [0, 1).
#[inline]
pub(crate) fn gen_f32(rng: &mut dyn RngCore) -> f32 {
    rng.gen::<f32>()
}
