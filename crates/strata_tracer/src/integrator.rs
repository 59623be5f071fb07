//! Path-tracing estimator.
//!
//! Every diffuse vertex pays for one next-event estimate over all lights;
//! specular vertices never do, and instead end the path with the light's
//! emission if the next segment lands on a light directly. That split is
//! what keeps direct light from being counted twice.

use crate::{gen_f32, Bounce, Color, Hit, Hittable, Material, Scattered, Scene};
use rand::RngCore;
use strata_math::Ray;

/// How one surface interaction turns the radiance arriving along the
/// continuation into radiance leaving toward the previous vertex:
/// `outgoing = emitted + weight * incoming`.
struct Interaction {
    emitted: Color,
    weight: Color,
}

impl<B: Bounce> Scene<B> {
    /// Next-event estimate at a shading point.
    ///
    /// Samples one point on every light, drops occluded samples, weighs the
    /// rest by the clamped cosine to the normal, and averages over the number
    /// of lights. Each light counts equally regardless of size or distance.
    pub fn direct_light(&self, _incoming: &Ray, normal: &Ray, rng: &mut dyn RngCore) -> Color {
        if self.lights.is_empty() {
            // Only reachable under EmptyLightPolicy::Black
            return Color::ZERO;
        }

        let mut color = Color::ZERO;
        for light in &self.lights {
            let p = light.random_point(rng);
            let d = p - normal.origin;
            let distance = d.length();
            if distance <= self.config.ray_epsilon {
                // Sample coincides with the shading point
                continue;
            }

            let to_light = Ray::from_unit(normal.origin, d / distance);
            if self.shadow(&to_light, distance - self.config.ray_epsilon) {
                continue;
            }
            let diffuse = to_light.direction.dot(normal.direction).max(0.0);
            color += light.color(p) * diffuse;
        }
        color / self.lights.len() as f32
    }

    /// Radiance carried back along `ray` by a path with `depth` bounces left.
    ///
    /// `reflected` says whether `ray` left its previous vertex through a
    /// specular bounce. A negative depth is a terminal state and yields black.
    /// Runs as a loop: `radiance` collects emitted terms, `throughput` is the
    /// product of the weights of the vertices visited so far.
    pub fn recursive_sample(
        &self,
        ray: &Ray,
        reflected: bool,
        depth: i32,
        rng: &mut dyn RngCore,
    ) -> Color {
        let mut radiance = Color::ZERO;
        let mut throughput = Color::ONE;
        let mut ray = *ray;
        let mut reflected = reflected;
        let mut depth = depth;

        while depth >= 0 {
            if reflected {
                if let Some(light) = self.intersect_lights(&ray) {
                    radiance += throughput * light.shape.color(light.point());
                    break;
                }
            }

            let Some(hit) = self.intersect_shapes(&ray) else {
                break;
            };
            let p = hit.point();
            let color = hit.shape.color(p);
            let material = hit.shape.material(p);

            let (r0, r1, r2) = (gen_f32(rng), gen_f32(rng), gen_f32(rng));
            let scattered = self.bounce.bounce(&ray, &hit, &material, r0, r1, r2);
            let step = self.interact(&ray, &hit, color, &material, &scattered, rng);

            radiance += throughput * step.emitted;
            throughput *= step.weight;
            ray = scattered.ray;
            reflected = scattered.reflected;
            depth -= 1;
        }

        radiance
    }

    /// Estimate the radiance arriving along a primary ray.
    ///
    /// The bounce at the primary hit is stratified over an `n × n` grid with
    /// `n = floor(sqrt(samples))`; a non-square `samples` is truncated to
    /// `n * n` and the mean is taken over the strata actually drawn.
    pub fn sample(&self, ray: &Ray, samples: usize, depth: i32, rng: &mut dyn RngCore) -> Color {
        if depth < 0 {
            return Color::ZERO;
        }
        let Some(hit) = self.intersect_shapes(ray) else {
            return Color::ZERO;
        };
        let n = strata_per_axis(samples);
        if n == 0 {
            return Color::ZERO;
        }

        let p = hit.point();
        let color = hit.shape.color(p);
        let material = hit.shape.material(p);
        let cell = 1.0 / n as f32;

        let mut result = Color::ZERO;
        for i in 0..n {
            for j in 0..n {
                let lobe = gen_f32(rng);
                let u = (i as f32 + gen_f32(rng)) * cell;
                let v = (j as f32 + gen_f32(rng)) * cell;
                let scattered = self.bounce.bounce(ray, &hit, &material, lobe, u, v);
                let step = self.interact(ray, &hit, color, &material, &scattered, rng);
                let indirect =
                    self.recursive_sample(&scattered.ray, scattered.reflected, depth - 1, rng);
                result += step.emitted + step.weight * indirect;
            }
        }
        result / (n * n) as f32
    }

    /// Fold a bounce into emitted/weight form.
    ///
    /// Specular: `color * (indirect * tint) + indirect * (1 - tint)`.
    /// Diffuse: `color * (direct + indirect)`.
    fn interact(
        &self,
        incoming: &Ray,
        hit: &Hit,
        color: Color,
        material: &Material,
        scattered: &Scattered,
        rng: &mut dyn RngCore,
    ) -> Interaction {
        if scattered.reflected {
            let tint = material.tint;
            let weight = if tint > 0.0 {
                color * tint + Color::splat(1.0 - tint)
            } else {
                Color::ONE
            };
            Interaction {
                emitted: Color::ZERO,
                weight,
            }
        } else {
            let direct = self.direct_light(incoming, &hit.surface, rng);
            Interaction {
                emitted: color * direct,
                weight: color,
            }
        }
    }
}

/// `floor(sqrt(samples))`, exact for every `usize`.
pub fn strata_per_axis(samples: usize) -> usize {
    // The float guess can land one past the root near usize::MAX, where
    // squaring overflows
    let fits = |n: usize| n.checked_mul(n).is_some_and(|square| square <= samples);
    let mut n = (samples as f64).sqrt() as usize;
    while !fits(n) {
        n -= 1;
    }
    while fits(n + 1) {
        n += 1;
    }
    n
}
