//! Image-level driver around the integrator.
//!
//! Splits the image into buckets, renders them in parallel with rayon, and
//! gathers linear colors into an [`ImageBuffer`].

use crate::bucket::{generate_buckets, render_bucket, BucketResult};
use crate::{gen_f32, strata_per_axis, Bounce, Camera, Color, Scene};
use rand::RngCore;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Sub-pixel camera rays per pixel, stratified (truncated to a square)
    pub camera_samples: usize,
    /// Strata at each primary hit, passed to `Scene::sample`
    pub hit_samples: usize,
    /// Bounce budget, passed to `Scene::sample` as the depth
    pub bounces: i32,
    /// Base seed; each bucket derives its own generator from it
    pub seed: u64,
    /// Bucket edge length in pixels
    pub bucket_size: u32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            camera_samples: 4,
            hit_samples: 16,
            bounces: 4,
            seed: 0,
            bucket_size: 32,
        }
    }
}

impl RenderConfig {
    pub fn with_samples(mut self, camera_samples: usize, hit_samples: usize) -> Self {
        self.camera_samples = camera_samples;
        self.hit_samples = hit_samples;
        self
    }

    pub fn with_bounces(mut self, bounces: i32) -> Self {
        self.bounces = bounces;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_bucket_size(mut self, bucket_size: u32) -> Self {
        self.bucket_size = bucket_size.max(1);
        self
    }

    fn warn_on_truncation(&self) {
        for (name, n) in [("camera_samples", self.camera_samples), ("hit_samples", self.hit_samples)] {
            let k = strata_per_axis(n);
            if k * k != n {
                log::warn!("{} = {} is not a square; using {} samples", name, n, k * k);
            }
        }
    }
}

/// Estimate one pixel: stratified sub-pixel camera rays, each estimated
/// with `Scene::sample`, averaged.
pub fn render_pixel<B: Bounce>(
    camera: &Camera,
    scene: &Scene<B>,
    x: u32,
    y: u32,
    config: &RenderConfig,
    rng: &mut dyn RngCore,
) -> Color {
    let n = strata_per_axis(config.camera_samples);
    if n == 0 {
        return Color::ZERO;
    }
    let cell = 1.0 / n as f32;

    let mut pixel_color = Color::ZERO;
    for i in 0..n {
        for j in 0..n {
            let du = (i as f32 + gen_f32(rng)) * cell;
            let dv = (j as f32 + gen_f32(rng)) * cell;
            let ray = camera.get_ray(x, y, du, dv);
            pixel_color += scene.sample(&ray, config.hit_samples, config.bounces, rng);
        }
    }
    pixel_color / (n * n) as f32
}

/// Render the whole image in parallel.
///
/// Output depends only on the scene, camera and config: each bucket seeds
/// its own generator, so thread scheduling never changes a pixel.
pub fn render<B: Bounce>(camera: &Camera, scene: &Scene<B>, config: &RenderConfig) -> ImageBuffer {
    config.warn_on_truncation();
    let buckets = generate_buckets(camera.image_width, camera.image_height, config.bucket_size);
    log::info!(
        "Rendering {}x{} in {} buckets ({} camera x {} hit samples, {} bounces)",
        camera.image_width,
        camera.image_height,
        buckets.len(),
        config.camera_samples,
        config.hit_samples,
        config.bounces
    );

    let start = Instant::now();
    let results: Vec<BucketResult> = buckets
        .par_iter()
        .map(|bucket| render_bucket(bucket, camera, scene, config))
        .collect();

    let mut image = ImageBuffer::new(camera.image_width, camera.image_height);
    for result in &results {
        image.write_bucket(result);
    }
    log::info!("Rendered in {:?}", start.elapsed());
    image
}

/// Apply gamma correction (gamma = 2.0).
#[inline]
fn linear_to_gamma(linear: f32) -> f32 {
    if linear > 0.0 {
        linear.sqrt()
    } else {
        0.0
    }
}

/// Convert a linear color to gamma-corrected 8-bit RGBA.
pub fn color_to_rgba(color: Color) -> [u8; 4] {
    let [r, g, b] = color
        .to_array()
        .map(|c| (255.0 * linear_to_gamma(c).clamp(0.0, 1.0)).round() as u8);
    [r, g, b, 255]
}

/// Linear color image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[y as usize * self.width as usize + x as usize] = color;
    }

    /// Copy a rendered bucket into place.
    pub fn write_bucket(&mut self, result: &BucketResult) {
        let b = &result.bucket;
        for (i, color) in result.pixels.iter().enumerate() {
            let i = i as u32;
            self.set(b.x + i % b.width, b.y + i / b.width, *color);
        }
    }

    /// Convert to RGBA bytes (for display or saving).
    pub fn to_rgba(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|c| color_to_rgba(*c)).collect()
    }

    /// Write a gamma-corrected 8-bit PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let path = path.as_ref();
        image::save_buffer(
            path,
            &self.to_rgba(),
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )?;
        log::info!("Wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bucket, IntegratorConfig, Material, SceneBuilder, Sphere, Vec3};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_scene() -> Scene {
        let mut builder = SceneBuilder::new();
        builder
            .add_shape(Sphere::new(
                Vec3::new(0.0, 0.0, -1.0),
                0.5,
                Color::splat(0.5),
                Material::diffuse(),
            ))
            .add_shape(Sphere::new(
                Vec3::new(0.0, -100.5, -1.0),
                100.0,
                Color::splat(0.8),
                Material::diffuse(),
            ))
            .add_emitter(Sphere::new(
                Vec3::new(0.0, 3.0, -1.0),
                1.0,
                Color::splat(5.0),
                Material::diffuse(),
            ));
        builder.compile(IntegratorConfig::default()).unwrap()
    }

    fn test_camera(width: u32, height: u32) -> Camera {
        let mut camera = Camera::new().with_resolution(width, height);
        camera.initialize();
        camera
    }

    #[test]
    fn test_linear_to_gamma() {
        assert_eq!(linear_to_gamma(0.0), 0.0);
        assert_eq!(linear_to_gamma(-1.0), 0.0);
        assert!((linear_to_gamma(0.25) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_color_to_rgba_clamps() {
        assert_eq!(color_to_rgba(Color::ZERO), [0, 0, 0, 255]);
        assert_eq!(color_to_rgba(Color::new(4.0, 1.0, 0.25)), [255, 255, 128, 255]);
    }

    #[test]
    fn test_render_pixel_hits_sphere() {
        let scene = test_scene();
        let camera = test_camera(10, 10);
        let config = RenderConfig::default().with_samples(4, 4).with_bounces(3);
        let mut rng = StdRng::seed_from_u64(42);

        let color = render_pixel(&camera, &scene, 5, 5, &config, &mut rng);
        assert!(color.length() > 0.0);
        assert!(color.is_finite());
    }

    #[test]
    fn test_render_is_deterministic() {
        let scene = test_scene();
        let camera = test_camera(24, 16);
        let config = RenderConfig::default()
            .with_samples(1, 4)
            .with_bounces(2)
            .with_bucket_size(7)
            .with_seed(3);

        let a = render(&camera, &scene, &config);
        let b = render(&camera, &scene, &config);
        assert_eq!(a, b);
        assert_eq!(a.pixels.len(), 24 * 16);
        assert_eq!(a.to_rgba().len(), 24 * 16 * 4);
        assert!(a.pixels.iter().any(|c| c.length() > 0.0));
    }

    #[test]
    fn test_write_bucket_places_pixels() {
        let mut image = ImageBuffer::new(5, 3);
        assert_eq!(image.pixels.len(), 15);

        let bucket = Bucket { x: 3, y: 1, width: 2, height: 2, index: 0 };
        let pixels = (0..4).map(|i| Color::splat(i as f32 + 1.0)).collect();
        image.write_bucket(&BucketResult { bucket, pixels });

        assert_eq!(image.pixels[5 + 3], Color::splat(1.0));
        assert_eq!(image.pixels[5 + 4], Color::splat(2.0));
        assert_eq!(image.pixels[10 + 3], Color::splat(3.0));
        assert_eq!(image.pixels[10 + 4], Color::splat(4.0));
        assert_eq!(image.pixels.iter().filter(|c| **c != Color::ZERO).count(), 4);
    }

    #[test]
    fn test_config_from_json() {
        let config: RenderConfig = serde_json::from_str(r#"{ "hit_samples": 9, "seed": 5 }"#).unwrap();
        assert_eq!(config.hit_samples, 9);
        assert_eq!(config.seed, 5);
        assert_eq!(config.bounces, RenderConfig::default().bounces);
    }
}
