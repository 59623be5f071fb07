//! Bucket (tile) decomposition of the image.
//!
//! Buckets are the unit of parallel work. Each one owns its random
//! generator, seeded from the render seed and the bucket index, so no
//! sampling state is ever shared between threads.

use crate::renderer::render_pixel;
use crate::{Bounce, Camera, Color, RenderConfig, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// A rectangular region of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in row-major bucket order
    pub index: usize,
}

impl Bucket {
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Seed for this bucket's generator.
    pub fn seed(&self, base: u64) -> u64 {
        base ^ (self.index as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

/// Cover a `width × height` image with buckets of at most `size × size`,
/// row-major; edge buckets are clipped.
pub fn generate_buckets(width: u32, height: u32, size: u32) -> Vec<Bucket> {
    let size = size.max(1);
    (0..height)
        .step_by(size as usize)
        .flat_map(|y| (0..width).step_by(size as usize).map(move |x| (x, y)))
        .enumerate()
        .map(|(index, (x, y))| Bucket {
            x,
            y,
            width: size.min(width - x),
            height: size.min(height - y),
            index,
        })
        .collect()
}

/// Pixels of one rendered bucket, row-major within the bucket.
#[derive(Debug, Clone)]
pub struct BucketResult {
    pub bucket: Bucket,
    pub pixels: Vec<Color>,
}

/// Render every pixel of `bucket` with a generator private to the bucket.
pub fn render_bucket<B: Bounce>(
    bucket: &Bucket,
    camera: &Camera,
    scene: &Scene<B>,
    config: &RenderConfig,
) -> BucketResult {
    let mut rng = StdRng::seed_from_u64(bucket.seed(config.seed));
    let mut pixels = Vec::with_capacity(bucket.pixel_count() as usize);

    for y in bucket.y..bucket.y + bucket.height {
        for x in bucket.x..bucket.x + bucket.width {
            pixels.push(render_pixel(camera, scene, x, y, config, &mut rng));
        }
    }

    log::debug!("Bucket {} done ({}x{} at {},{})", bucket.index, bucket.width, bucket.height, bucket.x, bucket.y);
    BucketResult {
        bucket: *bucket,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_buckets_exact_fit() {
        let buckets = generate_buckets(128, 128, 64);
        assert_eq!(buckets.len(), 4);

        let total: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total, 128 * 128);
    }

    #[test]
    fn test_generate_buckets_partial_fit() {
        let buckets = generate_buckets(100, 70, 64);
        assert_eq!(buckets.len(), 4);
        assert_eq!(buckets[3], Bucket { x: 64, y: 64, width: 36, height: 6, index: 3 });

        let total: u32 = buckets.iter().map(|b| b.pixel_count()).sum();
        assert_eq!(total, 100 * 70);
    }

    #[test]
    fn test_bucket_seeds_differ() {
        let buckets = generate_buckets(64, 64, 16);
        let mut seeds: Vec<u64> = buckets.iter().map(|b| b.seed(7)).collect();
        seeds.sort_unstable();
        seeds.dedup();
        assert_eq!(seeds.len(), buckets.len());
    }
}
