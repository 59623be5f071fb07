//! Bounding Volume Hierarchy (BVH) acceleration structure.
//!
//! Binary tree over [`Shape`]s with a median split on the longest centroid
//! axis. Built once; queries take `&self` and are safe from many threads.

use crate::{Hit, Hittable, Shape};
use strata_math::{Aabb, Interval, Ray};

/// Maximum primitives per leaf node before splitting.
const LEAF_MAX_SIZE: usize = 4;

/// BVH node - either a branch with two children or a leaf with primitives.
pub enum BvhNode {
    Branch {
        left: Box<BvhNode>,
        right: Box<BvhNode>,
        bbox: Aabb,
    },
    Leaf {
        shapes: Vec<Shape>,
        bbox: Aabb,
    },
    /// Built from zero shapes; every query misses.
    Empty,
}

impl BvhNode {
    /// Build a BVH owning `shapes`.
    pub fn new(shapes: Vec<Shape>) -> Self {
        if shapes.is_empty() {
            return BvhNode::Empty;
        }
        let count = shapes.len();
        let node = Self::build(shapes);
        log::debug!(
            "Built BVH: {} shapes, depth {}, bbox {:?}",
            count,
            node.depth(),
            node.bounding_box()
        );
        node
    }

    fn build(mut shapes: Vec<Shape>) -> Self {
        let bbox = shapes
            .iter()
            .fold(Aabb::EMPTY, |acc, s| Aabb::surrounding(&acc, &s.bounding_box()));

        if shapes.len() <= LEAF_MAX_SIZE {
            return BvhNode::Leaf { shapes, bbox };
        }

        let centroids = shapes.iter().fold(Aabb::EMPTY, |acc, s| {
            let c = s.bounding_box().centroid();
            Aabb::surrounding(&acc, &Aabb::from_points(c, c))
        });
        let axis = centroids.longest_axis();

        // Partition around the median centroid; full sorting is unnecessary
        let mid = shapes.len() / 2;
        shapes.select_nth_unstable_by(mid, |a, b| {
            let a = a.bounding_box().centroid()[axis];
            let b = b.bounding_box().centroid()[axis];
            a.total_cmp(&b)
        });
        let right = shapes.split_off(mid);

        BvhNode::Branch {
            left: Box::new(Self::build(shapes)),
            right: Box::new(Self::build(right)),
            bbox,
        }
    }

    /// Nearest hit inside `ray_t`, with its surface ray resolved.
    pub fn intersect(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        self.nearest(ray, ray_t)
            .map(|(shape, t)| Hit::new(shape, ray, t))
    }

    /// Distance to the nearest hit inside `ray_t`, or `f32::INFINITY`.
    ///
    /// Skips normal evaluation, which is all an occlusion test needs.
    pub fn shadow(&self, ray: &Ray, ray_t: Interval) -> f32 {
        self.nearest(ray, ray_t)
            .map_or(f32::INFINITY, |(_, t)| t)
    }

    fn nearest(&self, ray: &Ray, ray_t: Interval) -> Option<(&Shape, f32)> {
        match self {
            BvhNode::Empty => None,

            BvhNode::Leaf { shapes, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let mut closest: Option<(&Shape, f32)> = None;
                let mut limit = ray_t;
                for shape in shapes {
                    if let Some(t) = shape.hit(ray, limit) {
                        closest = Some((shape, t));
                        limit = limit.with_max(t);
                    }
                }
                closest
            }

            BvhNode::Branch { left, right, bbox } => {
                if !bbox.hit(ray, ray_t) {
                    return None;
                }

                let hit_left = left.nearest(ray, ray_t);
                // Only check right up to the closest hit so far
                let right_t = hit_left.map_or(ray_t, |(_, t)| ray_t.with_max(t));
                right.nearest(ray, right_t).or(hit_left)
            }
        }
    }

    pub fn bounding_box(&self) -> Aabb {
        match self {
            BvhNode::Empty => Aabb::EMPTY,
            BvhNode::Leaf { bbox, .. } | BvhNode::Branch { bbox, .. } => *bbox,
        }
    }

    /// Number of shapes stored in the tree.
    pub fn len(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { shapes, .. } => shapes.len(),
            BvhNode::Branch { left, right, .. } => left.len() + right.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, BvhNode::Empty)
    }

    /// Longest root-to-leaf path, counting the root.
    pub fn depth(&self) -> usize {
        match self {
            BvhNode::Empty => 0,
            BvhNode::Leaf { .. } => 1,
            BvhNode::Branch { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }
}
