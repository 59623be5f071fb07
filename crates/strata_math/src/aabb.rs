use crate::{Interval, Ray, Vec3};

/// Axis-aligned bounding box, one interval per axis.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

/// Boxes thinner than this on an axis get padded (flat triangles, planes).
const MIN_EXTENT: f32 = 0.0001;

impl Aabb {
    /// Contains nothing; identity for [`Aabb::surrounding`].
    pub const EMPTY: Aabb = Aabb {
        x: Interval::EMPTY,
        y: Interval::EMPTY,
        z: Interval::EMPTY,
    };

    /// Create an AABB from two opposite corners, in any order.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        let lo = a.min(b);
        let hi = a.max(b);
        Self {
            x: Interval::new(lo.x, hi.x),
            y: Interval::new(lo.y, hi.y),
            z: Interval::new(lo.z, hi.z),
        }
        .padded()
    }

    /// Create an AABB that surrounds two other AABBs.
    pub fn surrounding(a: &Aabb, b: &Aabb) -> Self {
        Self {
            x: Interval::hull(&a.x, &b.x),
            y: Interval::hull(&a.y, &b.y),
            z: Interval::hull(&a.z, &b.z),
        }
    }

    /// Get the interval for an axis (0=X, 1=Y, 2=Z).
    pub fn axis(&self, n: usize) -> Interval {
        match n {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    pub fn min(&self) -> Vec3 {
        Vec3::new(self.x.min, self.y.min, self.z.min)
    }

    pub fn max(&self) -> Vec3 {
        Vec3::new(self.x.max, self.y.max, self.z.max)
    }

    /// Slab test: does the ray pass through the box within `ray_t`?
    pub fn hit(&self, ray: &Ray, ray_t: Interval) -> bool {
        let mut t = ray_t;
        for axis in 0..3 {
            let slab = self.axis(axis);
            let inv = 1.0 / ray.direction[axis];
            let t0 = (slab.min - ray.origin[axis]) * inv;
            let t1 = (slab.max - ray.origin[axis]) * inv;
            let (near, far) = if inv < 0.0 { (t1, t0) } else { (t0, t1) };
            t = t.intersect(&Interval::new(near, far));
            if t.max <= t.min {
                return false;
            }
        }
        true
    }

    /// Index of the axis with the longest extent.
    pub fn longest_axis(&self) -> usize {
        let size = self.max() - self.min();
        if size.x > size.y && size.x > size.z {
            0
        } else if size.y > size.z {
            1
        } else {
            2
        }
    }

    pub fn centroid(&self) -> Vec3 {
        (self.min() + self.max()) * 0.5
    }

    fn padded(mut self) -> Self {
        for slab in [&mut self.x, &mut self.y, &mut self.z] {
            if slab.size() < MIN_EXTENT {
                *slab = slab.expand(MIN_EXTENT);
            }
        }
        self
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}
