//! Math types shared by the Strata integrator.
//!
//! Re-exports glam and adds the few geometric primitives the tracer needs:
//! rays with unit directions, parameter intervals, and bounding boxes.

// Re-export glam for convenience
pub use glam::*;

mod aabb;
mod interval;
mod ray;

pub use aabb::Aabb;
pub use interval::Interval;
pub use ray::Ray;

/// Build an orthonormal basis `(u, v)` perpendicular to the unit vector `w`.
///
/// Uses the branchless construction of Duff et al. so it stays stable when
/// `w` is close to any axis.
pub fn orthonormal_basis(w: Vec3) -> (Vec3, Vec3) {
    let sign = 1.0_f32.copysign(w.z);
    let a = -1.0 / (sign + w.z);
    let b = w.x * w.y * a;
    let u = Vec3::new(1.0 + sign * w.x * w.x * a, sign * b, -sign * w.x);
    let v = Vec3::new(b, sign + w.y * w.y * a, -w.y);
    (u, v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthonormal_basis() {
        for w in [
            Vec3::X,
            Vec3::Y,
            Vec3::Z,
            -Vec3::Z,
            Vec3::new(1.0, 2.0, -3.0).normalize(),
        ] {
            let (u, v) = orthonormal_basis(w);
            assert!((u.length() - 1.0).abs() < 1e-5);
            assert!((v.length() - 1.0).abs() < 1e-5);
            assert!(u.dot(v).abs() < 1e-5);
            assert!(u.dot(w).abs() < 1e-5);
            assert!(v.dot(w).abs() < 1e-5);
        }
    }
}
