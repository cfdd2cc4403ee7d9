// Re-export glam for convenience
pub use glam::*;

// fogray math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// RGB triple stored as a vector. Channels may leave [0, 1] after lighting
/// and are clamped at the presentation boundary.
pub type Color = Vec3;

/// Linear interpolation from `from` to `to`.
///
/// `t <= 0` returns `from` exactly and `t >= 1` returns `to` exactly, so the
/// endpoints never pick up rounding error.
#[inline]
pub fn lerp(from: Vec3, to: Vec3, t: f32) -> Vec3 {
    if t <= 0.0 {
        return from;
    }
    if t >= 1.0 {
        return to;
    }
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec3_operations() {
        let a = Vec3::new(1.0, 2.0, 3.0);
        let b = Vec3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vec3::new(3.0, 3.0, 3.0));
        assert_eq!(a * 2.0, Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(b / 2.0, Vec3::new(2.0, 2.5, 3.0));
        assert_eq!(a.dot(b), 32.0);
        assert_eq!(Vec3::new(3.0, 4.0, 0.0).length(), 5.0);
    }

    #[test]
    fn test_lerp_endpoints() {
        let from = Vec3::new(0.1, 0.2, 0.3);
        let to = Vec3::new(0.9, 0.5, 0.0);

        assert_eq!(lerp(from, to, 0.0), from);
        assert_eq!(lerp(from, to, 1.0), to);

        // Out of range t is clamped to the endpoints
        assert_eq!(lerp(from, to, -3.0), from);
        assert_eq!(lerp(from, to, 7.5), to);
    }

    #[test]
    fn test_lerp_midpoint() {
        let mid = lerp(Vec3::ZERO, Vec3::new(2.0, 4.0, -6.0), 0.5);
        assert!((mid - Vec3::new(1.0, 2.0, -3.0)).length() < 1e-6);
    }

    #[test]
    fn test_lerp_monotonic() {
        let from = Vec3::new(0.0, 1.0, 0.5);
        let to = Vec3::new(1.0, 0.0, 0.5);

        let mut prev = from;
        for step in 1..=20 {
            let t = step as f32 / 20.0;
            let cur = lerp(from, to, t);
            assert!(cur.x >= prev.x, "x decreased at t={}", t);
            assert!(cur.y <= prev.y, "y increased at t={}", t);
            assert_eq!(cur.z, 0.5);
            prev = cur;
        }
    }
}
