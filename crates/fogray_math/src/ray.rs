use crate::Vec3;

/// A ray in 3D space with an origin and a direction.
///
/// The direction is not required to be unit length. Shadow rays use the
/// un-normalized direction to carry the distance to the light, so callers
/// normalize explicitly when they need a unit direction.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Create a new ray.
    #[inline]
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Create the ray that starts at `from` and ends exactly at `to`.
    #[inline]
    pub fn between(from: Vec3, to: Vec3) -> Self {
        Self::new(from, to - from)
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// The point reached after travelling the full direction vector.
    #[inline]
    pub fn end(&self) -> Vec3 {
        self.origin + self.direction
    }

    /// Same origin, unit-length direction.
    ///
    /// A zero-length direction yields NaN components.
    #[inline]
    pub fn normalize(&self) -> Self {
        Self::new(self.origin, self.direction / self.direction.length())
    }
}

impl Default for Ray {
    fn default() -> Self {
        Self {
            origin: Vec3::ZERO,
            direction: Vec3::Z,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_at() {
        let ray = Ray::new(Vec3::ZERO, Vec3::X);

        assert_eq!(ray.at(0.0), Vec3::ZERO);
        assert_eq!(ray.at(1.0), Vec3::X);
        assert_eq!(ray.at(2.0), Vec3::new(2.0, 0.0, 0.0));
        assert_eq!(ray.at(-1.0), Vec3::new(-1.0, 0.0, 0.0));
    }

    #[test]
    fn test_ray_end() {
        let ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 5.0, 6.0));
        assert_eq!(ray.end(), Vec3::new(5.0, 7.0, 9.0));
        assert_eq!(ray.end(), ray.at(1.0));
    }

    #[test]
    fn test_ray_between() {
        let from = Vec3::new(1.0, 1.0, 1.0);
        let to = Vec3::new(4.0, 5.0, 1.0);
        let ray = Ray::between(from, to);

        assert_eq!(ray.origin, from);
        assert_eq!(ray.end(), to);
        assert_eq!(ray.direction.length(), 5.0);
    }

    #[test]
    fn test_ray_normalize() {
        let origin = Vec3::new(1.0, 2.0, 3.0);
        let ray = Ray::new(origin, Vec3::new(0.0, 3.0, 4.0)).normalize();

        assert_eq!(ray.origin, origin);
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert!((ray.direction - Vec3::new(0.0, 0.6, 0.8)).length() < 1e-6);
    }

    #[test]
    fn test_ray_normalize_zero_length() {
        let ray = Ray::new(Vec3::ONE, Vec3::ZERO).normalize();
        assert!(ray.direction.x.is_nan());
    }

    #[test]
    fn test_ray_copy() {
        let ray1 = Ray::new(Vec3::ZERO, Vec3::Y);
        let ray2 = ray1; // Copy, not move

        // Both should be usable
        assert_eq!(ray1.origin, ray2.origin);
        assert_eq!(ray1.at(1.0), ray2.at(1.0));
    }
}
