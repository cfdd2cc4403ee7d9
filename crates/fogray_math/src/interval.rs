#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Returns the size of the interval (max - min).
    pub fn size(&self) -> f32 {
        self.max - self.min
    }

    /// Returns true if x is within the interval [min, max] (inclusive).
    pub fn contains(&self, x: f32) -> bool {
        self.min <= x && x <= self.max
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f32) -> bool {
        self.min < x && x < self.max
    }

    /// Clamps x to be within the interval [min, max].
    pub fn clamp(&self, x: f32) -> f32 {
        x.clamp(self.min, self.max)
    }

    /// The unit interval [0, 1], used for light factors and color channels.
    pub const UNIT: Interval = Interval { min: 0.0, max: 1.0 };

    /// Every non-negative distance along a ray.
    pub const FORWARD: Interval = Interval {
        min: 0.0,
        max: f32::INFINITY,
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_size() {
        assert_eq!(Interval::new(2.0, 7.0).size(), 5.0);
        assert_eq!(Interval::new(-5.0, 5.0).size(), 10.0);
    }

    #[test]
    fn test_interval_contains() {
        let interval = Interval::new(0.0, 10.0);

        // Inclusive bounds
        assert!(interval.contains(0.0));
        assert!(interval.contains(10.0));
        assert!(interval.contains(5.0));

        // Outside bounds
        assert!(!interval.contains(-0.1));
        assert!(!interval.contains(10.1));
    }

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
    }

    #[test]
    fn test_interval_clamp() {
        assert_eq!(Interval::UNIT.clamp(-5.0), 0.0);
        assert_eq!(Interval::UNIT.clamp(0.25), 0.25);
        assert_eq!(Interval::UNIT.clamp(15.0), 1.0);
    }

    #[test]
    fn test_interval_forward() {
        assert!(Interval::FORWARD.contains(0.0));
        assert!(Interval::FORWARD.contains(1e30));
        assert!(!Interval::FORWARD.contains(-1e-6));
    }
}
