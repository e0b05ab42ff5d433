/// A closed range of ray parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f64,
    pub max: f64,
}

impl Interval {
    /// Create a new interval given min and max values.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Interval of valid hit distances: everything beyond [`crate::EPSILON`].
    pub const fn forward() -> Self {
        Self::new(crate::EPSILON, f64::INFINITY)
    }

    /// Returns true if x is strictly within the interval (min, max) (exclusive).
    pub fn surrounds(&self, x: f64) -> bool {
        self.min < x && x < self.max
    }

    /// Same interval with `max` lowered to `max`, used while narrowing
    /// toward the closest hit.
    pub fn with_max(&self, max: f64) -> Interval {
        Interval::new(self.min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_surrounds() {
        let interval = Interval::new(0.0, 10.0);

        // Exclusive bounds - endpoints NOT included
        assert!(!interval.surrounds(0.0));
        assert!(!interval.surrounds(10.0));
        assert!(interval.surrounds(5.0));
    }

    #[test]
    fn test_forward_excludes_origin() {
        let forward = Interval::forward();
        assert!(!forward.surrounds(0.0));
        assert!(!forward.surrounds(crate::EPSILON));
        assert!(forward.surrounds(1e-3));
        assert!(forward.surrounds(1e12));
    }

    #[test]
    fn test_with_max_narrows() {
        let narrowed = Interval::forward().with_max(2.0);
        assert!(narrowed.surrounds(1.0));
        assert!(!narrowed.surrounds(3.0));
    }
}
