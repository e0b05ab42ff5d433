use crate::DVec3;

/// A ray in 3D space with an origin and a unit-length direction.
///
/// The direction is normalized on construction so intersection code can rely
/// on `t` being a true distance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: DVec3,
    pub direction: DVec3,
}

impl Ray {
    /// Create a new ray. `direction` does not need to be normalized; a zero
    /// direction yields a ray that hits nothing.
    pub fn new(origin: DVec3, direction: DVec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Create a ray whose origin is pushed `offset` along `direction`, for rays
    /// leaving a surface.
    pub fn offset(origin: DVec3, direction: DVec3, offset: f64) -> Self {
        let direction = direction.normalize_or_zero();
        Self {
            origin: origin + direction * offset,
            direction,
        }
    }

    /// Get the point along the ray at parameter t.
    ///
    /// Returns: origin + t * direction
    #[inline]
    pub fn at(&self, t: f64) -> DVec3 {
        self.origin + self.direction * t
    }
}
