//! Material chain links.
//!
//! A shape's materials run in order after local shading. Each one receives
//! the color produced so far, may spawn one secondary ray through the
//! [`Tracer`], and blends the result in with its coefficient.

mod reflection;
mod refraction;
mod transparency;

pub use reflection::Reflection;
pub use refraction::Refraction;
pub use transparency::Transparency;

use lumen_math::{Color, DVec3, Ray, SURFACE_OFFSET};

use crate::Hit;

/// Something that can resolve the color seen along a ray.
///
/// The renderer implements this; materials call back into it for
/// secondary rays.
pub trait Tracer {
    fn trace(&self, ray: &Ray, depth: u32) -> Color;
}

/// Trait for materials that modify a surface's color with secondary rays.
pub trait Material: Send + Sync {
    /// Combine `local` with whatever this material sees at `hit`.
    ///
    /// `depth` is the depth of `ray_in`; secondary rays are traced at
    /// `depth + 1`.
    fn apply(&self, ray_in: &Ray, hit: &Hit<'_>, depth: u32, tracer: &dyn Tracer, local: Color)
        -> Color;
}

/// Linear blend of the local color with a secondary color.
#[inline]
pub fn blend(local: Color, secondary: Color, coefficient: f64) -> Color {
    local * (1.0 - coefficient) + secondary * coefficient
}

/// True when the hit normal cannot orient a secondary ray.
#[inline]
pub(crate) fn degenerate(normal: DVec3) -> bool {
    normal.length_squared() < 0.5
}

/// Trace a secondary ray leaving `point` along `direction`.
pub(crate) fn trace_secondary(
    tracer: &dyn Tracer,
    point: DVec3,
    direction: DVec3,
    depth: u32,
) -> Color {
    let ray = Ray::offset(point, direction, SURFACE_OFFSET);
    tracer.trace(&ray, depth + 1)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_endpoints() {
        let local = Color::new(1.0, 0.0, 0.0);
        let secondary = Color::new(0.0, 0.0, 1.0);
        assert_eq!(blend(local, secondary, 0.0), local);
        assert_eq!(blend(local, secondary, 1.0), secondary);
        assert_eq!(blend(local, secondary, 0.5), Color::new(0.5, 0.0, 0.5));
    }
}
