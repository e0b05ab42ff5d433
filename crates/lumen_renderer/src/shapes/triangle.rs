//! Triangle primitive for ray tracing.
//!
//! Uses the Möller-Trumbore algorithm for ray-triangle intersection.

use lumen_core::{LumenError, Result, ShapeEntry};
use lumen_math::{DVec3, Interval, Ray};

use super::{placed, Shape};
use crate::{Factory, Hit, Surface};

/// Möller-Trumbore ray-triangle intersection.
///
/// Returns `(t, u, v)` with barycentric `u`, `v` for any `t`, including
/// negative ones; callers decide which distances are acceptable.
pub fn moller_trumbore(ray: &Ray, v0: DVec3, v1: DVec3, v2: DVec3) -> Option<(f64, f64, f64)> {
    let edge1 = v1 - v0;
    let edge2 = v2 - v0;

    let h = ray.direction.cross(edge2);
    let a = edge1.dot(h);

    // Ray is parallel to triangle
    if a.abs() < 1e-12 {
        return None;
    }

    let f = 1.0 / a;
    let s = ray.origin - v0;
    let u = f * s.dot(h);
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let q = s.cross(edge1);
    let v = f * ray.direction.dot(q);
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    Some((f * edge2.dot(q), u, v))
}

/// A single flat triangle.
pub struct Triangle {
    v0: DVec3,
    v1: DVec3,
    v2: DVec3,
    /// Pre-computed face normal (unit length)
    normal: DVec3,
    surface: Surface,
}

impl Triangle {
    /// Create a new triangle from three vertices.
    ///
    /// Collinear or coincident vertices are rejected.
    pub fn new(v0: DVec3, v1: DVec3, v2: DVec3, surface: Surface) -> Result<Self> {
        let normal = (v1 - v0)
            .cross(v2 - v0)
            .try_normalize()
            .ok_or_else(|| LumenError::config("triangle vertices are degenerate"))?;

        Ok(Self {
            v0,
            v1,
            v2,
            normal,
            surface,
        })
    }

    /// Build from vertices `a`, `b`, `c` (counter-clockwise seen from the
    /// front), `color` and the material chain.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        Self::new(
            placed(params, "a")?,
            placed(params, "b")?,
            placed(params, "c")?,
            Surface::from_entry(entry, factory)?,
        )
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }
}

impl Shape for Triangle {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let (t, _, _) = moller_trumbore(ray, self.v0, self.v1, self.v2)?;
        if !ray_t.surrounds(t) {
            return None;
        }
        Some(Hit::new(ray, t, self.normal, &self.surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Color;

    fn facing_camera() -> Triangle {
        Triangle::new(
            DVec3::new(-1.0, -1.0, -2.0),
            DVec3::new(1.0, -1.0, -2.0),
            DVec3::new(0.0, 1.0, -2.0),
            Surface::new(Color::ONE),
        )
        .unwrap()
    }

    #[test]
    fn test_triangle_hit() {
        let triangle = facing_camera();
        let hit = triangle
            .intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z))
            .unwrap();

        assert!((hit.t - 2.0).abs() < 1e-9);
        assert!(hit.front_face);
        assert_eq!(hit.normal, DVec3::Z);
    }

    #[test]
    fn test_triangle_miss_outside_edges() {
        let ray = Ray::new(DVec3::new(2.0, 0.0, 0.0), DVec3::NEG_Z);
        assert!(facing_camera().intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_parallel_ray() {
        let ray = Ray::new(DVec3::new(0.0, 0.0, -2.0), DVec3::X);
        assert!(facing_camera().intersect(&ray).is_none());
    }

    #[test]
    fn test_triangle_behind() {
        let ray = Ray::new(DVec3::ZERO, DVec3::Z);
        assert!(facing_camera().intersect(&ray).is_none());
    }

    #[test]
    fn test_degenerate_triangle_rejected() {
        let result = Triangle::new(
            DVec3::ZERO,
            DVec3::X,
            DVec3::X * 2.0,
            Surface::new(Color::ONE),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_barycentrics() {
        let ray = Ray::new(DVec3::new(-1.0, -1.0, 1.0), DVec3::NEG_Z);
        let (t, u, v) = moller_trumbore(
            &ray,
            DVec3::new(-1.0, -1.0, 0.0),
            DVec3::new(1.0, -1.0, 0.0),
            DVec3::new(-1.0, 1.0, 0.0),
        )
        .unwrap();
        assert!((t - 1.0).abs() < 1e-12);
        assert!(u.abs() < 1e-12 && v.abs() < 1e-12);
    }
}
