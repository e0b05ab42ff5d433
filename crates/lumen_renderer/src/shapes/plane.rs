//! Infinite plane primitive.

use lumen_core::{LumenError, Result, ShapeEntry};
use lumen_math::{DVec3, Interval, Ray};

use super::{oriented, placed, Shape};
use crate::{Factory, Hit, Surface};

/// An infinite plane through `point` with unit `normal`.
pub struct Plane {
    point: DVec3,
    normal: DVec3,
    surface: Surface,
}

impl Plane {
    /// Create a new plane. `normal` does not need to be normalized.
    pub fn new(point: DVec3, normal: DVec3, surface: Surface) -> Self {
        Self {
            point,
            normal: normal.normalize_or_zero(),
            surface,
        }
    }

    /// Build a plane from a scene entry.
    ///
    /// Two forms are accepted: `point` + `normal`, or an axis-aligned
    /// `axis` (`"X"`, `"Y"` or `"Z"`) with an `offset` along it.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        let surface = Surface::from_entry(entry, factory)?;

        if let Some(axis) = params.text_opt("axis")? {
            let normal = match axis {
                "X" | "x" => DVec3::X,
                "Y" | "y" => DVec3::Y,
                "Z" | "z" => DVec3::Z,
                other => {
                    return Err(LumenError::config(format!(
                        "plane axis must be X, Y or Z, got '{other}'"
                    )))
                }
            };
            let offset = params.number_or("offset", 0.0)?;
            let translate = params.vec3_opt("translate")?.unwrap_or(DVec3::ZERO);
            return Ok(Self::new(normal * offset + translate, normal, surface));
        }

        Ok(Self::new(
            placed(params, "point")?,
            oriented(params, "normal")?,
            surface,
        ))
    }

    pub fn normal(&self) -> DVec3 {
        self.normal
    }
}

impl Shape for Plane {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let denominator = self.normal.dot(ray.direction);

        // Ray is parallel to the plane
        if denominator.abs() < 1e-12 {
            return None;
        }

        let t = (self.point - ray.origin).dot(self.normal) / denominator;
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

    fn floor() -> Plane {
        Plane::new(DVec3::new(0.0, -1.0, 0.0), DVec3::Y, Surface::new(Color::ONE))
    }

    #[test]
    fn test_plane_hit_from_above() {
        let ray = Ray::new(DVec3::ZERO, DVec3::new(0.0, -1.0, -1.0));
        let plane = floor();
        let hit = plane.intersect(&ray).unwrap();

        assert!((hit.point.y + 1.0).abs() < 1e-9);
        assert!((hit.t - 2f64.sqrt()).abs() < 1e-9);
        assert_eq!(hit.normal, DVec3::Y);
    }

    #[test]
    fn test_plane_hit_from_below_flips_normal() {
        let ray = Ray::new(DVec3::new(0.0, -2.0, 0.0), DVec3::Y);
        let plane = floor();
        let hit = plane.intersect(&ray).unwrap();
        assert_eq!(hit.normal, DVec3::NEG_Y);
        assert!(!hit.front_face);
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(DVec3::ZERO, DVec3::X);
        assert!(floor().intersect(&ray).is_none());
    }

    #[test]
    fn test_plane_behind_ray_misses() {
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);
        assert!(floor().intersect(&ray).is_none());
    }

    #[test]
    fn test_axis_form() {
        let factory = Factory::with_builtins();
        let entry = ShapeEntry::new("plane")
            .with("axis", "z")
            .with("offset", -5.0)
            .with("color", Color::ONE);
        let plane = Plane::from_entry(&entry, &factory).unwrap();

        let hit = plane.intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)).unwrap();
        assert!((hit.t - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_bad_axis() {
        let factory = Factory::with_builtins();
        let entry = ShapeEntry::new("plane")
            .with("axis", "W")
            .with("color", Color::ONE);
        assert!(Plane::from_entry(&entry, &factory).is_err());
    }
}
