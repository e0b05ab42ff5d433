//! Finite and infinite cones.
//!
//! Both are described by an apex, a unit axis and a slope `k`: a point
//! `m` units along the axis lies on the surface when its distance from the
//! axis is `k·|m|`.

use lumen_core::{LumenError, Result, ShapeEntry};
use lumen_math::{DVec3, Interval, Ray};

use super::{oriented_or, placed, solve_quadratic, split_along, Closest, Shape};
use crate::{Factory, Hit, Surface};

/// Roots of the cone equation for a ray, relative to `apex` along `axis`.
///
/// Rays parallel to a generatrix reduce the quadratic to a linear equation
/// with a single root.
fn cone_roots(ray: &Ray, apex: DVec3, axis: DVec3, k: f64) -> Option<(f64, f64)> {
    let (m0, v_perp) = split_along(ray.origin - apex, axis);
    let (md, d_perp) = split_along(ray.direction, axis);
    let k2 = k * k;

    let a = d_perp.length_squared() - k2 * md * md;
    let b = 2.0 * (v_perp.dot(d_perp) - k2 * m0 * md);
    let c = v_perp.length_squared() - k2 * m0 * m0;

    if a.abs() < 1e-12 {
        if b.abs() < 1e-12 {
            return None;
        }
        let t = -c / b;
        return Some((t, t));
    }
    solve_quadratic(a, b, c)
}

/// Outward normal of the lateral surface at `point`.
fn cone_normal(point: DVec3, apex: DVec3, axis: DVec3, k: f64) -> DVec3 {
    let v = point - apex;
    let m = v.dot(axis);
    v - axis * ((1.0 + k * k) * m)
}

/// A cone with its apex at `apex`, opening along `axis` to a base disc of
/// `radius` at distance `height`.
pub struct Cone {
    apex: DVec3,
    axis: DVec3,
    radius: f64,
    height: f64,
    surface: Surface,
}

impl Cone {
    /// Create a new cone. A negative `height` opens the cone the other way.
    pub fn new(apex: DVec3, axis: DVec3, radius: f64, height: f64, surface: Surface) -> Self {
        let axis = axis.normalize_or_zero();
        let (axis, height) = if height < 0.0 {
            (-axis, -height)
        } else {
            (axis, height)
        };

        Self {
            apex,
            axis,
            radius,
            height,
            surface,
        }
    }

    /// Build from `center` (apex), optional `axis` (default +Y), `radius`
    /// and a non-zero `height`.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        let height = params.number("height")?;
        if height == 0.0 || !height.is_finite() {
            return Err(LumenError::config(format!(
                "field 'height' must be non-zero, got {height}"
            )));
        }

        Ok(Self::new(
            placed(params, "center")?,
            oriented_or(params, "axis", DVec3::Y)?,
            params.positive("radius")?,
            height,
            Surface::from_entry(entry, factory)?,
        ))
    }

    fn slope(&self) -> f64 {
        self.radius / self.height
    }
}

impl Shape for Cone {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let k = self.slope();
        let mut closest = Closest::new(ray_t);

        if let Some((t0, t1)) = cone_roots(ray, self.apex, self.axis, k) {
            for t in [t0, t1] {
                let point = ray.at(t);
                let m = (point - self.apex).dot(self.axis);
                // Only the nappe between apex and base belongs to the cone
                if (0.0..=self.height).contains(&m) {
                    closest.offer(t, cone_normal(point, self.apex, self.axis, k));
                }
            }
        }

        // Base cap
        let md = ray.direction.dot(self.axis);
        if md.abs() > 1e-12 {
            let t = (self.height - (ray.origin - self.apex).dot(self.axis)) / md;
            let center = self.apex + self.axis * self.height;
            if (ray.at(t) - center).length_squared() <= self.radius * self.radius {
                closest.offer(t, self.axis);
            }
        }

        let (t, outward_normal) = closest.into_inner()?;
        Some(Hit::new(ray, t, outward_normal, &self.surface))
    }
}

/// A double cone of unbounded extent with half-opening `angle`.
pub struct InfiniteCone {
    apex: DVec3,
    axis: DVec3,
    slope: f64,
    surface: Surface,
}

impl InfiniteCone {
    /// Create a new cone; `angle` is the half-opening in degrees, within
    /// (0, 90).
    pub fn new(apex: DVec3, axis: DVec3, angle: f64, surface: Surface) -> Result<Self> {
        if !(angle > 0.0 && angle < 90.0) {
            return Err(LumenError::config(format!(
                "cone angle must be within (0, 90) degrees, got {angle}"
            )));
        }

        Ok(Self {
            apex,
            axis: axis.normalize_or_zero(),
            slope: angle.to_radians().tan(),
            surface,
        })
    }

    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        Self::new(
            placed(params, "center")?,
            oriented_or(params, "axis", DVec3::Y)?,
            params.number("angle")?,
            Surface::from_entry(entry, factory)?,
        )
    }
}

impl Shape for InfiniteCone {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let (t0, t1) = cone_roots(ray, self.apex, self.axis, self.slope)?;

        let mut closest = Closest::new(ray_t);
        for t in [t0, t1] {
            closest.offer(t, cone_normal(ray.at(t), self.apex, self.axis, self.slope));
        }

        let (t, outward_normal) = closest.into_inner()?;
        Some(Hit::new(ray, t, outward_normal, &self.surface))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_math::Color;

    // Apex above, opening downward to a unit base disc at y = -1
    fn funnel() -> Cone {
        Cone::new(
            DVec3::new(0.0, 1.0, -5.0),
            DVec3::NEG_Y,
            1.0,
            2.0,
            Surface::new(Color::ONE),
        )
    }

    #[test]
    fn test_lateral_hit() {
        let cone = funnel();
        let hit = cone.intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)).unwrap();
        assert!((hit.t - 4.5).abs() < 1e-9);

        let expected = DVec3::new(0.0, 0.25, 0.5).normalize();
        assert!((hit.normal - expected).length() < 1e-9);
        assert!(hit.front_face);
    }

    #[test]
    fn test_base_cap_hit() {
        let ray = Ray::new(DVec3::new(0.0, -5.0, -5.0), DVec3::Y);
        let cone = funnel();
        let hit = cone.intersect(&ray).unwrap();
        assert!((hit.t - 4.0).abs() < 1e-9);
        assert_eq!(hit.normal, DVec3::NEG_Y);
    }

    #[test]
    fn test_other_nappe_is_ignored() {
        // Above the apex the mirrored nappe would be hit by an infinite cone
        let ray = Ray::new(DVec3::new(0.0, 2.0, 0.0), DVec3::NEG_Z);
        assert!(funnel().intersect(&ray).is_none());
    }

    #[test]
    fn test_negative_height_flips_axis() {
        let flipped = Cone::new(
            DVec3::new(0.0, 1.0, -5.0),
            DVec3::Y,
            1.0,
            -2.0,
            Surface::new(Color::ONE),
        );
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let a = flipped.intersect(&ray).unwrap();
        let upright = funnel();
        let b = upright.intersect(&ray).unwrap();
        assert!((a.t - b.t).abs() < 1e-9);
    }

    #[test]
    fn test_infinite_cone_double_nappe() {
        let cone = InfiniteCone::new(
            DVec3::new(0.0, 0.0, -5.0),
            DVec3::Y,
            45.0,
            Surface::new(Color::ONE),
        )
        .unwrap();

        for y in [1.0, -1.0, 2.0] {
            let hit = cone
                .intersect(&Ray::new(DVec3::new(0.0, y, 0.0), DVec3::NEG_Z))
                .unwrap();
            assert!((hit.t - (5.0 - y.abs())).abs() < 1e-9);
        }
    }

    #[test]
    fn test_infinite_cone_rejects_bad_angle() {
        for angle in [0.0, 90.0, 120.0, -10.0] {
            assert!(InfiniteCone::new(DVec3::ZERO, DVec3::Y, angle, Surface::new(Color::ONE)).is_err());
        }
    }

    #[test]
    fn test_zero_height_rejected() {
        let factory = Factory::with_builtins();
        let entry = ShapeEntry::new("cone")
            .with("center", DVec3::ZERO)
            .with("radius", 1.0)
            .with("height", 0.0)
            .with("color", Color::ONE);
        assert!(Cone::from_entry(&entry, &factory).is_err());
    }
}
