//! Finite and infinite cylinders.

use lumen_core::{Result, ShapeEntry};
use lumen_math::{DVec3, Interval, Ray};

use super::{oriented_or, placed, solve_quadratic, split_along, Closest, Shape};
use crate::{Factory, Hit, Surface};

/// A capped cylinder standing on its base center and extending `height`
/// along `axis`.
pub struct Cylinder {
    base: DVec3,
    axis: DVec3,
    radius: f64,
    height: f64,
    surface: Surface,
}

impl Cylinder {
    pub fn new(base: DVec3, axis: DVec3, radius: f64, height: f64, surface: Surface) -> Self {
        Self {
            base,
            axis: axis.normalize_or_zero(),
            radius,
            height,
            surface,
        }
    }

    /// Build from `center` (base), optional `axis` (default +Y), `radius`
    /// and `height`.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        Ok(Self::new(
            placed(params, "center")?,
            oriented_or(params, "axis", DVec3::Y)?,
            params.positive("radius")?,
            params.positive("height")?,
            Surface::from_entry(entry, factory)?,
        ))
    }
}

impl Shape for Cylinder {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let (m0, v_perp) = split_along(ray.origin - self.base, self.axis);
        let (md, d_perp) = split_along(ray.direction, self.axis);
        let r2 = self.radius * self.radius;
        let mut closest = Closest::new(ray_t);

        // Lateral surface, clipped to the body
        if let Some((t0, t1)) = solve_quadratic(
            d_perp.length_squared(),
            2.0 * v_perp.dot(d_perp),
            v_perp.length_squared() - r2,
        ) {
            for t in [t0, t1] {
                let m = m0 + t * md;
                if (0.0..=self.height).contains(&m) {
                    closest.offer(t, v_perp + d_perp * t);
                }
            }
        }

        // End caps
        if md.abs() > 1e-12 {
            for (cap, normal) in [(0.0, -self.axis), (self.height, self.axis)] {
                let t = (cap - m0) / md;
                if (v_perp + d_perp * t).length_squared() <= r2 {
                    closest.offer(t, normal);
                }
            }
        }

        let (t, outward_normal) = closest.into_inner()?;
        Some(Hit::new(ray, t, outward_normal, &self.surface))
    }
}

/// A cylinder of unbounded length around the line through `center` along
/// `axis`.
pub struct InfiniteCylinder {
    center: DVec3,
    axis: DVec3,
    radius: f64,
    surface: Surface,
}

impl InfiniteCylinder {
    pub fn new(center: DVec3, axis: DVec3, radius: f64, surface: Surface) -> Self {
        Self {
            center,
            axis: axis.normalize_or_zero(),
            radius,
            surface,
        }
    }

    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        Ok(Self::new(
            placed(params, "center")?,
            oriented_or(params, "axis", DVec3::Y)?,
            params.positive("radius")?,
            Surface::from_entry(entry, factory)?,
        ))
    }
}

impl Shape for InfiniteCylinder {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let (_, v_perp) = split_along(ray.origin - self.center, self.axis);
        let (_, d_perp) = split_along(ray.direction, self.axis);

        let (t0, t1) = solve_quadratic(
            d_perp.length_squared(),
            2.0 * v_perp.dot(d_perp),
            v_perp.length_squared() - self.radius * self.radius,
        )?;

        let mut closest = Closest::new(ray_t);
        closest.offer(t0, v_perp + d_perp * t0);
        closest.offer(t1, v_perp + d_perp * t1);

        let (t, outward_normal) = closest.into_inner()?;
        Some(Hit::new(ray, t, outward_normal, &self.surface))
    }
}
