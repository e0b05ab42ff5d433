//! Shape capability and the built-in shape variants.

mod cone;
mod cylinder;
mod mesh;
mod plane;
mod sphere;
mod triangle;

pub use cone::{Cone, InfiniteCone};
pub use cylinder::{Cylinder, InfiniteCylinder};
pub use mesh::{Mesh, MeshFace};
pub use plane::Plane;
pub use sphere::Sphere;
pub use triangle::{moller_trumbore, Triangle};

use lumen_core::{LumenError, Params, Result, ShapeEntry};
use lumen_math::{rotate_euler_degrees, DVec3, Interval, Ray};

use crate::{Composite, Factory, Hit};

/// Trait for objects that can be hit by rays.
pub trait Shape: Send + Sync {
    /// Find the nearest intersection whose distance lies strictly inside
    /// `ray_t`.
    ///
    /// The ray direction is unit length. Implementations never report a hit
    /// at or below [`lumen_math::EPSILON`], as long as `ray_t.min` respects it.
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>>;

    /// Find the nearest intersection in front of the ray origin.
    fn intersect(&self, ray: &Ray) -> Option<Hit<'_>> {
        self.intersect_within(ray, Interval::forward())
    }

    /// True if anything blocks the ray inside `ray_t`.
    fn occludes(&self, ray: &Ray, ray_t: Interval) -> bool {
        self.intersect_within(ray, ray_t).is_some()
    }
}

/// A group of shapes answered as a single shape: the nearest child hit wins.
pub type ShapeComposite = Composite<dyn Shape>;

impl Shape for Composite<dyn Shape> {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let nothing: Option<Hit<'_>> = None;
        self.reduce(nothing, |closest, child| {
            let closest_so_far = closest.as_ref().map_or(ray_t.max, |hit| hit.t);
            child
                .intersect_within(ray, ray_t.with_max(closest_so_far))
                .or(closest)
        })
    }
}

impl ShapeComposite {
    /// Build a composite from a scene entry's `children`.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        if !entry.materials.is_empty() {
            return Err(LumenError::config(
                "composite shapes take no materials; attach them to the children",
            ));
        }

        entry
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                factory
                    .create_shape(child)
                    .map_err(|e| e.in_entry(format!("children[{i}]")))
            })
            .collect()
    }
}

/// Tracks the closest candidate hit while a shape tests several surfaces.
pub(crate) struct Closest {
    ray_t: Interval,
    best: Option<(f64, DVec3)>,
}

impl Closest {
    pub(crate) fn new(ray_t: Interval) -> Self {
        Self { ray_t, best: None }
    }

    /// Offer a candidate distance and its outward normal.
    pub(crate) fn offer(&mut self, t: f64, outward_normal: DVec3) {
        let limit = self.best.map_or(self.ray_t.max, |(best_t, _)| best_t);
        if self.ray_t.min < t && t < limit {
            self.best = Some((t, outward_normal));
        }
    }

    pub(crate) fn into_inner(self) -> Option<(f64, DVec3)> {
        self.best
    }
}

/// Real roots of `a t² + b t + c = 0` in ascending order.
///
/// Returns `None` for a negative discriminant or a degenerate (`a ≈ 0`)
/// equation.
pub(crate) fn solve_quadratic(a: f64, b: f64, c: f64) -> Option<(f64, f64)> {
    if a.abs() < 1e-12 {
        return None;
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }
    let sqrtd = discriminant.sqrt();
    let t0 = (-b - sqrtd) / (2.0 * a);
    let t1 = (-b + sqrtd) / (2.0 * a);
    Some(if t0 <= t1 { (t0, t1) } else { (t1, t0) })
}

/// Split `v` into its component along the unit `axis` and the remainder.
#[inline]
pub(crate) fn split_along(v: DVec3, axis: DVec3) -> (f64, DVec3) {
    let along = v.dot(axis);
    (along, v - axis * along)
}

/// Read a position parameter, shifted by the optional `translate` vector.
pub(crate) fn placed(params: &Params, key: &str) -> Result<DVec3> {
    let position = params.vec3(key)?;
    Ok(position + params.vec3_opt("translate")?.unwrap_or(DVec3::ZERO))
}

/// Read a direction parameter, turned by the optional `rotation` (Euler
/// angles in degrees).
pub(crate) fn oriented(params: &Params, key: &str) -> Result<DVec3> {
    let axis = params.direction(key)?;
    Ok(match params.vec3_opt("rotation")? {
        Some(degrees) => rotate_euler_degrees(axis, degrees).normalize(),
        None => axis,
    })
}

/// Read an axis parameter that defaults to `default` when absent.
pub(crate) fn oriented_or(params: &Params, key: &str, default: DVec3) -> Result<DVec3> {
    if params.contains(key) {
        oriented(params, key)
    } else {
        let mut params = params.clone();
        params.insert(key, default);
        oriented(&params, key)
    }
}
