//! Sphere primitive.

use lumen_core::{Result, ShapeEntry};
use lumen_math::{DVec3, Interval, Ray};

use super::{placed, Shape};
use crate::{Factory, Hit, Surface};

/// A sphere primitive.
pub struct Sphere {
    center: DVec3,
    radius: f64,
    surface: Surface,
}

impl Sphere {
    /// Create a new sphere.
    pub fn new(center: DVec3, radius: f64, surface: Surface) -> Self {
        Self {
            center,
            radius: radius.max(0.0),
            surface,
        }
    }

    /// Build from `center`, `radius`, `color` and the material chain.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        Ok(Self::new(
            placed(params, "center")?,
            params.positive("radius")?,
            Surface::from_entry(entry, factory)?,
        ))
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl Shape for Sphere {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let oc = self.center - ray.origin;
        let a = ray.direction.length_squared();
        let h = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;

        let discriminant = h * h - a * c;
        if discriminant < 0.0 || a == 0.0 {
            return None;
        }

        let sqrtd = discriminant.sqrt();

        // Find the nearest root in the acceptable range
        let mut root = (h - sqrtd) / a;
        if !ray_t.surrounds(root) {
            root = (h + sqrtd) / a;
            if !ray_t.surrounds(root) {
                return None;
            }
        }

        let outward_normal = (ray.at(root) - self.center) / self.radius;
        Some(Hit::new(ray, root, outward_normal, &self.surface))
    }
}
