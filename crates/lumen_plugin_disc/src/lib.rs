//! Sample plugin: a flat disc shape.
//!
//! Build as a `cdylib` and list the library under `plugins` in a scene
//! description (or pass `--plugin` to the CLI) to make the `disc` shape
//! type available:
//!
//! ```json
//! { "type": "disc", "center": [0, -1, -4], "normal": [0, 1, 0],
//!   "radius": 2, "color": [0.8, 0.8, 0.2] }
//! ```

use lumen_renderer::{DVec3, Factory, Hit, Interval, Ray, Result, Shape, ShapeEntry, Surface};

/// A disc of `radius` around `center`, facing along `normal`.
pub struct Disc {
    center: DVec3,
    normal: DVec3,
    radius: f64,
    surface: Surface,
}

impl Disc {
    pub fn new(center: DVec3, normal: DVec3, radius: f64, surface: Surface) -> Self {
        Self {
            center,
            normal: normal.normalize_or_zero(),
            radius,
            surface,
        }
    }

    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let params = &entry.params;
        Ok(Self::new(
            params.vec3("center")?,
            params.direction("normal")?,
            params.positive("radius")?,
            Surface::from_entry(entry, factory)?,
        ))
    }
}

impl Shape for Disc {
    fn intersect_within(&self, ray: &Ray, ray_t: Interval) -> Option<Hit<'_>> {
        let denominator = self.normal.dot(ray.direction);
        if denominator.abs() < 1e-12 {
            return None;
        }

        let t = (self.center - ray.origin).dot(self.normal) / denominator;
        if !ray_t.surrounds(t) {
            return None;
        }

        if (ray.at(t) - self.center).length_squared() > self.radius * self.radius {
            return None;
        }

        Some(Hit::new(ray, t, self.normal, &self.surface))
    }
}

/// Register the `disc` shape.
pub fn register(factory: &mut Factory) -> Result<()> {
    factory.register_shape("disc", |entry: &ShapeEntry, factory: &Factory| {
        let disc: Box<dyn Shape> = Box::new(Disc::from_entry(entry, factory)?);
        Ok(disc)
    })?;
    log::debug!("Disc plugin registered");
    Ok(())
}

lumen_renderer::declare_plugin!(register);
