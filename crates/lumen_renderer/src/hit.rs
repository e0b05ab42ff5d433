//! Hit record and per-shape surface data.

use lumen_core::{Result, ShapeEntry};
use lumen_math::{Color, DVec3, Ray};

use crate::{Factory, Material};

/// Color and material chain shared by every leaf shape.
#[derive(Default)]
pub struct Surface {
    /// Base color used for local shading
    pub color: Color,
    /// Material chain, applied in order after local shading
    pub materials: Vec<Box<dyn Material>>,
}

impl Surface {
    /// Create a plain surface with no materials.
    pub fn new(color: Color) -> Self {
        Self {
            color,
            materials: Vec::new(),
        }
    }

    /// Append a material to the chain.
    pub fn with_material(mut self, material: impl Material + 'static) -> Self {
        self.materials.push(Box::new(material));
        self
    }

    /// Build the surface of a scene entry: its required `color` and its
    /// material chain resolved through the Factory.
    pub fn from_entry(entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let color = entry.params.color("color")?;
        Self::with_color_from_entry(color, entry, factory)
    }

    /// Like [`Surface::from_entry`] but `color` may be omitted.
    pub fn from_entry_or(entry: &ShapeEntry, factory: &Factory, default: Color) -> Result<Self> {
        let color = entry.params.color_or("color", default)?;
        Self::with_color_from_entry(color, entry, factory)
    }

    fn with_color_from_entry(color: Color, entry: &ShapeEntry, factory: &Factory) -> Result<Self> {
        let materials = entry
            .materials
            .iter()
            .enumerate()
            .map(|(i, m)| {
                factory
                    .create_material(m)
                    .map_err(|e| e.in_entry(format!("materials[{i}]")))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { color, materials })
    }
}

/// Record of a ray-shape intersection.
#[derive(Clone, Copy)]
pub struct Hit<'a> {
    /// Distance along the ray, always greater than [`lumen_math::EPSILON`]
    pub t: f64,
    /// Point of intersection
    pub point: DVec3,
    /// Unit surface normal, always pointing against the incoming ray
    pub normal: DVec3,
    /// Whether the ray hit the front face (outside) of the surface
    pub front_face: bool,
    /// Base color at the hit point
    pub color: Color,
    /// Material chain of the shape that was hit
    pub materials: &'a [Box<dyn Material>],
}

impl<'a> Hit<'a> {
    /// Build a hit at distance `t` along `ray`.
    ///
    /// `outward_normal` does not need to be normalized; it is flipped when
    /// the ray hits the back face so the stored normal faces the ray.
    pub fn new(ray: &Ray, t: f64, outward_normal: DVec3, surface: &'a Surface) -> Self {
        let outward_normal = outward_normal.normalize_or_zero();
        // If the ray and normal point in the same direction, we're inside
        let front_face = ray.direction.dot(outward_normal) < 0.0;

        Self {
            t,
            point: ray.at(t),
            normal: if front_face {
                outward_normal
            } else {
                -outward_normal
            },
            front_face,
            color: surface.color,
            materials: &surface.materials,
        }
    }

    /// Override the base color, e.g. per-face mesh colors.
    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}
