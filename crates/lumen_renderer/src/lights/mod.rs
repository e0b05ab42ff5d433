//! Light capability and the built-in light variants.
//!
//! A light answers how much energy reaches a surface point. Ambient energy
//! and diffuse (Lambert) energy are kept apart so a composite can sum each
//! component over its children before the renderer combines them.

mod ambient;
mod directional;
mod point;

pub use ambient::AmbientLight;
pub use directional::DirectionalLight;
pub use point::PointLight;

use std::iter::Sum;
use std::ops::{Add, AddAssign};

use lumen_core::{LightEntry, LumenError, Result};
use lumen_math::{Color, DVec3, Interval, Ray, EPSILON};

use crate::{Composite, Factory, Shape};

/// Energy arriving at a point from one light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    /// Unit vector from the surface toward the light; `None` for ambient
    pub direction: Option<DVec3>,
    /// Intensity after attenuation
    pub intensity: f64,
    /// Light color
    pub color: Color,
}

impl Contribution {
    /// Color scaled by intensity.
    pub fn radiance(&self) -> Color {
        self.color * self.intensity
    }
}

/// Ambient and diffuse energy reaching a surface point.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Illumination {
    pub ambient: Color,
    pub diffuse: Color,
}

impl Illumination {
    /// Ambient-only energy.
    pub fn ambient(color: Color) -> Self {
        Self {
            ambient: color,
            diffuse: Color::ZERO,
        }
    }

    /// Lambert shading of a contribution on a surface with unit `normal`.
    ///
    /// Directionless contributions count as ambient.
    pub fn lambert(contribution: &Contribution, normal: DVec3) -> Self {
        match contribution.direction {
            None => Self::ambient(contribution.radiance()),
            Some(direction) => Self {
                ambient: Color::ZERO,
                diffuse: contribution.radiance() * normal.dot(direction).max(0.0),
            },
        }
    }

    /// Ambient plus diffuse.
    pub fn total(&self) -> Color {
        self.ambient + self.diffuse
    }
}

impl Add for Illumination {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            ambient: self.ambient + rhs.ambient,
            diffuse: self.diffuse + rhs.diffuse,
        }
    }
}

impl AddAssign for Illumination {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for Illumination {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

/// Trait for light sources.
pub trait Light: Send + Sync {
    /// Energy reaching `point` on a surface with unit `normal`; `shapes`
    /// is tested for occlusion.
    fn illuminate(&self, point: DVec3, normal: DVec3, shapes: &dyn Shape) -> Illumination;
}

/// A group of lights answered as one: contributions add up.
pub type LightComposite = Composite<dyn Light>;

impl Light for Composite<dyn Light> {
    fn illuminate(&self, point: DVec3, normal: DVec3, shapes: &dyn Shape) -> Illumination {
        self.iter()
            .map(|light| light.illuminate(point, normal, shapes))
            .sum()
    }
}

impl LightComposite {
    /// Build a composite from a light entry's `children`.
    pub fn from_entry(entry: &LightEntry, factory: &Factory) -> Result<Self> {
        if !entry.params.is_empty() {
            return Err(LumenError::config(
                "composite lights take no parameters; set them on the children",
            ));
        }

        entry
            .children
            .iter()
            .enumerate()
            .map(|(i, child)| {
                factory
                    .create_light(child)
                    .map_err(|e| e.in_entry(format!("children[{i}]")))
            })
            .collect()
    }
}

/// True if a shadow ray from `point` toward `direction` is blocked before
/// `max_distance`.
pub(crate) fn occluded(shapes: &dyn Shape, point: DVec3, direction: DVec3, max_distance: f64) -> bool {
    let shadow_ray = Ray::new(point, direction);
    shapes.occludes(&shadow_ray, Interval::new(EPSILON, max_distance - EPSILON))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ShapeComposite, Sphere, Surface};

    fn nothing() -> ShapeComposite {
        ShapeComposite::new()
    }

    #[test]
    fn test_lambert_cosine() {
        let contribution = Contribution {
            direction: Some(DVec3::new(0.0, 1.0, 1.0).normalize()),
            intensity: 1.0,
            color: Color::ONE,
        };
        let lit = Illumination::lambert(&contribution, DVec3::Y);
        let expected = std::f64::consts::FRAC_1_SQRT_2;
        assert!((lit.diffuse.x - expected).abs() < 1e-12);
        assert_eq!(lit.ambient, Color::ZERO);
    }

    #[test]
    fn test_lambert_from_behind_is_dark() {
        let contribution = Contribution {
            direction: Some(DVec3::NEG_Y),
            intensity: 3.0,
            color: Color::ONE,
        };
        assert_eq!(Illumination::lambert(&contribution, DVec3::Y).total(), Color::ZERO);
    }

    #[test]
    fn test_composite_is_additive() {
        let a = AmbientLight::new(0.2, Color::ONE);
        let b = DirectionalLight::new(DVec3::NEG_Y, 0.5, Color::new(1.0, 0.0, 0.0));
        let point = DVec3::ZERO;
        let normal = DVec3::Y;
        let shapes = nothing();

        let separate = a.illuminate(point, normal, &shapes) + b.illuminate(point, normal, &shapes);

        let composite = LightComposite::new()
            .with(Box::new(AmbientLight::new(0.2, Color::ONE)))
            .with(Box::new(DirectionalLight::new(
                DVec3::NEG_Y,
                0.5,
                Color::new(1.0, 0.0, 0.0),
            )));
        let together = composite.illuminate(point, normal, &shapes);

        assert!((separate.total() - together.total()).length() < 1e-12);
    }

    #[test]
    fn test_empty_composite_is_dark() {
        let lit = LightComposite::new().illuminate(DVec3::ZERO, DVec3::Y, &nothing());
        assert_eq!(lit, Illumination::default());
    }

    #[test]
    fn test_occluded_respects_distance() {
        let shapes = ShapeComposite::new().with(Box::new(Sphere::new(
            DVec3::new(0.0, 5.0, 0.0),
            1.0,
            Surface::new(Color::ONE),
        )));
        assert!(occluded(&shapes, DVec3::ZERO, DVec3::Y, 10.0));
        assert!(!occluded(&shapes, DVec3::ZERO, DVec3::Y, 3.0));
        assert!(!occluded(&shapes, DVec3::ZERO, DVec3::NEG_Y, 10.0));
    }

    #[test]
    fn test_composite_rejects_params() {
        let factory = Factory::with_builtins();
        let entry = LightEntry::new("composite").with("intensity", 1.0);
        assert!(LightComposite::from_entry(&entry, &factory).is_err());
    }
}
