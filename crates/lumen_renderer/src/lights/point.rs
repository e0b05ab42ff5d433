//! Point light.

use lumen_core::{LightEntry, Result};
use lumen_math::{Color, DVec3};

use super::{occluded, Contribution, Illumination, Light};
use crate::Shape;

/// Light radiating from a single position, falling off with the square of
/// the distance.
#[derive(Debug, Clone, Copy)]
pub struct PointLight {
    position: DVec3,
    intensity: f64,
    color: Color,
}

impl PointLight {
    pub fn new(position: DVec3, intensity: f64, color: Color) -> Self {
        Self {
            position,
            intensity: intensity.max(0.0),
            color,
        }
    }

    /// Build from `position`, `intensity` and an optional `color`.
    pub fn from_entry(entry: &LightEntry) -> Result<Self> {
        let params = &entry.params;
        let translate = params.vec3_opt("translate")?.unwrap_or(DVec3::ZERO);
        Ok(Self::new(
            params.vec3("position")? + translate,
            params.non_negative("intensity")?,
            params.color_or("color", Color::ONE)?,
        ))
    }

    /// Energy reaching `point`, or `None` when something sits between the
    /// point and the light.
    pub fn contribution(&self, point: DVec3, shapes: &dyn Shape) -> Option<Contribution> {
        let offset = self.position - point;
        let distance_squared = offset.length_squared();
        // A point on the light itself receives no directed energy
        if distance_squared < 1e-12 {
            return None;
        }

        let distance = distance_squared.sqrt();
        let direction = offset / distance;
        if occluded(shapes, point, direction, distance) {
            return None;
        }

        Some(Contribution {
            direction: Some(direction),
            intensity: self.intensity / distance_squared,
            color: self.color,
        })
    }
}

impl Light for PointLight {
    fn illuminate(&self, point: DVec3, normal: DVec3, shapes: &dyn Shape) -> Illumination {
        self.contribution(point, shapes)
            .map(|c| Illumination::lambert(&c, normal))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ShapeComposite, Sphere, Surface};

    #[test]
    fn test_inverse_square_falloff() {
        let light = PointLight::new(DVec3::new(0.0, 2.0, 0.0), 8.0, Color::ONE);
        let c = light.contribution(DVec3::ZERO, &ShapeComposite::new()).unwrap();

        assert!((c.intensity - 2.0).abs() < 1e-12);
        assert_eq!(c.direction, Some(DVec3::Y));
    }

    #[test]
    fn test_blocker_between_point_and_light() {
        let light = PointLight::new(DVec3::new(0.0, 10.0, 0.0), 1.0, Color::ONE);
        let shapes = ShapeComposite::new().with(Box::new(Sphere::new(
            DVec3::new(0.0, 5.0, 0.0),
            1.0,
            Surface::new(Color::ONE),
        )));
        assert!(light.contribution(DVec3::ZERO, &shapes).is_none());
    }

    #[test]
    fn test_blocker_beyond_light_is_ignored() {
        let light = PointLight::new(DVec3::new(0.0, 3.0, 0.0), 1.0, Color::ONE);
        let shapes = ShapeComposite::new().with(Box::new(Sphere::new(
            DVec3::new(0.0, 5.0, 0.0),
            1.0,
            Surface::new(Color::ONE),
        )));
        assert!(light.contribution(DVec3::ZERO, &shapes).is_some());
    }
}
