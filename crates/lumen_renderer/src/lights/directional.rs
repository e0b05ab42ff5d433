//! Directional light.

use lumen_core::{LightEntry, Result};
use lumen_math::{Color, DVec3};

use super::{occluded, Contribution, Illumination, Light};
use crate::Shape;

/// Parallel light arriving from infinitely far away, like sunlight.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalLight {
    /// Unit direction the light travels in
    direction: DVec3,
    intensity: f64,
    color: Color,
}

impl DirectionalLight {
    /// Create a new directional light travelling along `direction`.
    pub fn new(direction: DVec3, intensity: f64, color: Color) -> Self {
        Self {
            direction: direction.normalize_or_zero(),
            intensity: intensity.max(0.0),
            color,
        }
    }

    /// Build from `direction`, `intensity` and an optional `color`.
    pub fn from_entry(entry: &LightEntry) -> Result<Self> {
        let params = &entry.params;
        Ok(Self::new(
            params.direction("direction")?,
            params.non_negative("intensity")?,
            params.color_or("color", Color::ONE)?,
        ))
    }

    /// Energy reaching `point`, or `None` when something blocks the light.
    pub fn contribution(&self, point: DVec3, shapes: &dyn Shape) -> Option<Contribution> {
        let to_light = -self.direction;
        if occluded(shapes, point, to_light, f64::INFINITY) {
            return None;
        }

        Some(Contribution {
            direction: Some(to_light),
            intensity: self.intensity,
            color: self.color,
        })
    }
}

impl Light for DirectionalLight {
    fn illuminate(&self, point: DVec3, normal: DVec3, shapes: &dyn Shape) -> Illumination {
        self.contribution(point, shapes)
            .map(|c| Illumination::lambert(&c, normal))
            .unwrap_or_default()
    }
}
