//! Ambient light.

use lumen_core::{LightEntry, Result};
use lumen_math::{Color, DVec3};

use super::{Contribution, Illumination, Light};
use crate::Shape;

/// Constant light reaching every point regardless of geometry.
#[derive(Debug, Clone, Copy)]
pub struct AmbientLight {
    intensity: f64,
    color: Color,
}

impl AmbientLight {
    pub fn new(intensity: f64, color: Color) -> Self {
        Self {
            intensity: intensity.max(0.0),
            color,
        }
    }

    /// Build from `intensity` and an optional `color` (default white).
    pub fn from_entry(entry: &LightEntry) -> Result<Self> {
        let params = &entry.params;
        Ok(Self::new(
            params.non_negative("intensity")?,
            params.color_or("color", Color::ONE)?,
        ))
    }

    /// Ambient light is never occluded.
    pub fn contribution(&self) -> Contribution {
        Contribution {
            direction: None,
            intensity: self.intensity,
            color: self.color,
        }
    }
}

impl Light for AmbientLight {
    fn illuminate(&self, _point: DVec3, normal: DVec3, _shapes: &dyn Shape) -> Illumination {
        Illumination::lambert(&self.contribution(), normal)
    }
}
