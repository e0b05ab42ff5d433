//! Mirror reflection.

use lumen_core::{Params, Result};
use lumen_math::{reflect, Color, Ray};

use super::{blend, degenerate, trace_secondary, Material, Tracer};
use crate::Hit;

/// Blends in what the surface mirrors.
#[derive(Debug, Clone, Copy)]
pub struct Reflection {
    coefficient: f64,
}

impl Reflection {
    pub const DEFAULT_COEFFICIENT: f64 = 0.9;

    /// Create a reflection with a blend coefficient, clamped to [0, 1].
    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient: coefficient.clamp(0.0, 1.0),
        }
    }

    /// Build from an optional `coefficient`.
    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(
            params.unit_or("coefficient", Self::DEFAULT_COEFFICIENT)?,
        ))
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

impl Default for Reflection {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COEFFICIENT)
    }
}

impl Material for Reflection {
    fn apply(&self, ray_in: &Ray, hit: &Hit<'_>, depth: u32, tracer: &dyn Tracer, local: Color) -> Color {
        if degenerate(hit.normal) {
            return local;
        }

        let direction = reflect(ray_in.direction, hit.normal);
        let reflected = trace_secondary(tracer, hit.point, direction, depth);
        blend(local, reflected, self.coefficient)
    }
}
