//! See-through surfaces.

use lumen_core::{Params, Result};
use lumen_math::{Color, Ray};

use super::{blend, degenerate, trace_secondary, Material, Tracer};
use crate::Hit;

/// Blends in what lies behind the surface along the unchanged ray
/// direction.
#[derive(Debug, Clone, Copy)]
pub struct Transparency {
    coefficient: f64,
}

impl Transparency {
    pub const DEFAULT_COEFFICIENT: f64 = 0.7;

    pub fn new(coefficient: f64) -> Self {
        Self {
            coefficient: coefficient.clamp(0.0, 1.0),
        }
    }

    pub fn from_params(params: &Params) -> Result<Self> {
        Ok(Self::new(
            params.unit_or("coefficient", Self::DEFAULT_COEFFICIENT)?,
        ))
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

impl Default for Transparency {
    fn default() -> Self {
        Self::new(Self::DEFAULT_COEFFICIENT)
    }
}

impl Material for Transparency {
    fn apply(&self, ray_in: &Ray, hit: &Hit<'_>, depth: u32, tracer: &dyn Tracer, local: Color) -> Color {
        if degenerate(hit.normal) {
            return local;
        }

        let behind = trace_secondary(tracer, hit.point, ray_in.direction, depth);
        blend(local, behind, self.coefficient)
    }
}
