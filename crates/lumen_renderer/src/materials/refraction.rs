//! Refraction through dielectric surfaces.

use lumen_core::{LumenError, Params, Result};
use lumen_math::{reflect, refract, Color, Ray};

use super::{blend, degenerate, trace_secondary, Material, Tracer};
use crate::Hit;

/// Bends rays by Snell's law and blends in what they see.
#[derive(Debug, Clone, Copy)]
pub struct Refraction {
    /// Index of refraction (1.0 = air, 1.5 = glass, 2.4 = diamond)
    ior: f64,
    coefficient: f64,
}

impl Refraction {
    pub const DEFAULT_IOR: f64 = 1.5;
    pub const DEFAULT_COEFFICIENT: f64 = 0.8;

    pub fn new(ior: f64, coefficient: f64) -> Self {
        Self {
            ior,
            coefficient: coefficient.clamp(0.0, 1.0),
        }
    }

    /// Build from optional `ior` and `coefficient`.
    pub fn from_params(params: &Params) -> Result<Self> {
        let ior = params.number_or("ior", Self::DEFAULT_IOR)?;
        if !(ior > 0.0 && ior.is_finite()) {
            return Err(LumenError::config(format!(
                "field 'ior' must be positive, got {ior}"
            )));
        }

        Ok(Self::new(
            ior,
            params.unit_or("coefficient", Self::DEFAULT_COEFFICIENT)?,
        ))
    }

    pub fn ior(&self) -> f64 {
        self.ior
    }

    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

impl Default for Refraction {
    fn default() -> Self {
        Self::new(Self::DEFAULT_IOR, Self::DEFAULT_COEFFICIENT)
    }
}

impl Material for Refraction {
    fn apply(&self, ray_in: &Ray, hit: &Hit<'_>, depth: u32, tracer: &dyn Tracer, local: Color) -> Color {
        if degenerate(hit.normal) {
            return local;
        }

        let eta = if hit.front_face {
            1.0 / self.ior
        } else {
            self.ior
        };

        // Total internal reflection
        let direction = refract(ray_in.direction, hit.normal, eta)
            .unwrap_or_else(|| reflect(ray_in.direction, hit.normal));

        let refracted = trace_secondary(tracer, hit.point, direction, depth);
        blend(local, refracted, self.coefficient)
    }
}
