// Re-export glam for convenience
pub use glam::*;

// Lumen math types
mod interval;
mod ray;
pub use interval::Interval;
pub use ray::Ray;

/// RGB color, each channel nominally in 0-1.
pub type Color = DVec3;

/// Smallest accepted hit distance along a ray.
///
/// Intersections closer than this to the ray origin are treated as the
/// surface the ray started on and discarded.
pub const EPSILON: f64 = 1e-6;

/// Distance secondary rays are pushed off the surface they spawn from.
pub const SURFACE_OFFSET: f64 = 1e-4;

/// Reflect `v` about the unit normal `n`.
#[inline]
pub fn reflect(v: DVec3, n: DVec3) -> DVec3 {
    v - 2.0 * v.dot(n) * n
}

/// Refract the unit vector `uv` through a surface with unit normal `n`
/// (facing against `uv`), using the ratio of refractive indices
/// `eta = n_incident / n_transmitted`.
///
/// Returns `None` on total internal reflection.
#[inline]
pub fn refract(uv: DVec3, n: DVec3, eta: f64) -> Option<DVec3> {
    let cos_i = (-uv).dot(n).min(1.0);
    let sin2_t = eta * eta * (1.0 - cos_i * cos_i);
    if sin2_t > 1.0 {
        return None;
    }
    let cos_t = (1.0 - sin2_t).sqrt();
    Some(eta * uv + (eta * cos_i - cos_t) * n)
}

/// Rotate `v` by Euler angles in degrees, applied about X, then Y, then Z.
pub fn rotate_euler_degrees(v: DVec3, degrees: DVec3) -> DVec3 {
    let rotation = DQuat::from_euler(
        EulerRot::ZYX,
        degrees.z.to_radians(),
        degrees.y.to_radians(),
        degrees.x.to_radians(),
    );
    rotation * v
}
