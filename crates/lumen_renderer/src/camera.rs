//! Camera for ray generation.

use lumen_core::{CameraDescription, LumenError, Result};
use lumen_math::{DQuat, DVec3, Ray};

/// Pinhole camera oriented by yaw and pitch.
///
/// Yaw 0 and pitch 0 look down -Z with +Y up. Positive yaw turns toward +X,
/// positive pitch looks up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: DVec3,
    /// Horizontal field of view in degrees
    fov: f64,

    // Orthonormal basis; yaw and pitch are read back from `forward`
    forward: DVec3,
    up: DVec3,
    right: DVec3,
}

impl Camera {
    /// Create a camera; angles are in degrees.
    pub fn new(position: DVec3, yaw: f64, pitch: f64, fov: f64) -> Self {
        let (sin_y, cos_y) = yaw.to_radians().sin_cos();
        let (sin_p, cos_p) = pitch.to_radians().sin_cos();

        let forward = DVec3::new(cos_p * sin_y, sin_p, -cos_p * cos_y);
        let right = DVec3::new(cos_y, 0.0, sin_y);
        let up = right.cross(forward);

        Self {
            position,
            fov,
            forward,
            up,
            right,
        }
    }

    /// Build from a scene description.
    ///
    /// Position and field of view are required; the field of view must lie
    /// in (0, 180) degrees.
    pub fn from_description(description: &CameraDescription) -> Result<Self> {
        let position = description
            .position
            .ok_or_else(|| LumenError::config("missing field 'position'").in_entry("camera"))?;
        let fov = description
            .fov
            .ok_or_else(|| LumenError::config("missing field 'fov'").in_entry("camera"))?;

        if !(fov > 0.0 && fov < 180.0) {
            return Err(LumenError::config(format!(
                "field of view must be within (0, 180) degrees, got {fov}"
            ))
            .in_entry("camera"));
        }

        Ok(Self::new(position, description.yaw, description.pitch, fov))
    }

    /// Set the field of view in degrees.
    pub fn with_fov(mut self, fov: f64) -> Self {
        self.fov = fov;
        self
    }

    /// Ray from the camera through the center of pixel (`x`, `y`), with
    /// (0, 0) the top-left pixel.
    pub fn ray(&self, x: u32, y: u32, width: u32, height: u32) -> Ray {
        let aspect = width as f64 / height as f64;
        // Horizontal half-extent of the view plane one unit ahead
        let half_width = (self.fov.to_radians() / 2.0).tan();
        let half_height = half_width / aspect;

        let u = (2.0 * (x as f64 + 0.5) / width as f64 - 1.0) * half_width;
        let v = (1.0 - 2.0 * (y as f64 + 0.5) / height as f64) * half_height;

        Ray::new(self.position, self.forward + self.right * u + self.up * v)
    }

    /// Turn left or right about the current up axis.
    pub fn rotate_yaw(&mut self, degrees: f64) -> &mut Self {
        let rotation = DQuat::from_axis_angle(self.up, -degrees.to_radians());
        self.forward = rotation * self.forward;
        self.right = rotation * self.right;
        self.orthonormalize();
        self
    }

    /// Look up or down about the current right axis.
    pub fn rotate_pitch(&mut self, degrees: f64) -> &mut Self {
        let rotation = DQuat::from_axis_angle(self.right, degrees.to_radians());
        self.forward = rotation * self.forward;
        self.up = rotation * self.up;
        self.orthonormalize();
        self
    }

    /// Move the camera without turning it.
    pub fn translate(&mut self, offset: DVec3) -> &mut Self {
        self.position += offset;
        self
    }

    /// Turn to face `target`, keeping +Y as the reference up direction.
    pub fn look_at(&mut self, target: DVec3) -> &mut Self {
        if let Some(direction) = (target - self.position).try_normalize() {
            let (yaw, pitch) = angles_of(direction);
            *self = Self::new(self.position, yaw, pitch, self.fov);
        }
        self
    }

    fn orthonormalize(&mut self) {
        self.forward = self.forward.normalize();
        self.right = self.forward.cross(self.up).normalize();
        self.up = self.right.cross(self.forward);
    }

    pub fn position(&self) -> DVec3 {
        self.position
    }

    /// Yaw of the current view direction in degrees, within (-180, 180].
    pub fn yaw(&self) -> f64 {
        angles_of(self.forward).0
    }

    /// Pitch of the current view direction in degrees, within [-90, 90].
    pub fn pitch(&self) -> f64 {
        angles_of(self.forward).1
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    pub fn forward(&self) -> DVec3 {
        self.forward
    }

    pub fn up(&self) -> DVec3 {
        self.up
    }

    pub fn right(&self) -> DVec3 {
        self.right
    }
}

/// Yaw and pitch in degrees of a unit view direction.
fn angles_of(direction: DVec3) -> (f64, f64) {
    let yaw = direction.x.atan2(-direction.z).to_degrees();
    let pitch = direction.y.clamp(-1.0, 1.0).asin().to_degrees();
    (yaw, pitch)
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DVec3::ZERO, 0.0, 0.0, 90.0)
    }
}
