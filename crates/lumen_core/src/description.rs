//! Resolved scene description.
//!
//! This is the renderer-agnostic form of a scene: camera parameters, render
//! settings, plugin paths, and ordered lists of shape and light entries. Each
//! entry names a type identifier that the renderer's Factory resolves into a
//! concrete object. The types derive `serde::Deserialize` so any serde format
//! can act as the scene parser; [`load_description`] reads JSON.

use std::fs;
use std::path::{Path, PathBuf};

use lumen_math::{Color, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{LumenError, Result};
use crate::params::{ParamValue, Params};

/// A complete scene as handed over by the parsing collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub render: RenderSettings,
    /// Required; its absence is reported when the scene is resolved.
    #[serde(default)]
    pub camera: Option<CameraDescription>,
    /// Plugin modules to load before any entry is resolved.
    #[serde(default)]
    pub plugins: Vec<PathBuf>,
    #[serde(default)]
    pub shapes: Vec<ShapeEntry>,
    #[serde(default)]
    pub lights: Vec<LightEntry>,
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Maximum number of nested secondary rays per primary ray.
    pub max_depth: u32,
    /// Color returned for rays that escape the scene
    pub background: Color,
    /// Use a white-to-blue sky gradient instead of `background`
    pub sky_gradient: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            max_depth: 5,
            background: Color::ZERO,
            sky_gradient: false,
        }
    }
}

/// Camera placement.
///
/// `position` and `fov` are required. They are optional here so a missing
/// field surfaces as a configuration error when the camera is built rather
/// than as a syntax error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraDescription {
    #[serde(default)]
    pub position: Option<DVec3>,
    /// Rotation around the vertical axis, in degrees.
    #[serde(default)]
    pub yaw: f64,
    /// Rotation around the horizontal axis, in degrees.
    #[serde(default)]
    pub pitch: f64,
    /// Horizontal field of view in degrees.
    #[serde(default, alias = "fieldOfView")]
    pub fov: Option<f64>,
}

impl CameraDescription {
    pub fn new(position: DVec3, fov: f64) -> Self {
        Self {
            position: Some(position),
            yaw: 0.0,
            pitch: 0.0,
            fov: Some(fov),
        }
    }
}

/// One shape to build through the Factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeEntry {
    /// Factory type identifier, e.g. `"sphere"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Material chain, applied in order.
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
    /// Child shapes, used by composite types.
    #[serde(default)]
    pub children: Vec<ShapeEntry>,
    /// Every other key of the entry.
    #[serde(flatten)]
    pub params: Params,
}

impl ShapeEntry {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            materials: Vec::new(),
            children: Vec::new(),
            params: Params::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_material(mut self, material: MaterialEntry) -> Self {
        self.materials.push(material);
        self
    }

    pub fn with_child(mut self, child: ShapeEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// One light to build through the Factory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LightEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub children: Vec<LightEntry>,
    #[serde(flatten)]
    pub params: Params,
}

impl LightEntry {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            children: Vec::new(),
            params: Params::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_child(mut self, child: LightEntry) -> Self {
        self.children.push(child);
        self
    }
}

/// One link of a shape's material chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialEntry {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub params: Params,
}

impl MaterialEntry {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            params: Params::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(key, value);
        self
    }
}

/// Parse a JSON scene description.
pub fn description_from_str(source: &str) -> Result<SceneDescription> {
    serde_json::from_str(source).map_err(|e| LumenError::Parse(e.to_string()))
}

/// Load a JSON scene description from disk.
pub fn load_description(path: impl AsRef<Path>) -> Result<SceneDescription> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|e| {
        LumenError::Parse(format!("cannot read scene file '{}': {e}", path.display()))
    })?;

    let description = description_from_str(&source)?;
    log::debug!(
        "Loaded scene description {}: {} shapes, {} lights, {} plugins",
        path.display(),
        description.shapes.len(),
        description.lights.len(),
        description.plugins.len()
    );
    Ok(description)
}
