//! Lumen Core - errors and scene description types.
//!
//! This crate provides:
//!
//! - **Error taxonomy**: `LumenError`, the single error kind every setup
//!   failure is reported through
//! - **Scene description**: the resolved, renderer-agnostic input consumed by
//!   the renderer's Factory (`SceneDescription`, `ShapeEntry`, ...)
//! - **Parameter sets**: `Params`, typed access to constructor parameters
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::load_description;
//!
//! let description = load_description("scene.json")?;
//! println!("{} shapes, {} lights",
//!     description.shapes.len(),
//!     description.lights.len());
//! ```

pub mod description;
pub mod error;
pub mod params;

// Re-export commonly used types
pub use description::{
    description_from_str, load_description, CameraDescription, LightEntry, MaterialEntry,
    RenderSettings, SceneDescription, ShapeEntry,
};
pub use error::{Capability, LumenError, Result};
pub use params::{ParamValue, Params};
