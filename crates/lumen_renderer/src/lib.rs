//! Lumen Renderer - recursive Whitted-style ray tracing
//!
//! Turns a scene (camera, shapes, lights, materials) into an image buffer.
//! Shapes, lights and materials are open sets: every kind is built through
//! a name-keyed [`Factory`] that plugins loaded at runtime can extend.

mod camera;
mod composite;
mod factory;
mod hit;
mod lights;
mod materials;
mod plugin;
mod renderer;
mod scene;
mod shapes;

pub use camera::Camera;
pub use composite::Composite;
pub use factory::{Factory, LightConstructor, MaterialConstructor, Registrar, ShapeConstructor};
pub use hit::{Hit, Surface};
pub use lights::{
    AmbientLight, Contribution, DirectionalLight, Illumination, Light, LightComposite, PointLight,
};
pub use materials::{blend, Material, Reflection, Refraction, Tracer, Transparency};
pub use plugin::{PluginHost, PLUGIN_ABI_VERSION};
pub use renderer::{
    color_to_rgb, ray_color, render_scene, sky_gradient, ImageBuffer, RenderConfig, Renderer,
};
pub use scene::Scene;
pub use shapes::{
    moller_trumbore, Cone, Cylinder, InfiniteCone, InfiniteCylinder, Mesh, MeshFace, Plane, Shape,
    ShapeComposite, Sphere, Triangle,
};

/// Re-export the setup types every constructor deals with
pub use lumen_core::{
    Capability, LightEntry, LumenError, MaterialEntry, ParamValue, Params, Result,
    SceneDescription, ShapeEntry,
};

/// Re-export common math types from lumen_math
pub use lumen_math::{Color, DVec3, Interval, Ray};
