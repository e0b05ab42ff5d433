//! Scene: the root shape, the root light and the camera.

use lumen_core::{LumenError, Result, SceneDescription};

use crate::{
    render_scene, Camera, Factory, ImageBuffer, Light, LightComposite, RenderConfig, Shape,
    ShapeComposite,
};

/// Everything a render pass reads.
#[derive(Default)]
pub struct Scene {
    shapes: ShapeComposite,
    lights: LightComposite,
    camera: Camera,
}

impl Scene {
    pub fn new(shapes: ShapeComposite, lights: LightComposite, camera: Camera) -> Self {
        Self {
            shapes,
            lights,
            camera,
        }
    }

    /// Resolve every entry of a description through `factory`.
    ///
    /// `camera` overrides the description's camera; one of the two must be
    /// present.
    pub fn from_description(
        description: &SceneDescription,
        camera: Option<Camera>,
        factory: &Factory,
    ) -> Result<Self> {
        let camera = match (camera, &description.camera) {
            (Some(camera), _) => camera,
            (None, Some(camera)) => Camera::from_description(camera)?,
            (None, None) => return Err(LumenError::config("scene has no camera")),
        };

        let shapes = description
            .shapes
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                factory
                    .create_shape(entry)
                    .map_err(|e| e.in_entry(format!("shapes[{i}]")))
            })
            .collect::<Result<ShapeComposite>>()?;

        let lights = description
            .lights
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                factory
                    .create_light(entry)
                    .map_err(|e| e.in_entry(format!("lights[{i}]")))
            })
            .collect::<Result<LightComposite>>()?;

        log::info!(
            "Built scene: {} shapes, {} lights",
            shapes.len(),
            lights.len()
        );

        Ok(Self::new(shapes, lights, camera))
    }

    /// Add a shape to the root composite.
    pub fn add_shape(&mut self, shape: Box<dyn Shape>) {
        self.shapes.add(shape);
    }

    /// Builder-style [`Scene::add_shape`].
    pub fn with_shape(mut self, shape: Box<dyn Shape>) -> Self {
        self.add_shape(shape);
        self
    }

    /// Add a light to the root composite.
    pub fn add_light(&mut self, light: Box<dyn Light>) {
        self.lights.add(light);
    }

    /// Builder-style [`Scene::add_light`].
    pub fn with_light(mut self, light: Box<dyn Light>) -> Self {
        self.add_light(light);
        self
    }

    pub fn shapes(&self) -> &ShapeComposite {
        &self.shapes
    }

    pub fn lights(&self) -> &LightComposite {
        &self.lights
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Render the scene from its camera.
    pub fn render(&self, width: u32, height: u32, config: &RenderConfig) -> ImageBuffer {
        render_scene(self, width, height, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{CameraDescription, LightEntry, ShapeEntry};
    use lumen_math::{Color, DVec3};

    fn description() -> SceneDescription {
        SceneDescription {
            camera: Some(CameraDescription::new(DVec3::ZERO, 90.0)),
            shapes: vec![ShapeEntry::new("sphere")
                .with("center", DVec3::new(0.0, 0.0, -3.0))
                .with("radius", 1.0)
                .with("color", Color::ONE)],
            lights: vec![LightEntry::new("ambient").with("intensity", 0.5)],
            ..Default::default()
        }
    }

    #[test]
    fn test_from_description() {
        let factory = Factory::with_builtins();
        let scene = Scene::from_description(&description(), None, &factory).unwrap();
        assert_eq!(scene.shapes().len(), 1);
        assert_eq!(scene.lights().len(), 1);
        assert_eq!(scene.camera().fov(), 90.0);
    }

    #[test]
    fn test_camera_override() {
        let factory = Factory::with_builtins();
        let camera = Camera::default().with_fov(40.0);
        let scene = Scene::from_description(&description(), Some(camera), &factory).unwrap();
        assert_eq!(scene.camera().fov(), 40.0);
    }

    #[test]
    fn test_missing_camera() {
        let factory = Factory::with_builtins();
        let description = SceneDescription {
            camera: None,
            ..description()
        };
        assert!(Scene::from_description(&description, None, &factory).is_err());
    }

    #[test]
    fn test_bad_entry_reports_location() {
        let factory = Factory::with_builtins();
        let mut description = description();
        description.shapes.push(
            ShapeEntry::new("composite").with_child(ShapeEntry::new("sphere").with("radius", 1.0)),
        );

        let err = Scene::from_description(&description, None, &factory)
            .err()
            .unwrap();
        let message = err.to_string();
        assert!(message.contains("shapes[1].children[0]"), "{message}");
        assert!(message.contains("center"), "{message}");
    }
}
