//! Core recursive ray tracer.
//!
//! Implements Whitted-style shading:
//! - Local shading from every light, with shadow rays
//! - A material chain per shape for reflection, refraction and transparency
//! - Recursion bounded by a maximum depth

use std::path::PathBuf;
use std::time::Instant;

use lumen_core::{LumenError, RenderSettings, Result, SceneDescription};
use lumen_math::{Color, Ray};
use rayon::prelude::*;

use crate::{Camera, Factory, Light, PluginHost, Scene, Shape, Tracer};

/// Render configuration.
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Maximum recursion depth; the primary ray has depth 0
    pub max_depth: u32,
    /// Background color when a ray doesn't hit anything
    pub background: Color,
    /// Whether to use sky gradient instead of solid background
    pub use_sky_gradient: bool,
    /// Render rows in parallel with rayon
    pub parallel: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            max_depth: 5,
            background: Color::ZERO,
            use_sky_gradient: false,
            parallel: true,
        }
    }
}

impl RenderConfig {
    /// Take depth and background from a description's render settings.
    pub fn from_settings(settings: &RenderSettings) -> Self {
        Self {
            max_depth: settings.max_depth,
            background: settings.background,
            use_sky_gradient: settings.sky_gradient,
            ..Self::default()
        }
    }

    /// What a ray sees when it escapes the scene or runs out of depth.
    pub fn background_for(&self, ray: &Ray) -> Color {
        if self.use_sky_gradient {
            sky_gradient(ray)
        } else {
            self.background
        }
    }
}

/// White toward the horizon and below, light blue straight up.
pub fn sky_gradient(ray: &Ray) -> Color {
    let a = 0.5 * (ray.direction.normalize_or_zero().y + 1.0);
    let white = Color::ONE;
    let blue = Color::new(0.5, 0.7, 1.0);
    white * (1.0 - a) + blue * a
}

/// Compute the color seen by a ray.
///
/// Rays deeper than `config.max_depth` and rays that miss everything see
/// the background, or the sky gradient when enabled. Otherwise the hit color is lit by every light, then each
/// material of the hit shape runs in order, possibly tracing secondary rays
/// at `depth + 1`. The result is clamped to [0, 1].
pub fn ray_color(scene: &Scene, ray: &Ray, depth: u32, config: &RenderConfig) -> Color {
    if depth > config.max_depth {
        return config.background_for(ray);
    }

    let Some(hit) = scene.shapes().intersect(ray) else {
        return config.background_for(ray);
    };

    let illumination = scene
        .lights()
        .illuminate(hit.point, hit.normal, scene.shapes());
    let local = hit.color * illumination.total();

    let shader = Shader { scene, config };
    let color = hit.materials.iter().fold(local, |color, material| {
        material.apply(ray, &hit, depth, &shader, color)
    });

    color.clamp(Color::ZERO, Color::ONE)
}

/// Routes material callbacks back into [`ray_color`].
struct Shader<'a> {
    scene: &'a Scene,
    config: &'a RenderConfig,
}

impl Tracer for Shader<'_> {
    fn trace(&self, ray: &Ray, depth: u32) -> Color {
        ray_color(self.scene, ray, depth, self.config)
    }
}

/// Convert a [0, 1] color to 8-bit RGB.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::ONE) * 255.0;
    [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
}

/// Render output: one color per pixel, stored row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    /// Get the pixel at (`row`, `col`), with row 0 at the top.
    pub fn get(&self, row: u32, col: u32) -> Color {
        self.pixels[self.index(row, col)]
    }

    /// Set the pixel at (`row`, `col`).
    pub fn set(&mut self, row: u32, col: u32, color: Color) {
        let index = self.index(row, col);
        self.pixels[index] = color;
    }

    /// All pixels of one row.
    pub fn row(&self, row: u32) -> &[Color] {
        let start = self.index(row, 0);
        &self.pixels[start..start + self.width as usize]
    }

    /// Convert to packed RGB bytes (for saving).
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&color| color_to_rgb(color))
            .collect()
    }

    fn index(&self, row: u32, col: u32) -> usize {
        row as usize * self.width as usize + col as usize
    }
}

/// Render `scene` from its camera into a `width` x `height` buffer.
pub fn render_scene(scene: &Scene, width: u32, height: u32, config: &RenderConfig) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height);
    if width == 0 || height == 0 {
        return image;
    }

    let start = Instant::now();
    let camera = scene.camera();
    let render_row = |(row, pixels): (usize, &mut [Color])| {
        for (col, pixel) in pixels.iter_mut().enumerate() {
            let ray = camera.ray(col as u32, row as u32, width, height);
            *pixel = ray_color(scene, &ray, 0, config);
        }
    };

    if config.parallel {
        image
            .pixels
            .par_chunks_mut(width as usize)
            .enumerate()
            .for_each(render_row);
    } else {
        image
            .pixels
            .chunks_mut(width as usize)
            .enumerate()
            .for_each(render_row);
    }

    log::info!(
        "Rendered {}x{} in {:.2?} (max depth {})",
        width,
        height,
        start.elapsed(),
        config.max_depth
    );
    image
}

/// A ready-to-render scene together with the Factory and plugins it was
/// built from.
pub struct Renderer {
    width: u32,
    height: u32,
    config: RenderConfig,
    // Fields drop in declaration order: everything built from plugin code
    // must go before the plugin libraries are unloaded
    scene: Scene,
    factory: Factory,
    plugins: PluginHost,
}

impl Renderer {
    /// Load plugins, build the Factory and resolve the scene.
    ///
    /// `camera` overrides the description's camera. All validation happens
    /// here; rendering cannot fail afterwards.
    pub fn new(
        width: u32,
        height: u32,
        description: &SceneDescription,
        camera: Option<Camera>,
        plugin_paths: &[PathBuf],
        config: RenderConfig,
    ) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LumenError::config(format!(
                "resolution must be positive, got {width}x{height}"
            )));
        }

        // Locals drop in reverse order, so on any early return the factory
        // goes before the plugin libraries
        let mut plugins = PluginHost::new();
        let mut factory = Factory::with_builtins();
        // SAFETY: `plugins` outlives `factory` here and in `Self`, and no
        // accessor hands out the factory or moves the scene out.
        unsafe { plugins.load_all(plugin_paths, &mut factory)? };

        let scene = Scene::from_description(description, camera, &factory)?;

        Ok(Self {
            width,
            height,
            config,
            scene,
            factory,
            plugins,
        })
    }

    /// Build everything from a description alone: its resolution, camera,
    /// plugins and render settings.
    pub fn from_description(description: &SceneDescription) -> Result<Self> {
        let settings = &description.render;
        Self::new(
            settings.width,
            settings.height,
            description,
            None,
            &description.plugins,
            RenderConfig::from_settings(settings),
        )
    }

    /// Wrap an already built scene, using only the built-in Factory.
    pub fn from_scene(width: u32, height: u32, scene: Scene, config: RenderConfig) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(LumenError::config(format!(
                "resolution must be positive, got {width}x{height}"
            )));
        }

        Ok(Self {
            width,
            height,
            config,
            scene,
            factory: Factory::with_builtins(),
            plugins: PluginHost::new(),
        })
    }

    /// Render the scene at the configured resolution.
    pub fn render_to_buffer(&self) -> ImageBuffer {
        render_scene(&self.scene, self.width, self.height, &self.config)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Move or rotate the camera between renders.
    pub fn camera_mut(&mut self) -> &mut Camera {
        self.scene.camera_mut()
    }

    /// Registered shape type names, plugins included.
    pub fn shape_types(&self) -> Vec<&str> {
        self.factory.shape_types()
    }

    /// Registered light type names, plugins included.
    pub fn light_types(&self) -> Vec<&str> {
        self.factory.light_types()
    }

    /// Registered material type names, plugins included.
    pub fn material_types(&self) -> Vec<&str> {
        self.factory.material_types()
    }

    pub fn plugins(&self) -> &PluginHost {
        &self.plugins
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AmbientLight, Reflection, Sphere, Surface};
    use lumen_math::DVec3;

    #[test]
    fn test_miss_returns_background() {
        let scene = Scene::default();
        let config = RenderConfig {
            background: Color::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        assert_eq!(ray_color(&scene, &ray, 0, &config), config.background);
    }

    #[test]
    fn test_sky_gradient() {
        // Straight up is the blue end, straight down is white
        let up = sky_gradient(&Ray::new(DVec3::ZERO, DVec3::Y));
        let down = sky_gradient(&Ray::new(DVec3::ZERO, DVec3::NEG_Y));
        assert!((up - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
        assert!((down - Color::ONE).length() < 1e-12);

        let horizon = sky_gradient(&Ray::new(DVec3::ZERO, DVec3::NEG_Z));
        assert!((horizon - Color::new(0.75, 0.85, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_sky_gradient_only_when_enabled() {
        let scene = Scene::default();
        let ray = Ray::new(DVec3::ZERO, DVec3::Y);

        let flat = RenderConfig {
            background: Color::new(0.1, 0.2, 0.3),
            ..Default::default()
        };
        assert_eq!(ray_color(&scene, &ray, 0, &flat), flat.background);

        let sky = RenderConfig {
            use_sky_gradient: true,
            ..flat.clone()
        };
        assert!((ray_color(&scene, &ray, 0, &sky) - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
        // Past the depth limit too
        assert!((ray_color(&scene, &ray, 99, &sky) - Color::new(0.5, 0.7, 1.0)).length() < 1e-12);
    }

    #[test]
    fn test_settings_enable_sky_gradient() {
        let settings = RenderSettings {
            sky_gradient: true,
            max_depth: 3,
            ..Default::default()
        };
        let config = RenderConfig::from_settings(&settings);
        assert!(config.use_sky_gradient);
        assert_eq!(config.max_depth, 3);
        assert!(!RenderConfig::default().use_sky_gradient);
    }

    #[test]
    fn test_past_max_depth_returns_background() {
        let scene = Scene::default().with_shape(Box::new(Sphere::new(
            DVec3::new(0.0, 0.0, -3.0),
            1.0,
            Surface::new(Color::ONE),
        )));
        let config = RenderConfig {
            max_depth: 2,
            background: Color::new(0.0, 0.0, 1.0),
            ..Default::default()
        };
        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);

        // No lights: a hit is black, past the limit it is background
        assert_eq!(ray_color(&scene, &ray, 2, &config), Color::ZERO);
        assert_eq!(ray_color(&scene, &ray, 3, &config), config.background);
    }

    #[test]
    fn test_ambient_only_shading() {
        let scene = Scene::default()
            .with_shape(Box::new(Sphere::new(
                DVec3::new(0.0, 0.0, -3.0),
                1.0,
                Surface::new(Color::new(1.0, 0.5, 0.0)),
            )))
            .with_light(Box::new(AmbientLight::new(0.5, Color::ONE)));

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let color = ray_color(&scene, &ray, 0, &RenderConfig::default());
        assert!((color - Color::new(0.5, 0.25, 0.0)).length() < 1e-12);
    }

    #[test]
    fn test_output_is_clamped() {
        let scene = Scene::default()
            .with_shape(Box::new(Sphere::new(
                DVec3::new(0.0, 0.0, -3.0),
                1.0,
                Surface::new(Color::ONE),
            )))
            .with_light(Box::new(AmbientLight::new(5.0, Color::ONE)));

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        assert_eq!(ray_color(&scene, &ray, 0, &RenderConfig::default()), Color::ONE);
    }

    #[test]
    fn test_mirror_sees_background() {
        let scene = Scene::default().with_shape(Box::new(Sphere::new(
            DVec3::new(0.0, 0.0, -3.0),
            1.0,
            Surface::new(Color::ONE).with_material(Reflection::new(1.0)),
        )));
        let config = RenderConfig {
            background: Color::new(0.0, 1.0, 0.0),
            ..Default::default()
        };

        let ray = Ray::new(DVec3::ZERO, DVec3::NEG_Z);
        let color = ray_color(&scene, &ray, 0, &config);
        assert!((color - config.background).length() < 1e-12);
    }

    #[test]
    fn test_parallel_matches_serial() {
        let scene = Scene::default()
            .with_shape(Box::new(Sphere::new(
                DVec3::new(0.0, 0.0, -3.0),
                1.0,
                Surface::new(Color::new(0.8, 0.3, 0.3)),
            )))
            .with_light(Box::new(AmbientLight::new(0.7, Color::ONE)));

        let parallel = scene.render(16, 9, &RenderConfig::default());
        let serial = scene.render(
            16,
            9,
            &RenderConfig {
                parallel: false,
                ..Default::default()
            },
        );
        assert_eq!(parallel, serial);
        assert_eq!(parallel.pixels.len(), 16 * 9);
    }

    #[test]
    fn test_image_buffer_row_major() {
        let mut image = ImageBuffer::new(3, 2);
        image.set(1, 2, Color::ONE);
        assert_eq!(image.pixels[5], Color::ONE);
        assert_eq!(image.get(1, 2), Color::ONE);
        assert_eq!(image.row(1)[2], Color::ONE);
        assert_eq!(&image.to_rgb8()[15..18], &[255, 255, 255]);
    }

    #[test]
    fn test_zero_resolution_rejected() {
        let result = Renderer::from_scene(0, 10, Scene::default(), RenderConfig::default());
        assert!(matches!(result, Err(LumenError::Config { .. })));
    }
}
