//! Loads the built `cdylib` through the plugin host.

use std::env::consts::{DLL_PREFIX, DLL_SUFFIX};
use std::fs;
use std::path::PathBuf;

use lumen_renderer::{
    Camera, Color, DVec3, Factory, LightEntry, LumenError, PluginHost, Ray, RenderConfig,
    Renderer, SceneDescription, ShapeEntry,
};

/// The disc plugin's shared library, built by cargo next to this test.
fn disc_library() -> PathBuf {
    let exe = std::env::current_exe().unwrap();
    let deps = exe.parent().unwrap();
    let prefix = format!("{DLL_PREFIX}lumen_plugin_disc");

    [deps, deps.parent().unwrap()]
        .iter()
        .filter_map(|dir| fs::read_dir(dir).ok())
        .flatten()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            name.starts_with(&prefix) && name.ends_with(DLL_SUFFIX)
        })
        .max_by_key(|entry| entry.metadata().and_then(|m| m.modified()).ok())
        .map(|entry| entry.path())
        .expect("lumen_plugin_disc cdylib not found next to the test binary")
}

fn facing_disc() -> ShapeEntry {
    ShapeEntry::new("disc")
        .with("center", DVec3::new(0.0, 0.0, -4.0))
        .with("normal", DVec3::Z)
        .with("radius", 2.0)
        .with("color", Color::new(1.0, 0.0, 0.0))
}

#[test]
fn test_load_registers_disc() {
    let path = disc_library();
    let mut host = PluginHost::new();
    let mut factory = Factory::with_builtins();
    assert!(!factory.has_shape("disc"));

    // SAFETY: host is declared first, so it drops after the factory and shape
    unsafe { host.load(&path, &mut factory) }.unwrap();
    assert_eq!(host.len(), 1);
    assert_eq!(host.paths().next(), Some(path.as_path()));
    assert!(factory.has_shape("disc"));

    let disc = factory.create_shape(&facing_disc()).unwrap();
    let hit = disc.intersect(&Ray::new(DVec3::ZERO, DVec3::NEG_Z)).unwrap();
    assert!((hit.t - 4.0).abs() < 1e-9);
    assert_eq!(hit.normal, DVec3::Z);
}

#[test]
fn test_renderer_keeps_plugin_loaded() {
    let description = SceneDescription {
        shapes: vec![facing_disc()],
        lights: vec![LightEntry::new("ambient").with("intensity", 1.0)],
        ..Default::default()
    };

    let renderer = Renderer::new(
        5,
        5,
        &description,
        Some(Camera::default()),
        &[disc_library()],
        RenderConfig::default(),
    )
    .unwrap();
    assert_eq!(renderer.plugins().len(), 1);
    assert!(renderer.shape_types().contains(&"disc"));

    let image = renderer.render_to_buffer();
    assert_eq!(image.get(2, 2), Color::new(1.0, 0.0, 0.0));
    // Corner rays pass outside the rim
    assert_eq!(image.get(0, 0), Color::ZERO);
}

#[test]
fn test_failed_registration_keeps_library() {
    let path = disc_library();
    let mut host = PluginHost::new();
    let mut factory = Factory::new();

    unsafe { host.load(&path, &mut factory) }.unwrap();
    let err = unsafe { host.load(&path, &mut factory) }.unwrap_err();

    assert!(matches!(err, LumenError::Plugin { .. }));
    assert!(err.to_string().contains("registration failed"));
    assert_eq!(host.len(), 2);
    assert!(factory.has_shape("disc"));
}

#[cfg(all(target_os = "linux", target_env = "gnu"))]
#[test]
fn test_library_without_entry_point() {
    let mut host = PluginHost::new();
    let mut factory = Factory::with_builtins();
    let before = factory.shape_types().len();

    let err = unsafe { host.load("libm.so.6", &mut factory) }.unwrap_err();

    assert!(matches!(err, LumenError::Plugin { .. }));
    assert!(err.to_string().contains("lumen_plugin_abi_version"));
    assert!(host.is_empty());
    assert_eq!(factory.shape_types().len(), before);
}
