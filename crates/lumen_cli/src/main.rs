use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;
mod logger;
mod output;

use cli::Args;
use logger::init_logger;
use lumen_core::load_description;
use lumen_renderer::Renderer;
use output::save_png;

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.into());

    let mut description = load_description(&args.scene)
        .with_context(|| format!("failed to load {}", args.scene.display()))?;
    args.apply_overrides(&mut description);

    let mut renderer = Renderer::from_description(&description)?;
    info!(
        "Shapes: {}; lights: {}; materials: {}",
        renderer.shape_types().join(", "),
        renderer.light_types().join(", "),
        renderer.material_types().join(", ")
    );

    if args.single_thread {
        renderer.config_mut().parallel = false;
    }

    let camera = renderer.camera_mut();
    if let Some(yaw) = args.yaw {
        camera.rotate_yaw(yaw);
    }
    if let Some(pitch) = args.pitch {
        camera.rotate_pitch(pitch);
    }

    info!(
        "Rendering {}x{}, max depth {}",
        renderer.width(),
        renderer.height(),
        renderer.config().max_depth
    );
    let image = renderer.render_to_buffer();
    save_png(&image, &args.output)?;

    Ok(())
}
