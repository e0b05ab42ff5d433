use std::path::Path;

use anyhow::{Context, Result};
use image::RgbImage;
use log::info;
use lumen_renderer::ImageBuffer;

/// Save a render as an 8-bit PNG.
pub fn save_png(image: &ImageBuffer, path: &Path) -> Result<()> {
    let rgb = RgbImage::from_raw(image.width, image.height, image.to_rgb8())
        .context("image buffer size does not match its resolution")?;

    rgb.save(path)
        .with_context(|| format!("failed to save {}", path.display()))?;
    info!("Image saved as {}", path.display());
    Ok(())
}
