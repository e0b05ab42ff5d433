use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;
use lumen_core::SceneDescription;

/// Log levels selectable from the command line
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Command line arguments
#[derive(Debug, Parser)]
#[command(name = "lumen")]
#[command(about = "Render a JSON scene description with the Lumen ray tracer")]
pub struct Args {
    /// Scene description (JSON)
    pub scene: PathBuf,

    #[arg(short, long, default_value = "render.png", help = "Output PNG path")]
    pub output: PathBuf,

    #[arg(long, help = "Image width in pixels (overrides the scene)")]
    pub width: Option<u32>,

    #[arg(long, help = "Image height in pixels (overrides the scene)")]
    pub height: Option<u32>,

    #[arg(long, help = "Maximum recursion depth (overrides the scene)")]
    pub max_depth: Option<u32>,

    /// Plugin library to load; may be given several times
    #[arg(short, long = "plugin", value_name = "PATH")]
    pub plugins: Vec<PathBuf>,

    #[arg(long, allow_hyphen_values = true, help = "Turn the camera by this many degrees before rendering")]
    pub yaw: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Tilt the camera by this many degrees before rendering")]
    pub pitch: Option<f64>,

    #[arg(long, help = "Use a sky gradient instead of the background color")]
    pub sky: bool,

    #[arg(long, help = "Render on the calling thread only")]
    pub single_thread: bool,

    #[arg(long, default_value = "info", help = "Set the logging level")]
    pub log_level: LogLevel,
}

impl Args {
    /// Fold command-line overrides into a loaded description.
    pub fn apply_overrides(&self, description: &mut SceneDescription) {
        if let Some(width) = self.width {
            description.render.width = width;
        }
        if let Some(height) = self.height {
            description.render.height = height;
        }
        if let Some(max_depth) = self.max_depth {
            description.render.max_depth = max_depth;
        }
        if self.sky {
            description.render.sky_gradient = true;
        }
        description.plugins.extend(self.plugins.iter().cloned());
    }
}
