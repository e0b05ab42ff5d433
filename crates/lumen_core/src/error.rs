//! Error taxonomy shared by every Lumen crate.
//!
//! All failures happen while setting up a render (loading plugins, reading a
//! scene description, resolving entries through the Factory). Once a render
//! has started nothing can fail.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// The three extensible capabilities a Factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    Shape,
    Light,
    Material,
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Capability::Shape => f.write_str("shape"),
            Capability::Light => f.write_str("light"),
            Capability::Material => f.write_str("material"),
        }
    }
}

/// Errors that can occur while preparing a render.
#[derive(Error, Debug)]
pub enum LumenError {
    /// Malformed or missing scene configuration.
    #[error("config error{}: {message}", location_suffix(.location))]
    Config {
        message: String,
        location: Option<String>,
    },

    /// Malformed or unreadable scene description.
    #[error("parse error: {0}")]
    Parse(String),

    /// A plugin module failed to load or does not follow the plugin ABI.
    #[error("plugin error: {}: {reason}", .path.display())]
    Plugin { path: PathBuf, reason: String },

    /// The Factory has no constructor registered under this name.
    #[error("unknown {capability} type '{name}'")]
    UnknownType { capability: Capability, name: String },

    /// A constructor is already registered under this name.
    #[error("{capability} type '{name}' is already registered")]
    DuplicateType { capability: Capability, name: String },
}

fn location_suffix(location: &Option<String>) -> String {
    match location {
        Some(location) => format!(" at {location}"),
        None => String::new(),
    }
}

impl LumenError {
    /// Create a configuration error without a location.
    pub fn config(message: impl Into<String>) -> Self {
        LumenError::Config {
            message: message.into(),
            location: None,
        }
    }

    /// Create a plugin error for the module at `path`.
    pub fn plugin(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        LumenError::Plugin {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Attach the scene entry a configuration error came from.
    ///
    /// Called from the innermost entry outward, so each call prefixes the
    /// path: `children[1]` then `shapes[0]` gives `shapes[0].children[1]`.
    /// Other error kinds pass through unchanged.
    pub fn in_entry(self, entry: impl Into<String>) -> Self {
        match self {
            LumenError::Config { message, location } => {
                let entry = entry.into();
                let location = match location {
                    Some(inner) => format!("{entry}.{inner}"),
                    None => entry,
                };
                LumenError::Config {
                    message,
                    location: Some(location),
                }
            }
            other => other,
        }
    }
}

/// Result type for setup operations.
pub type Result<T> = std::result::Result<T, LumenError>;
