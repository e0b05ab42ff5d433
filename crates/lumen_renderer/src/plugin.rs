//! Dynamically loaded Factory extensions.
//!
//! A plugin is a `cdylib` that exports two symbols, both generated by
//! [`declare_plugin!`](crate::declare_plugin):
//!
//! - `lumen_plugin_abi_version() -> u32`, which must equal
//!   [`PLUGIN_ABI_VERSION`]
//! - `lumen_plugin_register(&mut Factory) -> Result<()>`, which registers the
//!   plugin's constructors
//!
//! The registration function passes Rust types across the library boundary,
//! so plugins must be built with the same compiler and the same version of
//! this crate as the host.
//!
//! Objects built by a plugin's constructors run code from the plugin's
//! library, and so do the constructors themselves once registered. Loading
//! is therefore `unsafe`: the caller keeps the [`PluginHost`] alive until the
//! Factory and everything built through it are gone. [`Renderer`] owns all
//! three and upholds this for its users.
//!
//! [`Renderer`]: crate::Renderer

use std::path::{Path, PathBuf};

use libloading::{Library, Symbol};
use lumen_core::{LumenError, Result};

use crate::factory::{Factory, Registrar};

/// Version of the plugin interface. Bumped whenever the exported symbols or
/// the types they exchange change shape.
pub const PLUGIN_ABI_VERSION: u32 = 1;

const ABI_VERSION_SYMBOL: &[u8] = b"lumen_plugin_abi_version\0";
const REGISTER_SYMBOL: &[u8] = b"lumen_plugin_register\0";

/// Export the plugin entry points for a registration function.
///
/// ```ignore
/// pub fn register(factory: &mut lumen_renderer::Factory) -> lumen_renderer::Result<()> {
///     factory.register_shape("disc", |entry, factory| { /* ... */ })
/// }
///
/// lumen_renderer::declare_plugin!(register);
/// ```
#[macro_export]
macro_rules! declare_plugin {
    ($register:path) => {
        #[no_mangle]
        pub extern "C" fn lumen_plugin_abi_version() -> u32 {
            $crate::PLUGIN_ABI_VERSION
        }

        #[no_mangle]
        pub fn lumen_plugin_register(factory: &mut $crate::Factory) -> $crate::Result<()> {
            $register(factory)
        }
    };
}

struct LoadedPlugin {
    path: PathBuf,
    // Never read; owning it keeps the plugin's code mapped
    #[allow(dead_code)]
    library: Library,
}

/// Owner of every loaded plugin library.
#[derive(Default)]
pub struct PluginHost {
    plugins: Vec<LoadedPlugin>,
}

impl PluginHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the plugin at `path` and let it register into `factory`.
    ///
    /// Fails with [`LumenError::Plugin`] when the library cannot be opened,
    /// lacks an entry point, was built for another [`PLUGIN_ABI_VERSION`], or
    /// its registration fails. The library stays loaded in every case where
    /// registration ran, since constructors may already be in `factory`.
    ///
    /// # Safety
    ///
    /// Loading runs the library's initializers, which must be sound. The
    /// host must outlive `factory` and every shape, light or material built
    /// through it: dropping the host unloads the code they point into.
    pub unsafe fn load(&mut self, path: impl AsRef<Path>, factory: &mut Factory) -> Result<()> {
        let path = path.as_ref();
        log::info!("Loading plugin {}", path.display());

        // SAFETY: the caller vouches for the library's initializers.
        let library = unsafe { Library::new(path) }.map_err(|e| LumenError::plugin(path, e))?;

        // SAFETY: the symbol type matches the one `declare_plugin!` exports.
        let version = unsafe {
            let symbol: Symbol<unsafe extern "C" fn() -> u32> = library
                .get(ABI_VERSION_SYMBOL)
                .map_err(|e| LumenError::plugin(path, e))?;
            symbol()
        };
        check_abi_version(path, version)?;

        // SAFETY: same signature as `declare_plugin!`; the ABI version check
        // above guards against stale plugins.
        let register: Registrar = unsafe {
            let symbol: Symbol<Registrar> = library
                .get(REGISTER_SYMBOL)
                .map_err(|e| LumenError::plugin(path, e))?;
            *symbol
        };

        let result = register(factory);

        // Constructors may already be registered even if it failed part way
        self.plugins.push(LoadedPlugin {
            path: path.to_path_buf(),
            library,
        });

        result.map_err(|e| LumenError::plugin(path, format!("registration failed: {e}")))?;
        log::info!("Loaded plugin {}", path.display());
        Ok(())
    }

    /// Load several plugins in order, stopping at the first failure.
    ///
    /// # Safety
    ///
    /// Same contract as [`PluginHost::load`] for every path.
    pub unsafe fn load_all<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        factory: &mut Factory,
    ) -> Result<()> {
        for path in paths {
            // SAFETY: forwarded from the caller
            unsafe { self.load(path, factory)? };
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Paths of the loaded plugins, in load order.
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        self.plugins.iter().map(|p| p.path.as_path())
    }
}

fn check_abi_version(path: &Path, version: u32) -> Result<()> {
    if version == PLUGIN_ABI_VERSION {
        return Ok(());
    }
    Err(LumenError::plugin(
        path,
        format!("plugin ABI version {version}, host expects {PLUGIN_ABI_VERSION}"),
    ))
}
