//! Name-keyed registry of shape, light and material constructors.
//!
//! Scene descriptions name the kind of every entry; the Factory turns each
//! entry into a live object. Built-in kinds are registered by
//! [`Factory::with_builtins`] and plugins add more through the same
//! `register_*` calls.

use std::collections::HashMap;

use lumen_core::{Capability, LightEntry, LumenError, MaterialEntry, Params, Result, ShapeEntry};

use crate::{
    AmbientLight, Cone, Cylinder, DirectionalLight, InfiniteCone, InfiniteCylinder, Light,
    LightComposite, Material, Mesh, Plane, PointLight, Reflection, Refraction, Shape,
    ShapeComposite, Sphere, Transparency, Triangle,
};

/// Builds a shape from its entry; the Factory is passed along for nested
/// children and materials.
pub type ShapeConstructor =
    Box<dyn Fn(&ShapeEntry, &Factory) -> Result<Box<dyn Shape>> + Send + Sync>;

/// Builds a light from its entry.
pub type LightConstructor =
    Box<dyn Fn(&LightEntry, &Factory) -> Result<Box<dyn Light>> + Send + Sync>;

/// Builds a material from its parameters.
pub type MaterialConstructor = Box<dyn Fn(&Params) -> Result<Box<dyn Material>> + Send + Sync>;

/// A registration function, as exported by plugins or linked statically.
pub type Registrar = fn(&mut Factory) -> Result<()>;

/// Registry of constructors for every extensible capability.
#[derive(Default)]
pub struct Factory {
    shapes: HashMap<String, ShapeConstructor>,
    lights: HashMap<String, LightConstructor>,
    materials: HashMap<String, MaterialConstructor>,
}

impl Factory {
    /// Create an empty factory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a factory with every built-in kind registered.
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();
        factory.register_builtins();
        factory
    }

    fn register_builtins(&mut self) {
        let shapes: [(&str, ShapeConstructor); 9] = [
            ("sphere", shape(Sphere::from_entry)),
            ("plane", shape(Plane::from_entry)),
            ("cylinder", shape(Cylinder::from_entry)),
            ("infinite_cylinder", shape(InfiniteCylinder::from_entry)),
            ("cone", shape(Cone::from_entry)),
            ("infinite_cone", shape(InfiniteCone::from_entry)),
            ("triangle", shape(Triangle::from_entry)),
            ("mesh", shape(Mesh::from_entry)),
            ("composite", shape(ShapeComposite::from_entry)),
        ];
        let lights: [(&str, LightConstructor); 4] = [
            ("ambient", light(|entry, _| AmbientLight::from_entry(entry))),
            ("directional", light(|entry, _| DirectionalLight::from_entry(entry))),
            ("point", light(|entry, _| PointLight::from_entry(entry))),
            ("composite", light(LightComposite::from_entry)),
        ];
        let materials: [(&str, MaterialConstructor); 3] = [
            ("reflection", material(Reflection::from_params)),
            ("refraction", material(Refraction::from_params)),
            ("transparency", material(Transparency::from_params)),
        ];

        // The registries are empty here, so inserting directly cannot clash
        self.shapes
            .extend(shapes.into_iter().map(|(name, c)| (name.to_string(), c)));
        self.lights
            .extend(lights.into_iter().map(|(name, c)| (name.to_string(), c)));
        self.materials
            .extend(materials.into_iter().map(|(name, c)| (name.to_string(), c)));
    }

    /// Run statically linked registration functions, in order.
    pub fn register_static(&mut self, registrars: &[Registrar]) -> Result<()> {
        for register in registrars {
            register(self)?;
        }
        Ok(())
    }

    /// Register a shape constructor under `name`.
    ///
    /// Fails with [`LumenError::DuplicateType`] if the name is taken; the
    /// existing constructor is kept.
    pub fn register_shape<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&ShapeEntry, &Factory) -> Result<Box<dyn Shape>> + Send + Sync + 'static,
    {
        insert_unique(&mut self.shapes, Capability::Shape, name.into(), Box::new(constructor))
    }

    /// Register a light constructor under `name`.
    pub fn register_light<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&LightEntry, &Factory) -> Result<Box<dyn Light>> + Send + Sync + 'static,
    {
        insert_unique(&mut self.lights, Capability::Light, name.into(), Box::new(constructor))
    }

    /// Register a material constructor under `name`.
    pub fn register_material<F>(&mut self, name: impl Into<String>, constructor: F) -> Result<()>
    where
        F: Fn(&Params) -> Result<Box<dyn Material>> + Send + Sync + 'static,
    {
        insert_unique(
            &mut self.materials,
            Capability::Material,
            name.into(),
            Box::new(constructor),
        )
    }

    /// Build the shape an entry describes.
    pub fn create_shape(&self, entry: &ShapeEntry) -> Result<Box<dyn Shape>> {
        let constructor = lookup(&self.shapes, Capability::Shape, &entry.kind)?;
        constructor(entry, self)
    }

    /// Build the light an entry describes.
    pub fn create_light(&self, entry: &LightEntry) -> Result<Box<dyn Light>> {
        let constructor = lookup(&self.lights, Capability::Light, &entry.kind)?;
        constructor(entry, self)
    }

    /// Build the material an entry describes.
    pub fn create_material(&self, entry: &MaterialEntry) -> Result<Box<dyn Material>> {
        let constructor = lookup(&self.materials, Capability::Material, &entry.kind)?;
        constructor(&entry.params)
    }

    pub fn has_shape(&self, name: &str) -> bool {
        self.shapes.contains_key(name)
    }

    pub fn has_light(&self, name: &str) -> bool {
        self.lights.contains_key(name)
    }

    pub fn has_material(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Registered shape names, sorted.
    pub fn shape_types(&self) -> Vec<&str> {
        sorted_names(&self.shapes)
    }

    /// Registered light names, sorted.
    pub fn light_types(&self) -> Vec<&str> {
        sorted_names(&self.lights)
    }

    /// Registered material names, sorted.
    pub fn material_types(&self) -> Vec<&str> {
        sorted_names(&self.materials)
    }
}

fn shape<S: Shape + 'static>(build: fn(&ShapeEntry, &Factory) -> Result<S>) -> ShapeConstructor {
    Box::new(move |entry: &ShapeEntry, factory: &Factory| -> Result<Box<dyn Shape>> {
        Ok(Box::new(build(entry, factory)?))
    })
}

fn light<L: Light + 'static>(build: fn(&LightEntry, &Factory) -> Result<L>) -> LightConstructor {
    Box::new(move |entry: &LightEntry, factory: &Factory| -> Result<Box<dyn Light>> {
        Ok(Box::new(build(entry, factory)?))
    })
}

fn material<M: Material + 'static>(build: fn(&Params) -> Result<M>) -> MaterialConstructor {
    Box::new(move |params: &Params| -> Result<Box<dyn Material>> {
        Ok(Box::new(build(params)?))
    })
}

fn insert_unique<C>(
    registry: &mut HashMap<String, C>,
    capability: Capability,
    name: String,
    constructor: C,
) -> Result<()> {
    if registry.contains_key(&name) {
        log::warn!("Rejected duplicate {} type '{}'", capability, name);
        return Err(LumenError::DuplicateType { capability, name });
    }

    log::debug!("Registered {} type '{}'", capability, name);
    registry.insert(name, constructor);
    Ok(())
}

fn lookup<'a, C>(
    registry: &'a HashMap<String, C>,
    capability: Capability,
    name: &str,
) -> Result<&'a C> {
    registry.get(name).ok_or_else(|| LumenError::UnknownType {
        capability,
        name: name.to_string(),
    })
}

fn sorted_names<C>(registry: &HashMap<String, C>) -> Vec<&str> {
    let mut names: Vec<&str> = registry.keys().map(String::as_str).collect();
    names.sort_unstable();
    names
}
