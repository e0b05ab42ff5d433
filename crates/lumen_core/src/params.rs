//! Constructor parameter sets.
//!
//! A `Params` map is what the scene description hands to a registered
//! constructor. Accessors convert loosely typed values into the types a
//! constructor needs and report a `LumenError::Config` naming the key when a
//! value is missing or malformed.

use std::collections::BTreeMap;

use lumen_math::{Color, DVec3};
use serde::{Deserialize, Serialize};

use crate::error::{LumenError, Result};

/// A single loosely typed parameter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<ParamValue>),
}

impl ParamValue {
    fn kind(&self) -> &'static str {
        match self {
            ParamValue::Bool(_) => "a boolean",
            ParamValue::Number(_) => "a number",
            ParamValue::Text(_) => "a string",
            ParamValue::List(_) => "a list",
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            ParamValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    fn as_vec3(&self) -> Option<DVec3> {
        match self {
            ParamValue::List(items) if items.len() == 3 => Some(DVec3::new(
                items[0].as_number()?,
                items[1].as_number()?,
                items[2].as_number()?,
            )),
            _ => None,
        }
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Number(value)
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        ParamValue::Bool(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<DVec3> for ParamValue {
    fn from(value: DVec3) -> Self {
        ParamValue::List(vec![
            ParamValue::Number(value.x),
            ParamValue::Number(value.y),
            ParamValue::Number(value.z),
        ])
    }
}

impl From<Vec<DVec3>> for ParamValue {
    fn from(values: Vec<DVec3>) -> Self {
        ParamValue::List(values.into_iter().map(ParamValue::from).collect())
    }
}

/// Named constructor parameters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params {
    values: BTreeMap<String, ParamValue>,
}

impl Params {
    /// Create an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or replace a value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ParamValue>) {
        self.values.insert(key.into(), value.into());
    }

    /// Raw access.
    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn require(&self, key: &str) -> Result<&ParamValue> {
        self.values
            .get(key)
            .ok_or_else(|| LumenError::config(format!("missing field '{key}'")))
    }

    fn invalid(key: &str, expected: &str, found: &ParamValue) -> LumenError {
        LumenError::config(format!(
            "field '{key}' must be {expected}, found {}",
            found.kind()
        ))
    }

    /// A required number.
    pub fn number(&self, key: &str) -> Result<f64> {
        let value = self.require(key)?;
        value
            .as_number()
            .ok_or_else(|| Self::invalid(key, "a number", value))
    }

    /// An optional number with a default.
    pub fn number_or(&self, key: &str, default: f64) -> Result<f64> {
        match self.values.get(key) {
            Some(_) => self.number(key),
            None => Ok(default),
        }
    }

    /// A required number strictly greater than zero.
    pub fn positive(&self, key: &str) -> Result<f64> {
        let n = self.number(key)?;
        if n > 0.0 && n.is_finite() {
            Ok(n)
        } else {
            Err(LumenError::config(format!(
                "field '{key}' must be positive, got {n}"
            )))
        }
    }

    /// A required number that may be zero but not negative.
    pub fn non_negative(&self, key: &str) -> Result<f64> {
        let n = self.number(key)?;
        if n >= 0.0 && n.is_finite() {
            Ok(n)
        } else {
            Err(LumenError::config(format!(
                "field '{key}' must not be negative, got {n}"
            )))
        }
    }

    /// An optional coefficient in [0, 1] with a default when absent.
    pub fn unit_or(&self, key: &str, default: f64) -> Result<f64> {
        let n = self.number_or(key, default)?;
        if (0.0..=1.0).contains(&n) {
            Ok(n)
        } else {
            Err(LumenError::config(format!(
                "field '{key}' must be within [0, 1], got {n}"
            )))
        }
    }

    /// A required three-component vector written as `[x, y, z]`.
    pub fn vec3(&self, key: &str) -> Result<DVec3> {
        let value = self.require(key)?;
        value
            .as_vec3()
            .ok_or_else(|| Self::invalid(key, "a list of three numbers", value))
    }

    /// An optional three-component vector.
    pub fn vec3_opt(&self, key: &str) -> Result<Option<DVec3>> {
        match self.values.get(key) {
            Some(_) => self.vec3(key).map(Some),
            None => Ok(None),
        }
    }

    /// A required direction; rejects the zero vector and normalizes.
    pub fn direction(&self, key: &str) -> Result<DVec3> {
        let v = self.vec3(key)?;
        v.try_normalize()
            .ok_or_else(|| LumenError::config(format!("field '{key}' must not be a zero vector")))
    }

    /// A required RGB color with every channel in [0, 1].
    pub fn color(&self, key: &str) -> Result<Color> {
        let c = self.vec3(key)?;
        if c.cmplt(Color::ZERO).any() || c.cmpgt(Color::ONE).any() {
            return Err(LumenError::config(format!(
                "color '{key}' values must be within [0, 1]"
            )));
        }
        Ok(c)
    }

    /// An optional color with a default.
    pub fn color_or(&self, key: &str, default: Color) -> Result<Color> {
        match self.values.get(key) {
            Some(_) => self.color(key),
            None => Ok(default),
        }
    }

    /// A required string.
    pub fn text(&self, key: &str) -> Result<&str> {
        match self.require(key)? {
            ParamValue::Text(s) => Ok(s),
            other => Err(Self::invalid(key, "a string", other)),
        }
    }

    /// An optional string.
    pub fn text_opt(&self, key: &str) -> Result<Option<&str>> {
        match self.values.get(key) {
            Some(_) => self.text(key).map(Some),
            None => Ok(None),
        }
    }

    /// A required list of `[x, y, z]` points.
    pub fn points(&self, key: &str) -> Result<Vec<DVec3>> {
        match self.require(key)? {
            ParamValue::List(items) => items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_vec3().ok_or_else(|| {
                        LumenError::config(format!(
                            "field '{key}[{i}]' must be a list of three numbers"
                        ))
                    })
                })
                .collect(),
            other => Err(Self::invalid(key, "a list of points", other)),
        }
    }

    /// A required list of index triples, e.g. triangle faces.
    pub fn index_triples(&self, key: &str) -> Result<Vec<[usize; 3]>> {
        self.points(key)?
            .into_iter()
            .enumerate()
            .map(|(i, v)| {
                let idx = [v.x, v.y, v.z];
                if idx.iter().all(|n| *n >= 0.0 && n.fract() == 0.0) {
                    Ok([idx[0] as usize, idx[1] as usize, idx[2] as usize])
                } else {
                    Err(LumenError::config(format!(
                        "field '{key}[{i}]' must hold non-negative integers"
                    )))
                }
            })
            .collect()
    }
}
