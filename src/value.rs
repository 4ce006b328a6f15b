//! Scalar and composite configuration values.

use std::collections::BTreeMap;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

use crate::{DiError, DiResult};

/// A configuration value that can be various types
///
/// Parameters and literal service arguments are carried as `ConfigValue`:
/// any scalar, or arrays and string-keyed objects of further values.
/// Objects are ordered maps so that rendering a value is deterministic.
///
/// # Examples
///
/// ```rust
/// use lattice_di::ConfigValue;
///
/// let port = ConfigValue::from(8080i64);
/// assert_eq!(port.as_i64().unwrap(), 8080);
///
/// let hosts = ConfigValue::Array(vec![
///     ConfigValue::from("primary"),
///     ConfigValue::from("replica"),
/// ]);
/// assert_eq!(hosts.as_array().unwrap().len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum ConfigValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Array(Vec<ConfigValue>),
    Object(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Try to view as a string slice
    pub fn as_str(&self) -> DiResult<&str> {
        match self {
            ConfigValue::String(s) => Ok(s),
            _ => Err(DiError::TypeMismatch("config value is not a string")),
        }
    }

    /// Try to convert to integer
    pub fn as_i64(&self) -> DiResult<i64> {
        match self {
            ConfigValue::Integer(i) => Ok(*i),
            _ => Err(DiError::TypeMismatch("config value is not an integer")),
        }
    }

    /// Try to convert to float
    pub fn as_f64(&self) -> DiResult<f64> {
        match self {
            ConfigValue::Float(f) => Ok(*f),
            _ => Err(DiError::TypeMismatch("config value is not a float")),
        }
    }

    /// Try to convert to boolean
    pub fn as_bool(&self) -> DiResult<bool> {
        match self {
            ConfigValue::Boolean(b) => Ok(*b),
            _ => Err(DiError::TypeMismatch("config value is not a boolean")),
        }
    }

    /// Try to view as an array of values
    pub fn as_array(&self) -> DiResult<&[ConfigValue]> {
        match self {
            ConfigValue::Array(values) => Ok(values),
            _ => Err(DiError::TypeMismatch("config value is not an array")),
        }
    }

    /// Try to view as an ordered object
    pub fn as_object(&self) -> DiResult<&BTreeMap<String, ConfigValue>> {
        match self {
            ConfigValue::Object(map) => Ok(map),
            _ => Err(DiError::TypeMismatch("config value is not an object")),
        }
    }

    /// Whether this value is `Null`
    pub fn is_null(&self) -> bool {
        matches!(self, ConfigValue::Null)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        ConfigValue::String(value)
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<f64> for ConfigValue {
    fn from(value: f64) -> Self {
        ConfigValue::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<Vec<ConfigValue>> for ConfigValue {
    fn from(values: Vec<ConfigValue>) -> Self {
        ConfigValue::Array(values)
    }
}

impl From<BTreeMap<String, ConfigValue>> for ConfigValue {
    fn from(map: BTreeMap<String, ConfigValue>) -> Self {
        ConfigValue::Object(map)
    }
}
