//! Action specifications
//!
//! An [`ActionSpec`] describes a registered action: the parameters it takes
//! and the values it returns, each described by a [`Schema`].

use crate::core::value::{nullable, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Data type of a schema field
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Byte,
    #[default]
    String,
    Date,
    Int,
    Long,
    Float,
    Double,
    Bool,
    Object,
    Array,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Byte => "byte",
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Int => "int",
            FieldType::Long => "long",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::Bool => "bool",
            FieldType::Object => "object",
            FieldType::Array => "array",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Description of one parameter or return value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(rename = "type", default, deserialize_with = "nullable")]
    pub field_type: FieldType,

    /// Element schema for `array` fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,

    /// Member schemas for `object` fields
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<Schema>,

    /// Allowed values, if restricted
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,

    #[serde(default, deserialize_with = "nullable")]
    pub required: bool,
}

impl Schema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            ..Default::default()
        }
    }

    /// Mark the field as required
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A registered action and its inputs and outputs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    #[serde(default, deserialize_with = "nullable")]
    pub id: String,

    #[serde(default, deserialize_with = "nullable")]
    pub name: String,

    #[serde(default, deserialize_with = "nullable")]
    pub description: String,

    #[serde(default, deserialize_with = "nullable")]
    pub parameters: Vec<Schema>,

    #[serde(default, deserialize_with = "nullable")]
    pub returns: Vec<Schema>,

    /// Whether the action completes asynchronously
    #[serde(rename = "async", default, deserialize_with = "nullable")]
    pub is_async: bool,

    #[serde(default, deserialize_with = "nullable")]
    pub endpoint: String,
}

impl ActionSpec {
    pub fn parameter(&self, name: &str) -> Option<&Schema> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Parameters that must be present before the action runs
    pub fn required_parameters(&self) -> impl Iterator<Item = &Schema> {
        self.parameters.iter().filter(|p| p.required)
    }
}
