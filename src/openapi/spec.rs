//! OpenAPI specification structs for serde deserialization.
//!
//! This module defines the subset of OpenAPI 3.0/3.1 that the date transform
//! generator reads: component schemas and the response side of operations.
//! Maps whose order is observable in the output use `IndexMap` so that
//! properties are visited in declaration order.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::TransformError;

/// Root OpenAPI specification.
#[derive(Debug, Default, Deserialize)]
pub struct OpenApiSpec {
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    pub components: Option<Components>,
}

/// Components section containing reusable schemas.
#[derive(Debug, Default, Deserialize)]
pub struct Components {
    pub schemas: Option<IndexMap<String, SchemaOrBool>>,
}

/// A path item containing operations for different HTTP methods.
#[derive(Debug, Deserialize)]
pub struct PathItem {
    pub get: Option<Operation>,
    pub post: Option<Operation>,
    pub put: Option<Operation>,
    pub patch: Option<Operation>,
    pub delete: Option<Operation>,
}

/// An API operation (endpoint). Only the parts that shape the response are read.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    pub operation_id: Option<String>,
    #[serde(default)]
    pub responses: HashMap<String, Response>,
}

/// A response definition, or a `$ref` to `#/components/responses`.
#[derive(Debug, Deserialize)]
pub struct Response {
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Media type content (e.g., application/json).
#[derive(Debug, Deserialize)]
pub struct MediaType {
    pub schema: Option<SchemaOrBool>,
}

/// A schema position: OpenAPI 3.1 allows `true`/`false` wherever a schema goes.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrBool {
    Bool(bool),
    Schema(Box<Schema>),
}

/// JSON Schema definition used in OpenAPI.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// The type of the schema (string, number, integer, boolean, object, array).
    #[serde(rename = "type")]
    pub schema_type: Option<SchemaType>,

    /// Reference to another schema.
    #[serde(rename = "$ref")]
    pub ref_path: Option<String>,

    /// Properties for object types, in declaration order.
    pub properties: Option<IndexMap<String, SchemaOrBool>>,

    /// Item schema for array types.
    pub items: Option<Box<SchemaOrBool>>,

    /// Union type (any of these schemas). Only the nullable form is understood.
    #[serde(rename = "anyOf")]
    pub any_of: Option<Vec<SchemaOrBool>>,

    /// Additional properties for object types (for Record/dict types).
    pub additional_properties: Option<SchemaOrBool>,

    /// Format hint (e.g., date-time, uuid).
    pub format: Option<String>,

    /// OpenAPI 3.0 nullable flag (3.1 uses type arrays instead).
    pub nullable: Option<bool>,
}

/// Schema type can be a single type or an array of types (for nullable).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SchemaType {
    Single(String),
    Multiple(Vec<String>),
}

/// Serialization format of a schema document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
}

impl DocumentFormat {
    /// Guess the format from a file extension; anything not `.yaml`/`.yml` is JSON.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

impl OpenApiSpec {
    /// Parse an OpenAPI spec from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, TransformError> {
        serde_json::from_str(json).map_err(|e| TransformError::Parse(e.to_string()))
    }

    /// Parse an OpenAPI spec from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, TransformError> {
        serde_yaml::from_str(yaml).map_err(|e| TransformError::Parse(e.to_string()))
    }

    /// Parse an OpenAPI spec in the given format.
    pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, TransformError> {
        match format {
            DocumentFormat::Json => Self::from_json(text),
            DocumentFormat::Yaml => Self::from_yaml(text),
        }
    }

    /// Look up a component schema by name.
    pub fn component_schema(&self, name: &str) -> Option<&SchemaOrBool> {
        self.components
            .as_ref()
            .and_then(|c| c.schemas.as_ref())
            .and_then(|schemas| schemas.get(name))
    }
}

impl Schema {
    /// Check if this schema is nullable (contains null in anyOf, type array, or nullable flag).
    pub fn is_nullable(&self) -> bool {
        // Check OpenAPI 3.0 nullable flag
        if self.nullable == Some(true) {
            return true;
        }

        // Check anyOf for null type
        if let Some(any_of) = &self.any_of
            && any_of.iter().any(SchemaOrBool::is_null_type)
        {
            return true;
        }

        // Check type array for null
        if let Some(SchemaType::Multiple(types)) = &self.schema_type
            && types.iter().any(|t| t == "null")
        {
            return true;
        }

        false
    }

    /// Get the single non-null schema from an `anyOf` that includes null.
    ///
    /// Returns `None` when there is no `anyOf`, when it has no null member, or
    /// when more than one non-null alternative remains.
    pub fn unwrap_nullable(&self) -> Option<&SchemaOrBool> {
        let any_of = self.any_of.as_ref()?;
        if !any_of.iter().any(SchemaOrBool::is_null_type) {
            return None;
        }
        let mut rest = any_of.iter().filter(|s| !s.is_null_type());
        let first = rest.next()?;
        if rest.next().is_some() {
            return None;
        }
        Some(first)
    }

    /// The primary (non-null) type name, if any.
    pub fn primary_type(&self) -> Option<&str> {
        match &self.schema_type {
            Some(SchemaType::Single(t)) => Some(t.as_str()),
            Some(SchemaType::Multiple(types)) => {
                types.iter().map(String::as_str).find(|t| *t != "null")
            }
            None => None,
        }
    }

    /// Whether this schema describes an object, explicitly or by shape.
    pub fn is_object(&self) -> bool {
        match self.primary_type() {
            Some(t) => t == "object",
            None => self.properties.is_some() || self.additional_properties.is_some(),
        }
    }

    /// Additional properties schema, treating `false` as absent.
    pub fn map_values(&self) -> Option<&SchemaOrBool> {
        match &self.additional_properties {
            Some(SchemaOrBool::Bool(false)) | None => None,
            Some(values) => Some(values),
        }
    }
}

impl SchemaOrBool {
    fn is_null_type(&self) -> bool {
        matches!(
            self,
            SchemaOrBool::Schema(s) if matches!(&s.schema_type, Some(SchemaType::Single(t)) if t == "null")
        )
    }
}
