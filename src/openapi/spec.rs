//! Schema document structs for serde deserialization.
//!
//! This module defines the subset of the OpenAPI-style schema document the
//! generator consumes: path operations keyed by HTTP verb, and named component
//! schemas under `components.schemas`. All maps are `IndexMap` so iteration
//! follows document declaration order, which the flattening and parameter
//! ordering rules depend on.

// Allow unused fields that are part of the schema format for completeness.
#![allow(dead_code)]

use indexmap::IndexMap;
use serde::Deserialize;

use super::error::GenerateError;

/// Root schema document.
#[derive(Debug, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub paths: IndexMap<String, PathItem>,
    /// Component groups (e.g. "schemas") mapping names to reusable schemas.
    #[serde(default)]
    pub components: IndexMap<String, IndexMap<String, ComponentSchema>>,
}

/// Named component schema table (the `$ref` resolution root).
pub type ComponentMap = IndexMap<String, ComponentSchema>;

impl SchemaDocument {
    /// Parse a schema document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, GenerateError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The `components.schemas` table, or an empty table when absent.
    pub fn schemas(&self) -> Option<&ComponentMap> {
        self.components.get("schemas")
    }
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

impl PathItem {
    /// All operations on this path, in a fixed verb order.
    pub fn operations(&self) -> impl Iterator<Item = &Operation> {
        [
            self.get.as_ref(),
            self.post.as_ref(),
            self.put.as_ref(),
            self.patch.as_ref(),
            self.delete.as_ref(),
        ]
        .into_iter()
        .flatten()
    }
}

/// One HTTP endpoint definition.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Slash-delimited logical name (the default naming source).
    pub operation_id: Option<String>,
    /// Alternative naming source used by the legacy schema dialect.
    pub summary: Option<String>,
    /// Presence alone marks the operation as authenticated.
    pub security: Option<serde_json::Value>,
    pub request_body: Option<RequestBody>,
    #[serde(default)]
    pub responses: IndexMap<String, Response>,
}

/// A request body definition.
#[derive(Debug, Deserialize)]
pub struct RequestBody {
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub content: IndexMap<String, MediaType>,
}

/// A response definition.
#[derive(Debug, Deserialize)]
pub struct Response {
    pub description: Option<String>,
    pub content: Option<IndexMap<String, MediaType>>,
}

/// Media type content (e.g. application/json).
#[derive(Debug, Deserialize)]
pub struct MediaType {
    pub schema: Option<PropertySchema>,
}

/// A named, reusable schema component.
///
/// Exactly one of `properties` or a `oneOf`/`allOf` composition is populated;
/// a component with neither is treated as opaque and yields an empty type.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSchema {
    #[serde(rename = "type")]
    pub schema_type: Option<String>,
    pub properties: Option<IndexMap<String, PropertySchema>>,
    pub required: Option<Vec<String>>,
    pub one_of: Option<Vec<PropertySchema>>,
    pub all_of: Option<Vec<PropertySchema>>,
}

impl ComponentSchema {
    /// Composition branches, `oneOf` strictly preferred over `allOf`.
    pub fn composition(&self) -> Option<&[PropertySchema]> {
        self.one_of.as_deref().or(self.all_of.as_deref())
    }
}

/// Recursive schema node: appears in component properties, request/response
/// schemas, and nested as `items` / `items.items`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub ty: PropertyType,
    #[serde(rename = "$ref")]
    pub reference: Option<String>,
    pub format: Option<String>,
    /// Ordered string values; only meaningful when the type is "string".
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    pub default: Option<serde_json::Value>,
    pub items: Option<Box<PropertySchema>>,
    pub properties: Option<IndexMap<String, PropertySchema>>,
    pub one_of: Option<Vec<PropertySchema>>,
    pub any_of: Option<Vec<PropertySchema>>,
    pub all_of: Option<Vec<PropertySchema>>,
    /// Legacy dialect nullability flag (later dialects use type arrays).
    pub nullable: Option<bool>,
    /// Legacy dialect optionality flag.
    pub optional: Option<bool>,
}

impl PropertySchema {
    /// Extract the referenced component name from a `$ref` pointer,
    /// recognizing the `#/components/schemas/<Name>` syntax.
    pub fn ref_name(&self) -> Option<&str> {
        self.reference
            .as_deref()
            .map(|r| r.strip_prefix("#/components/schemas/").unwrap_or(r))
    }

    /// The declared base type name, ignoring any null marker.
    pub fn base_type(&self) -> Option<&str> {
        match &self.ty {
            PropertyType::Unset => None,
            PropertyType::Named(t) | PropertyType::Nullable(t) => Some(t.as_str()),
        }
    }

    pub fn is_array(&self) -> bool {
        self.base_type() == Some("array")
    }

    /// Union branches of this node, `oneOf` strictly preferred over `anyOf`.
    pub fn union_branches(&self) -> Option<&[PropertySchema]> {
        self.one_of.as_deref().or(self.any_of.as_deref())
    }
}

/// Declared type of a property node, decided once at parse time.
///
/// The schema's `type` field is either absent, a single string, or a
/// 2-element `[T, "null"]` array meaning nullable-T; this tagged form
/// replaces repeated runtime inspection of the raw JSON shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawType")]
pub enum PropertyType {
    #[default]
    Unset,
    Named(String),
    Nullable(String),
}

/// Raw wire shape of the `type` field.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawType {
    One(String),
    Many(Vec<String>),
    /// Anything else (malformed documents) degrades to `Unset`.
    Other(serde_json::Value),
}

impl From<RawType> for PropertyType {
    fn from(raw: RawType) -> Self {
        match raw {
            RawType::One(t) => PropertyType::Named(t),
            RawType::Many(types) => {
                let base = types.iter().find(|t| *t != "null");
                match base {
                    Some(b) if types.iter().any(|t| t == "null") => {
                        PropertyType::Nullable(b.clone())
                    }
                    Some(b) => PropertyType::Named(b.clone()),
                    None => PropertyType::Unset,
                }
            }
            RawType::Other(_) => PropertyType::Unset,
        }
    }
}
