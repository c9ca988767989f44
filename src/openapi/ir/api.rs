//! API-level IR for normalized operations.
//!
//! Grouping and response-shape classification happen here, before any C# AST
//! is built: `GroupIR` captures how operations nest into classes and
//! `ResponseShape` captures what a method returns. Schema fragments are
//! carried by value so the later, fallible resolution steps can fail one
//! emission unit without touching the rest.

use indexmap::IndexMap;

use crate::openapi::spec::PropertySchema;

use super::types::ClassDef;

/// What a generated client method returns, classified from the operation's
/// success response.
#[derive(Debug, Clone)]
pub enum ResponseShape {
    /// Response schema is a `$ref`: the referenced model (unsanitized name).
    Model(String),
    /// Inline `properties`: a one-off response class is synthesized.
    Inline(IndexMap<String, PropertySchema>),
    /// `items`: a list of the resolved item type.
    ListOf(PropertySchema),
    /// `oneOf`/`anyOf`: branches are flattened against the component table
    /// and a response class is synthesized like the inline case.
    Union(Vec<PropertySchema>),
    /// Only a no-content status: empty envelope, expect this status code.
    NoContent(u16),
    /// A success schema with no usable shape; degrades to the JSON sentinel.
    Opaque,
}

/// Request parameters of one operation.
#[derive(Debug, Clone)]
pub struct ParamsIR {
    /// Request-body properties in declaration order.
    pub properties: IndexMap<String, PropertySchema>,
    /// Body content type was multipart/form-data.
    pub form_data: bool,
}

/// One normalized operation.
#[derive(Debug, Clone)]
pub struct OperationIR {
    /// Path key passed to the call primitive (document path, leading `/`
    /// removed).
    pub path_key: String,
    /// Logical-name segments; drive grouping, method and type naming.
    pub segments: Vec<String>,
    pub params: Option<ParamsIR>,
    pub auth: bool,
    pub response: ResponseShape,
}

/// One top-level operation group and its sub-groups.
#[derive(Debug, Clone)]
pub struct GroupIR {
    /// Raw first logical-name segment.
    pub key: String,
    /// Operations with 1 or 2 segments, emitted as direct methods.
    pub direct: Vec<OperationIR>,
    /// Operations with 3+ segments, keyed by their second segment; emitted
    /// only inside the sub-group class.
    pub subgroups: IndexMap<String, Vec<OperationIR>>,
}

/// Per-emission-unit side-effect collector.
///
/// One sink is scoped to a single model file or a single client class and
/// flushed before the next unit begins; nothing here is shared across units.
#[derive(Debug, Default)]
pub struct TypeSink {
    /// Synthesized anonymous nested types, in synthesis order.
    pub nested: Vec<ClassDef>,
    /// Scoped enum name → ordered raw values, deduplicated by name.
    pub enums: IndexMap<String, Vec<String>>,
    /// The unit mentions a list type and needs the collections import.
    pub uses_list: bool,
    /// The unit mentions the upload-stream type and needs the IO import.
    pub uses_stream: bool,
}

impl TypeSink {
    /// Register an enum under its scoped name; the first registration wins.
    pub fn register_enum(&mut self, name: String, values: Vec<String>) {
        self.enums.entry(name).or_insert(values);
    }

    /// Fold a child sink (from a nested synthesis) into this one, returning
    /// the child's synthesized classes.
    pub fn absorb(&mut self, child: TypeSink) -> Vec<ClassDef> {
        for (name, values) in child.enums {
            self.register_enum(name, values);
        }
        self.uses_list |= child.uses_list;
        self.uses_stream |= child.uses_stream;
        child.nested
    }
}
