//! C# AST IR for code generation.
//!
//! This module defines the target-language representation the emitters build:
//! - `CsType`: emitted types (primitives, lists, named references)
//! - `ClassDef` / `MethodDef` / `EnumDef`: declarations
//! - `Module`: one generated source file (usings + namespaces)
//!
//! The AST captures every decision about *what* to emit; rendering to source
//! text is a separate pass (see `emit`).

/// An emitted C# type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsType {
    String,
    Decimal,
    Int,
    Bool,
    DateTime,
    /// Upload stream for `format: "binary"` client arguments.
    Stream,
    /// Unknown-JSON-value sentinel (`JsonNode`).
    Json,
    List(Box<CsType>),
    /// Named type reference: a model, a synthesized nested type, or an enum.
    Named(String),
    Nullable(Box<CsType>),
}

impl CsType {
    /// Wrap in the nullable marker. Idempotent.
    pub fn nullable(self) -> CsType {
        match self {
            CsType::Nullable(_) => self,
            other => CsType::Nullable(Box::new(other)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, CsType::Nullable(_))
    }

    /// Whether this type (or any type it contains) is a list type.
    pub fn uses_list(&self) -> bool {
        match self {
            CsType::List(_) => true,
            CsType::Nullable(inner) => inner.uses_list(),
            _ => false,
        }
    }
}

/// How a member renders inside the structural string-render method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderKind {
    /// Single line: `  <key>: <value>`.
    Scalar,
    /// Indented block with one comma-terminated line per element;
    /// `ref_items` selects the nested multi-line element form.
    List { ref_items: bool },
    /// Indented block embedding the referenced value's own rendering.
    Ref,
}

/// One generated class member (auto-property).
#[derive(Debug, Clone)]
pub struct Member {
    /// Original schema property name (used in render output).
    pub key: String,
    /// PascalCase member identifier.
    pub ident: String,
    pub ty: CsType,
    pub render: RenderKind,
}

/// A generated class: members, synthesized nested classes, and optionally
/// the structural string-render method.
#[derive(Debug, Clone)]
pub struct ClassDef {
    pub name: String,
    pub nested: Vec<ClassDef>,
    pub members: Vec<Member>,
    /// Attach the `ToString` structural render method.
    pub render: bool,
}

/// One synthesized enum: ordered raw values with sanitized member idents.
#[derive(Debug, Clone)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<EnumMember>,
}

#[derive(Debug, Clone)]
pub struct EnumMember {
    /// Raw schema value, kept on the member as a string attribute.
    pub raw: String,
    pub ident: String,
}

/// Rendered default literal for a defaulted client argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    Null,
    Bool(bool),
    /// Numeric literal, already formatted.
    Number(String),
    /// String literal content (quoted and escaped at emission).
    Str(String),
    /// Resolved enum member: `<enum_name>.<member>`.
    EnumMember { enum_name: String, member: String },
    /// Best-effort stringified literal for defaults that do not match their
    /// declared type.
    Raw(String),
}

/// One generated client-method parameter.
#[derive(Debug, Clone)]
pub struct ParamDef {
    /// Original schema property name (argument-map key).
    pub key: String,
    /// Sanitized C# argument identifier.
    pub ident: String,
    pub ty: CsType,
    /// `None` marks a required parameter; defaulted parameters carry their
    /// rendered default literal.
    pub default: Option<DefaultValue>,
}

/// One generated client method, wired to the external call primitive.
#[derive(Debug, Clone)]
pub struct MethodDef {
    pub name: String,
    /// Inner result type; wrapped in the `Response<T>` envelope unless the
    /// operation has a no-content response.
    pub returns: CsType,
    pub envelope: bool,
    pub params: Vec<ParamDef>,
    /// Operation path key passed to the call primitive.
    pub path_key: String,
    /// Multipart/form upload semantics (selects `RequestFormData`).
    pub form_data: bool,
    /// Authenticated call (`security` present on the operation).
    pub auth: bool,
    pub expected_status: u16,
}

/// Body item of a client class, in emission order.
#[derive(Debug, Clone)]
pub enum ClientItem {
    /// Ad-hoc response class emitted ahead of its method.
    Response(ClassDef),
    Method(MethodDef),
    /// Enum flushed at the end of the class.
    Enum(EnumDef),
}

/// Reference from a group class to one of its sub-group classes.
#[derive(Debug, Clone)]
pub struct SubApiRef {
    /// Field name, e.g. `ReactionsApi`.
    pub field: String,
    /// Class path relative to the client namespace, e.g. `Notes.ReactionsApi`.
    pub class_path: String,
}

/// A generated client class (top-level group or nested sub-group).
#[derive(Debug, Clone)]
pub struct ClientClass {
    pub name: String,
    /// Runtime handle type taken by the constructor.
    pub app_type: String,
    pub sub_apis: Vec<SubApiRef>,
    pub items: Vec<ClientItem>,
}

/// The api-root aggregation class: one property and constructor wire-up per
/// generated group class.
#[derive(Debug, Clone)]
pub struct ApiRoot {
    pub name: String,
    pub app_type: String,
    /// Group class names, e.g. `NotesApi`.
    pub groups: Vec<String>,
}

/// Top-level item inside a namespace block.
#[derive(Debug, Clone)]
pub enum Item {
    Class(ClassDef),
    Client(ClientClass),
    Root(ApiRoot),
}

#[derive(Debug, Clone)]
pub struct Namespace {
    pub name: String,
    pub items: Vec<Item>,
}

/// One generated source file.
#[derive(Debug, Clone)]
pub struct Module {
    pub usings: Vec<String>,
    pub namespaces: Vec<Namespace>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_nullable_idempotent() {
        let ty = CsType::String.nullable().nullable();
        assert_eq!(ty, CsType::Nullable(Box::new(CsType::String)));
    }

    #[test]
    fn test_uses_list() {
        assert!(CsType::List(Box::new(CsType::Int)).uses_list());
        assert!(CsType::List(Box::new(CsType::Int)).nullable().uses_list());
        assert!(!CsType::Named("Note".into()).uses_list());
    }
}
