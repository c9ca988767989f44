//! C# source emission via the Emit trait.
//!
//! Purely mechanical rendering of the AST built by `codegen`: no generation
//! decisions are made here, only text layout. Indentation is one tab per
//! nesting level.

use super::types::{
    ApiRoot, ClassDef, ClientClass, ClientItem, CsType, DefaultValue, EnumDef, Item, Member,
    MethodDef, Module, Namespace, ParamDef, RenderKind,
};
use super::utils::escape_cs_string;

/// Trait for emitting C# source from AST nodes.
pub trait Emit {
    /// Convert the AST node to its C# string representation.
    fn emit(&self) -> String;
}

fn tabs(indent: usize) -> String {
    "\t".repeat(indent)
}

impl Emit for CsType {
    fn emit(&self) -> String {
        match self {
            CsType::String => "string".to_string(),
            CsType::Decimal => "decimal".to_string(),
            CsType::Int => "int".to_string(),
            CsType::Bool => "bool".to_string(),
            CsType::DateTime => "DateTime".to_string(),
            CsType::Stream => "Stream".to_string(),
            CsType::Json => "JsonNode".to_string(),
            CsType::List(inner) => format!("List<{}>", inner.emit()),
            CsType::Named(name) => name.clone(),
            CsType::Nullable(inner) => format!("{}?", inner.emit()),
        }
    }
}

impl Emit for DefaultValue {
    fn emit(&self) -> String {
        match self {
            DefaultValue::Null => "null".to_string(),
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Number(n) => n.clone(),
            DefaultValue::Str(s) => format!("\"{}\"", escape_cs_string(s)),
            DefaultValue::EnumMember { enum_name, member } => format!("{enum_name}.{member}"),
            DefaultValue::Raw(raw) => raw.clone(),
        }
    }
}

impl Emit for ParamDef {
    fn emit(&self) -> String {
        match &self.default {
            Some(value) => format!("{} {} = {}", self.ty.emit(), self.ident, value.emit()),
            None => format!("{} {}", self.ty.emit(), self.ident),
        }
    }
}

impl ClassDef {
    pub fn emit_indented(&self, indent: usize) -> String {
        let t = tabs(indent);
        let mut out = format!("{t}public class {} {{\n", self.name);
        for nested in &self.nested {
            out.push_str(&nested.emit_indented(indent + 1));
        }
        for member in &self.members {
            out.push_str(&format!(
                "{t}\tpublic {} {} {{ get; set; }}\n",
                member.ty.emit(),
                member.ident
            ));
        }
        if self.render {
            out.push_str(&emit_render_method(&self.name, &self.members, indent + 1));
        }
        out.push_str(&format!("{t}}}\n"));
        out
    }
}

/// The structural `ToString` method: a `class <Name>: {` header, one entry
/// per member, and a closing brace. List and reference members render as
/// indented blocks with one element per line.
fn emit_render_method(class_name: &str, members: &[Member], indent: usize) -> String {
    let t = tabs(indent);
    let b = tabs(indent + 1);
    let mut out = String::new();
    out.push_str(&format!("{t}public override string ToString()\n"));
    out.push_str(&format!("{t}{{\n"));
    out.push_str(&format!("{b}var sb = new StringBuilder();\n"));
    out.push_str(&format!(
        "{b}sb.Append(\"class {}: {{\\n\");\n",
        escape_cs_string(class_name)
    ));
    for member in members {
        let key = escape_cs_string(&member.key);
        let ident = &member.ident;
        match member.render {
            RenderKind::Scalar => {
                out.push_str(&format!(
                    "{b}sb.Append($\"  {key}: {{this.{ident}}}\\n\");\n"
                ));
            }
            RenderKind::List { ref_items: false } => {
                out.push_str(&format!("{b}sb.Append(\"  {key}: {{\\n\");\n"));
                out.push_str(&format!(
                    "{b}if (this.{ident} != null && this.{ident}.Count > 0) this.{ident}.ForEach(item => sb.Append(\"    \").Append(item).Append(\",\\n\"));\n"
                ));
                out.push_str(&format!("{b}sb.Append(\"  }}\\n\");\n"));
            }
            RenderKind::List { ref_items: true } => {
                out.push_str(&format!("{b}sb.Append(\"  {key}: {{\\n\");\n"));
                out.push_str(&format!(
                    "{b}if (this.{ident} != null && this.{ident}.Count > 0)\n"
                ));
                out.push_str(&format!("{b}{{\n"));
                out.push_str(&format!("{b}\tvar sb2 = new StringBuilder();\n"));
                out.push_str(&format!(
                    "{b}\tthis.{ident}.ForEach(item => sb2.Append(item).Append(\",\\n\"));\n"
                ));
                out.push_str(&format!("{b}\tsb2.Replace(\"\\n\", \"\\n    \");\n"));
                out.push_str(&format!(
                    "{b}\tsb.Append(\"    \").Append(sb2).Append(\"\\n\");\n"
                ));
                out.push_str(&format!("{b}}}\n"));
                out.push_str(&format!("{b}sb.Append(\"  }}\\n\");\n"));
            }
            RenderKind::Ref => {
                out.push_str(&format!("{b}var sb{ident} = new StringBuilder();\n"));
                out.push_str(&format!(
                    "{b}sb{ident}.Append(\"  {key}: {{\\n\");\n"
                ));
                out.push_str(&format!("{b}if (this.{ident} != null)\n"));
                out.push_str(&format!("{b}{{\n"));
                out.push_str(&format!("{b}\tsb{ident}.Append(this.{ident});\n"));
                out.push_str(&format!("{b}\tsb{ident}.Replace(\"\\n\", \"\\n    \");\n"));
                out.push_str(&format!("{b}\tsb{ident}.Append(\"\\n\");\n"));
                out.push_str(&format!("{b}}}\n"));
                out.push_str(&format!("{b}sb{ident}.Append(\"  }}\\n\");\n"));
                out.push_str(&format!("{b}sb.Append(sb{ident});\n"));
            }
        }
    }
    out.push_str(&format!("{b}sb.Append(\"}}\");\n"));
    out.push_str(&format!("{b}return sb.ToString();\n"));
    out.push_str(&format!("{t}}}\n"));
    out
}

impl MethodDef {
    pub fn emit_indented(&self, indent: usize) -> String {
        let t = tabs(indent);
        let body = tabs(indent + 1);
        let inner = self.returns.emit();
        let return_type = if self.envelope {
            format!("Task<Response<{inner}>>")
        } else {
            format!("Task<{inner}>")
        };
        let params = self
            .params
            .iter()
            .map(Emit::emit)
            .collect::<Vec<_>>()
            .join(", ");

        let mut out = format!(
            "{t}public async {return_type} {}({params})\n{t}{{\n",
            self.name
        );
        if !self.params.is_empty() {
            out.push_str(&format!(
                "{body}var param = new Dictionary<string, object?>\n{body}{{\n"
            ));
            for param in &self.params {
                out.push_str(&format!(
                    "{body}\t{{ \"{}\", {} }},\n",
                    escape_cs_string(&param.key),
                    param.ident
                ));
            }
            out.push_str(&format!("{body}}};\n"));
        }
        let primitive = if self.form_data {
            "RequestFormData"
        } else {
            "Request"
        };
        let args = if self.params.is_empty() {
            format!("\"{}\", {}, {}", self.path_key, self.auth, self.expected_status)
        } else {
            format!(
                "\"{}\", param, {}, {}",
                self.path_key, self.auth, self.expected_status
            )
        };
        out.push_str(&format!(
            "{body}var result = await _app.{primitive}<{inner}>({args});\n"
        ));
        out.push_str(&format!("{body}return result;\n"));
        out.push_str(&format!("{t}}}\n"));
        out
    }
}

impl EnumDef {
    pub fn emit_indented(&self, indent: usize) -> String {
        let t = tabs(indent);
        let mut out = format!("{t}public enum {} {{\n", self.name);
        for value in &self.values {
            out.push_str(&format!(
                "{t}\t[StringValue(\"{}\")]\n",
                escape_cs_string(&value.raw)
            ));
            out.push_str(&format!("{t}\t{},\n", value.ident));
        }
        out.push_str(&format!("{t}}}\n"));
        out
    }
}

impl ClientClass {
    pub fn emit_indented(&self, indent: usize) -> String {
        let t = tabs(indent);
        let inner = tabs(indent + 1);
        let body = tabs(indent + 2);
        let mut out = format!("{t}public class {} {{\n", self.name);
        out.push_str(&format!("{inner}private {} _app;\n", self.app_type));
        for sub in &self.sub_apis {
            out.push_str(&format!("{inner}public {} {};\n", sub.class_path, sub.field));
        }
        out.push_str(&format!("{inner}public {}({} app)\n", self.name, self.app_type));
        out.push_str(&format!("{inner}{{\n"));
        out.push_str(&format!("{body}_app = app;\n"));
        for sub in &self.sub_apis {
            out.push_str(&format!(
                "{body}{} = new {}(_app);\n",
                sub.field, sub.class_path
            ));
        }
        out.push_str(&format!("{inner}}}\n"));
        for item in &self.items {
            match item {
                ClientItem::Response(class) => out.push_str(&class.emit_indented(indent + 1)),
                ClientItem::Method(method) => out.push_str(&method.emit_indented(indent + 1)),
                ClientItem::Enum(def) => out.push_str(&def.emit_indented(indent + 1)),
            }
        }
        out.push_str(&format!("{t}}}\n"));
        out
    }
}

impl ApiRoot {
    pub fn emit_indented(&self, indent: usize) -> String {
        let t = tabs(indent);
        let inner = tabs(indent + 1);
        let body = tabs(indent + 2);
        let mut out = format!("{t}public partial class {} {{\n", self.name);
        for group in &self.groups {
            out.push_str(&format!("{inner}public {group} {group} {{ get; }}\n"));
        }
        out.push_str(&format!("{inner}public {}({} app)\n", self.name, self.app_type));
        out.push_str(&format!("{inner}{{\n"));
        for group in &self.groups {
            out.push_str(&format!("{body}{group} = new {group}(app);\n"));
        }
        out.push_str(&format!("{inner}}}\n"));
        out.push_str(&format!("{t}}}\n"));
        out
    }
}

impl Emit for Namespace {
    fn emit(&self) -> String {
        let mut out = format!("namespace {} {{\n", self.name);
        for item in &self.items {
            match item {
                Item::Class(class) => out.push_str(&class.emit_indented(1)),
                Item::Client(client) => out.push_str(&client.emit_indented(1)),
                Item::Root(root) => out.push_str(&root.emit_indented(1)),
            }
        }
        out.push_str("}\n");
        out
    }
}

impl Emit for Module {
    fn emit(&self) -> String {
        let mut out = String::new();
        for using in &self.usings {
            out.push_str(&format!("using {using};\n"));
        }
        if !self.usings.is_empty() {
            out.push('\n');
        }
        for namespace in &self.namespaces {
            out.push_str(&namespace.emit());
        }
        out
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::openapi::ir::types::{EnumMember, SubApiRef};

    #[test]
    fn test_emit_cs_type() {
        assert_eq!(CsType::String.emit(), "string");
        assert_eq!(CsType::Decimal.emit(), "decimal");
        assert_eq!(CsType::List(Box::new(CsType::Int)).emit(), "List<int>");
        assert_eq!(
            CsType::List(Box::new(CsType::Named("Note".into())))
                .nullable()
                .emit(),
            "List<Note>?"
        );
        assert_eq!(CsType::Json.emit(), "JsonNode");
    }

    #[test]
    fn test_emit_default_values() {
        assert_eq!(DefaultValue::Null.emit(), "null");
        assert_eq!(DefaultValue::Bool(true).emit(), "true");
        assert_eq!(DefaultValue::Str("home".into()).emit(), "\"home\"");
        assert_eq!(
            DefaultValue::EnumMember {
                enum_name: "SortEnum".into(),
                member: "MinusCreatedAt".into()
            }
            .emit(),
            "SortEnum.MinusCreatedAt"
        );
    }

    #[test]
    fn test_emit_class_with_render_method() {
        let class = ClassDef {
            name: "Note".into(),
            nested: Vec::new(),
            members: vec![
                Member {
                    key: "id".into(),
                    ident: "Id".into(),
                    ty: CsType::String,
                    render: RenderKind::Scalar,
                },
                Member {
                    key: "tags".into(),
                    ident: "Tags".into(),
                    ty: CsType::List(Box::new(CsType::String)),
                    render: RenderKind::List { ref_items: false },
                },
                Member {
                    key: "user".into(),
                    ident: "User".into(),
                    ty: CsType::Named("UserLite".into()),
                    render: RenderKind::Ref,
                },
            ],
            render: true,
        };
        let code = class.emit_indented(1);
        assert!(code.contains("public class Note {"));
        assert!(code.contains("public string Id { get; set; }"));
        assert!(code.contains("public List<string> Tags { get; set; }"));
        assert!(code.contains("public override string ToString()"));
        assert!(code.contains("sb.Append(\"class Note: {\\n\");"));
        assert!(code.contains("sb.Append($\"  id: {this.Id}\\n\");"));
        assert!(code.contains("sb.Append(\"  tags: {\\n\");"));
        assert!(code.contains("sbUser.Append(\"  user: {\\n\");"));
        assert!(code.contains("sb.Append(\"}\");"));
    }

    #[test]
    fn test_emit_method_with_params() {
        let method = MethodDef {
            name: "Show".into(),
            returns: CsType::Named("Note".into()),
            envelope: true,
            params: vec![
                ParamDef {
                    key: "noteId".into(),
                    ident: "noteId".into(),
                    ty: CsType::String,
                    default: None,
                },
                ParamDef {
                    key: "untilId".into(),
                    ident: "untilId".into(),
                    ty: CsType::String.nullable(),
                    default: Some(DefaultValue::Null),
                },
            ],
            path_key: "notes/show".into(),
            form_data: false,
            auth: true,
            expected_status: 200,
        };
        let code = method.emit_indented(2);
        assert!(code.contains(
            "public async Task<Response<Note>> Show(string noteId, string? untilId = null)"
        ));
        assert!(code.contains("var param = new Dictionary<string, object?>"));
        assert!(code.contains("{ \"noteId\", noteId },"));
        assert!(code.contains(
            "var result = await _app.Request<Note>(\"notes/show\", param, true, 200);"
        ));
    }

    #[test]
    fn test_emit_method_no_params_form_data() {
        let method = MethodDef {
            name: "Create".into(),
            returns: CsType::Named("DriveFile".into()),
            envelope: true,
            params: Vec::new(),
            path_key: "drive/files/create".into(),
            form_data: true,
            auth: true,
            expected_status: 200,
        };
        let code = method.emit_indented(2);
        assert!(!code.contains("var param"));
        assert!(code.contains(
            "var result = await _app.RequestFormData<DriveFile>(\"drive/files/create\", true, 200);"
        ));
    }

    #[test]
    fn test_emit_no_content_method() {
        let method = MethodDef {
            name: "Delete".into(),
            returns: CsType::Named("EmptyResponse".into()),
            envelope: false,
            params: Vec::new(),
            path_key: "notes/delete".into(),
            form_data: false,
            auth: true,
            expected_status: 204,
        };
        let code = method.emit_indented(2);
        assert!(code.contains("public async Task<EmptyResponse> Delete()"));
        assert!(code.contains("_app.Request<EmptyResponse>(\"notes/delete\", true, 204);"));
    }

    #[test]
    fn test_emit_enum() {
        let def = EnumDef {
            name: "SortEnum".into(),
            values: vec![
                EnumMember {
                    raw: "+createdAt".into(),
                    ident: "PlusCreatedAt".into(),
                },
                EnumMember {
                    raw: "-createdAt".into(),
                    ident: "MinusCreatedAt".into(),
                },
            ],
        };
        let code = def.emit_indented(2);
        assert!(code.contains("public enum SortEnum {"));
        assert!(code.contains("[StringValue(\"+createdAt\")]"));
        assert!(code.contains("PlusCreatedAt,"));
    }

    #[test]
    fn test_emit_client_class_constructor() {
        let class = ClientClass {
            name: "NotesApi".into(),
            app_type: "ApiClient.App".into(),
            sub_apis: vec![SubApiRef {
                field: "ReactionsApi".into(),
                class_path: "Notes.ReactionsApi".into(),
            }],
            items: Vec::new(),
        };
        let code = class.emit_indented(1);
        assert!(code.contains("public class NotesApi {"));
        assert!(code.contains("private ApiClient.App _app;"));
        assert!(code.contains("public Notes.ReactionsApi ReactionsApi;"));
        assert!(code.contains("public NotesApi(ApiClient.App app)"));
        assert!(code.contains("ReactionsApi = new Notes.ReactionsApi(_app);"));
    }

    #[test]
    fn test_emit_module_usings() {
        let module = Module {
            usings: vec!["ApiClient.Model".into(), "System.Text".into()],
            namespaces: vec![Namespace {
                name: "ApiClient.Controls".into(),
                items: Vec::new(),
            }],
        };
        let code = module.emit();
        assert!(code.starts_with("using ApiClient.Model;\nusing System.Text;\n\n"));
        assert!(code.contains("namespace ApiClient.Controls {"));
    }
}
