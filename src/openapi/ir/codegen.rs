//! Code generation from API IR to the C# AST.
//!
//! The model emitter turns one named component into a class module; the
//! client emitter turns one operation group into a client-class module with
//! one callable method per operation. Both drive the type resolver and the
//! union flattener from `normalize`.

use indexmap::IndexMap;

use crate::openapi::config::GeneratorConfig;
use crate::openapi::error::{GenerateError, UnitFailure};
use crate::openapi::spec::{ComponentMap, ComponentSchema, PropertySchema};

use super::api::{GroupIR, OperationIR, ResponseShape, TypeSink};
use super::normalize::{
    ResolveCtx, enum_type_name, flatten_branches, flatten_properties, is_nullable,
    resolve_members, resolve_type,
};
use super::types::{
    ApiRoot, ClassDef, ClientClass, ClientItem, CsType, DefaultValue, EnumDef, EnumMember, Item,
    MethodDef, Module, Namespace, ParamDef, SubApiRef,
};
use super::utils::{arg_identifier, pascal_case, sanitize_enum_value, sanitize_identifier};

/// Generate the model module for one named component.
pub fn model_file(
    name: &str,
    component: &ComponentSchema,
    root: &ComponentMap,
    config: &GeneratorConfig,
) -> Result<Module, GenerateError> {
    let class_name = sanitize_identifier(name);
    let mut sink = TypeSink::default();
    let members = if let Some(props) = &component.properties {
        resolve_members(props, &class_name, root, config, &mut sink)?
    } else if component.composition().is_some() {
        let flat = flatten_properties(Some(name), component, root)?;
        resolve_members(&flat, &class_name, root, config, &mut sink)?
    } else {
        // Opaque component: an empty type.
        Vec::new()
    };

    let mut usings = Vec::new();
    if sink.uses_list {
        usings.push("System.Collections.Generic".to_string());
    }
    usings.push("System.Text.Json".to_string());
    usings.push("System.Text.Json.Nodes".to_string());
    usings.push("System.Text".to_string());

    let class = ClassDef {
        name: class_name,
        nested: sink.nested,
        members,
        render: true,
    };
    Ok(Module {
        usings,
        namespaces: vec![Namespace {
            name: config.model_namespace.clone(),
            items: vec![Item::Class(class)],
        }],
    })
}

/// Generate the client module for one operation group: the group class, any
/// sub-group classes in a nested namespace, and their enums. Operations that
/// fail to resolve are skipped and reported as per-unit failures.
pub fn client_file(
    group: &GroupIR,
    root: &ComponentMap,
    config: &GeneratorConfig,
) -> (Module, Vec<UnitFailure>) {
    let mut failures = Vec::new();
    let group_pascal = pascal_case(&group.key);

    let mut class_sink = TypeSink::default();
    let mut items = Vec::new();
    for op in &group.direct {
        collect_operation(op, root, config, &mut class_sink, &mut items, &mut failures);
    }

    let mut sub_refs = Vec::new();
    let mut sub_classes = Vec::new();
    let mut uses_list = false;
    let mut uses_stream = false;
    for (sub_key, ops) in &group.subgroups {
        let sub_class_name = format!("{}Api", pascal_case(sub_key));
        sub_refs.push(SubApiRef {
            field: sub_class_name.clone(),
            class_path: format!("{group_pascal}.{sub_class_name}"),
        });
        let mut sub_sink = TypeSink::default();
        let mut sub_items = Vec::new();
        for op in ops {
            collect_operation(op, root, config, &mut sub_sink, &mut sub_items, &mut failures);
        }
        flush_enums(&mut sub_sink, &mut sub_items);
        uses_list |= sub_sink.uses_list;
        uses_stream |= sub_sink.uses_stream;
        sub_classes.push(ClientClass {
            name: sub_class_name,
            app_type: config.app_type.clone(),
            sub_apis: Vec::new(),
            items: sub_items,
        });
    }

    flush_enums(&mut class_sink, &mut items);
    uses_list |= class_sink.uses_list;
    uses_stream |= class_sink.uses_stream;

    let group_class = ClientClass {
        name: format!("{group_pascal}Api"),
        app_type: config.app_type.clone(),
        sub_apis: sub_refs,
        items,
    };

    // The argument map needs the collections import even without list types.
    let has_args = class_has_args(&group_class) || sub_classes.iter().any(class_has_args);

    let mut usings = vec![config.model_namespace.clone()];
    if uses_list || has_args {
        usings.push("System.Collections.Generic".to_string());
    }
    if uses_stream {
        usings.push("System.IO".to_string());
    }
    usings.push("System.Text".to_string());

    let mut namespaces = vec![Namespace {
        name: config.client_namespace.clone(),
        items: vec![Item::Client(group_class)],
    }];
    if !sub_classes.is_empty() {
        namespaces.push(Namespace {
            name: format!("{}.{group_pascal}", config.client_namespace),
            items: sub_classes.into_iter().map(Item::Client).collect(),
        });
    }

    (Module { usings, namespaces }, failures)
}

/// Generate the api-root aggregation module over the generated group classes.
pub fn api_root_file(group_classes: Vec<String>, config: &GeneratorConfig) -> Module {
    Module {
        usings: Vec::new(),
        namespaces: vec![Namespace {
            name: config.client_namespace.clone(),
            items: vec![Item::Root(ApiRoot {
                name: "Apps".to_string(),
                app_type: config.app_type.clone(),
                groups: group_classes,
            })],
        }],
    }
}

fn class_has_args(class: &ClientClass) -> bool {
    class.items.iter().any(|item| {
        matches!(item, ClientItem::Method(method) if !method.params.is_empty())
    })
}

fn flush_enums(sink: &mut TypeSink, items: &mut Vec<ClientItem>) {
    for (name, values) in std::mem::take(&mut sink.enums) {
        let members = values
            .iter()
            .map(|raw| EnumMember {
                raw: raw.clone(),
                ident: sanitize_enum_value(raw),
            })
            .collect();
        items.push(ClientItem::Enum(EnumDef {
            name,
            values: members,
        }));
    }
}

fn collect_operation(
    op: &OperationIR,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
    items: &mut Vec<ClientItem>,
    failures: &mut Vec<UnitFailure>,
) {
    match operation_items(op, root, config, sink) {
        Ok(mut generated) => items.append(&mut generated),
        Err(error) => failures.push(UnitFailure {
            unit: format!("operation {}", op.path_key),
            error,
        }),
    }
}

/// Generate the items one operation contributes to its class: synthesized
/// argument/response classes followed by the method itself.
fn operation_items(
    op: &OperationIR,
    root: &ComponentMap,
    config: &GeneratorConfig,
    class_sink: &mut TypeSink,
) -> Result<Vec<ClientItem>, GenerateError> {
    let scope: String = op.segments.iter().map(|s| pascal_case(s)).collect();
    let method_name = op
        .segments
        .last()
        .map(|s| pascal_case(s))
        .unwrap_or_default();

    let mut op_sink = TypeSink::default();
    let params = build_params(op, &scope, root, config, &mut op_sink)?;
    let (returns, envelope, expected_status, response_class) =
        build_response(op, &scope, root, config, &mut op_sink)?;

    let mut items = Vec::new();
    for nested in std::mem::take(&mut op_sink.nested) {
        items.push(ClientItem::Response(nested));
    }
    if let Some(class) = response_class {
        items.push(ClientItem::Response(class));
    }
    items.push(ClientItem::Method(MethodDef {
        name: method_name,
        returns,
        envelope,
        params,
        path_key: op.path_key.clone(),
        form_data: op.params.as_ref().is_some_and(|p| p.form_data),
        auth: op.auth,
        expected_status,
    }));

    class_sink.absorb(op_sink);
    Ok(items)
}

/// Build the ordered parameter list: required parameters first in declaration
/// order, then defaulted parameters (default value, nullable, array, or
/// cursor-pagination field) in declaration order.
fn build_params(
    op: &OperationIR,
    scope: &str,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<Vec<ParamDef>, GenerateError> {
    let Some(params_ir) = &op.params else {
        return Ok(Vec::new());
    };
    let mut required = Vec::new();
    let mut defaulted = Vec::new();
    for (key, prop) in &params_ir.properties {
        let ctx = ResolveCtx {
            owner: scope,
            member: key,
            in_item: false,
            client_arg: true,
        };
        let mut ty = resolve_type(prop, &ctx, root, config, sink)?;

        let is_cursor = config.cursor_params.iter().any(|c| c == key);
        let nullable = is_nullable(prop, config.dialect);
        let array = prop.is_array();
        if is_cursor || array {
            // Cursor fields are forced nullable regardless of schema; array
            // arguments carry the marker alongside their null default.
            ty = ty.nullable();
        }

        let default = if is_cursor || nullable || array {
            Some(DefaultValue::Null)
        } else if prop.default.is_some() {
            Some(default_literal(prop, scope, key))
        } else {
            None
        };

        let param = ParamDef {
            key: key.clone(),
            ident: arg_identifier(key),
            ty,
            default,
        };
        if param.default.is_some() {
            defaulted.push(param);
        } else {
            required.push(param);
        }
    }
    required.append(&mut defaulted);
    Ok(required)
}

/// Render a declared default into its literal form; a default that does not
/// match its declared type degrades to a stringified literal.
fn default_literal(prop: &PropertySchema, scope: &str, key: &str) -> DefaultValue {
    let Some(value) = &prop.default else {
        return DefaultValue::Null;
    };
    if prop.enum_values.is_some() {
        if let serde_json::Value::String(s) = value {
            if s.is_empty() {
                return DefaultValue::Null;
            }
            return DefaultValue::EnumMember {
                enum_name: enum_type_name(scope, key),
                member: sanitize_enum_value(s),
            };
        }
        return DefaultValue::Raw(value.to_string());
    }
    match (prop.base_type(), value) {
        (_, serde_json::Value::Null) => DefaultValue::Null,
        (Some("string"), serde_json::Value::String(s)) => {
            if s.is_empty() {
                DefaultValue::Null
            } else {
                DefaultValue::Str(s.clone())
            }
        }
        (Some("boolean"), serde_json::Value::Bool(b)) => DefaultValue::Bool(*b),
        (Some("number") | Some("integer"), serde_json::Value::Number(n)) => {
            DefaultValue::Number(n.to_string())
        }
        _ => DefaultValue::Raw(value.to_string()),
    }
}

/// Determine the method's return type from the operation's response shape.
/// Returns (inner type, envelope?, expected status, synthesized class).
fn build_response(
    op: &OperationIR,
    scope: &str,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<(CsType, bool, u16, Option<ClassDef>), GenerateError> {
    match &op.response {
        ResponseShape::Model(name) => {
            if !root.contains_key(name.as_str()) {
                return Err(GenerateError::UnresolvedRef {
                    reference: name.clone(),
                    context: op.path_key.clone(),
                });
            }
            Ok((CsType::Named(sanitize_identifier(name)), true, 200, None))
        }
        ResponseShape::Inline(props) => {
            let class = response_class(op, props, root, config, sink)?;
            Ok((CsType::Named(class.name.clone()), true, 200, Some(class)))
        }
        ResponseShape::ListOf(items) => {
            let member = op.segments.last().map(String::as_str).unwrap_or("item");
            let ctx = ResolveCtx {
                owner: scope,
                member,
                in_item: false,
                client_arg: false,
            };
            let elem = resolve_type(items, &ctx, root, config, sink)?;
            sink.uses_list = true;
            Ok((CsType::List(Box::new(elem)), true, 200, None))
        }
        ResponseShape::Union(branches) => {
            let flat = flatten_branches(branches, root)?;
            let class = response_class(op, &flat, root, config, sink)?;
            Ok((CsType::Named(class.name.clone()), true, 200, Some(class)))
        }
        ResponseShape::NoContent(status) => {
            Ok((CsType::Named("EmptyResponse".to_string()), false, *status, None))
        }
        ResponseShape::Opaque => Ok((CsType::Json, true, 200, None)),
    }
}

/// Synthesize the ad-hoc response class for an inline or union-flattened
/// response, named from the operation's logical-name segments.
fn response_class(
    op: &OperationIR,
    props: &IndexMap<String, PropertySchema>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<ClassDef, GenerateError> {
    let name = format!(
        "{}Response",
        op.segments
            .iter()
            .take(3)
            .map(|s| pascal_case(s))
            .collect::<String>()
    );
    let mut child = TypeSink::default();
    let members = resolve_members(props, &name, root, config, &mut child)?;
    let nested = sink.absorb(child);
    Ok(ClassDef {
        name,
        nested,
        members,
        render: true,
    })
}
