//! Normalization from the schema document to API IR.
//!
//! All schema-format logic lives here:
//! - `resolve_type`: the recursive property-node → C# type mapping, including
//!   nested anonymous type synthesis and client-argument enum extraction
//! - `flatten_properties`: `oneOf`/`allOf` composition flattening
//! - `group_operations`: logical-name grouping and sub-grouping

use std::collections::HashSet;

use indexmap::IndexMap;
use tracing::warn;

use crate::openapi::config::{Dialect, GeneratorConfig};
use crate::openapi::error::GenerateError;
use crate::openapi::spec::{
    ComponentMap, ComponentSchema, Operation, PropertySchema, SchemaDocument,
};

use super::api::{GroupIR, OperationIR, ParamsIR, ResponseShape, TypeSink};
use super::types::{ClassDef, CsType, Member, RenderKind};
use super::utils::{pascal_case, sanitize_identifier};

/// Context for one `resolve_type` call.
#[derive(Debug, Clone, Copy)]
pub struct ResolveCtx<'a> {
    /// Owning type name: the component name for model members, the
    /// pascal-cased logical-name concatenation for client arguments.
    pub owner: &'a str,
    /// Schema name of the member or argument being resolved.
    pub member: &'a str,
    /// Already inside an item-type synthesis (switches the synthesized name
    /// from `<Member>ItemType` to `<Member>Type`).
    pub in_item: bool,
    /// Resolving a client argument: enables the enum short-circuit and the
    /// binary-upload rule.
    pub client_arg: bool,
}

/// Scoped name of a synthesized client-argument enum.
pub fn enum_type_name(owner: &str, member: &str) -> String {
    format!("{owner}{}Enum", pascal_case(member))
}

/// Whether a property is nullable under the active dialect: a 2-element
/// `[T, "null"]` type array, or the earliest dialect's boolean flags.
pub fn is_nullable(prop: &PropertySchema, dialect: Dialect) -> bool {
    use crate::openapi::spec::PropertyType;
    (dialect.nullable_type_arrays && matches!(prop.ty, PropertyType::Nullable(_)))
        || (dialect.legacy_optional_flags
            && (prop.nullable == Some(true) || prop.optional == Some(true)))
}

/// Map one schema property node to a concrete C# type.
///
/// Priority order: `$ref` (wins over everything but nullability), declared
/// type with array/object recursion, `date-time` format override,
/// client-argument rules (binary upload, enum synthesis), nullability suffix.
/// Resolution is deterministic: the same node in the same context always
/// yields the same type and side effects.
pub fn resolve_type(
    prop: &PropertySchema,
    ctx: &ResolveCtx<'_>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<CsType, GenerateError> {
    let base = if let Some(name) = prop.ref_name() {
        lookup_component(name, root, ctx.owner)?;
        CsType::Named(sanitize_identifier(name))
    } else {
        resolve_unreferenced(prop, ctx, root, config, sink)?
    };
    if is_nullable(prop, config.dialect) {
        Ok(base.nullable())
    } else {
        Ok(base)
    }
}

fn lookup_component(name: &str, root: &ComponentMap, context: &str) -> Result<(), GenerateError> {
    if root.contains_key(name) {
        Ok(())
    } else {
        Err(GenerateError::UnresolvedRef {
            reference: name.to_string(),
            context: context.to_string(),
        })
    }
}

fn resolve_unreferenced(
    prop: &PropertySchema,
    ctx: &ResolveCtx<'_>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<CsType, GenerateError> {
    // A node without a declared type may still carry a single usable union
    // branch (`oneOf`/`anyOf`/one-element `allOf`).
    if prop.base_type().is_none() {
        if let Some(ty) = resolve_single_branch(prop, ctx, root, config, sink)? {
            return Ok(ty);
        }
    }

    let mut base = match prop.base_type() {
        Some("array") => resolve_array(prop, ctx, root, config, sink)?,
        Some("object") => resolve_object(prop, ctx, root, config, sink)?,
        Some(other) => primitive_type(other),
        None => CsType::Json,
    };

    // The date-time format wins over the declared type; a $ref never gets
    // here, so a ref always beats the format.
    if prop.format.as_deref() == Some("date-time") {
        base = CsType::DateTime;
    }
    if ctx.client_arg && prop.format.as_deref() == Some("binary") {
        sink.uses_stream = true;
        base = CsType::Stream;
    }
    if ctx.client_arg {
        if let Some(values) = &prop.enum_values {
            let name = enum_type_name(ctx.owner, ctx.member);
            sink.register_enum(name.clone(), values.clone());
            base = CsType::Named(name);
        }
    }
    Ok(base)
}

fn primitive_type(raw: &str) -> CsType {
    match raw {
        "string" => CsType::String,
        "number" => CsType::Decimal,
        "integer" => CsType::Int,
        "boolean" => CsType::Bool,
        _ => CsType::Json,
    }
}

/// Unwrap a union with exactly one non-null branch (`oneOf` preferred over
/// `anyOf`, then a one-element `allOf`) into that branch's type, nullable
/// when a null branch was filtered out.
fn resolve_single_branch(
    prop: &PropertySchema,
    ctx: &ResolveCtx<'_>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<Option<CsType>, GenerateError> {
    let branches = prop.union_branches().or_else(|| match prop.all_of.as_deref() {
        Some(branches) if branches.len() == 1 => Some(branches),
        _ => None,
    });
    let Some(branches) = branches else {
        return Ok(None);
    };
    let non_null: Vec<&PropertySchema> = branches
        .iter()
        .filter(|b| b.base_type() != Some("null"))
        .collect();
    if non_null.len() == 1 {
        let saw_null = non_null.len() != branches.len();
        let inner = resolve_type(non_null[0], ctx, root, config, sink)?;
        return Ok(Some(if saw_null { inner.nullable() } else { inner }));
    }
    // Multi-branch property unions have no single concrete type.
    Ok(None)
}

fn resolve_array(
    prop: &PropertySchema,
    ctx: &ResolveCtx<'_>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<CsType, GenerateError> {
    sink.uses_list = true;
    let Some(items) = prop.items.as_deref() else {
        warn!(
            owner = ctx.owner,
            member = ctx.member,
            "array property without items; using unknown element type"
        );
        return Ok(CsType::List(Box::new(CsType::Json)));
    };

    // 2-D arrays add exactly one more list level; the innermost type is
    // resolved flat (ref name or primitive), never synthesized.
    if let Some(inner) = items.items.as_deref() {
        let elem = if let Some(name) = inner.ref_name() {
            lookup_component(name, root, ctx.owner)?;
            CsType::Named(sanitize_identifier(name))
        } else {
            match inner.base_type() {
                Some(t) => primitive_type(t),
                None => CsType::Json,
            }
        };
        return Ok(CsType::List(Box::new(CsType::List(Box::new(elem)))));
    }

    let elem = resolve_type(items, ctx, root, config, sink)?;
    if matches!(elem, CsType::Json) {
        if let Some(props) = &items.properties {
            // Anonymous element shape: synthesize a named item type.
            let name = if ctx.in_item {
                format!("{}Type", pascal_case(ctx.member))
            } else {
                format!("{}ItemType", pascal_case(ctx.member))
            };
            let ty = synthesize_class(&name, props, root, config, sink, true)?;
            return Ok(CsType::List(Box::new(ty)));
        }
    }
    Ok(CsType::List(Box::new(elem)))
}

fn resolve_object(
    prop: &PropertySchema,
    ctx: &ResolveCtx<'_>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<CsType, GenerateError> {
    if let Some(props) = &prop.properties {
        let name = format!("{}{}Object", ctx.owner, pascal_case(ctx.member));
        synthesize_class(&name, props, root, config, sink, false)
    } else if let Some(ty) = resolve_single_branch(prop, ctx, root, config, sink)? {
        // An object declared through a single composed ref.
        Ok(ty)
    } else {
        Ok(CsType::Json)
    }
}

/// Synthesize a nested anonymous class from an inline property map and
/// register it in the sink.
fn synthesize_class(
    name: &str,
    props: &IndexMap<String, PropertySchema>,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
    in_item: bool,
) -> Result<CsType, GenerateError> {
    let mut child = TypeSink::default();
    let members = resolve_members_with(props, name, root, config, &mut child, in_item)?;
    let nested = sink.absorb(child);
    sink.nested.push(ClassDef {
        name: name.to_string(),
        nested,
        members,
        render: false,
    });
    Ok(CsType::Named(name.to_string()))
}

/// Resolve an ordered property map into class members, in declaration order.
pub fn resolve_members(
    props: &IndexMap<String, PropertySchema>,
    owner: &str,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
) -> Result<Vec<Member>, GenerateError> {
    resolve_members_with(props, owner, root, config, sink, false)
}

fn resolve_members_with(
    props: &IndexMap<String, PropertySchema>,
    owner: &str,
    root: &ComponentMap,
    config: &GeneratorConfig,
    sink: &mut TypeSink,
    in_item: bool,
) -> Result<Vec<Member>, GenerateError> {
    let mut members = Vec::new();
    for (key, prop) in props {
        let ctx = ResolveCtx {
            owner,
            member: key,
            in_item,
            client_arg: false,
        };
        let ty = resolve_type(prop, &ctx, root, config, sink)?;
        let render = if prop.is_array() {
            RenderKind::List {
                ref_items: prop
                    .items
                    .as_deref()
                    .and_then(PropertySchema::ref_name)
                    .is_some(),
            }
        } else if prop.reference.is_some() {
            RenderKind::Ref
        } else {
            RenderKind::Scalar
        };
        members.push(Member {
            key: key.clone(),
            ident: sanitize_identifier(&pascal_case(key)),
            ty,
            render,
        });
    }
    Ok(members)
}

/// Flatten a composed component's branches into a single ordered property
/// set, first-seen-wins.
pub fn flatten_properties(
    name: Option<&str>,
    component: &ComponentSchema,
    root: &ComponentMap,
) -> Result<IndexMap<String, PropertySchema>, GenerateError> {
    let Some(branches) = component.composition() else {
        return Ok(IndexMap::new());
    };
    let mut stack: Vec<String> = name.map(str::to_string).into_iter().collect();
    flatten_branches_onto(branches, root, &mut stack)
}

/// Flatten an anonymous branch list (e.g. a response-level union) against
/// the component table.
pub fn flatten_branches(
    branches: &[PropertySchema],
    root: &ComponentMap,
) -> Result<IndexMap<String, PropertySchema>, GenerateError> {
    flatten_branches_onto(branches, root, &mut Vec::new())
}

fn flatten_branches_onto(
    branches: &[PropertySchema],
    root: &ComponentMap,
    stack: &mut Vec<String>,
) -> Result<IndexMap<String, PropertySchema>, GenerateError> {
    let mut acc = IndexMap::new();
    let mut done = HashSet::new();
    flatten_into(branches, root, &mut acc, stack, &mut done)?;
    Ok(acc)
}

fn flatten_into(
    branches: &[PropertySchema],
    root: &ComponentMap,
    acc: &mut IndexMap<String, PropertySchema>,
    stack: &mut Vec<String>,
    done: &mut HashSet<String>,
) -> Result<(), GenerateError> {
    for branch in branches {
        // Branches without a ref are skipped, not an error.
        let Some(name) = branch.ref_name() else {
            continue;
        };
        if stack.iter().any(|seen| seen == name) {
            return Err(GenerateError::CompositionCycle {
                component: name.to_string(),
            });
        }
        // Already merged through another branch: nothing new to add.
        if !done.insert(name.to_string()) {
            continue;
        }
        let target = root
            .get(name)
            .ok_or_else(|| GenerateError::UnresolvedRef {
                reference: name.to_string(),
                context: stack.last().cloned().unwrap_or_else(|| "composition".to_string()),
            })?;
        if let Some(props) = &target.properties {
            for (key, prop) in props {
                if !acc.contains_key(key) {
                    acc.insert(key.clone(), prop.clone());
                }
            }
        } else if let Some(sub) = target.composition() {
            stack.push(name.to_string());
            flatten_into(sub, root, acc, stack, done)?;
            stack.pop();
        }
        // Opaque components contribute nothing.
    }
    Ok(())
}

/// Partition the document's operations into top-level groups and sub-groups
/// by logical-name segments, honoring the configured group denylist.
pub fn group_operations(doc: &SchemaDocument, config: &GeneratorConfig) -> Vec<GroupIR> {
    let mut groups: IndexMap<String, GroupIR> = IndexMap::new();
    for (path, item) in &doc.paths {
        for op in item.operations() {
            let logical = logical_name(op, path, config.dialect);
            let segments: Vec<String> = logical
                .split('/')
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
            let Some(first) = segments.first().cloned() else {
                warn!(%path, "operation with empty logical name; skipped");
                continue;
            };
            if config.excluded_groups.iter().any(|g| *g == first) {
                continue;
            }
            let ir = normalize_operation(path, op, segments);
            let entry = groups.entry(first.clone()).or_insert_with(|| GroupIR {
                key: first,
                direct: Vec::new(),
                subgroups: IndexMap::new(),
            });
            if ir.segments.len() >= 3 {
                entry
                    .subgroups
                    .entry(ir.segments[1].clone())
                    .or_default()
                    .push(ir);
            } else {
                entry.direct.push(ir);
            }
        }
    }
    groups.into_values().collect()
}

fn logical_name(op: &Operation, path: &str, dialect: Dialect) -> String {
    let primary = if dialect.logical_name_from_summary {
        op.summary.as_deref().or(op.operation_id.as_deref())
    } else {
        op.operation_id.as_deref().or(op.summary.as_deref())
    };
    primary
        .map(str::to_string)
        .unwrap_or_else(|| path.trim_start_matches('/').to_string())
}

fn normalize_operation(path: &str, op: &Operation, segments: Vec<String>) -> OperationIR {
    let params = op.request_body.as_ref().and_then(|body| {
        let (media, form_data) = if let Some(media) = body.content.get("application/json") {
            (Some(media), false)
        } else if let Some(media) = body.content.get("multipart/form-data") {
            (Some(media), true)
        } else {
            (None, false)
        };
        let schema = media?.schema.as_ref()?;
        if schema.reference.is_some() {
            warn!(path, "request body is a bare $ref; no parameters generated");
            return None;
        }
        let properties = schema.properties.clone()?;
        Some(ParamsIR {
            properties,
            form_data,
        })
    });
    OperationIR {
        path_key: path.trim_start_matches('/').to_string(),
        segments,
        params,
        auth: op.security.is_some(),
        response: select_response(path, op),
    }
}

/// Classify the operation's success response, preferring the 200 response's
/// JSON content and falling back to any other 2xx in document order.
fn select_response(path: &str, op: &Operation) -> ResponseShape {
    let mut candidates: Vec<(&str, &crate::openapi::spec::Response)> = Vec::new();
    if let Some(resp) = op.responses.get("200") {
        candidates.push(("200", resp));
    }
    for (status, resp) in &op.responses {
        if status.starts_with('2') && status != "200" {
            candidates.push((status.as_str(), resp));
        }
    }

    for (status, resp) in &candidates {
        let Some(content) = &resp.content else {
            continue;
        };
        let Some(schema) = content.get("application/json").and_then(|m| m.schema.as_ref()) else {
            continue;
        };
        if let Some(name) = schema.ref_name() {
            return ResponseShape::Model(name.to_string());
        }
        if let Some(props) = &schema.properties {
            return ResponseShape::Inline(props.clone());
        }
        if let Some(items) = schema.items.as_deref() {
            return ResponseShape::ListOf(items.clone());
        }
        if let Some(branches) = schema.union_branches() {
            return ResponseShape::Union(branches.to_vec());
        }
        warn!(path, status = %status, "success response schema has no usable shape");
        return ResponseShape::Opaque;
    }

    let status = candidates
        .first()
        .and_then(|(status, _)| status.parse().ok())
        .unwrap_or(204);
    ResponseShape::NoContent(status)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn prop(value: serde_json::Value) -> PropertySchema {
        serde_json::from_value(value).unwrap()
    }

    fn components(value: serde_json::Value) -> ComponentMap {
        serde_json::from_value(value).unwrap()
    }

    fn resolve(
        value: serde_json::Value,
        root: &ComponentMap,
        client_arg: bool,
        sink: &mut TypeSink,
    ) -> Result<CsType, GenerateError> {
        let p = prop(value);
        let ctx = ResolveCtx {
            owner: "NotesCreate",
            member: "visibility",
            in_item: false,
            client_arg,
        };
        resolve_type(&p, &ctx, root, &GeneratorConfig::default(), sink)
    }

    #[test]
    fn test_nullable_string() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(json!({"type": ["string", "null"]}), &root, false, &mut sink).unwrap();
        assert_eq!(ty, CsType::Nullable(Box::new(CsType::String)));
    }

    #[test]
    fn test_array_of_integer() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "array", "items": {"type": "integer"}}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::List(Box::new(CsType::Int)));
        assert!(sink.uses_list);
    }

    #[test]
    fn test_ref_wins_over_sibling_type() {
        let root = components(json!({"Note": {"properties": {}}}));
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"$ref": "#/components/schemas/Note", "type": "string"}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::Named("Note".into()));
    }

    #[test]
    fn test_unresolved_ref_is_an_error() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let err = resolve(
            json!({"$ref": "#/components/schemas/Missing"}),
            &root,
            false,
            &mut sink,
        )
        .unwrap_err();
        assert!(matches!(err, GenerateError::UnresolvedRef { reference, .. } if reference == "Missing"));
    }

    #[test]
    fn test_date_time_overrides_primitive() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "string", "format": "date-time"}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::DateTime);
    }

    #[test]
    fn test_date_time_never_overrides_ref() {
        let root = components(json!({"Note": {"properties": {}}}));
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"$ref": "#/components/schemas/Note", "format": "date-time"}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::Named("Note".into()));
    }

    #[test]
    fn test_array_without_items_degrades() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(json!({"type": "array"}), &root, false, &mut sink).unwrap();
        assert_eq!(ty, CsType::List(Box::new(CsType::Json)));
    }

    #[test]
    fn test_item_type_synthesis() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "array", "items": {"properties": {"id": {"type": "string"}}}}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::List(Box::new(CsType::Named("VisibilityItemType".into()))));
        assert_eq!(sink.nested.len(), 1);
        assert_eq!(sink.nested[0].name, "VisibilityItemType");
        assert_eq!(sink.nested[0].members[0].ident, "Id");
    }

    #[test]
    fn test_object_synthesis_uses_owner_and_member() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "object", "properties": {"count": {"type": "integer"}}}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            ty,
            CsType::Named("NotesCreateVisibilityObject".into())
        );
        assert_eq!(sink.nested[0].members[0].ty, CsType::Int);
    }

    #[test]
    fn test_two_dimensional_array() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "array", "items": {"type": "array", "items": {"type": "integer"}}}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(
            ty,
            CsType::List(Box::new(CsType::List(Box::new(CsType::Int))))
        );
    }

    #[test]
    fn test_client_enum_short_circuit() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "string", "enum": ["public", "home"]}),
            &root,
            true,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::Named("NotesCreateVisibilityEnum".into()));
        assert_eq!(
            sink.enums.get("NotesCreateVisibilityEnum").unwrap(),
            &vec!["public".to_string(), "home".to_string()]
        );
    }

    #[test]
    fn test_enum_ignored_for_model_members() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"type": "string", "enum": ["public", "home"]}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::String);
        assert!(sink.enums.is_empty());
    }

    #[test]
    fn test_binary_upload_for_client_args_only() {
        let root = ComponentMap::new();
        let mut sink = TypeSink::default();
        let arg = resolve(
            json!({"type": "string", "format": "binary"}),
            &root,
            true,
            &mut sink,
        )
        .unwrap();
        assert_eq!(arg, CsType::Stream);

        let member = resolve(
            json!({"type": "string", "format": "binary"}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(member, CsType::String);
    }

    #[test]
    fn test_single_union_branch_unwrap() {
        let root = components(json!({"Note": {"properties": {}}}));
        let mut sink = TypeSink::default();
        let ty = resolve(
            json!({"anyOf": [{"$ref": "#/components/schemas/Note"}, {"type": "null"}]}),
            &root,
            false,
            &mut sink,
        )
        .unwrap();
        assert_eq!(ty, CsType::Nullable(Box::new(CsType::Named("Note".into()))));
    }

    #[test]
    fn test_flatten_first_seen_wins() {
        let root = components(json!({
            "A": {"oneOf": [
                {"$ref": "#/components/schemas/B"},
                {"$ref": "#/components/schemas/C"}
            ]},
            "B": {"properties": {"x": {"type": "string"}, "y": {"type": "integer"}}},
            "C": {"properties": {"y": {"type": "string"}, "z": {"type": "boolean"}}}
        }));
        let flat = flatten_properties(Some("A"), &root["A"], &root).unwrap();
        let keys: Vec<_> = flat.keys().collect();
        assert_eq!(keys, ["x", "y", "z"]);
        // B's y wins over C's y.
        assert_eq!(flat["y"].base_type(), Some("integer"));
    }

    #[test]
    fn test_flatten_recurses_through_composed_refs() {
        let root = components(json!({
            "A": {"oneOf": [{"$ref": "#/components/schemas/B"}]},
            "B": {"allOf": [{"$ref": "#/components/schemas/C"}]},
            "C": {"properties": {"x": {"type": "string"}}}
        }));
        let flat = flatten_properties(Some("A"), &root["A"], &root).unwrap();
        assert!(flat.contains_key("x"));
    }

    #[test]
    fn test_flatten_skips_non_ref_branches() {
        let root = components(json!({
            "A": {"oneOf": [{"type": "string"}, {"$ref": "#/components/schemas/B"}]},
            "B": {"properties": {"x": {"type": "string"}}}
        }));
        let flat = flatten_properties(Some("A"), &root["A"], &root).unwrap();
        assert_eq!(flat.len(), 1);
    }

    #[test]
    fn test_flatten_self_cycle_is_fatal() {
        let root = components(json!({
            "A": {"oneOf": [{"$ref": "#/components/schemas/A"}]}
        }));
        let err = flatten_properties(Some("A"), &root["A"], &root).unwrap_err();
        assert!(matches!(err, GenerateError::CompositionCycle { component } if component == "A"));
    }

    #[test]
    fn test_flatten_mutual_cycle_is_fatal() {
        let root = components(json!({
            "A": {"oneOf": [{"$ref": "#/components/schemas/B"}]},
            "B": {"oneOf": [{"$ref": "#/components/schemas/A"}]}
        }));
        let err = flatten_properties(Some("A"), &root["A"], &root).unwrap_err();
        assert!(matches!(err, GenerateError::CompositionCycle { .. }));
    }

    #[test]
    fn test_flatten_diamond_is_not_a_cycle() {
        let root = components(json!({
            "A": {"oneOf": [
                {"$ref": "#/components/schemas/B"},
                {"$ref": "#/components/schemas/C"}
            ]},
            "B": {"oneOf": [{"$ref": "#/components/schemas/D"}]},
            "C": {"oneOf": [{"$ref": "#/components/schemas/D"}]},
            "D": {"properties": {"x": {"type": "string"}}}
        }));
        let flat = flatten_properties(Some("A"), &root["A"], &root).unwrap();
        assert!(flat.contains_key("x"));
    }

    #[test]
    fn test_flatten_unresolved_branch_ref() {
        let root = components(json!({
            "A": {"oneOf": [{"$ref": "#/components/schemas/Gone"}]}
        }));
        let err = flatten_properties(Some("A"), &root["A"], &root).unwrap_err();
        assert!(matches!(err, GenerateError::UnresolvedRef { reference, .. } if reference == "Gone"));
    }

    fn doc(value: serde_json::Value) -> SchemaDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_grouping_and_subgrouping() {
        let document = doc(json!({
            "paths": {
                "/notes/create": {"post": {"operationId": "notes/create", "responses": {}}},
                "/notes/show": {"post": {"operationId": "notes/show", "responses": {}}},
                "/notes/reactions/create": {"post": {"operationId": "notes/reactions/create", "responses": {}}}
            }
        }));
        let groups = group_operations(&document, &GeneratorConfig::default());
        assert_eq!(groups.len(), 1);
        let notes = &groups[0];
        assert_eq!(notes.key, "notes");
        // 3-segment operation appears only in the sub-group.
        assert_eq!(notes.direct.len(), 2);
        assert_eq!(notes.subgroups.len(), 1);
        let reactions = &notes.subgroups["reactions"];
        assert_eq!(reactions.len(), 1);
        assert_eq!(reactions[0].segments.last().unwrap(), "create");
    }

    #[test]
    fn test_group_denylist_excluded() {
        let document = doc(json!({
            "paths": {
                "/admin/accounts/create": {"post": {"operationId": "admin/accounts/create", "responses": {}}},
                "/notes/create": {"post": {"operationId": "notes/create", "responses": {}}}
            }
        }));
        let groups = group_operations(&document, &GeneratorConfig::default());
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].key, "notes");
    }

    #[test]
    fn test_response_shapes() {
        let document = doc(json!({
            "paths": {
                "/notes/show": {"post": {
                    "operationId": "notes/show",
                    "responses": {"200": {"content": {"application/json": {"schema": {"$ref": "#/components/schemas/Note"}}}}}
                }},
                "/notes/delete": {"post": {
                    "operationId": "notes/delete",
                    "security": [{"bearerAuth": []}],
                    "responses": {"204": {"description": "No Content"}}
                }},
                "/notes/search": {"post": {
                    "operationId": "notes/search",
                    "responses": {"200": {"content": {"application/json": {"schema": {"type": "array", "items": {"$ref": "#/components/schemas/Note"}}}}}}
                }}
            }
        }));
        let groups = group_operations(&document, &GeneratorConfig::default());
        let ops = &groups[0].direct;
        assert!(matches!(&ops[0].response, ResponseShape::Model(name) if name == "Note"));
        assert!(!ops[0].auth);
        assert!(matches!(ops[1].response, ResponseShape::NoContent(204)));
        assert!(ops[1].auth);
        assert!(matches!(ops[2].response, ResponseShape::ListOf(_)));
    }

    #[test]
    fn test_legacy_dialect_flags() {
        let legacy = Dialect {
            nullable_type_arrays: false,
            legacy_optional_flags: true,
            logical_name_from_summary: false,
        };
        let p = prop(json!({"type": "string", "nullable": true}));
        assert!(is_nullable(&p, legacy));
        assert!(!is_nullable(&p, Dialect::default()));

        let arrayed = prop(json!({"type": ["string", "null"]}));
        assert!(!is_nullable(&arrayed, legacy));
        assert!(is_nullable(&arrayed, Dialect::default()));
    }
}
