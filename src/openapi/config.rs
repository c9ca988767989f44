//! Generator configuration.

use serde::Deserialize;

/// Configuration for one generation run.
///
/// Defaults match the upstream API surface the generator was built against;
/// every knob can be overridden from a JSON config file or the CLI.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Namespace the model types are emitted into.
    pub model_namespace: String,
    /// Namespace the client classes are emitted into.
    pub client_namespace: String,
    /// Type of the runtime handle the client classes call through.
    pub app_type: String,
    /// Top-level operation groups excluded from generation entirely.
    pub excluded_groups: Vec<String>,
    /// Component names excluded from model generation (known-broken entries).
    pub excluded_components: Vec<String>,
    /// Cursor-pagination parameter names that are always forced to a
    /// nullable argument with a `null` default, regardless of schema.
    pub cursor_params: Vec<String>,
    pub dialect: Dialect,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model_namespace: "ApiClient.Model".to_string(),
            client_namespace: "ApiClient.Controls".to_string(),
            app_type: "ApiClient.App".to_string(),
            excluded_groups: vec!["admin".to_string(), "charts".to_string()],
            excluded_components: Vec::new(),
            cursor_params: vec![
                "untilId".to_string(),
                "sinceId".to_string(),
                "untilDate".to_string(),
                "sinceDate".to_string(),
            ],
            dialect: Dialect::default(),
        }
    }
}

/// Schema-dialect capability flags.
///
/// One implementation serves every dialect revision of the upstream schema
/// format; these flags select the behaviors that changed between revisions
/// instead of maintaining parallel code paths.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dialect {
    /// The dialect expresses nullability as a 2-element `[T, "null"]` type
    /// array.
    pub nullable_type_arrays: bool,
    /// The dialect carries boolean `nullable` / `optional` property flags
    /// (earliest revision only).
    pub legacy_optional_flags: bool,
    /// Logical operation names come from `summary` instead of `operationId`.
    pub logical_name_from_summary: bool,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            nullable_type_arrays: true,
            legacy_optional_flags: false,
            logical_name_from_summary: false,
        }
    }
}
