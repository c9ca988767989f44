//! Top-level generation drive.
//!
//! One call runs the whole transform: parse the document, emit one model per
//! component, one client module per operation group, and the api-root index.
//! Unit-scoped failures (unresolved refs, composition cycles) are collected
//! and reported alongside the generated files; only a parse failure aborts
//! the run.

use tracing::{debug, warn};

use super::config::GeneratorConfig;
use super::error::{GenerateError, UnitFailure};
use super::ir::{Emit, api_root_file, client_file, group_operations, model_file};
use super::ir::utils::{pascal_case, sanitize_identifier};
use super::spec::{ComponentMap, SchemaDocument};

/// One generated source file: an output-relative path and its content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub source: String,
}

/// Result of one generation run.
#[derive(Debug)]
pub struct Generation {
    pub files: Vec<GeneratedFile>,
    /// Units that failed and were skipped; the run itself still succeeded.
    pub failures: Vec<UnitFailure>,
}

/// Generate the full client library from a schema document JSON string.
pub fn generate(json: &str, config: &GeneratorConfig) -> Result<Generation, GenerateError> {
    let doc = SchemaDocument::from_json(json)?;
    let mut files = Vec::new();
    let mut failures = Vec::new();

    let empty = ComponentMap::new();
    let root = doc.schemas().unwrap_or(&empty);

    for (name, component) in root {
        if config.excluded_components.iter().any(|c| c == name) {
            continue;
        }
        match model_file(name, component, root, config) {
            Ok(module) => {
                let path = format!("Models/{}.cs", sanitize_identifier(name));
                debug!(%path, "model generated");
                files.push(GeneratedFile {
                    path,
                    source: module.emit(),
                });
            }
            Err(error) => {
                warn!(component = name.as_str(), %error, "skipping component");
                failures.push(UnitFailure {
                    unit: format!("component {name}"),
                    error,
                });
            }
        }
    }

    let groups = group_operations(&doc, config);
    let mut group_classes = Vec::new();
    for group in &groups {
        let (module, mut group_failures) = client_file(group, root, config);
        for failure in &group_failures {
            warn!(unit = failure.unit.as_str(), error = %failure.error, "skipping operation");
        }
        failures.append(&mut group_failures);
        let class_name = format!("{}Api", pascal_case(&group.key));
        let path = format!("Controls/{class_name}.cs");
        debug!(%path, "client group generated");
        files.push(GeneratedFile {
            path,
            source: module.emit(),
        });
        group_classes.push(class_name);
    }

    if !group_classes.is_empty() {
        files.push(GeneratedFile {
            path: "Apps.cs".to_string(),
            source: api_root_file(group_classes, config).emit(),
        });
    }

    debug!(
        files = files.len(),
        failures = failures.len(),
        "generation complete"
    );
    Ok(Generation { files, failures })
}
