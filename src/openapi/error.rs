//! Error taxonomy for schema-to-client generation.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while generating client code from a schema document.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The document failed to deserialize at all. Fatal for the whole run.
    #[error("failed to parse schema document: {0}")]
    Parse(#[from] serde_json::Error),

    /// A `$ref` points at a component that does not exist. Fatal for the
    /// emission unit that contains the reference only.
    #[error("unresolved reference '{reference}' in {context}")]
    UnresolvedRef { reference: String, context: String },

    /// A `oneOf`/`allOf` chain references back into itself. Fatal for the
    /// component being flattened only.
    #[error("composition cycle through component '{component}'")]
    CompositionCycle { component: String },

    /// Writing a generated file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A non-fatal failure scoped to one emission unit (one component or one
/// operation); the rest of the run continues.
#[derive(Debug)]
pub struct UnitFailure {
    /// Human-readable unit description, e.g. `component Note` or
    /// `operation notes/show`.
    pub unit: String,
    pub error: GenerateError,
}
