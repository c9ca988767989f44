//! Schema document to C# client code generator.
//!
//! This module parses an OpenAPI-style schema document and generates C# code
//! with:
//! - One model class per named component schema
//! - One client class per top-level operation group (plus nested sub-group
//!   classes), with one typed method per operation
//! - An api-root index aggregating the group classes
//!
//! The pipeline is:
//! 1. Parse: JSON -> `SchemaDocument`
//! 2. Normalize: document -> API IR (grouping, response shapes, type
//!    resolution)
//! 3. Codegen: API IR -> C# AST
//! 4. Emit: AST -> source strings (via the `Emit` trait)

mod config;
mod error;
mod generator;
pub mod ir;
mod spec;
mod writer;

pub use config::{Dialect, GeneratorConfig};
pub use error::{GenerateError, UnitFailure};
pub use generator::{GeneratedFile, Generation, generate};
pub use writer::write_files;
