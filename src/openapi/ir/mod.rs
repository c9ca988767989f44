//! Intermediate representation for schema-to-C# code generation.
//!
//! This module defines a three-layer architecture:
//! 1. API-level IR: normalized operations, groups, response shapes
//! 2. C# AST IR: types, classes, methods, enums, modules
//! 3. Emission: AST to source strings via the `Emit` trait
//!
//! The separation keeps every schema corner case in normalization, makes the
//! generation decisions testable as structured values, and leaves emission as
//! purely mechanical string building.
//!
//! ## Module structure
//!
//! - `utils`: identifier normalization shared across layers
//! - `types`: C# AST IR (`CsType`, `ClassDef`, `MethodDef`, `Module`)
//! - `api`: API-level IR (`OperationIR`, `GroupIR`, `ResponseShape`)
//! - `normalize`: schema document -> API IR (type resolver, union flattener,
//!   operation grouping)
//! - `codegen`: API IR -> C# AST (model and client emitters)
//! - `emit`: C# AST -> source strings (via the `Emit` trait)

pub mod api;
pub mod codegen;
pub mod emit;
pub mod normalize;
pub mod types;
pub mod utils;

pub use codegen::{api_root_file, client_file, model_file};
pub use emit::Emit;
pub use normalize::group_operations;
