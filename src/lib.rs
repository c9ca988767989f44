#![forbid(unsafe_code)]
#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro
)]

//! Generates a typed C# API client library from an OpenAPI-style schema
//! document: one model class per component schema, one client class per
//! operation group, wired to an assumed runtime call primitive.

pub mod openapi;

pub use openapi::{
    Dialect, GenerateError, GeneratedFile, Generation, GeneratorConfig, UnitFailure, generate,
    write_files,
};
