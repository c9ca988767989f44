//! Identifier normalization for C# code generation.
//!
//! This module provides the naming helpers shared across normalization and
//! emission: pascal-casing of schema identifiers, enum-value escaping, and
//! reserved-word handling for generated argument names.

use std::collections::HashSet;
use std::sync::LazyLock;

/// C# reserved words that cannot be used as plain identifiers.
pub static CS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
        "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
        "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
        "void", "volatile", "while",
    ]
    .into_iter()
    .collect()
});

/// Convert a schema identifier to PascalCase.
///
/// The first lowercase letter of every letter run is upper-cased (a letter run
/// starts at the beginning of the string or after any non-letter character,
/// per Unicode letter categories), and interior `-` separators are removed.
///
/// Idempotent: `pascal_case(pascal_case(x)) == pascal_case(x)`.
pub fn pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c != '-' {
            if c.is_lowercase() && prev.map_or(true, |p| !p.is_alphabetic()) {
                out.extend(c.to_uppercase());
            } else {
                out.push(c);
            }
        }
        prev = Some(c);
    }
    out
}

/// Turn a string enum value into a valid member identifier.
///
/// A leading `+`/`-` becomes `Plus`/`Minus`, then the value is pascal-cased
/// (which strips interior `-`), then `@` becomes `At`. Handles signed or
/// numeric-looking values: `"-5"` → `"Minus5"`, `"+1"` → `"Plus1"`.
pub fn sanitize_enum_value(v: &str) -> String {
    let prefixed = match v.as_bytes().first() {
        Some(b'+') => format!("Plus{}", &v[1..]),
        Some(b'-') => format!("Minus{}", &v[1..]),
        _ => v.to_string(),
    };
    pascal_case(&prefixed).replace('@', "At")
}

/// Prefix an identifier with `_` when it starts with a digit.
pub fn sanitize_identifier(name: &str) -> String {
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        format!("_{name}")
    } else {
        name.to_string()
    }
}

/// Make a schema property name usable as a generated method argument:
/// digit-leading names get a `_` prefix and reserved words get the C#
/// verbatim-identifier `@` prefix.
pub fn arg_identifier(name: &str) -> String {
    let ident = sanitize_identifier(name);
    if CS_RESERVED_WORDS.contains(ident.as_str()) {
        format!("@{ident}")
    } else {
        ident
    }
}

/// Escape a string for use inside a C# string literal.
pub fn escape_cs_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}
