//! JSON Schema types.
//!
//! A token is either a `type` keyword (`integer`) or a `format` the table
//! knows (`date-time`). [`split_token`] turns a token back into the pair.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry, no_strip};

pub static JSON_SCHEMA_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("string", U::String, None),
        entry("date-time", U::Datetime, None),
        entry("date", U::Date, None),
        entry("time", U::String, Some(F::Time)),
        entry("uri", U::String, Some(F::Uri)),
        entry("email", U::String, Some(F::Email)),
        entry("uuid", U::String, Some(F::Uuid)),
        entry("binary", U::String, Some(F::Binary)),
        entry("integer", U::Number, None),
        entry("int64", U::Number, Some(F::Long)),
        entry("number", U::Number, Some(F::Double)),
        entry("double", U::Number, Some(F::Double)),
        entry("float", U::Number, Some(F::Float)),
        entry("decimal", U::Number, Some(F::Decimal)),
        entry("boolean", U::Boolean, None),
    ],
    case: CaseRule::Exact,
    base_of: no_strip,
    default_spelling: |ty| match ty {
        U::String | U::Other => "string",
        U::Number => "integer",
        U::Boolean => "boolean",
        U::Date => "date",
        U::Datetime => "date-time",
    },
};

/// The vocabulary token for a `type`/`format` pair. A format the table does
/// not know is not part of the token.
pub fn token_of<'a>(ty: &'a str, format: Option<&'a str>) -> &'a str {
    match format {
        Some(f) if JSON_SCHEMA_VOCABULARY.lookup(f).is_some() => f,
        _ => ty,
    }
}

/// Inverse of [`token_of`]: `date-time` gives `("string", Some("date-time"))`.
pub fn split_token(token: &str) -> (&str, Option<&str>) {
    match token {
        "date-time" | "date" | "time" | "uri" | "email" | "uuid" | "binary" => ("string", Some(token)),
        "int64" => ("integer", Some(token)),
        "double" | "float" | "decimal" => ("number", Some(token)),
        _ => (token, None),
    }
}

pub fn to_universal_type(token: &str) -> Type {
    JSON_SCHEMA_VOCABULARY.to_universal_type(token)
}

pub fn from_universal_type(ty: &Type) -> String {
    JSON_SCHEMA_VOCABULARY.from_universal_type(ty)
}
