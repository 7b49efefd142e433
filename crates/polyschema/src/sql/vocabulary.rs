//! SQL column types.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry, strip_parens};

pub static SQL_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("INT", U::Number, None),
        entry("INTEGER", U::Number, None),
        entry("SMALLINT", U::Number, Some(F::Short)),
        entry("TINYINT", U::Number, Some(F::Byte)),
        entry("BIGINT", U::Number, Some(F::Long)),
        entry("DECIMAL", U::Number, Some(F::Decimal)),
        entry("NUMERIC", U::Number, Some(F::Decimal)),
        entry("FLOAT", U::Number, Some(F::Float)),
        entry("REAL", U::Number, Some(F::Float)),
        entry("DOUBLE", U::Number, Some(F::Double)),
        entry("VARCHAR", U::String, None),
        entry("CHAR", U::String, None),
        entry("TEXT", U::String, None),
        entry("UUID", U::String, Some(F::Uuid)),
        entry("BLOB", U::String, Some(F::Binary)),
        entry("TIME", U::String, Some(F::Time)),
        entry("BOOLEAN", U::Boolean, None),
        entry("BOOL", U::Boolean, None),
        entry("DATE", U::Date, None),
        entry("DATETIME", U::Datetime, None),
        entry("TIMESTAMP", U::Datetime, None),
    ],
    case: CaseRule::IgnoreAsciiCase,
    base_of: strip_parens,
    default_spelling: |ty| match ty {
        U::String => "VARCHAR",
        U::Number => "INT",
        U::Boolean => "BOOLEAN",
        U::Date => "DATE",
        U::Datetime => "DATETIME",
        U::Other => "TEXT",
    },
};

/// Base types the parser accepts and the writer emits. `JSON` has no
/// universal bucket and travels as `Other`.
const SUPPORTED: &[&str] = &[
    "INT", "INTEGER", "SMALLINT", "BIGINT", "TINYINT", "DECIMAL", "NUMERIC", "FLOAT", "DOUBLE",
    "REAL", "VARCHAR", "CHAR", "TEXT", "BOOLEAN", "BOOL", "DATE", "DATETIME", "TIMESTAMP", "TIME",
    "UUID", "BLOB", "JSON",
];

pub fn is_supported(base: &str) -> bool {
    SUPPORTED.iter().any(|t| t.eq_ignore_ascii_case(base))
}

pub fn to_universal_type(token: &str) -> Type {
    SQL_VOCABULARY.to_universal_type(token)
}

pub fn from_universal_type(ty: &Type) -> String {
    SQL_VOCABULARY.from_universal_type(ty)
}
