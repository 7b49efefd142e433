//! Type names seen in class diagrams. Diagrams borrow from several
//! languages, so both `Long` and `long` are native spellings.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry, strip_generics};

pub static PLANTUML_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("String", U::String, None),
        entry("string", U::String, None),
        entry("char", U::String, None),
        entry("UUID", U::String, Some(F::Uuid)),
        entry("Time", U::String, Some(F::Time)),
        entry("int", U::Number, None),
        entry("Integer", U::Number, None),
        entry("integer", U::Number, None),
        entry("long", U::Number, Some(F::Long)),
        entry("Long", U::Number, Some(F::Long)),
        entry("short", U::Number, Some(F::Short)),
        entry("float", U::Number, Some(F::Float)),
        entry("double", U::Number, Some(F::Double)),
        entry("Double", U::Number, Some(F::Double)),
        entry("decimal", U::Number, Some(F::Decimal)),
        entry("BigDecimal", U::Number, Some(F::Decimal)),
        entry("boolean", U::Boolean, None),
        entry("Boolean", U::Boolean, None),
        entry("bool", U::Boolean, None),
        entry("Date", U::Date, None),
        entry("LocalDate", U::Date, None),
        entry("DateTime", U::Datetime, None),
        entry("LocalDateTime", U::Datetime, None),
        entry("Instant", U::Datetime, None),
    ],
    case: CaseRule::Exact,
    base_of: strip_generics,
    default_spelling: |ty| match ty {
        U::String => "String",
        U::Number => "int",
        U::Boolean => "boolean",
        U::Date => "Date",
        U::Datetime => "DateTime",
        U::Other => "Object",
    },
};

pub fn to_universal_type(token: &str) -> Type {
    PLANTUML_VOCABULARY.to_universal_type(token)
}

pub fn from_universal_type(ty: &Type) -> String {
    PLANTUML_VOCABULARY.from_universal_type(ty)
}
