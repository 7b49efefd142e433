//! LinkML built-in ranges.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry, no_strip};

pub static LINKML_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("string", U::String, None),
        entry("ncname", U::String, None),
        entry("uri", U::String, Some(F::Uri)),
        entry("uriorcurie", U::String, Some(F::Uri)),
        entry("time", U::String, Some(F::Time)),
        entry("integer", U::Number, None),
        entry("float", U::Number, Some(F::Float)),
        entry("double", U::Number, Some(F::Double)),
        entry("decimal", U::Number, Some(F::Decimal)),
        entry("boolean", U::Boolean, None),
        entry("date", U::Date, None),
        entry("datetime", U::Datetime, None),
    ],
    case: CaseRule::Exact,
    base_of: no_strip,
    default_spelling: |ty| match ty {
        U::String | U::Other => "string",
        U::Number => "integer",
        U::Boolean => "boolean",
        U::Date => "date",
        U::Datetime => "datetime",
    },
};

pub fn to_universal_type(token: &str) -> Type {
    LINKML_VOCABULARY.to_universal_type(token)
}

pub fn from_universal_type(ty: &Type) -> String {
    LINKML_VOCABULARY.from_universal_type(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranges_are_case_sensitive() {
        assert_eq!(to_universal_type("integer").universal_type, U::Number);
        assert_eq!(to_universal_type("Integer").universal_type, U::Other);
        assert_eq!(from_universal_type(&Type::new("BIGINT", U::Number, Some(F::Long))), "integer");
        assert_eq!(from_universal_type(&Type::new("Instant", U::Datetime, None)), "datetime");
    }
}
