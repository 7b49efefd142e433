//! C# types: keywords first, then the CLR names that have no keyword.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry, strip_generics};

pub static CSHARP_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("string", U::String, None),
        entry("char", U::String, None),
        entry("Guid", U::String, Some(F::Uuid)),
        entry("Uri", U::String, Some(F::Uri)),
        entry("TimeOnly", U::String, Some(F::Time)),
        entry("TimeSpan", U::String, Some(F::Time)),
        entry("int", U::Number, None),
        entry("Int32", U::Number, None),
        entry("uint", U::Number, None),
        entry("long", U::Number, Some(F::Long)),
        entry("Int64", U::Number, Some(F::Long)),
        entry("ulong", U::Number, Some(F::Long)),
        entry("short", U::Number, Some(F::Short)),
        entry("Int16", U::Number, Some(F::Short)),
        entry("byte", U::Number, Some(F::Byte)),
        entry("sbyte", U::Number, Some(F::Byte)),
        entry("float", U::Number, Some(F::Float)),
        entry("Single", U::Number, Some(F::Float)),
        entry("double", U::Number, Some(F::Double)),
        entry("decimal", U::Number, Some(F::Decimal)),
        entry("bool", U::Boolean, None),
        entry("DateOnly", U::Date, None),
        entry("DateTime", U::Datetime, None),
        entry("DateTimeOffset", U::Datetime, None),
    ],
    case: CaseRule::IgnoreAsciiCase,
    base_of: strip_generics,
    default_spelling: |ty| match ty {
        U::String => "string",
        U::Number => "int",
        U::Boolean => "bool",
        U::Date => "DateOnly",
        U::Datetime => "DateTime",
        U::Other => "object",
    },
};

pub fn to_universal_type(token: &str) -> Type {
    CSHARP_VOCABULARY.to_universal_type(token)
}

pub fn from_universal_type(ty: &Type) -> String {
    CSHARP_VOCABULARY.from_universal_type(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_and_clr_names() {
        assert_eq!(to_universal_type("decimal").format, Some(F::Decimal));
        assert_eq!(to_universal_type("Int64").format, Some(F::Long));
        assert_eq!(to_universal_type("Guid").format, Some(F::Uuid));
        assert_eq!(to_universal_type("ICollection<Post>").universal_type, U::Other);
    }

    #[test]
    fn foreign_spellings_become_keywords() {
        assert_eq!(from_universal_type(&Type::new("String", U::String, None)), "string");
        assert_eq!(from_universal_type(&Type::new("BIGINT", U::Number, Some(F::Long))), "long");
        assert_eq!(from_universal_type(&Type::new("boolean", U::Boolean, None)), "bool");
        assert_eq!(from_universal_type(&Type::new("TIMESTAMP", U::Datetime, None)), "DateTime");
    }
}
