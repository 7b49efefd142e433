//! Java types. Primitives come before their boxed forms, so `int` is the
//! canonical spelling of a plain number.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry, strip_generics};

pub static JAVA_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("String", U::String, None),
        entry("char", U::String, None),
        entry("Character", U::String, None),
        entry("CharSequence", U::String, None),
        entry("UUID", U::String, Some(F::Uuid)),
        entry("URI", U::String, Some(F::Uri)),
        entry("URL", U::String, Some(F::Uri)),
        entry("LocalTime", U::String, Some(F::Time)),
        entry("int", U::Number, None),
        entry("Integer", U::Number, None),
        entry("long", U::Number, Some(F::Long)),
        entry("Long", U::Number, Some(F::Long)),
        entry("short", U::Number, Some(F::Short)),
        entry("Short", U::Number, Some(F::Short)),
        entry("byte", U::Number, Some(F::Byte)),
        entry("Byte", U::Number, Some(F::Byte)),
        entry("float", U::Number, Some(F::Float)),
        entry("Float", U::Number, Some(F::Float)),
        entry("double", U::Number, Some(F::Double)),
        entry("Double", U::Number, Some(F::Double)),
        entry("BigDecimal", U::Number, Some(F::Decimal)),
        entry("BigInteger", U::Number, None),
        entry("boolean", U::Boolean, None),
        entry("Boolean", U::Boolean, None),
        entry("LocalDate", U::Date, None),
        entry("LocalDateTime", U::Datetime, None),
        entry("Instant", U::Datetime, None),
        entry("ZonedDateTime", U::Datetime, None),
        entry("OffsetDateTime", U::Datetime, None),
        entry("Date", U::Datetime, None),
        entry("Timestamp", U::Datetime, None),
    ],
    case: CaseRule::IgnoreAsciiCase,
    base_of: strip_generics,
    default_spelling: |ty| match ty {
        U::String => "String",
        U::Number => "int",
        U::Boolean => "boolean",
        U::Date => "LocalDate",
        U::Datetime => "LocalDateTime",
        U::Other => "Object",
    },
};

pub fn to_universal_type(token: &str) -> Type {
    JAVA_VOCABULARY.to_universal_type(token)
}

pub fn from_universal_type(ty: &Type) -> String {
    JAVA_VOCABULARY.from_universal_type(ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxed_and_primitive_share_buckets() {
        assert_eq!(to_universal_type("Long").format, Some(F::Long));
        assert_eq!(to_universal_type("long").format, Some(F::Long));
        assert_eq!(to_universal_type("Boolean").universal_type, U::Boolean);
        assert_eq!(to_universal_type("Post").universal_type, U::Other);
    }

    #[test]
    fn canonical_spellings() {
        assert_eq!(from_universal_type(&Type::new("INT", U::Number, None)), "int");
        assert_eq!(from_universal_type(&Type::new("DECIMAL(10,2)", U::Number, Some(F::Decimal))), "BigDecimal");
        assert_eq!(from_universal_type(&Type::new("email", U::String, Some(F::Email))), "String");
        assert_eq!(from_universal_type(&Type::other("List<Post>")), "List<Post>");
    }

    #[test]
    fn native_spelling_survives() {
        let ty = to_universal_type("Long");
        assert_eq!(JAVA_VOCABULARY.render(&ty), "Long");
    }
}
