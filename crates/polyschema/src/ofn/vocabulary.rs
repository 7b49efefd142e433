//! XSD datatypes used as OFN property ranges.
//!
//! Both `xsd:string` and the full namespace IRI resolve to the same entry.

use crate::universal::{Type, UniversalFormat as F, UniversalType as U};
use crate::vocabulary::{CaseRule, Vocabulary, entry};

pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";
pub const XSD_PREFIX: &str = "xsd:";

fn xsd_local(token: &str) -> &str {
    token
        .strip_prefix(XSD_NAMESPACE)
        .or_else(|| token.strip_prefix(XSD_PREFIX))
        .unwrap_or(token)
}

pub static OFN_VOCABULARY: Vocabulary = Vocabulary {
    entries: &[
        entry("string", U::String, None),
        entry("anyURI", U::String, Some(F::Uri)),
        entry("time", U::String, Some(F::Time)),
        entry("integer", U::Number, None),
        entry("int", U::Number, None),
        entry("long", U::Number, Some(F::Long)),
        entry("short", U::Number, Some(F::Short)),
        entry("byte", U::Number, Some(F::Byte)),
        entry("decimal", U::Number, Some(F::Decimal)),
        entry("double", U::Number, Some(F::Double)),
        entry("float", U::Number, Some(F::Float)),
        entry("boolean", U::Boolean, None),
        entry("date", U::Date, None),
        entry("dateTime", U::Datetime, None),
        entry("dateTimeStamp", U::Datetime, None),
        entry("base64Binary", U::String, Some(F::Binary)),
    ],
    case: CaseRule::Exact,
    base_of: xsd_local,
    default_spelling: |ty| match ty {
        U::String | U::Other => "string",
        U::Number => "integer",
        U::Boolean => "boolean",
        U::Date => "date",
        U::Datetime => "dateTime",
    },
};

pub fn to_universal_type(token: &str) -> Type {
    OFN_VOCABULARY.to_universal_type(token)
}

/// Canonical `xsd:`-prefixed spelling.
pub fn from_universal_type(ty: &Type) -> String {
    prefixed(OFN_VOCABULARY.from_universal_type(ty), ty)
}

/// Range for output: the stored token when it is already an XSD spelling of
/// the same type, else the canonical one.
pub fn render(ty: &Type) -> String {
    prefixed(OFN_VOCABULARY.render(ty), ty)
}

fn prefixed(token: String, ty: &Type) -> String {
    if ty.universal_type == U::Other || token.contains(':') {
        token
    } else {
        format!("{XSD_PREFIX}{token}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_and_prefix_agree() {
        let short = to_universal_type("xsd:dateTime");
        let long = to_universal_type("http://www.w3.org/2001/XMLSchema#dateTime");
        assert_eq!(short.universal_type, U::Datetime);
        assert_eq!(long.universal_type, U::Datetime);
        assert_eq!(render(&long), "http://www.w3.org/2001/XMLSchema#dateTime");
    }

    #[test]
    fn foreign_types_get_prefix() {
        assert_eq!(from_universal_type(&Type::new("VARCHAR(20)", U::String, None)), "xsd:string");
        assert_eq!(render(&Type::new("BigDecimal", U::Number, Some(F::Decimal))), "xsd:decimal");
        assert_eq!(render(&Type::other("https://example.org/Money")), "https://example.org/Money");
    }
}
