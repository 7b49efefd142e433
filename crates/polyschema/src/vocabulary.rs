//! Type vocabularies: native type tokens ↔ universal type + format.
//!
//! Each domain declares one `static` [`Vocabulary`] and wraps it in two free
//! functions, `to_universal_type` and `from_universal_type`.

use crate::universal::{Type, UniversalFormat, UniversalType};

/// How tokens are compared against table entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRule {
    Exact,
    IgnoreAsciiCase,
}

/// One row of a vocabulary table. `name` is the canonical spelling.
#[derive(Debug, Clone, Copy)]
pub struct VocabEntry {
    pub name: &'static str,
    pub universal_type: UniversalType,
    pub format: Option<UniversalFormat>,
}

/// Shorthand for building vocabulary tables.
pub const fn entry(
    name: &'static str,
    universal_type: UniversalType,
    format: Option<UniversalFormat>,
) -> VocabEntry {
    VocabEntry {
        name,
        universal_type,
        format,
    }
}

/// A static lookup table with its lookup rules.
pub struct Vocabulary {
    pub entries: &'static [VocabEntry],
    pub case: CaseRule,
    /// Reduce a full token (`VARCHAR(255)`, `List<String>`) to its base for lookup.
    pub base_of: fn(&str) -> &str,
    /// Spelling used when no entry matches the requested universal type and format.
    pub default_spelling: fn(UniversalType) -> &'static str,
}

impl Vocabulary {
    fn matches(&self, entry: &VocabEntry, base: &str) -> bool {
        match self.case {
            CaseRule::Exact => entry.name == base,
            CaseRule::IgnoreAsciiCase => entry.name.eq_ignore_ascii_case(base),
        }
    }

    /// Look up the table entry for a token, if any.
    pub fn lookup(&self, token: &str) -> Option<&'static VocabEntry> {
        let base = (self.base_of)(token.trim());
        self.entries.iter().find(|e| self.matches(e, base))
    }

    /// Map a native token to a universal [`Type`].
    ///
    /// Unknown tokens become [`UniversalType::Other`]; the full token is always
    /// kept in `domain_specific_type`.
    pub fn to_universal_type(&self, token: &str) -> Type {
        let token = token.trim();
        match self.lookup(token) {
            Some(e) => Type::new(token, e.universal_type, e.format),
            None => Type::other(token),
        }
    }

    /// Canonical native spelling of a universal [`Type`].
    ///
    /// `Other` returns the domain-specific token unchanged; otherwise the first
    /// entry with the same type and format wins, then the first entry with the
    /// same type and no format, then the domain default.
    pub fn from_universal_type(&self, ty: &Type) -> String {
        if ty.universal_type == UniversalType::Other {
            return ty.domain_specific_type.clone();
        }
        self.entries
            .iter()
            .find(|e| e.universal_type == ty.universal_type && e.format == ty.format)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|e| e.universal_type == ty.universal_type && e.format.is_none())
            })
            .map(|e| e.name)
            .unwrap_or_else(|| (self.default_spelling)(ty.universal_type))
            .to_string()
    }

    /// The stored token, when it is already this domain's exact spelling of the
    /// same type and format.
    pub fn native_spelling(&self, ty: &Type) -> Option<String> {
        if ty.universal_type == UniversalType::Other {
            return None;
        }
        let token = ty.domain_specific_type.trim();
        let base = (self.base_of)(token);
        self.entries
            .iter()
            .any(|e| {
                e.name == base && e.universal_type == ty.universal_type && e.format == ty.format
            })
            .then(|| token.to_string())
    }

    /// Spelling for output: the native token when it fits, else the canonical one.
    pub fn render(&self, ty: &Type) -> String {
        self.native_spelling(ty)
            .unwrap_or_else(|| self.from_universal_type(ty))
    }
}

/// Strip a trailing parameter list: `VARCHAR(255)` → `VARCHAR`.
pub fn strip_parens(token: &str) -> &str {
    token.split('(').next().unwrap_or(token).trim()
}

/// Strip generics, array brackets and nullability: `List<String>` → `List`.
pub fn strip_generics(token: &str) -> &str {
    token
        .split(['<', '[', '?'])
        .next()
        .unwrap_or(token)
        .trim()
}

pub fn no_strip(token: &str) -> &str {
    token
}

#[cfg(test)]
mod tests {
    use super::*;
    use UniversalFormat as F;
    use UniversalType as U;

    static TEST_VOCAB: Vocabulary = Vocabulary {
        entries: &[
            entry("INT", U::Number, None),
            entry("INTEGER", U::Number, None),
            entry("BIGINT", U::Number, Some(F::Long)),
            entry("VARCHAR", U::String, None),
        ],
        case: CaseRule::IgnoreAsciiCase,
        base_of: strip_parens,
        default_spelling: |_| "TEXT",
    };

    #[test]
    fn unknown_token_is_preserved() {
        let ty = TEST_VOCAB.to_universal_type("FrobnicatorXYZ");
        assert_eq!(ty, Type::other("FrobnicatorXYZ"));
        assert_eq!(TEST_VOCAB.from_universal_type(&ty), "FrobnicatorXYZ");
    }

    #[test]
    fn parameters_stripped_for_lookup_only() {
        let ty = TEST_VOCAB.to_universal_type("varchar(255)");
        assert_eq!(ty.universal_type, U::String);
        assert_eq!(ty.domain_specific_type, "varchar(255)");
    }

    #[test]
    fn first_table_entry_wins() {
        let ty = TEST_VOCAB.to_universal_type("integer");
        assert_eq!(TEST_VOCAB.from_universal_type(&ty), "INT");
        assert_eq!(
            TEST_VOCAB.from_universal_type(&Type::new("long", U::Number, Some(F::Long))),
            "BIGINT"
        );
    }

    #[test]
    fn format_mismatch_falls_back() {
        let ty = Type::new("double", U::Number, Some(F::Double));
        assert_eq!(TEST_VOCAB.from_universal_type(&ty), "INT");
        let ty = Type::new("x", U::Date, None);
        assert_eq!(TEST_VOCAB.from_universal_type(&ty), "TEXT");
    }

    #[test]
    fn render_keeps_native_spelling() {
        let ty = TEST_VOCAB.to_universal_type("VARCHAR(255)");
        assert_eq!(TEST_VOCAB.render(&ty), "VARCHAR(255)");
        // lowercase is not the canonical spelling
        let ty = TEST_VOCAB.to_universal_type("integer");
        assert_eq!(TEST_VOCAB.render(&ty), "INT");
    }
}
