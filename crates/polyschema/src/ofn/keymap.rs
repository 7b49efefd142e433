//! Czech ↔ English key translation for OFN documents.
//!
//! Paths are flat at document level and `concepts.`-prefixed inside a
//! concept. Keys missing from the map pass through unchanged, so unknown
//! vocabulary extensions survive a round trip.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::LazyLock;

/// English internal path → Czech wire key.
pub static OFN_KEY_MAP: &[(&str, &str)] = &[
    ("@context", "@context"),
    ("iri", "iri"),
    ("type", "typ"),
    ("name", "název"),
    ("description", "popis"),
    ("created", "vytvořeno"),
    ("updated", "aktualizováno"),
    ("concepts", "pojmy"),
    ("concepts.iri", "iri"),
    ("concepts.type", "typ"),
    ("concepts.name", "název"),
    ("concepts.description", "popis"),
    ("concepts.definition", "definice"),
    ("concepts.alternativeNames", "alternativní-název"),
    ("concepts.subClassOf", "nadřazená-třída"),
    ("concepts.domain", "definiční-obor"),
    ("concepts.range", "obor-hodnot"),
    ("concepts.superProperty", "nadřazený-vztah"),
    ("concepts.equivalent", "ekvivalentní-pojem"),
];

const CONCEPT_PREFIX: &str = "concepts.";

/// Czech path (`pojmy.název`) → English local key (`name`).
static INVERSE: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    OFN_KEY_MAP
        .iter()
        .map(|(english, czech)| match english.strip_prefix(CONCEPT_PREFIX) {
            Some(local) => (format!("{CONCEPT_PREFIX}{czech}"), local),
            None => ((*czech).to_string(), *english),
        })
        .collect()
});

static FORWARD: LazyLock<HashMap<&'static str, &'static str>> =
    LazyLock::new(|| OFN_KEY_MAP.iter().copied().collect());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Document,
    Concept,
}

impl Scope {
    fn path(self, key: &str) -> String {
        match self {
            Self::Document => key.to_string(),
            Self::Concept => format!("{CONCEPT_PREFIX}{key}"),
        }
    }
}

/// Czech key → English key.
pub fn to_english(scope: Scope, key: &str) -> String {
    INVERSE
        .get(&scope.path(key))
        .map_or_else(|| key.to_string(), |k| (*k).to_string())
}

/// English key → Czech key.
pub fn to_czech(scope: Scope, key: &str) -> String {
    FORWARD
        .get(scope.path(key).as_str())
        .map_or_else(|| key.to_string(), |k| (*k).to_string())
}

/// Rename the keys of a whole document, concepts included.
pub fn translate_document(value: Value, rename: fn(Scope, &str) -> String) -> Value {
    let Value::Object(map) = value else {
        return value;
    };
    map.into_iter()
        .map(|(key, value)| {
            let key = rename(Scope::Document, &key);
            let value = if key == "concepts" || key == "pojmy" {
                translate_concepts(value, rename)
            } else {
                value
            };
            (key, value)
        })
        .collect::<Map<_, _>>()
        .into()
}

fn translate_concepts(value: Value, rename: fn(Scope, &str) -> String) -> Value {
    let Value::Array(items) = value else {
        return value;
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(key, value)| (rename(Scope::Concept, &key), value))
                    .collect(),
            ),
            other => other,
        })
        .collect::<Vec<_>>()
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scoped_lookup() {
        assert_eq!(to_english(Scope::Document, "název"), "name");
        assert_eq!(to_english(Scope::Concept, "nadřazená-třída"), "subClassOf");
        assert_eq!(to_english(Scope::Document, "nadřazená-třída"), "nadřazená-třída");
        assert_eq!(to_czech(Scope::Concept, "range"), "obor-hodnot");
        assert_eq!(to_czech(Scope::Concept, "x-custom"), "x-custom");
    }

    #[test]
    fn document_translation_round_trips() {
        let czech = json!({
            "iri": "https://example.org/slovník",
            "typ": ["Slovník"],
            "název": {"cs": "Vozidla"},
            "pojmy": [{"iri": "https://example.org/pojem/vozidlo", "název": {"cs": "Vozidlo"}, "definice": {"cs": "Stroj"}}],
            "neznámý-klíč": 1
        });
        let english = translate_document(czech.clone(), to_english);
        assert_eq!(english["concepts"][0]["definition"]["cs"], "Stroj");
        assert_eq!(english["neznámý-klíč"], 1);
        assert_eq!(translate_document(english, to_czech), czech);
    }
}
