//! Typed model of an OFN vocabulary, with English keys.
//!
//! The wire format uses Czech keys; see [`super::keymap`]. Keys the model has
//! no field for are kept in `other`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Language tag → text, e.g. `{"cs": "Vozidlo", "en": "Vehicle"}`.
pub type LangString = BTreeMap<String, String>;

pub const CLASS: &str = "Třída";
pub const PROPERTY: &str = "Vlastnost";
pub const RELATION: &str = "Vztah";
pub const CONCEPT: &str = "Koncept";
pub const TERM: &str = "Pojem";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfnModel {
    #[serde(rename = "@context", default, skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub name: LangString,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LangString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub concepts: Vec<OfnConcept>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfnConcept {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iri: Option<String>,
    #[serde(
        rename = "type",
        default,
        deserialize_with = "one_or_many",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub types: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub name: LangString,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub description: LangString,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub definition: LangString,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternative_names: Vec<LangString>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub sub_class_of: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub super_property: Vec<String>,
    #[serde(default, deserialize_with = "one_or_many", skip_serializing_if = "Vec::is_empty")]
    pub equivalent: Vec<String>,
    /// Set by the parser; never written.
    #[serde(skip)]
    pub ignored: Vec<IgnoreReason>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl OfnConcept {
    pub fn has_type(&self, ty: &str) -> bool {
        self.types.iter().any(|t| t == ty)
    }

    pub fn is_class(&self) -> bool {
        self.has_type(CLASS)
    }

    pub fn is_property(&self) -> bool {
        self.has_type(PROPERTY)
    }

    pub fn is_relation(&self) -> bool {
        self.has_type(RELATION)
    }

    pub fn is_ignored(&self) -> bool {
        !self.ignored.is_empty()
    }

    /// Display label: Czech name, then English, then any name, then the IRI tail.
    pub fn label(&self) -> String {
        self.name
            .get("cs")
            .or_else(|| self.name.get("en"))
            .or_else(|| self.name.values().next())
            .cloned()
            .or_else(|| {
                self.iri
                    .as_deref()
                    .and_then(|iri| iri.rsplit(['/', '#']).next())
                    .map(str::to_string)
            })
            .unwrap_or_default()
    }

    /// Key other concepts use to point at this one.
    pub fn reference(&self) -> String {
        self.iri.clone().unwrap_or_else(|| self.label())
    }
}

/// Why the parser set a concept aside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Typed `Koncept`/`Pojem` without `Třída`, `Vztah` or `Vlastnost`.
    ConceptOnly,
    /// Carries `nadřazený-vztah`.
    SuperProperty,
}

impl IgnoreReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConceptOnly => "Koncept/Pojem",
            Self::SuperProperty => "nadřazený-vztah",
        }
    }
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

/// `"x"`, `["x", "y"]` or `null`.
fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_fallbacks() {
        let mut concept = OfnConcept {
            iri: Some("https://example.org/pojem/řidič".into()),
            ..Default::default()
        };
        assert_eq!(concept.label(), "řidič");
        concept.name.insert("en".into(), "Driver".into());
        assert_eq!(concept.label(), "Driver");
        concept.name.insert("cs".into(), "Řidič".into());
        assert_eq!(concept.label(), "Řidič");
    }

    #[test]
    fn single_type_string() {
        let concept: OfnConcept = serde_json::from_str(r#"{"type": "Třída"}"#).unwrap();
        assert!(concept.is_class());
    }
}
