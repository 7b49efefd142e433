//! OFN parser: JSON, Czech keys translated, then the OFN classification rules.

use super::keymap::{to_english, translate_document};
use super::model::{CONCEPT, IgnoreReason, OfnConcept, OfnModel, TERM};
use crate::error::ParseError;
use crate::traits::Parser;
use serde_json::Value;

const DOMAIN: &str = "ofn";

pub struct OfnParser;

impl Parser for OfnParser {
    type Model = OfnModel;

    fn parse(&self, text: &str) -> Result<OfnModel, ParseError> {
        if text.trim().is_empty() {
            return Ok(OfnModel::default());
        }
        let json_err = |source| ParseError::Json {
            domain: DOMAIN,
            source,
        };
        let value: Value = serde_json::from_str(text).map_err(json_err)?;
        if !value.is_object() {
            return Err(ParseError::syntax(DOMAIN, "expected a JSON object at the top level"));
        }
        let mut model: OfnModel =
            serde_json::from_value(translate_document(value, to_english)).map_err(json_err)?;
        for concept in &mut model.concepts {
            classify(concept);
        }
        Ok(model)
    }
}

/// Parse an OFN JSON-LD document.
pub fn parse_ofn(text: &str) -> Result<OfnModel, ParseError> {
    OfnParser.parse(text)
}

/// Apply the OFN concept rules.
///
/// Only classes keep `subClassOf` and only properties and relations keep
/// `domain`/`range`; elsewhere those keys move to `other` unread.
fn classify(concept: &mut OfnConcept) {
    let is_typed = concept.is_class() || concept.is_property() || concept.is_relation();
    if !is_typed && (concept.has_type(CONCEPT) || concept.has_type(TERM)) {
        concept.ignored.push(IgnoreReason::ConceptOnly);
    }
    if !concept.super_property.is_empty() {
        concept.ignored.push(IgnoreReason::SuperProperty);
    }
    if !concept.is_class() && !concept.sub_class_of.is_empty() {
        let parents = std::mem::take(&mut concept.sub_class_of);
        concept.other.insert("subClassOf".into(), parents.into());
    }
    if !concept.is_property() && !concept.is_relation() {
        for (key, value) in [("domain", concept.domain.take()), ("range", concept.range.take())] {
            if let Some(value) = value {
                concept.other.insert(key.into(), value.into());
            }
        }
    }
    if concept.is_ignored() {
        tracing::debug!(
            concept = %concept.label(),
            reasons = ?concept.ignored,
            "ignoring concept"
        );
    }
}
