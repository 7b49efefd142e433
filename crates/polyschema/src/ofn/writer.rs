//! OFN writer: English keys back to Czech, pretty printed.

use super::keymap::{to_czech, translate_document};
use super::model::OfnModel;
use crate::error::WriteError;
use crate::traits::Writer;

/// Document written for an empty vocabulary.
pub const EMPTY_DOCUMENT: &str = "{}";

pub struct OfnWriter;

impl Writer for OfnWriter {
    type Model = OfnModel;

    fn write(&self, model: &OfnModel) -> Result<String, WriteError> {
        if *model == OfnModel::default() {
            return Ok(EMPTY_DOCUMENT.to_string());
        }
        let value = translate_document(serde_json::to_value(model)?, to_czech);
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

pub fn write_ofn(model: &OfnModel) -> Result<String, WriteError> {
    OfnWriter.write(model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ofn::model::OfnConcept;

    #[test]
    fn empty_document() {
        assert_eq!(write_ofn(&OfnModel::default()).unwrap(), "{}");
    }

    #[test]
    fn writes_czech_keys() {
        let mut model = OfnModel {
            iri: Some("https://example.org/slovník".into()),
            types: vec!["Slovník".into()],
            ..Default::default()
        };
        model.name.insert("cs".into(), "Vozidla".into());
        let mut concept = OfnConcept {
            iri: Some("https://example.org/pojem/vozidlo".into()),
            types: vec!["Pojem".into(), "Třída".into()],
            ..Default::default()
        };
        concept.name.insert("cs".into(), "Vozidlo".into());
        model.concepts.push(concept);
        insta::assert_snapshot!(write_ofn(&model).unwrap(), @r#"
        {
          "iri": "https://example.org/slovník",
          "typ": [
            "Slovník"
          ],
          "název": {
            "cs": "Vozidla"
          },
          "pojmy": [
            {
              "iri": "https://example.org/pojem/vozidlo",
              "typ": [
                "Pojem",
                "Třída"
              ],
              "název": {
                "cs": "Vozidlo"
              }
            }
          ]
        }
        "#);
    }
}
