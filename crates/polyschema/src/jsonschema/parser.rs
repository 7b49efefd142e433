//! JSON Schema parser.

use super::model::JsonSchemaModel;
use crate::error::ParseError;
use crate::traits::Parser;

const DOMAIN: &str = "jsonschema";

pub struct JsonSchemaParser;

impl Parser for JsonSchemaParser {
    type Model = JsonSchemaModel;

    fn parse(&self, text: &str) -> Result<JsonSchemaModel, ParseError> {
        if text.trim().is_empty() {
            return Ok(JsonSchemaModel::default());
        }
        let model: JsonSchemaModel = serde_json::from_str(text).map_err(|source| ParseError::Json {
            domain: DOMAIN,
            source,
        })?;
        tracing::trace!(
            properties = model.properties.len(),
            definitions = model.definitions.len(),
            "parsed schema"
        );
        Ok(model)
    }
}

/// Parse JSON Schema text.
pub fn parse_json_schema(text: &str) -> Result<JsonSchemaModel, ParseError> {
    JsonSchemaParser.parse(text)
}
