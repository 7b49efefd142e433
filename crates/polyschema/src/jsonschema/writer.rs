//! JSON Schema writer.

use super::model::JsonSchemaModel;
use crate::error::WriteError;
use crate::traits::Writer;

/// Document written for an empty schema.
pub const EMPTY_DOCUMENT: &str = "{}";

pub struct JsonSchemaWriter;

impl Writer for JsonSchemaWriter {
    type Model = JsonSchemaModel;

    fn write(&self, model: &JsonSchemaModel) -> Result<String, WriteError> {
        if *model == JsonSchemaModel::default() {
            return Ok(EMPTY_DOCUMENT.to_string());
        }
        Ok(serde_json::to_string_pretty(model)?)
    }
}

pub fn write_json_schema(model: &JsonSchemaModel) -> Result<String, WriteError> {
    JsonSchemaWriter.write(model)
}
