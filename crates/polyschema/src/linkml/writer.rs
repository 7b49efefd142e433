//! LinkML YAML writer.

use super::model::LinkmlModel;
use crate::error::WriteError;
use crate::traits::Writer;

/// Document written for an empty schema.
pub const EMPTY_DOCUMENT: &str = "{}\n";

/// Writes the `schema:`-wrapped form.
pub struct LinkmlWriter;

impl Writer for LinkmlWriter {
    type Model = LinkmlModel;

    fn write(&self, model: &LinkmlModel) -> Result<String, WriteError> {
        if model.schema.is_empty() {
            return Ok(EMPTY_DOCUMENT.to_string());
        }
        Ok(serde_yaml::to_string(model)?)
    }
}

pub fn write_linkml(model: &LinkmlModel) -> Result<String, WriteError> {
    LinkmlWriter.write(model)
}
