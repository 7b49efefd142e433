//! JSON Schema domain: draft-07 documents with `properties`, `definitions` and `$ref`.

pub mod adapter;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{JsonSchemaAdapter, json_schema_from_universal, json_schema_to_universal};
pub use model::{JsonSchemaDefinition, JsonSchemaModel, JsonSchemaProperty, SchemaType};
pub use parser::{JsonSchemaParser, parse_json_schema};
pub use writer::{JsonSchemaWriter, write_json_schema};

use crate::traits::DomainBundle;

pub static JSON_SCHEMA_DOMAIN: DomainBundle<JsonSchemaParser, JsonSchemaAdapter, JsonSchemaWriter> =
    DomainBundle {
        name: "jsonschema",
        extensions: &["json"],
        parser: JsonSchemaParser,
        adapter: JsonSchemaAdapter,
        writer: JsonSchemaWriter,
    };
