//! LinkML domain: YAML schemas with classes, attributes and enums.

pub mod adapter;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{LinkmlAdapter, linkml_from_universal, linkml_to_universal};
pub use model::{LinkmlAttribute, LinkmlClass, LinkmlEnum, LinkmlModel, LinkmlSchema, PermissibleValue};
pub use parser::{LinkmlParser, parse_linkml};
pub use writer::{LinkmlWriter, write_linkml};

use crate::traits::DomainBundle;

pub static LINKML_DOMAIN: DomainBundle<LinkmlParser, LinkmlAdapter, LinkmlWriter> = DomainBundle {
    name: "linkml",
    extensions: &["yaml", "yml", "linkml"],
    parser: LinkmlParser,
    adapter: LinkmlAdapter,
    writer: LinkmlWriter,
};
