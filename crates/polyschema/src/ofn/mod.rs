//! OFN domain: Czech Open Formal Standard vocabularies in JSON-LD.

pub mod adapter;
pub mod keymap;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{OfnAdapter, ofn_from_universal, ofn_to_universal};
pub use keymap::OFN_KEY_MAP;
pub use model::{IgnoreReason, LangString, OfnConcept, OfnModel};
pub use parser::{OfnParser, parse_ofn};
pub use writer::{OfnWriter, write_ofn};

use crate::traits::DomainBundle;

pub static OFN_DOMAIN: DomainBundle<OfnParser, OfnAdapter, OfnWriter> = DomainBundle {
    name: "ofn",
    extensions: &["jsonld", "ofn"],
    parser: OfnParser,
    adapter: OfnAdapter,
    writer: OfnWriter,
};
