//! PlantUML domain: class diagrams with members and relations.

pub mod adapter;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{PlantUmlAdapter, plantuml_from_universal, plantuml_to_universal};
pub use model::{
    PlantUmlDiagram, PumlClass, PumlKind, PumlMember, PumlParameter, PumlRelation,
    PumlRelationKind, Visibility,
};
pub use parser::{PlantUmlParser, parse_plantuml};
pub use writer::{PlantUmlWriter, write_plantuml};

use crate::traits::DomainBundle;

pub static PLANTUML_DOMAIN: DomainBundle<PlantUmlParser, PlantUmlAdapter, PlantUmlWriter> =
    DomainBundle {
        name: "plantuml",
        extensions: &["puml", "plantuml"],
        parser: PlantUmlParser,
        adapter: PlantUmlAdapter,
        writer: PlantUmlWriter,
    };
