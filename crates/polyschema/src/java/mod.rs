//! Java domain: classes, interfaces, enums and records with annotated fields.

pub mod adapter;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{JavaAdapter, java_from_universal, java_to_universal};
pub use model::{Annotation, ClassKind, JavaClass, JavaField, JavaMethod, JavaModel, JavaParameter};
pub use parser::{JavaParser, parse_java};
pub use writer::{JavaWriter, write_java};

use crate::traits::DomainBundle;

pub static JAVA_DOMAIN: DomainBundle<JavaParser, JavaAdapter, JavaWriter> = DomainBundle {
    name: "java",
    extensions: &["java"],
    parser: JavaParser,
    adapter: JavaAdapter,
    writer: JavaWriter,
};
