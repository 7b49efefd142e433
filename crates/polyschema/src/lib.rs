//! Bidirectional schema translation through a universal model.
//!
//! `polyschema` reads a schema written in one notation (SQL DDL, Java, C#,
//! LinkML, JSON Schema, OFN, PlantUML), maps it onto a shared
//! [`UniversalModel`], and writes it back out in any other notation.
//!
//! # Architecture
//!
//! ```text
//! text ──parse──> domain model ──to_universal──> UniversalModel
//!                                                      │
//! text <──write── domain model <──from_universal───────┘
//! ```
//!
//! Each domain is a module with a typed model, a [`Parser`], a [`Writer`],
//! an [`Adapter`] and a type [`Vocabulary`]. The [`registry`] bundles them
//! behind the object-safe [`Domain`] trait so callers can pick domains by
//! name or file extension.
//!
//! Domain metadata with no first-class universal field rides along in an
//! [`Extensions`] map on the model, on every entity and on every property.
//! Adapters read what they recognize and ignore the rest, so a model built
//! by one domain can always be written by another.
//!
//! # Example
//!
//! ```ignore
//! let java = polyschema::convert(
//!     "CREATE TABLE User (id INT, name VARCHAR(255));",
//!     "sql",
//!     "java",
//! )?;
//! ```

pub mod error;
pub mod extensions;
pub mod registry;
pub mod text;
pub mod traits;
pub mod universal;
pub mod vocabulary;

#[cfg(feature = "csharp")]
pub mod csharp;
#[cfg(feature = "java")]
pub mod java;
#[cfg(feature = "jsonschema")]
pub mod jsonschema;
#[cfg(feature = "linkml")]
pub mod linkml;
#[cfg(feature = "ofn")]
pub mod ofn;
#[cfg(feature = "plantuml")]
pub mod plantuml;
#[cfg(feature = "sql")]
pub mod sql;

// Re-exports: core types
pub use error::{ConvertError, ParseError, WriteError};
pub use extensions::{AnnotationRef, ExtValue, Extensions, MethodSignature};
pub use universal::{
    Entity, Property, Relationship, RelationshipType, Type, UniversalFormat, UniversalModel,
    UniversalType,
};
pub use vocabulary::Vocabulary;

// Re-exports: traits
pub use traits::{Adapter, Domain, DomainBundle, Parser, Writer};

// Re-exports: registry
pub use registry::{
    DomainKind, convert, domain_for_extension, domain_for_name, domain_names, domains,
    register_domain,
};
