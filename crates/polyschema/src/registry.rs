//! Registry of domains.
//!
//! Built-in domains are registered once, on first use. Adding a domain is a
//! [`register_domain`] call, not a new branch in every caller.

use crate::error::ConvertError;
use crate::traits::Domain;
use std::sync::{OnceLock, PoisonError, RwLock};

/// Global registry of domains.
static DOMAINS: RwLock<Vec<&'static dyn Domain>> = RwLock::new(Vec::new());
static INITIALIZED: OnceLock<()> = OnceLock::new();

/// Register a custom domain.
///
/// A domain registered under an existing name shadows nothing: lookups return
/// the first registration.
pub fn register_domain(domain: &'static dyn Domain) {
    init_builtin();
    DOMAINS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .push(domain);
}

/// Initialize built-in domains (called automatically on first use).
fn init_builtin() {
    INITIALIZED.get_or_init(|| {
        let mut domains = DOMAINS.write().unwrap_or_else(PoisonError::into_inner);

        #[cfg(feature = "sql")]
        domains.push(&crate::sql::SQL_DOMAIN);

        #[cfg(feature = "java")]
        domains.push(&crate::java::JAVA_DOMAIN);

        #[cfg(feature = "csharp")]
        domains.push(&crate::csharp::CSHARP_DOMAIN);

        #[cfg(feature = "linkml")]
        domains.push(&crate::linkml::LINKML_DOMAIN);

        #[cfg(feature = "jsonschema")]
        domains.push(&crate::jsonschema::JSON_SCHEMA_DOMAIN);

        #[cfg(feature = "ofn")]
        domains.push(&crate::ofn::OFN_DOMAIN);

        #[cfg(feature = "plantuml")]
        domains.push(&crate::plantuml::PLANTUML_DOMAIN);
    });
}

fn with_domains<T>(f: impl FnOnce(&[&'static dyn Domain]) -> T) -> T {
    init_builtin();
    let domains = DOMAINS.read().unwrap_or_else(PoisonError::into_inner);
    f(&domains)
}

/// Get a domain by name.
pub fn domain_for_name(name: &str) -> Option<&'static dyn Domain> {
    with_domains(|domains| domains.iter().find(|d| d.name() == name).copied())
}

/// Get a domain by file extension (without the dot).
pub fn domain_for_extension(ext: &str) -> Option<&'static dyn Domain> {
    let ext = ext.to_ascii_lowercase();
    with_domains(|domains| {
        domains
            .iter()
            .find(|d| d.extensions().contains(&ext.as_str()))
            .copied()
    })
}

/// List all registered domains.
pub fn domains() -> Vec<&'static dyn Domain> {
    with_domains(|domains| domains.to_vec())
}

/// List all registered domain names.
pub fn domain_names() -> Vec<&'static str> {
    with_domains(|domains| domains.iter().map(|d| d.name()).collect())
}

/// Convert text from one domain to another through the universal model.
pub fn convert(text: &str, from: &str, to: &str) -> Result<String, ConvertError> {
    let source = domain_for_name(from).ok_or_else(|| ConvertError::UnknownDomain(from.into()))?;
    let target = domain_for_name(to).ok_or_else(|| ConvertError::UnknownDomain(to.into()))?;
    let universal = source.read(text)?;
    tracing::debug!(
        from,
        to,
        entities = universal.entities.len(),
        relationships = universal.relationships.len(),
        "converted to universal model"
    );
    Ok(target.render(&universal)?)
}

/// Built-in domain tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainKind {
    Sql,
    Java,
    CSharp,
    Linkml,
    JsonSchema,
    Ofn,
    PlantUml,
}

impl DomainKind {
    pub const ALL: [DomainKind; 7] = [
        Self::Sql,
        Self::Java,
        Self::CSharp,
        Self::Linkml,
        Self::JsonSchema,
        Self::Ofn,
        Self::PlantUml,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sql => "sql",
            Self::Java => "java",
            Self::CSharp => "csharp",
            Self::Linkml => "linkml",
            Self::JsonSchema => "jsonschema",
            Self::Ofn => "ofn",
            Self::PlantUml => "plantuml",
        }
    }

    /// The registered domain for this tag, if its feature is enabled.
    pub fn domain(&self) -> Option<&'static dyn Domain> {
        domain_for_name(self.as_str())
    }
}

impl std::fmt::Display for DomainKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DomainKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sql" | "ddl" => Ok(Self::Sql),
            "java" => Ok(Self::Java),
            "csharp" | "c#" | "cs" => Ok(Self::CSharp),
            "linkml" => Ok(Self::Linkml),
            "jsonschema" | "json-schema" => Ok(Self::JsonSchema),
            "ofn" => Ok(Self::Ofn),
            "plantuml" | "puml" => Ok(Self::PlantUml),
            _ => Err(format!("unknown domain: {s}")),
        }
    }
}
