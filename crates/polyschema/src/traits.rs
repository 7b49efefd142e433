//! Traits for domain parsers, writers and adapters.

use crate::error::{ParseError, WriteError};
use crate::universal::UniversalModel;

/// Parses domain text into the domain's typed model.
///
/// Either the whole text is recognized or an error is returned; empty input
/// yields an empty model.
pub trait Parser: Send + Sync {
    type Model;

    fn parse(&self, text: &str) -> Result<Self::Model, ParseError>;
}

/// Serializes a domain model back to text. Deterministic for equal input.
pub trait Writer: Send + Sync {
    type Model;

    fn write(&self, model: &Self::Model) -> Result<String, WriteError>;
}

/// Maps a domain model to and from the [`UniversalModel`].
///
/// Both directions are total: metadata this domain does not recognize is
/// ignored, and metadata it needs but cannot find falls back to defaults.
pub trait Adapter: Send + Sync {
    type Model;

    fn to_universal(&self, model: &Self::Model) -> UniversalModel;

    fn from_universal(&self, model: &UniversalModel) -> Self::Model;
}

/// A domain as seen by the registry: text in, text out, universal in between.
pub trait Domain: Send + Sync {
    /// Domain identifier (e.g., "sql", "java").
    fn name(&self) -> &'static str;

    /// File extensions this domain handles (e.g., &["sql", "ddl"]).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse text and adapt it to the universal model.
    fn read(&self, text: &str) -> Result<UniversalModel, ParseError>;

    /// Adapt a universal model to this domain and write it as text.
    fn render(&self, model: &UniversalModel) -> Result<String, WriteError>;
}

/// A parser, adapter and writer over the same model, bundled as a [`Domain`].
pub struct DomainBundle<P, A, W> {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    pub parser: P,
    pub adapter: A,
    pub writer: W,
}

impl<M, P, A, W> Domain for DomainBundle<P, A, W>
where
    P: Parser<Model = M>,
    A: Adapter<Model = M>,
    W: Writer<Model = M>,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn extensions(&self) -> &'static [&'static str] {
        self.extensions
    }

    fn read(&self, text: &str) -> Result<UniversalModel, ParseError> {
        let model = self.parser.parse(text)?;
        Ok(self.adapter.to_universal(&model))
    }

    fn render(&self, model: &UniversalModel) -> Result<String, WriteError> {
        let domain_model = self.adapter.from_universal(model);
        self.writer.write(&domain_model)
    }
}
