//! C# domain: types with auto-properties.

pub mod adapter;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{CSharpAdapter, csharp_from_universal, csharp_to_universal};
pub use model::{Attribute, CSharpClass, CSharpKind, CSharpModel, CSharpProperty, CSharpType};
pub use parser::{CSharpParser, parse_csharp};
pub use writer::{CSharpWriter, write_csharp};

use crate::traits::DomainBundle;

pub static CSHARP_DOMAIN: DomainBundle<CSharpParser, CSharpAdapter, CSharpWriter> = DomainBundle {
    name: "csharp",
    extensions: &["cs"],
    parser: CSharpParser,
    adapter: CSharpAdapter,
    writer: CSharpWriter,
};
