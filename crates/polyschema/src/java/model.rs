//! Typed model of Java source: top-level types with their fields and methods.

pub use crate::extensions::AnnotationRef as Annotation;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaModel {
    pub package: Option<String>,
    pub imports: Vec<String>,
    pub classes: Vec<JavaClass>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Enum,
    Record,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaClass {
    pub name: String,
    pub kind: ClassKind,
    /// `None` is package-private.
    pub access_modifier: Option<String>,
    pub is_abstract: bool,
    pub is_final: bool,
    pub is_static: bool,
    pub annotations: Vec<Annotation>,
    /// Generic parameter list without the angle brackets.
    pub type_parameters: Option<String>,
    /// Interfaces may extend several types; classes at most one.
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    /// Record header components.
    pub components: Vec<JavaParameter>,
    pub enum_constants: Vec<String>,
    pub fields: Vec<JavaField>,
    pub methods: Vec<JavaMethod>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaField {
    pub name: String,
    pub ty: String,
    pub access_modifier: Option<String>,
    pub is_static: bool,
    pub is_final: bool,
    pub annotations: Vec<Annotation>,
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JavaMethod {
    pub name: String,
    /// `None` for constructors.
    pub return_type: Option<String>,
    pub parameters: Vec<JavaParameter>,
    pub access_modifier: Option<String>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub annotations: Vec<Annotation>,
    /// Body text between the braces; `None` for declarations ending in `;`.
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JavaParameter {
    pub ty: String,
    pub name: String,
}

impl ClassKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Record => "record",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "enum" => Some(Self::Enum),
            "record" => Some(Self::Record),
            _ => None,
        }
    }
}

impl JavaClass {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

impl JavaField {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            ..Default::default()
        }
    }
}
