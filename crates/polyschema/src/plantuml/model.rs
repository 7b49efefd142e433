//! Typed model of a PlantUML class diagram.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlantUmlDiagram {
    pub title: Option<String>,
    pub classes: Vec<PumlClass>,
    pub relations: Vec<PumlRelation>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PumlKind {
    #[default]
    Class,
    AbstractClass,
    Interface,
    Enum,
    Entity,
}

impl PumlKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::AbstractClass => "abstract class",
            Self::Interface => "interface",
            Self::Enum => "enum",
            Self::Entity => "entity",
        }
    }

    /// Accepts `abstract` alone as well as `abstract class`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.split_whitespace().collect::<Vec<_>>().as_slice() {
            ["class"] => Some(Self::Class),
            ["abstract"] | ["abstract", "class"] => Some(Self::AbstractClass),
            ["interface"] => Some(Self::Interface),
            ["enum"] => Some(Self::Enum),
            ["entity"] => Some(Self::Entity),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PumlClass {
    pub name: String,
    pub kind: PumlKind,
    pub stereotype: Option<String>,
    /// For enums, one member per constant with no type.
    pub members: Vec<PumlMember>,
}

impl PumlClass {
    pub fn new(name: impl Into<String>, kind: PumlKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
    Protected,
    Package,
}

impl Visibility {
    pub fn symbol(&self) -> char {
        match self {
            Self::Public => '+',
            Self::Private => '-',
            Self::Protected => '#',
            Self::Package => '~',
        }
    }

    pub fn from_symbol(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Public),
            '-' => Some(Self::Private),
            '#' => Some(Self::Protected),
            '~' => Some(Self::Package),
            _ => None,
        }
    }

    pub fn access_modifier(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
            Self::Package => "package",
        }
    }

    /// C# `internal` is the closest thing to package visibility.
    pub fn from_access_modifier(modifier: &str) -> Option<Self> {
        match modifier {
            "public" => Some(Self::Public),
            "private" => Some(Self::Private),
            "protected" => Some(Self::Protected),
            "package" | "internal" => Some(Self::Package),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PumlMember {
    pub visibility: Option<Visibility>,
    pub name: String,
    pub ty: Option<String>,
    pub is_static: bool,
    pub is_abstract: bool,
    /// `Some` for methods, even with no parameters.
    pub parameters: Option<Vec<PumlParameter>>,
}

impl PumlMember {
    pub fn field(name: impl Into<String>, ty: Option<&str>) -> Self {
        Self {
            name: name.into(),
            ty: ty.map(str::to_string),
            ..Default::default()
        }
    }

    pub fn is_method(&self) -> bool {
        self.parameters.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumlParameter {
    pub name: String,
    pub ty: Option<String>,
}

impl fmt::Display for PumlParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.ty {
            Some(ty) => write!(f, "{} : {ty}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

/// Relation kinds, normalized so `source` is the end the arrow leaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PumlRelationKind {
    /// `--|>`
    Extension,
    /// `..|>`
    Implementation,
    /// `*--`: the source owns the target.
    Composition,
    /// `o--`
    Aggregation,
    /// `-->` and `--`
    Association,
    /// `..>`
    Dependency,
}

impl PumlRelationKind {
    /// Arrow written from source to target.
    pub fn arrow(&self) -> &'static str {
        match self {
            Self::Extension => "--|>",
            Self::Implementation => "..|>",
            Self::Composition => "*--",
            Self::Aggregation => "o--",
            Self::Association => "-->",
            Self::Dependency => "..>",
        }
    }

    /// Kind of an arrow and whether it points right-to-left.
    pub fn from_arrow(arrow: &str) -> Option<(Self, bool)> {
        Some(match arrow {
            "--|>" => (Self::Extension, false),
            "<|--" => (Self::Extension, true),
            "..|>" => (Self::Implementation, false),
            "<|.." => (Self::Implementation, true),
            "*--" => (Self::Composition, false),
            "--*" => (Self::Composition, true),
            "o--" => (Self::Aggregation, false),
            "--o" => (Self::Aggregation, true),
            "-->" | "--" => (Self::Association, false),
            "<--" => (Self::Association, true),
            "..>" | ".." => (Self::Dependency, false),
            "<.." => (Self::Dependency, true),
            _ => return None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PumlRelation {
    pub source: String,
    pub target: String,
    pub kind: PumlRelationKind,
    pub label: Option<String>,
    pub source_cardinality: Option<String>,
    pub target_cardinality: Option<String>,
}

impl PumlRelation {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: PumlRelationKind) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind,
            label: None,
            source_cardinality: None,
            target_cardinality: None,
        }
    }
}
