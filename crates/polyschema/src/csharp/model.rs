//! Typed model of C# source: types with auto-properties.

use crate::extensions::AnnotationRef;
use std::fmt;

/// A C# attribute such as `[Key]` or `[MaxLength(50)]`.
pub type Attribute = AnnotationRef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CSharpModel {
    pub usings: Vec<String>,
    pub namespace: Option<String>,
    pub classes: Vec<CSharpClass>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CSharpKind {
    #[default]
    Class,
    Interface,
    Record,
    Struct,
    Enum,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CSharpClass {
    pub name: String,
    pub kind: CSharpKind,
    pub access_modifier: Option<String>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub is_sealed: bool,
    pub is_partial: bool,
    pub attributes: Vec<Attribute>,
    pub type_parameters: Option<String>,
    pub base_types: Vec<String>,
    pub enum_members: Vec<String>,
    pub properties: Vec<CSharpProperty>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CSharpProperty {
    pub name: String,
    pub ty: CSharpType,
    pub access_modifier: Option<String>,
    pub is_static: bool,
    pub is_virtual: bool,
    pub is_required: bool,
    pub has_setter: bool,
    /// `init` instead of `set`.
    pub init_only: bool,
    /// Accessor modifier on the setter, as in `private set;`.
    pub setter_access: Option<String>,
    pub attributes: Vec<Attribute>,
    pub initializer: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CSharpType {
    pub name: String,
    pub is_nullable: bool,
}

impl CSharpKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Interface => "interface",
            Self::Record => "record",
            Self::Struct => "struct",
            Self::Enum => "enum",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword.split_whitespace().next()? {
            "class" => Some(Self::Class),
            "interface" => Some(Self::Interface),
            "record" => Some(Self::Record),
            "struct" => Some(Self::Struct),
            "enum" => Some(Self::Enum),
            _ => None,
        }
    }
}

impl CSharpType {
    /// Parse `decimal?` into its name and nullability.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.strip_suffix('?') {
            Some(name) => Self {
                name: name.trim().to_string(),
                is_nullable: true,
            },
            None => Self {
                name: token.to_string(),
                is_nullable: false,
            },
        }
    }
}

impl fmt::Display for CSharpType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.is_nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl CSharpClass {
    pub fn new(name: impl Into<String>, kind: CSharpKind) -> Self {
        Self {
            name: name.into(),
            kind,
            ..Default::default()
        }
    }
}

impl CSharpProperty {
    /// A `public` read-write auto-property.
    pub fn new(name: impl Into<String>, ty: CSharpType) -> Self {
        Self {
            name: name.into(),
            ty,
            access_modifier: Some("public".to_string()),
            has_setter: true,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_type_token() {
        let ty = CSharpType::parse("decimal?");
        assert_eq!(ty.name, "decimal");
        assert!(ty.is_nullable);
        assert_eq!(ty.to_string(), "decimal?");
        assert_eq!(CSharpType::parse("List<Post>").to_string(), "List<Post>");
    }
}
