//! Typed model of SQL DDL.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlDiagram {
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<Column>,
    pub constraints: Vec<TableConstraint>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    pub data_type: SqlType,
    pub nullable: bool,
    /// Default value as written, literal quoting included.
    pub default: Option<String>,
    pub primary_key: bool,
    pub unique: bool,
    pub auto_increment: bool,
    pub references: Option<ColumnReference>,
}

/// A column type: upper-cased base name plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlType {
    pub base: String,
    pub params: Vec<String>,
}

/// Inline `REFERENCES table(column) [ON DELETE ..] [ON UPDATE ..]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnReference {
    pub table: String,
    pub column: Option<String>,
    pub on_delete: Option<String>,
    pub on_update: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableConstraint {
    pub name: Option<String>,
    pub kind: ConstraintKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintKind {
    PrimaryKey(Vec<String>),
    Unique(Vec<String>),
    ForeignKey {
        columns: Vec<String>,
        ref_table: String,
        ref_columns: Vec<String>,
        on_delete: Option<String>,
        on_update: Option<String>,
    },
    Check(String),
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: SqlType) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable: true,
            default: None,
            primary_key: false,
            unique: false,
            auto_increment: false,
            references: None,
        }
    }
}

impl SqlType {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into().to_ascii_uppercase(),
            params: Vec::new(),
        }
    }

    /// Parse `VARCHAR(255)` / `decimal(10, 2)`. The base is upper-cased.
    pub fn parse(token: &str) -> Self {
        let token = token.trim();
        match token.split_once('(') {
            Some((base, rest)) => Self {
                base: base.trim().to_ascii_uppercase(),
                params: rest
                    .trim_end_matches(')')
                    .split(',')
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty())
                    .collect(),
            },
            None => Self::new(token),
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.base)?;
        if !self.params.is_empty() {
            write!(f, "({})", self.params.join(","))?;
        }
        Ok(())
    }
}

impl ConstraintKind {
    /// SQL keyword introducing the constraint.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::PrimaryKey(_) => "PRIMARY KEY",
            Self::Unique(_) => "UNIQUE",
            Self::ForeignKey { .. } => "FOREIGN KEY",
            Self::Check(_) => "CHECK",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sql_type_parse_and_display() {
        let ty = SqlType::parse("decimal(10, 2)");
        assert_eq!(ty.base, "DECIMAL");
        assert_eq!(ty.params, ["10", "2"]);
        assert_eq!(ty.to_string(), "DECIMAL(10,2)");
        assert_eq!(SqlType::parse("int").to_string(), "INT");
    }
}
