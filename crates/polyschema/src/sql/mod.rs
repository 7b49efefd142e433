//! SQL DDL domain: `CREATE TABLE` scripts.

pub mod adapter;
pub mod model;
pub mod parser;
pub mod vocabulary;
pub mod writer;

pub use adapter::{SqlAdapter, sql_from_universal, sql_to_universal};
pub use model::{Column, ColumnReference, ConstraintKind, SqlDiagram, SqlType, Table, TableConstraint};
pub use parser::{SqlParser, parse_sql};
pub use writer::{SqlWriter, write_sql};

use crate::traits::DomainBundle;

pub static SQL_DOMAIN: DomainBundle<SqlParser, SqlAdapter, SqlWriter> = DomainBundle {
    name: "sql",
    extensions: &["sql", "ddl"],
    parser: SqlParser,
    adapter: SqlAdapter,
    writer: SqlWriter,
};
