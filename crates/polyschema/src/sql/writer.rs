//! SQL DDL writer.

use super::model::{Column, ConstraintKind, SqlDiagram, Table, TableConstraint};
use crate::error::WriteError;
use crate::traits::Writer;
use std::fmt::Write;

/// Writes one `CREATE TABLE` statement per table, in model order.
pub struct SqlWriter;

impl Writer for SqlWriter {
    type Model = SqlDiagram;

    fn write(&self, model: &SqlDiagram) -> Result<String, WriteError> {
        let mut out = String::new();
        for table in &model.tables {
            write_table(&mut out, table);
        }
        Ok(out)
    }
}

/// Write a SQL diagram as DDL. The empty diagram is `""`.
pub fn write_sql(model: &SqlDiagram) -> Result<String, WriteError> {
    SqlWriter.write(model)
}

fn write_table(out: &mut String, table: &Table) {
    let lines: Vec<String> = table
        .columns
        .iter()
        .map(column_line)
        .chain(table.constraints.iter().map(constraint_line))
        .collect();
    let _ = writeln!(out, "CREATE TABLE {} (", table.name);
    for (i, line) in lines.iter().enumerate() {
        out.push_str("  ");
        out.push_str(line);
        if i + 1 < lines.len() {
            out.push(',');
        }
        out.push('\n');
    }
    out.push_str(");\n\n");
}

fn column_line(column: &Column) -> String {
    let mut line = format!("{} {}", column.name, column.data_type);
    if !column.nullable {
        line.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        let _ = write!(line, " DEFAULT {default}");
    }
    if column.primary_key {
        line.push_str(" PRIMARY KEY");
    }
    if column.unique {
        line.push_str(" UNIQUE");
    }
    if column.auto_increment {
        line.push_str(" AUTO_INCREMENT");
    }
    if let Some(reference) = &column.references {
        let _ = write!(line, " REFERENCES {}", reference.table);
        if let Some(col) = &reference.column {
            let _ = write!(line, "({col})");
        }
        if let Some(action) = &reference.on_delete {
            let _ = write!(line, " ON DELETE {action}");
        }
        if let Some(action) = &reference.on_update {
            let _ = write!(line, " ON UPDATE {action}");
        }
    }
    line
}

fn constraint_line(constraint: &TableConstraint) -> String {
    let mut line = String::new();
    if let Some(name) = &constraint.name {
        let _ = write!(line, "CONSTRAINT {name} ");
    }
    line.push_str(constraint.kind.keyword());
    match &constraint.kind {
        ConstraintKind::PrimaryKey(columns) | ConstraintKind::Unique(columns) => {
            let _ = write!(line, " ({})", columns.join(", "));
        }
        ConstraintKind::ForeignKey {
            columns,
            ref_table,
            ref_columns,
            on_delete,
            on_update,
        } => {
            let _ = write!(line, " ({}) REFERENCES {ref_table}", columns.join(", "));
            if !ref_columns.is_empty() {
                let _ = write!(line, "({})", ref_columns.join(", "));
            }
            if let Some(action) = on_delete {
                let _ = write!(line, " ON DELETE {action}");
            }
            if let Some(action) = on_update {
                let _ = write!(line, " ON UPDATE {action}");
            }
        }
        ConstraintKind::Check(expr) => {
            let _ = write!(line, " ({expr})");
        }
    }
    line
}
