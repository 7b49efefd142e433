//! SQL ↔ Universal Model.
//!
//! Tables become entities and columns become properties. Column flags and
//! table constraints ride in the side channel; every foreign key, inline or
//! table-level, also surfaces as an association from the owning table.

use super::model::{Column, ColumnReference, ConstraintKind, SqlDiagram, SqlType, Table, TableConstraint};
use super::vocabulary::{SQL_VOCABULARY, is_supported};
use crate::extensions::{AnnotationRef, ExtValue, Extensions, keys};
use crate::traits::Adapter;
use crate::universal::{Entity, Property, Relationship, RelationshipType, UniversalModel, UniversalType};
use crate::vocabulary::strip_parens;

pub const IS_AUTO_INCREMENT: &str = "isAutoIncrement";
pub const REFERENCES: &str = "references";

pub struct SqlAdapter;

impl Adapter for SqlAdapter {
    type Model = SqlDiagram;

    fn to_universal(&self, model: &SqlDiagram) -> UniversalModel {
        let mut universal = UniversalModel::new();
        for table in &model.tables {
            universal.add_entity(table_to_entity(table));
        }
        for table in &model.tables {
            for rel in foreign_keys(table) {
                universal.add_relationship(rel);
            }
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> SqlDiagram {
        let tables = model
            .entities
            .iter()
            .filter(|entity| {
                if entity.is_enum() {
                    tracing::debug!(entity = %entity.label, "enum has no SQL table form, skipping");
                }
                !entity.is_enum()
            })
            .map(entity_to_table)
            .collect();
        SqlDiagram { tables }
    }
}

pub fn sql_to_universal(model: &SqlDiagram) -> UniversalModel {
    SqlAdapter.to_universal(model)
}

pub fn sql_from_universal(model: &UniversalModel) -> SqlDiagram {
    SqlAdapter.from_universal(model)
}

fn table_to_entity(table: &Table) -> Entity {
    let mut entity = Entity::new(&table.name);
    entity.properties = table.columns.iter().map(column_to_property).collect();
    if !table.constraints.is_empty() {
        entity.extensions.insert(
            keys::CONSTRAINTS,
            ExtValue::List(table.constraints.iter().map(constraint_to_ext).collect()),
        );
    }
    entity
}

fn column_to_property(column: &Column) -> Property {
    let mut property = Property::new(
        &column.name,
        SQL_VOCABULARY.to_universal_type(&column.data_type.to_string()),
    );
    let ext = &mut property.extensions;
    ext.insert(keys::IS_NULLABLE, column.nullable);
    ext.insert_opt(keys::DEFAULT_VALUE, column.default.as_deref());
    ext.insert_flag(keys::IS_PRIMARY_KEY, column.primary_key);
    ext.insert_flag(keys::IS_UNIQUE, column.unique);
    ext.insert_flag(IS_AUTO_INCREMENT, column.auto_increment);
    if let Some(reference) = &column.references {
        let mut map = Extensions::new();
        map.insert("table", reference.table.as_str());
        map.insert_opt("column", reference.column.as_deref());
        map.insert_opt("onDelete", reference.on_delete.as_deref());
        map.insert_opt("onUpdate", reference.on_update.as_deref());
        ext.insert(REFERENCES, ExtValue::Map(map.into_iter().collect()));
    }
    property
}

fn constraint_to_ext(constraint: &TableConstraint) -> ExtValue {
    let mut map = Extensions::new();
    map.insert("kind", constraint.kind.keyword());
    map.insert_opt("name", constraint.name.as_deref());
    match &constraint.kind {
        ConstraintKind::PrimaryKey(columns) | ConstraintKind::Unique(columns) => {
            map.insert("columns", ExtValue::strings(columns));
        }
        ConstraintKind::ForeignKey {
            columns,
            ref_table,
            ref_columns,
            on_delete,
            on_update,
        } => {
            map.insert("columns", ExtValue::strings(columns));
            map.insert("refTable", ref_table.as_str());
            map.insert("refColumns", ExtValue::strings(ref_columns));
            map.insert_opt("onDelete", on_delete.as_deref());
            map.insert_opt("onUpdate", on_update.as_deref());
        }
        ConstraintKind::Check(expr) => map.insert("expression", expr.as_str()),
    }
    ExtValue::Map(map.into_iter().collect())
}

fn foreign_keys(table: &Table) -> Vec<Relationship> {
    let inline = table.columns.iter().filter_map(|column| {
        let reference = column.references.as_ref()?;
        Some((column.name.clone(), reference.table.clone()))
    });
    let declared = table.constraints.iter().filter_map(|constraint| match &constraint.kind {
        ConstraintKind::ForeignKey {
            columns, ref_table, ..
        } => Some((columns.join(", "), ref_table.clone())),
        _ => None,
    });
    inline
        .chain(declared)
        .map(|(label, target)| {
            Relationship::new(&table.name, target, RelationshipType::Association)
                .with_label(label)
                .with_cardinality(Some("*"), Some("1"))
        })
        .collect()
}

fn entity_to_table(entity: &Entity) -> Table {
    let columns = entity
        .properties
        .iter()
        .filter_map(|p| property_to_column(&entity.label, p))
        .collect();
    let constraints = entity
        .extensions
        .get_list(keys::CONSTRAINTS)
        .unwrap_or_default()
        .iter()
        .filter_map(|value| {
            let constraint = constraint_from_ext(value);
            if constraint.is_none() {
                tracing::debug!(table = %entity.label, ?value, "malformed constraint entry, dropping");
            }
            constraint
        })
        .collect();
    Table {
        name: entity.label.clone(),
        columns,
        constraints,
    }
}

fn property_to_column(table: &str, property: &Property) -> Option<Column> {
    let ty = &property.ty;
    let data_type = if ty.universal_type == UniversalType::Other {
        let token = ty.domain_specific_type.trim();
        if !is_supported(strip_parens(token)) {
            tracing::warn!(table, column = %property.label, ty = token, "type has no SQL equivalent, skipping column");
            return None;
        }
        SqlType::parse(token)
    } else {
        let mut data_type = SqlType::parse(&SQL_VOCABULARY.render(ty));
        if data_type.base == "VARCHAR" && data_type.params.is_empty() && SQL_VOCABULARY.native_spelling(ty).is_none() {
            data_type.params.push("255".to_string());
        }
        data_type
    };

    let ext = &property.extensions;
    let mut column = Column::new(&property.label, data_type);
    column.nullable = property.is_nullable();
    column.default = ext.get_str(keys::DEFAULT_VALUE).map(str::to_string);
    column.primary_key = ext.flag(keys::IS_PRIMARY_KEY)
        || AnnotationRef::read_all(ext)
            .iter()
            .any(|a| a.name == "Id" || a.name == "Key");
    column.unique = ext.flag(keys::IS_UNIQUE);
    column.auto_increment = ext.flag(IS_AUTO_INCREMENT);
    column.references = ext.get(REFERENCES).and_then(ExtValue::as_map).and_then(|map| {
        Some(ColumnReference {
            table: map.get("table")?.as_str()?.to_string(),
            column: map.get("column").and_then(ExtValue::as_str).map(str::to_string),
            on_delete: map.get("onDelete").and_then(ExtValue::as_str).map(str::to_string),
            on_update: map.get("onUpdate").and_then(ExtValue::as_str).map(str::to_string),
        })
    });
    Some(column)
}

fn constraint_from_ext(value: &ExtValue) -> Option<TableConstraint> {
    let map: Extensions = value.as_map()?.clone().into_iter().collect();
    let columns = map.get_strings("columns");
    let kind = match map.get_str("kind")? {
        "PRIMARY KEY" => ConstraintKind::PrimaryKey(columns),
        "UNIQUE" => ConstraintKind::Unique(columns),
        "FOREIGN KEY" => ConstraintKind::ForeignKey {
            columns,
            ref_table: map.get_str("refTable")?.to_string(),
            ref_columns: map.get_strings("refColumns"),
            on_delete: map.get_str("onDelete").map(str::to_string),
            on_update: map.get_str("onUpdate").map(str::to_string),
        },
        "CHECK" => ConstraintKind::Check(map.get_str("expression")?.to_string()),
        _ => return None,
    };
    Some(TableConstraint {
        name: map.get_str("name").map(str::to_string),
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::parser::parse_sql;
    use crate::universal::{Type, UniversalFormat};

    #[test]
    fn table_round_trips_through_universal() {
        let sql = "CREATE TABLE posts (
            id BIGINT PRIMARY KEY AUTO_INCREMENT,
            title VARCHAR(120) NOT NULL DEFAULT 'untitled',
            body TEXT,
            meta JSON,
            author_id INT REFERENCES users(id),
            CONSTRAINT fk_editor FOREIGN KEY (id) REFERENCES editors(id) ON UPDATE CASCADE,
            CHECK (id > 0)
        );";
        let diagram = parse_sql(sql).unwrap();
        let back = sql_from_universal(&sql_to_universal(&diagram));
        assert_eq!(back, diagram);
    }

    #[test]
    fn inline_reference_actions_and_escaped_defaults_survive_text_round_trip() {
        let sql = "CREATE TABLE B (\n  a_id INT REFERENCES A(id) ON DELETE CASCADE ON UPDATE SET NULL,\n  s VARCHAR(10) DEFAULT 'it''s'\n);\n\n";
        let diagram = parse_sql(sql).unwrap();
        let universal = sql_to_universal(&diagram);
        let a_id = universal.entity("B").and_then(|e| e.property("a_id")).unwrap();
        let reference = a_id.extensions.get(REFERENCES).and_then(ExtValue::as_map).unwrap();
        assert_eq!(reference.get("onDelete").and_then(ExtValue::as_str), Some("CASCADE"));

        let back = sql_from_universal(&universal);
        assert_eq!(back, diagram);
        assert_eq!(crate::sql::writer::write_sql(&back).unwrap(), sql);
    }

    #[test]
    fn foreign_keys_become_associations() {
        let sql = "CREATE TABLE users (id INT);
            CREATE TABLE posts (id INT, author_id INT REFERENCES users(id),
              FOREIGN KEY (id) REFERENCES users(id));";
        let universal = sql_to_universal(&parse_sql(sql).unwrap());
        assert_eq!(universal.relationships.len(), 2);
        let rel = &universal.relationships[0];
        assert_eq!(rel.source_entity_label, "posts");
        assert_eq!(rel.target_entity_label, "users");
        assert_eq!(rel.label.as_deref(), Some("author_id"));
        assert_eq!(rel.source_cardinality.as_deref(), Some("*"));
        assert_eq!(rel.target_cardinality.as_deref(), Some("1"));
    }

    #[test]
    fn foreign_types_get_sql_defaults() {
        let mut model = UniversalModel::new();
        model.add_entity(
            Entity::new("User")
                .with_property(
                    Property::new("name", Type::new("String", UniversalType::String, None))
                        .with_required(true),
                )
                .with_property(Property::new(
                    "id",
                    Type::new("Long", UniversalType::Number, Some(UniversalFormat::Long)),
                ))
                .with_property(Property::new("posts", Type::other("List<Post>"))),
        );
        let table = &sql_from_universal(&model).tables[0];
        assert_eq!(table.columns.len(), 2);
        assert_eq!(table.columns[0].data_type.to_string(), "VARCHAR(255)");
        assert!(!table.columns[0].nullable);
        assert_eq!(table.columns[1].data_type.to_string(), "BIGINT");
        assert!(table.columns[1].nullable);
    }

    #[test]
    fn malformed_side_channel_falls_back() {
        let model = UniversalModel {
            entities: vec![Entity::new("t")
                .with_property(
                    Property::new("a", Type::new("INT", UniversalType::Number, None))
                        .with_extension(keys::DEFAULT_VALUE, ExtValue::List(vec![])),
                )
                .with_extension(keys::CONSTRAINTS, "not a list")],
            ..Default::default()
        };
        let table = &sql_from_universal(&model).tables[0];
        assert_eq!(table.columns[0].default, None);
        assert!(table.constraints.is_empty());
    }
}
