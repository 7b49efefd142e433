//! C# ↔ Universal Model.
//!
//! Nullability is first-class on the C# side (`decimal?`) and travels as
//! `isNullable`. A `required` property sets the universal `required` flag.

use super::model::{CSharpClass, CSharpKind, CSharpModel, CSharpProperty, CSharpType};
use super::vocabulary::CSHARP_VOCABULARY;
use crate::extensions::{AnnotationRef, ExtValue, Extensions, keys};
use crate::text::{base_name, element_type};
use crate::traits::Adapter;
use crate::universal::{Entity, Property, Relationship, RelationshipType, UniversalModel};
use std::collections::HashSet;

pub const NAMESPACE: &str = "namespace";
pub const USINGS: &str = "usings";
pub const BASE_TYPES: &str = "baseTypes";
pub const TYPE_PARAMETERS: &str = "typeParameters";
pub const IS_SEALED: &str = "isSealed";
pub const IS_PARTIAL: &str = "isPartial";
pub const IS_VIRTUAL: &str = "isVirtual";
pub const ACCESSORS: &str = "accessors";
pub const SETTER_ACCESS: &str = "setterAccess";

pub struct CSharpAdapter;

impl Adapter for CSharpAdapter {
    type Model = CSharpModel;

    fn to_universal(&self, model: &CSharpModel) -> UniversalModel {
        let mut universal = UniversalModel::new();
        universal.extensions.insert_opt(NAMESPACE, model.namespace.as_deref());
        if !model.usings.is_empty() {
            universal.extensions.insert(USINGS, ExtValue::strings(&model.usings));
        }
        for class in &model.classes {
            universal.add_entity(class_to_entity(class));
        }
        let kinds: Vec<(&str, CSharpKind)> =
            model.classes.iter().map(|c| (c.name.as_str(), c.kind)).collect();
        let names: HashSet<&str> = kinds.iter().map(|(name, _)| *name).collect();
        for class in &model.classes {
            for rel in infer_relationships(class, &names, &kinds) {
                universal.add_relationship(rel);
            }
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> CSharpModel {
        CSharpModel {
            usings: model.extensions.get_strings(USINGS),
            namespace: model.extensions.get_str(NAMESPACE).map(str::to_string),
            classes: model
                .entities
                .iter()
                .map(|entity| entity_to_class(entity, model))
                .collect(),
        }
    }
}

pub fn csharp_to_universal(model: &CSharpModel) -> UniversalModel {
    CSharpAdapter.to_universal(model)
}

pub fn csharp_from_universal(model: &UniversalModel) -> CSharpModel {
    CSharpAdapter.from_universal(model)
}

fn class_to_entity(class: &CSharpClass) -> Entity {
    let mut entity = Entity::new(&class.name);
    let ext = &mut entity.extensions;
    ext.insert(keys::TYPE, class.kind.keyword());
    ext.insert_opt(keys::ACCESS_MODIFIER, class.access_modifier.as_deref());
    ext.insert_flag(keys::IS_STATIC, class.is_static);
    ext.insert_flag(keys::IS_ABSTRACT, class.is_abstract);
    ext.insert_flag(IS_SEALED, class.is_sealed);
    ext.insert_flag(IS_PARTIAL, class.is_partial);
    AnnotationRef::write_all(ext, &class.attributes);
    ext.insert_opt(TYPE_PARAMETERS, class.type_parameters.as_deref());
    ext.insert(BASE_TYPES, ExtValue::strings(&class.base_types));
    if !class.enum_members.is_empty() {
        ext.insert(keys::ENUM_VALUES, ExtValue::strings(&class.enum_members));
    }
    entity.properties = class.properties.iter().map(property_to_universal).collect();
    entity
}

fn property_to_universal(property: &CSharpProperty) -> Property {
    let mut universal = Property::new(
        &property.name,
        CSHARP_VOCABULARY.to_universal_type(&property.ty.name),
    );
    if property.is_required {
        universal.required = Some(true);
    }
    let ext = &mut universal.extensions;
    ext.insert(keys::IS_NULLABLE, property.ty.is_nullable);
    ext.insert_opt(keys::ACCESS_MODIFIER, property.access_modifier.as_deref());
    ext.insert_flag(keys::IS_STATIC, property.is_static);
    ext.insert_flag(IS_VIRTUAL, property.is_virtual);
    AnnotationRef::write_all(ext, &property.attributes);
    ext.insert_opt(keys::DEFAULT_VALUE, property.initializer.as_deref());
    let accessors = match (property.has_setter, property.init_only) {
        (false, _) => "get",
        (true, false) => "get;set",
        (true, true) => "get;init",
    };
    ext.insert(ACCESSORS, accessors);
    ext.insert_opt(SETTER_ACCESS, property.setter_access.as_deref());
    universal
}

fn infer_relationships(
    class: &CSharpClass,
    names: &HashSet<&str>,
    kinds: &[(&str, CSharpKind)],
) -> Vec<Relationship> {
    let mut rels = Vec::new();
    for property in &class.properties {
        let ty = property.ty.name.as_str();
        if names.contains(ty) {
            rels.push(
                Relationship::new(&class.name, ty, RelationshipType::Association)
                    .with_label(&property.name)
                    .with_cardinality(None, Some(if property.ty.is_nullable { "0..1" } else { "1" })),
            );
        } else if let Some(element) = element_type(ty).filter(|e| names.contains(e)) {
            rels.push(
                Relationship::new(&class.name, element, RelationshipType::Association)
                    .with_label(&property.name)
                    .with_cardinality(None, Some("*")),
            );
        }
    }
    for base in class.base_types.iter().map(|b| base_name(b)) {
        if !names.contains(base) {
            continue;
        }
        let is_interface = kinds
            .iter()
            .any(|(name, kind)| *name == base && *kind == CSharpKind::Interface);
        let rel = Relationship::new(&class.name, base, RelationshipType::Inheritance);
        rels.push(if is_interface && class.kind != CSharpKind::Interface {
            rel.with_label("implements")
        } else {
            rel
        });
    }
    rels
}

/// C# access keywords for a side-channel value; foreign values fall back to `public`.
fn csharp_access(ext: &Extensions) -> Option<String> {
    match ext.get_str(keys::ACCESS_MODIFIER) {
        Some(
            v @ ("public" | "private" | "protected" | "internal" | "protected internal"
            | "private protected"),
        ) => Some(v.to_string()),
        Some("package") => Some("internal".to_string()),
        Some(other) => {
            tracing::debug!(access = other, "access modifier has no C# form, using public");
            Some("public".to_string())
        }
        None => Some("public".to_string()),
    }
}

fn entity_to_class(entity: &Entity, model: &UniversalModel) -> CSharpClass {
    let ext = &entity.extensions;
    let kind = match entity.kind() {
        Some("interface") => CSharpKind::Interface,
        Some("enum") => CSharpKind::Enum,
        Some("record") => CSharpKind::Record,
        Some("struct") => CSharpKind::Struct,
        _ => CSharpKind::Class,
    };
    let mut class = CSharpClass::new(&entity.label, kind);
    class.access_modifier = if ext.contains(keys::TYPE) && ext.get_str(keys::ACCESS_MODIFIER).is_none() {
        // a C# type declared without a modifier stays without one
        None
    } else {
        csharp_access(ext)
    };
    class.is_static = ext.flag(keys::IS_STATIC);
    class.is_abstract = ext.flag(keys::IS_ABSTRACT) || entity.kind() == Some("abstract class");
    class.is_sealed = ext.flag(IS_SEALED) || ext.flag(keys::IS_FINAL);
    class.is_partial = ext.flag(IS_PARTIAL);
    class.attributes = AnnotationRef::read_all(ext);
    class.type_parameters = ext.get_str(TYPE_PARAMETERS).map(str::to_string);
    class.enum_members = ext.get_strings(keys::ENUM_VALUES);
    class.base_types = if ext.contains(BASE_TYPES) {
        ext.get_strings(BASE_TYPES)
    } else if ext.contains(keys::EXTENDS) || ext.contains(keys::IMPLEMENTS) {
        let mut bases = ext.get_strings(keys::EXTENDS);
        bases.extend(ext.get_strings(keys::IMPLEMENTS));
        bases
    } else {
        model
            .relationships_from(&entity.label, RelationshipType::Inheritance)
            .map(|r| r.target_entity_label.clone())
            .collect()
    };
    if kind != CSharpKind::Enum {
        class.properties = entity.properties.iter().map(property_from_universal).collect();
    }
    class
}

fn property_from_universal(property: &Property) -> CSharpProperty {
    let ext = &property.extensions;
    let (has_setter, init_only) = match ext.get_str(ACCESSORS) {
        Some("get") => (false, false),
        Some("get;init") => (true, true),
        _ => (true, false),
    };
    CSharpProperty {
        name: property.label.clone(),
        ty: CSharpType {
            name: CSHARP_VOCABULARY.render(&property.ty),
            is_nullable: property.is_nullable(),
        },
        access_modifier: if ext.contains(ACCESSORS) && ext.get_str(keys::ACCESS_MODIFIER).is_none() {
            None
        } else {
            csharp_access(ext)
        },
        is_static: ext.flag(keys::IS_STATIC),
        is_virtual: ext.flag(IS_VIRTUAL),
        is_required: property.required == Some(true),
        has_setter,
        init_only,
        setter_access: ext.get_str(SETTER_ACCESS).map(str::to_string),
        attributes: AnnotationRef::read_all(ext),
        initializer: ext.get_str(keys::DEFAULT_VALUE).map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::csharp::parser::parse_csharp;
    use crate::universal::{Type, UniversalFormat, UniversalType};

    #[test]
    fn round_trip_preserves_model() {
        let src = r#"
            using System;
            namespace Shop;

            [Table("orders")]
            public sealed class Order : EntityBase, IAuditable
            {
                [Key] public int Id { get; set; }
                public required string Number { get; init; } = "";
                public decimal? Total { get; private set; }
                public ICollection<Line> Lines { get; set; }
                internal static bool Flag { get; }
                Customer Buyer { get; set; }
            }
            public class Line { public Order? Order { get; set; } }
            interface IAuditable { }
            class Customer { }
            public enum Status { Open, Closed }
        "#;
        let model = parse_csharp(src).unwrap();
        let back = csharp_from_universal(&csharp_to_universal(&model));
        assert_eq!(back, model);
    }

    #[test]
    fn nullable_decimal_travels_as_flag() {
        let model = parse_csharp("class P { public decimal? Price { get; set; } }").unwrap();
        let universal = csharp_to_universal(&model);
        let price = &universal.entities[0].properties[0];
        assert_eq!(price.ty.format, Some(UniversalFormat::Decimal));
        assert_eq!(price.extensions.get_bool(keys::IS_NULLABLE), Some(true));
        let back = csharp_from_universal(&universal);
        assert_eq!(back.classes[0].properties[0].ty.to_string(), "decimal?");
    }

    #[test]
    fn relationships_from_properties_and_bases() {
        let src = "class Order : IAuditable { public List<Line> Lines { get; set; } public Customer? Buyer { get; set; } }
                   class Line { } class Customer { } interface IAuditable { }";
        let universal = csharp_to_universal(&parse_csharp(src).unwrap());
        let summary: Vec<_> = universal
            .relationships
            .iter()
            .map(|r| (r.target_entity_label.as_str(), r.ty, r.label.as_deref()))
            .collect();
        assert_eq!(
            summary,
            [
                ("Line", RelationshipType::Association, Some("Lines")),
                ("Customer", RelationshipType::Association, Some("Buyer")),
                ("IAuditable", RelationshipType::Inheritance, Some("implements")),
            ]
        );
    }

    #[test]
    fn foreign_model_gets_csharp_defaults() {
        let mut model = UniversalModel::new();
        model.add_entity(
            Entity::new("users")
                .with_property(
                    Property::new("id", Type::new("INT", UniversalType::Number, None))
                        .with_extension(keys::IS_NULLABLE, false),
                )
                .with_property(
                    Property::new("name", Type::new("str", UniversalType::String, None))
                        .with_required(true),
                )
                .with_property(Property::new("bio", Type::new("TEXT", UniversalType::String, None))),
        );
        let class = &csharp_from_universal(&model).classes[0];
        assert_eq!(class.access_modifier.as_deref(), Some("public"));
        let props: Vec<_> = class
            .properties
            .iter()
            .map(|p| (p.ty.to_string(), p.is_required, p.access_modifier.clone()))
            .collect();
        assert_eq!(
            props,
            [
                ("int".to_string(), false, Some("public".to_string())),
                ("string".to_string(), true, Some("public".to_string())),
                ("string?".to_string(), false, Some("public".to_string())),
            ]
        );
        assert!(class.properties.iter().all(|p| p.has_setter && !p.init_only));
    }
}
