//! LinkML ↔ Universal Model.
//!
//! Classes and enums both become entities; enums carry `type: enum` and their
//! permissible values. `required` is first-class on both sides.

use super::model::{LinkmlAttribute, LinkmlClass, LinkmlEnum, LinkmlModel, LinkmlSchema, PermissibleValue};
use super::vocabulary::LINKML_VOCABULARY;
use crate::extensions::{ExtValue, keys};
use crate::text::element_type;
use crate::traits::Adapter;
use crate::universal::{Entity, Property, Relationship, RelationshipType, UniversalModel, UniversalType};
use std::collections::BTreeMap;

pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
pub const PREFIXES: &str = "prefixes";
pub const DEFAULT_PREFIX: &str = "defaultPrefix";
pub const DEFAULT_RANGE: &str = "defaultRange";
pub const IMPORTS: &str = "imports";
pub const IS_A: &str = "isA";
pub const MIXINS: &str = "mixins";
pub const MULTIVALUED: &str = "multivalued";
pub const IDENTIFIER: &str = "identifier";
pub const PATTERN: &str = "pattern";
/// The attribute had no `range` and fell back to the schema default.
pub const IMPLICIT_RANGE: &str = "implicitRange";
/// Permissible value descriptions, keyed by value.
pub const VALUE_DESCRIPTIONS: &str = "valueDescriptions";

pub struct LinkmlAdapter;

impl Adapter for LinkmlAdapter {
    type Model = LinkmlModel;

    fn to_universal(&self, model: &LinkmlModel) -> UniversalModel {
        let schema = &model.schema;
        let mut universal = UniversalModel {
            id: schema.id.clone(),
            name: schema.name.clone(),
            ..Default::default()
        };
        let ext = &mut universal.extensions;
        ext.insert_opt(TITLE, schema.title.as_deref());
        ext.insert_opt(DESCRIPTION, schema.description.as_deref());
        if !schema.prefixes.is_empty() {
            let prefixes = schema
                .prefixes
                .iter()
                .map(|(k, v)| (k.clone(), ExtValue::from(v.as_str())))
                .collect();
            ext.insert(PREFIXES, ExtValue::Map(prefixes));
        }
        ext.insert_opt(DEFAULT_PREFIX, schema.default_prefix.as_deref());
        ext.insert_opt(DEFAULT_RANGE, schema.default_range.as_deref());
        if !schema.imports.is_empty() {
            ext.insert(IMPORTS, ExtValue::strings(&schema.imports));
        }

        let default_range = schema.default_range.as_deref().unwrap_or("string");
        for (name, class) in &schema.classes {
            universal.add_entity(class_to_entity(name, class, default_range));
        }
        for (name, linkml_enum) in &schema.enums {
            universal.add_entity(enum_to_entity(name, linkml_enum));
        }
        for (name, class) in &schema.classes {
            for rel in infer_relationships(name, class, schema) {
                universal.add_relationship(rel);
            }
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> LinkmlModel {
        let ext = &model.extensions;
        let mut schema = LinkmlSchema {
            id: model.id.clone(),
            name: model.name.clone(),
            title: ext.get_str(TITLE).map(str::to_string),
            description: ext.get_str(DESCRIPTION).map(str::to_string),
            prefixes: ext
                .get(PREFIXES)
                .and_then(ExtValue::as_map)
                .map(|map| {
                    map.iter()
                        .filter_map(|(k, v)| Some((k.clone(), v.as_str()?.to_string())))
                        .collect()
                })
                .unwrap_or_default(),
            default_prefix: ext.get_str(DEFAULT_PREFIX).map(str::to_string),
            default_range: ext.get_str(DEFAULT_RANGE).map(str::to_string),
            imports: ext.get_strings(IMPORTS),
            ..Default::default()
        };
        for entity in &model.entities {
            if entity.is_enum() {
                schema.enums.insert(entity.label.clone(), entity_to_enum(entity));
            } else {
                schema
                    .classes
                    .insert(entity.label.clone(), entity_to_class(entity, model));
            }
        }
        LinkmlModel { schema }
    }
}

pub fn linkml_to_universal(model: &LinkmlModel) -> UniversalModel {
    LinkmlAdapter.to_universal(model)
}

pub fn linkml_from_universal(model: &UniversalModel) -> LinkmlModel {
    LinkmlAdapter.from_universal(model)
}

fn class_to_entity(name: &str, class: &LinkmlClass, default_range: &str) -> Entity {
    let mut entity = Entity::new(name);
    entity.description = class.description.clone();
    entity.extensions.insert_flag(keys::IS_ABSTRACT, class.is_abstract);
    entity.extensions.insert_opt(IS_A, class.is_a.as_deref());
    entity.extensions.insert(MIXINS, ExtValue::strings(&class.mixins));
    entity.properties = class
        .attributes
        .iter()
        .map(|(attr_name, attr)| attribute_to_property(attr_name, attr, default_range))
        .collect();
    entity
}

fn attribute_to_property(name: &str, attr: &LinkmlAttribute, default_range: &str) -> Property {
    let range = attr.range.as_deref().unwrap_or(default_range);
    let mut property = Property::new(name, LINKML_VOCABULARY.to_universal_type(range));
    property.description = attr.description.clone();
    property.required = attr.required;
    let ext = &mut property.extensions;
    ext.insert_flag(IMPLICIT_RANGE, attr.range.is_none());
    if let Some(multivalued) = attr.multivalued {
        ext.insert(MULTIVALUED, multivalued);
    }
    match attr.identifier {
        Some(true) => ext.insert(keys::IS_PRIMARY_KEY, true),
        Some(false) => ext.insert(IDENTIFIER, false),
        None => {}
    }
    ext.insert_opt(PATTERN, attr.pattern.as_deref());
    property
}

fn enum_to_entity(name: &str, linkml_enum: &LinkmlEnum) -> Entity {
    let mut entity = Entity::new(name).with_extension(keys::TYPE, "enum");
    entity.description = linkml_enum.description.clone();
    entity.extensions.insert(
        keys::ENUM_VALUES,
        ExtValue::strings(linkml_enum.permissible_values.keys()),
    );
    let descriptions: BTreeMap<String, ExtValue> = linkml_enum
        .permissible_values
        .iter()
        .filter_map(|(value, pv)| Some((value.clone(), ExtValue::from(pv.description.as_deref()?))))
        .collect();
    if !descriptions.is_empty() {
        entity.extensions.insert(VALUE_DESCRIPTIONS, ExtValue::Map(descriptions));
    }
    entity
}

fn infer_relationships(name: &str, class: &LinkmlClass, schema: &LinkmlSchema) -> Vec<Relationship> {
    let mut rels = Vec::new();
    for (attr_name, attr) in &class.attributes {
        let Some(range) = attr.range.as_deref() else {
            continue;
        };
        if schema.classes.contains_key(range) {
            let multivalued = attr.multivalued == Some(true);
            rels.push(
                Relationship::new(name, range, RelationshipType::Association)
                    .with_label(attr_name)
                    .with_cardinality(None, Some(if multivalued { "*" } else { "1" })),
            );
        }
    }
    if let Some(parent) = class.is_a.as_deref().filter(|p| schema.classes.contains_key(*p)) {
        rels.push(Relationship::new(name, parent, RelationshipType::Inheritance));
    }
    for mixin in class.mixins.iter().filter(|m| schema.classes.contains_key(*m)) {
        rels.push(Relationship::new(name, mixin, RelationshipType::Inheritance).with_label("mixin"));
    }
    rels
}

fn entity_to_class(entity: &Entity, model: &UniversalModel) -> LinkmlClass {
    let ext = &entity.extensions;
    let (is_a, mixins) = if ext.contains(IS_A) || ext.contains(MIXINS) {
        (ext.get_str(IS_A).map(str::to_string), ext.get_strings(MIXINS))
    } else {
        let mut is_a = None;
        let mut mixins = Vec::new();
        for rel in model.relationships_from(&entity.label, RelationshipType::Inheritance) {
            let target = rel.target_entity_label.clone();
            if rel.label.is_none() && is_a.is_none() {
                is_a = Some(target);
            } else {
                mixins.push(target);
            }
        }
        (is_a, mixins)
    };
    LinkmlClass {
        description: entity.description.clone(),
        is_a,
        mixins,
        is_abstract: ext.flag(keys::IS_ABSTRACT),
        attributes: entity
            .properties
            .iter()
            .map(|p| (p.label.clone(), property_to_attribute(p, model)))
            .collect(),
    }
}

fn property_to_attribute(property: &Property, model: &UniversalModel) -> LinkmlAttribute {
    let ext = &property.extensions;
    let mut multivalued = ext.get_bool(MULTIVALUED);
    let range = if ext.flag(IMPLICIT_RANGE) {
        None
    } else if property.ty.universal_type == UniversalType::Other {
        let token = property.ty.domain_specific_type.as_str();
        match element_type(token).filter(|e| model.has_entity(e)) {
            Some(element) => {
                multivalued = Some(true);
                Some(element.to_string())
            }
            None => Some(token.to_string()),
        }
    } else {
        Some(LINKML_VOCABULARY.render(&property.ty))
    };
    LinkmlAttribute {
        description: property.description.clone(),
        range,
        required: property
            .required
            .or_else(|| (!property.is_nullable()).then_some(true)),
        multivalued,
        identifier: if ext.flag(keys::IS_PRIMARY_KEY) {
            Some(true)
        } else {
            ext.get_bool(IDENTIFIER)
        },
        pattern: ext.get_str(PATTERN).map(str::to_string),
    }
}

fn entity_to_enum(entity: &Entity) -> LinkmlEnum {
    let descriptions = entity.extensions.get(VALUE_DESCRIPTIONS).and_then(ExtValue::as_map);
    LinkmlEnum {
        description: entity.description.clone(),
        permissible_values: entity
            .extensions
            .get_strings(keys::ENUM_VALUES)
            .into_iter()
            .map(|value| {
                let description = descriptions
                    .and_then(|d| d.get(&value))
                    .and_then(ExtValue::as_str)
                    .map(str::to_string);
                (value, PermissibleValue { description })
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linkml::parser::parse_linkml;
    use crate::universal::{Type, UniversalFormat};

    const BLOG: &str = "
schema:
  id: https://example.org/blog
  name: blog
  prefixes:
    linkml: https://w3id.org/linkml/
  default_range: string
  imports:
    - linkml:types
  classes:
    Named:
      abstract: true
      attributes:
        name:
          description: display name
    User:
      is_a: Named
      mixins:
        - Auditable
      attributes:
        id:
          range: integer
          identifier: true
        email:
          required: true
          pattern: '^\\S+@\\S+$'
        posts:
          range: Post
          multivalued: true
        status:
          range: Status
    Post:
      attributes:
        author:
          range: User
          required: false
    Auditable:
  enums:
    Status:
      permissible_values:
        ACTIVE:
          description: can log in
        BLOCKED:
";

    #[test]
    fn round_trip_preserves_schema() {
        let model = parse_linkml(BLOG).unwrap();
        let back = linkml_from_universal(&linkml_to_universal(&model));
        assert_eq!(back, model);
    }

    #[test]
    fn classes_enums_and_relationships() {
        let universal = linkml_to_universal(&parse_linkml(BLOG).unwrap());
        let labels: Vec<_> = universal.entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Named", "User", "Post", "Auditable", "Status"]);
        assert!(universal.entity("Status").is_some_and(Entity::is_enum));

        let user = universal.entity("User").unwrap();
        assert_eq!(user.property("email").and_then(|p| p.required), Some(true));
        assert_eq!(user.property("id").map(|p| p.ty.universal_type), Some(UniversalType::Number));

        let summary: Vec<_> = universal
            .relationships
            .iter()
            .map(|r| {
                (
                    r.source_entity_label.as_str(),
                    r.target_entity_label.as_str(),
                    r.ty,
                    r.target_cardinality.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                ("User", "Post", RelationshipType::Association, Some("*")),
                ("User", "Named", RelationshipType::Inheritance, None),
                ("User", "Auditable", RelationshipType::Inheritance, None),
                ("Post", "User", RelationshipType::Association, Some("1")),
            ]
        );
    }

    #[test]
    fn foreign_model_maps_to_ranges() {
        let mut model = UniversalModel::new();
        model.add_entity(
            Entity::new("User")
                .with_property(
                    Property::new("id", Type::new("BIGINT", UniversalType::Number, Some(UniversalFormat::Long)))
                        .with_extension(keys::IS_NULLABLE, false)
                        .with_extension(keys::IS_PRIMARY_KEY, true),
                )
                .with_property(Property::new("posts", Type::other("List<Post>"))),
        );
        model.add_entity(Entity::new("Post"));
        let schema = linkml_from_universal(&model).schema;
        let id = &schema.classes["User"].attributes["id"];
        assert_eq!(id.range.as_deref(), Some("integer"));
        assert_eq!(id.required, Some(true));
        assert_eq!(id.identifier, Some(true));
        let posts = &schema.classes["User"].attributes["posts"];
        assert_eq!(posts.range.as_deref(), Some("Post"));
        assert_eq!(posts.multivalued, Some(true));
        assert_eq!(posts.required, None);
    }
}
