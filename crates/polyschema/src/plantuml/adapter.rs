//! PlantUML ↔ Universal Model.
//!
//! Relations are explicit in a diagram, so nothing is inferred from member
//! types. Methods travel as `methods` signatures.

use super::model::{
    PlantUmlDiagram, PumlClass, PumlKind, PumlMember, PumlParameter, PumlRelation,
    PumlRelationKind, Visibility,
};
use super::vocabulary::PLANTUML_VOCABULARY;
use crate::extensions::{ExtValue, MethodSignature, keys};
use crate::traits::Adapter;
use crate::universal::{
    Entity, Property, Relationship, RelationshipType, Type, UniversalModel, UniversalType,
};

pub const STEREOTYPE: &str = "stereotype";
/// The member was declared without a type.
pub const UNTYPED: &str = "untyped";

const IMPLEMENTS: &str = "implements";

pub struct PlantUmlAdapter;

impl Adapter for PlantUmlAdapter {
    type Model = PlantUmlDiagram;

    fn to_universal(&self, diagram: &PlantUmlDiagram) -> UniversalModel {
        let mut universal = UniversalModel {
            name: diagram.title.clone(),
            ..Default::default()
        };
        for class in &diagram.classes {
            universal.add_entity(class_to_entity(class));
        }
        for relation in &diagram.relations {
            universal.add_relationship(relation_to_universal(relation));
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> PlantUmlDiagram {
        PlantUmlDiagram {
            title: model.name.clone(),
            classes: model.entities.iter().map(entity_to_class).collect(),
            relations: model
                .relationships
                .iter()
                .map(|r| relation_from_universal(r, model))
                .collect(),
        }
    }
}

pub fn plantuml_to_universal(diagram: &PlantUmlDiagram) -> UniversalModel {
    PlantUmlAdapter.to_universal(diagram)
}

pub fn plantuml_from_universal(model: &UniversalModel) -> PlantUmlDiagram {
    PlantUmlAdapter.from_universal(model)
}

fn class_to_entity(class: &PumlClass) -> Entity {
    let mut entity = Entity::new(&class.name).with_extension(keys::TYPE, class.kind.keyword());
    let ext = &mut entity.extensions;
    ext.insert_flag(keys::IS_ABSTRACT, class.kind == PumlKind::AbstractClass);
    ext.insert_opt(STEREOTYPE, class.stereotype.as_deref());
    if class.kind == PumlKind::Enum {
        let names: Vec<&str> = class.members.iter().map(|m| m.name.as_str()).collect();
        ext.insert(keys::ENUM_VALUES, ExtValue::strings(names));
        return entity;
    }
    let methods: Vec<MethodSignature> = class
        .members
        .iter()
        .filter(|m| m.is_method())
        .map(method_signature)
        .collect();
    MethodSignature::write_all(ext, &methods);
    entity.properties = class
        .members
        .iter()
        .filter(|m| !m.is_method())
        .map(member_to_property)
        .collect();
    entity
}

fn member_to_property(member: &PumlMember) -> Property {
    let ty = match &member.ty {
        Some(ty) => PLANTUML_VOCABULARY.to_universal_type(ty),
        None => Type::new("", UniversalType::String, None),
    };
    let mut property = Property::new(&member.name, ty);
    let ext = &mut property.extensions;
    ext.insert_opt(keys::ACCESS_MODIFIER, member.visibility.map(|v| v.access_modifier()));
    ext.insert_flag(keys::IS_STATIC, member.is_static);
    ext.insert_flag(keys::IS_ABSTRACT, member.is_abstract);
    ext.insert_flag(UNTYPED, member.ty.is_none());
    property
}

fn method_signature(member: &PumlMember) -> MethodSignature {
    MethodSignature {
        name: member.name.clone(),
        return_type: member.ty.clone(),
        parameters: member
            .parameters
            .iter()
            .flatten()
            .map(|p| (p.name.clone(), p.ty.clone().unwrap_or_default()))
            .collect(),
        access_modifier: member.visibility.map(|v| v.access_modifier().to_string()),
        is_static: member.is_static,
        is_abstract: member.is_abstract,
        annotations: Vec::new(),
    }
}

fn relation_to_universal(relation: &PumlRelation) -> Relationship {
    let (ty, label) = match relation.kind {
        PumlRelationKind::Extension => (RelationshipType::Inheritance, relation.label.clone()),
        PumlRelationKind::Implementation => (
            RelationshipType::Inheritance,
            Some(relation.label.clone().unwrap_or_else(|| IMPLEMENTS.to_string())),
        ),
        PumlRelationKind::Composition => (RelationshipType::Composition, relation.label.clone()),
        PumlRelationKind::Aggregation => (RelationshipType::Aggregation, relation.label.clone()),
        PumlRelationKind::Association => (RelationshipType::Association, relation.label.clone()),
        PumlRelationKind::Dependency => (RelationshipType::Dependency, relation.label.clone()),
    };
    Relationship {
        source_entity_label: relation.source.clone(),
        target_entity_label: relation.target.clone(),
        ty,
        label,
        source_cardinality: relation.source_cardinality.clone(),
        target_cardinality: relation.target_cardinality.clone(),
    }
}

fn entity_kind(entity: &Entity) -> PumlKind {
    let kind = entity.kind().and_then(PumlKind::from_keyword);
    match kind {
        Some(PumlKind::Class) | None if entity.extensions.flag(keys::IS_ABSTRACT) => {
            PumlKind::AbstractClass
        }
        Some(kind) => kind,
        None => PumlKind::Class,
    }
}

fn entity_to_class(entity: &Entity) -> PumlClass {
    let ext = &entity.extensions;
    let kind = entity_kind(entity);
    let mut class = PumlClass::new(&entity.label, kind);
    class.stereotype = ext.get_str(STEREOTYPE).map(str::to_string);
    if kind == PumlKind::Enum {
        class.members = ext
            .get_strings(keys::ENUM_VALUES)
            .into_iter()
            .map(|name| PumlMember::field(name, None))
            .collect();
        return class;
    }
    class.members = entity.properties.iter().map(property_to_member).collect();
    class.members.extend(MethodSignature::read_all(ext).iter().map(method_member));
    class
}

fn property_to_member(property: &Property) -> PumlMember {
    let ext = &property.extensions;
    let ty = if ext.flag(UNTYPED) {
        None
    } else {
        Some(PLANTUML_VOCABULARY.render(&property.ty))
    };
    PumlMember {
        visibility: ext
            .get_str(keys::ACCESS_MODIFIER)
            .and_then(Visibility::from_access_modifier),
        is_static: ext.flag(keys::IS_STATIC),
        is_abstract: ext.flag(keys::IS_ABSTRACT),
        ..PumlMember::field(&property.label, ty.as_deref())
    }
}

fn method_member(signature: &MethodSignature) -> PumlMember {
    PumlMember {
        visibility: signature
            .access_modifier
            .as_deref()
            .and_then(Visibility::from_access_modifier),
        name: signature.name.clone(),
        ty: signature.return_type.clone(),
        is_static: signature.is_static,
        is_abstract: signature.is_abstract,
        parameters: Some(
            signature
                .parameters
                .iter()
                .map(|(name, ty)| PumlParameter {
                    name: name.clone(),
                    ty: Some(ty.clone()).filter(|t| !t.is_empty()),
                })
                .collect(),
        ),
    }
}

fn relation_from_universal(rel: &Relationship, model: &UniversalModel) -> PumlRelation {
    let is_interface = |label: &str| model.entity(label).and_then(Entity::kind) == Some("interface");
    let mut label = rel.label.clone();
    let kind = match rel.ty {
        RelationshipType::Inheritance => {
            let implements = label.as_deref() == Some(IMPLEMENTS)
                || (is_interface(&rel.target_entity_label) && !is_interface(&rel.source_entity_label));
            if label.as_deref() == Some(IMPLEMENTS) {
                label = None;
            }
            if implements {
                PumlRelationKind::Implementation
            } else {
                PumlRelationKind::Extension
            }
        }
        RelationshipType::Composition => PumlRelationKind::Composition,
        RelationshipType::Aggregation => PumlRelationKind::Aggregation,
        RelationshipType::Association => PumlRelationKind::Association,
        RelationshipType::Dependency => PumlRelationKind::Dependency,
    };
    PumlRelation {
        source: rel.source_entity_label.clone(),
        target: rel.target_entity_label.clone(),
        kind,
        label,
        source_cardinality: rel.source_cardinality.clone(),
        target_cardinality: rel.target_cardinality.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plantuml::parser::parse_plantuml;
    use crate::plantuml::writer::write_plantuml;
    use crate::universal::UniversalFormat;

    const SHOP: &str = r#"@startuml
title Shop
abstract class Product <<Entity>> {
  -id : Long
  +name : String
  note
  {static} +count : int
  {abstract} +price(currency : String) : BigDecimal
}
interface Priced
class Book
enum Status {
  OPEN
  CLOSED
}
Book --|> Product
Product ..|> Priced
Order "1" *-- "*" Line : lines
@enduml
"#;

    #[test]
    fn round_trip_preserves_diagram() {
        let diagram = parse_plantuml(SHOP).unwrap();
        let back = plantuml_from_universal(&plantuml_to_universal(&diagram));
        assert_eq!(back, diagram);
    }

    #[test]
    fn text_round_trip_is_stable() {
        let diagram = parse_plantuml(SHOP).unwrap();
        let text = write_plantuml(&diagram).unwrap();
        assert_eq!(parse_plantuml(&text).unwrap(), diagram);
        assert_eq!(write_plantuml(&parse_plantuml(&text).unwrap()).unwrap(), text);
    }

    #[test]
    fn mapping_to_universal() {
        let universal = plantuml_to_universal(&parse_plantuml(SHOP).unwrap());
        assert_eq!(universal.name.as_deref(), Some("Shop"));
        let product = universal.entity("Product").unwrap();
        assert_eq!(product.kind(), Some("abstract class"));
        assert!(product.extensions.flag(keys::IS_ABSTRACT));
        assert_eq!(product.properties.len(), 4);
        assert_eq!(MethodSignature::read_all(&product.extensions)[0].name, "price");
        assert_eq!(
            universal.entity("Status").map(|e| e.extensions.get_strings(keys::ENUM_VALUES)),
            Some(vec!["OPEN".to_string(), "CLOSED".to_string()])
        );

        let implements = &universal.relationships[1];
        assert_eq!(implements.ty, RelationshipType::Inheritance);
        assert_eq!(implements.label.as_deref(), Some("implements"));
        assert_eq!(universal.relationships[2].ty, RelationshipType::Composition);
    }

    #[test]
    fn foreign_types_and_access() {
        let mut model = UniversalModel::new();
        model.add_entity(
            Entity::new("User")
                .with_extension(keys::TYPE, "record")
                .with_property(
                    Property::new(
                        "id",
                        Type::new("BIGINT", UniversalType::Number, Some(UniversalFormat::Long)),
                    )
                    .with_extension(keys::ACCESS_MODIFIER, "internal"),
                ),
        );
        model.add_entity(Entity::new("Named").with_extension(keys::TYPE, "interface"));
        model.add_relationship(Relationship::new("User", "Named", RelationshipType::Inheritance));
        let diagram = plantuml_from_universal(&model);
        assert_eq!(diagram.classes[0].kind, PumlKind::Class);
        assert_eq!(diagram.classes[0].members[0], PumlMember {
            visibility: Some(Visibility::Package),
            ..PumlMember::field("id", Some("long"))
        });
        assert_eq!(diagram.relations[0].kind, PumlRelationKind::Implementation);
    }
}
