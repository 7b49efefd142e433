//! Java ↔ Universal Model.

use super::model::{ClassKind, JavaClass, JavaField, JavaMethod, JavaModel, JavaParameter};
use super::vocabulary::JAVA_VOCABULARY;
use crate::extensions::{AnnotationRef, ExtValue, Extensions, MethodSignature, keys};
use crate::text::{base_name, element_type};
use crate::traits::Adapter;
use crate::universal::{Entity, Property, Relationship, RelationshipType, UniversalModel};
use std::collections::HashSet;

pub const PACKAGE: &str = "package";
pub const IMPORTS: &str = "imports";
pub const TYPE_PARAMETERS: &str = "typeParameters";
pub const RECORD_COMPONENT: &str = "recordComponent";

/// Marker for Java's default (package-private) access in the side channel.
const PACKAGE_PRIVATE: &str = "package";

pub struct JavaAdapter;

impl Adapter for JavaAdapter {
    type Model = JavaModel;

    fn to_universal(&self, model: &JavaModel) -> UniversalModel {
        let mut universal = UniversalModel::new();
        universal.extensions.insert_opt(PACKAGE, model.package.as_deref());
        if !model.imports.is_empty() {
            universal.extensions.insert(IMPORTS, ExtValue::strings(&model.imports));
        }
        for class in &model.classes {
            universal.add_entity(class_to_entity(class));
        }
        let names: HashSet<&str> = model.classes.iter().map(|c| c.name.as_str()).collect();
        for class in &model.classes {
            for rel in infer_relationships(class, &names) {
                universal.add_relationship(rel);
            }
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> JavaModel {
        JavaModel {
            package: model.extensions.get_str(PACKAGE).map(str::to_string),
            imports: model.extensions.get_strings(IMPORTS),
            classes: model
                .entities
                .iter()
                .map(|entity| entity_to_class(entity, model))
                .collect(),
        }
    }
}

pub fn java_to_universal(model: &JavaModel) -> UniversalModel {
    JavaAdapter.to_universal(model)
}

pub fn java_from_universal(model: &UniversalModel) -> JavaModel {
    JavaAdapter.from_universal(model)
}

fn access_or_package(access: &Option<String>) -> &str {
    access.as_deref().unwrap_or(PACKAGE_PRIVATE)
}

fn class_to_entity(class: &JavaClass) -> Entity {
    let mut entity = Entity::new(&class.name);
    let ext = &mut entity.extensions;
    ext.insert(keys::TYPE, class.kind.keyword());
    ext.insert(keys::ACCESS_MODIFIER, access_or_package(&class.access_modifier));
    ext.insert_flag(keys::IS_ABSTRACT, class.is_abstract);
    ext.insert_flag(keys::IS_FINAL, class.is_final);
    ext.insert_flag(keys::IS_STATIC, class.is_static);
    AnnotationRef::write_all(ext, &class.annotations);
    ext.insert_opt(TYPE_PARAMETERS, class.type_parameters.as_deref());
    ext.insert(keys::EXTENDS, ExtValue::strings(&class.extends));
    ext.insert(keys::IMPLEMENTS, ExtValue::strings(&class.implements));
    if !class.enum_constants.is_empty() {
        ext.insert(keys::ENUM_VALUES, ExtValue::strings(&class.enum_constants));
    }
    let methods: Vec<MethodSignature> = class.methods.iter().map(method_signature).collect();
    MethodSignature::write_all(ext, &methods);

    entity.properties = class
        .components
        .iter()
        .map(|c| {
            Property::new(&c.name, JAVA_VOCABULARY.to_universal_type(&c.ty))
                .with_extension(RECORD_COMPONENT, true)
        })
        .chain(class.fields.iter().map(field_to_property))
        .collect();
    entity
}

fn field_to_property(field: &JavaField) -> Property {
    let mut property = Property::new(&field.name, JAVA_VOCABULARY.to_universal_type(&field.ty));
    let ext = &mut property.extensions;
    ext.insert(keys::ACCESS_MODIFIER, access_or_package(&field.access_modifier));
    ext.insert_flag(keys::IS_STATIC, field.is_static);
    ext.insert_flag(keys::IS_FINAL, field.is_final);
    AnnotationRef::write_all(ext, &field.annotations);
    ext.insert_opt(keys::DEFAULT_VALUE, field.initializer.as_deref());
    if field
        .annotations
        .iter()
        .any(|a| matches!(a.name.as_str(), "NotNull" | "NonNull" | "Nonnull"))
    {
        ext.insert(keys::IS_NULLABLE, false);
    }
    property
}

fn method_signature(method: &JavaMethod) -> MethodSignature {
    MethodSignature {
        name: method.name.clone(),
        return_type: method.return_type.clone(),
        parameters: method
            .parameters
            .iter()
            .map(|p| (p.name.clone(), p.ty.clone()))
            .collect(),
        access_modifier: Some(access_or_package(&method.access_modifier).to_string()),
        is_static: method.is_static,
        is_abstract: method.is_abstract,
        annotations: method.annotations.clone(),
    }
}

fn infer_relationships(class: &JavaClass, names: &HashSet<&str>) -> Vec<Relationship> {
    let mut rels = Vec::new();
    let fields = class
        .components
        .iter()
        .map(|c| (c.name.as_str(), c.ty.as_str()))
        .chain(class.fields.iter().map(|f| (f.name.as_str(), f.ty.as_str())));
    for (name, ty) in fields {
        if names.contains(ty.trim()) {
            rels.push(
                Relationship::new(&class.name, ty.trim(), RelationshipType::Association)
                    .with_label(name)
                    .with_cardinality(None, Some("1")),
            );
        } else if let Some(element) = element_type(ty).filter(|e| names.contains(e)) {
            rels.push(
                Relationship::new(&class.name, element, RelationshipType::Association)
                    .with_label(name)
                    .with_cardinality(None, Some("*")),
            );
        }
    }
    for parent in class.extends.iter().map(|p| base_name(p)) {
        if names.contains(parent) {
            rels.push(Relationship::new(&class.name, parent, RelationshipType::Inheritance));
        }
    }
    for parent in class.implements.iter().map(|p| base_name(p)) {
        if names.contains(parent) {
            rels.push(
                Relationship::new(&class.name, parent, RelationshipType::Inheritance)
                    .with_label("implements"),
            );
        }
    }
    rels
}

/// Java access keyword for a side-channel value, or `fallback` when foreign.
fn java_access(ext: &Extensions, fallback: &str) -> Option<String> {
    let value = match ext.get_str(keys::ACCESS_MODIFIER) {
        Some(v @ ("public" | "protected" | "private" | PACKAGE_PRIVATE)) => v,
        Some(other) => {
            tracing::debug!(access = other, fallback, "access modifier has no Java form");
            fallback
        }
        None => fallback,
    };
    (value != PACKAGE_PRIVATE).then(|| value.to_string())
}

fn entity_to_class(entity: &Entity, model: &UniversalModel) -> JavaClass {
    let ext = &entity.extensions;
    let kind = match entity.kind() {
        Some("interface") => ClassKind::Interface,
        Some("enum") => ClassKind::Enum,
        Some("record") => ClassKind::Record,
        _ => ClassKind::Class,
    };
    let mut class = JavaClass::new(&entity.label, kind);
    class.access_modifier = java_access(ext, "public");
    class.is_abstract = ext.flag(keys::IS_ABSTRACT) || entity.kind() == Some("abstract class");
    class.is_final = ext.flag(keys::IS_FINAL);
    class.is_static = ext.flag(keys::IS_STATIC);
    class.annotations = AnnotationRef::read_all(ext);
    class.type_parameters = ext.get_str(TYPE_PARAMETERS).map(str::to_string);
    class.enum_constants = ext.get_strings(keys::ENUM_VALUES);

    if ext.contains(keys::EXTENDS) || ext.contains(keys::IMPLEMENTS) {
        class.extends = ext.get_strings(keys::EXTENDS);
        class.implements = ext.get_strings(keys::IMPLEMENTS);
    } else {
        for rel in model.relationships_from(&entity.label, RelationshipType::Inheritance) {
            let target = rel.target_entity_label.clone();
            let parent_is_interface =
                model.entity(&target).and_then(Entity::kind) == Some("interface");
            if kind == ClassKind::Interface || (!parent_is_interface && class.extends.is_empty()) {
                class.extends.push(target);
            } else {
                class.implements.push(target);
            }
        }
    }

    for property in &entity.properties {
        let ty = JAVA_VOCABULARY.render(&property.ty);
        if kind == ClassKind::Record && property.extensions.flag(RECORD_COMPONENT) {
            class.components.push(JavaParameter {
                ty,
                name: property.label.clone(),
            });
            continue;
        }
        let pext = &property.extensions;
        class.fields.push(JavaField {
            name: property.label.clone(),
            ty,
            access_modifier: java_access(pext, "private"),
            is_static: pext.flag(keys::IS_STATIC),
            is_final: pext.flag(keys::IS_FINAL),
            annotations: AnnotationRef::read_all(pext),
            initializer: pext.get_str(keys::DEFAULT_VALUE).map(str::to_string),
        });
    }

    class.methods = MethodSignature::read_all(ext)
        .into_iter()
        .map(|sig| {
            let mut sig_ext = Extensions::new();
            sig_ext.insert_opt(keys::ACCESS_MODIFIER, sig.access_modifier.as_deref());
            JavaMethod {
                access_modifier: java_access(&sig_ext, "public"),
                name: sig.name,
                return_type: sig.return_type,
                parameters: sig
                    .parameters
                    .into_iter()
                    .map(|(name, ty)| JavaParameter { ty, name })
                    .collect(),
                is_static: sig.is_static,
                is_abstract: sig.is_abstract,
                annotations: sig.annotations,
                body: None,
            }
        })
        .collect();
    class
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::java::parser::parse_java;
    use crate::universal::{Type, UniversalType};

    fn without_bodies(mut model: JavaModel) -> JavaModel {
        for class in &mut model.classes {
            for method in &mut class.methods {
                method.body = None;
            }
        }
        model
    }

    #[test]
    fn round_trip_preserves_claimed_fields() {
        let src = r#"
            package app;
            import java.util.List;

            @Entity
            public abstract class User extends Base implements Named {
                @Id private Long id;
                String nick = "x";
                protected static final int MAX = 3;
                private List<Post> posts;
                public abstract String name();
                User(Long id) { this.id = id; }
            }
            interface Named { String name(); }
            enum Role { ADMIN, GUEST }
            record Pair<A, B>(A left, B right) { static int count; }
        "#;
        let model = parse_java(src).unwrap();
        let back = java_from_universal(&java_to_universal(&model));
        assert_eq!(back, without_bodies(model));
    }

    #[test]
    fn relationship_inference_is_deterministic() {
        let model = parse_java("class User { Post post; } class Post { }").unwrap();
        let universal = java_to_universal(&model);
        assert_eq!(universal.relationships.len(), 1);
        let rel = &universal.relationships[0];
        assert_eq!(
            (rel.source_entity_label.as_str(), rel.target_entity_label.as_str(), rel.ty),
            ("User", "Post", RelationshipType::Association)
        );
    }

    #[test]
    fn collections_and_inheritance() {
        let src = "class A extends B implements I { List<C> cs; C[] more; Map<String, C> byName; }
                   class B {} interface I {} class C {}";
        let universal = java_to_universal(&parse_java(src).unwrap());
        let summary: Vec<_> = universal
            .relationships
            .iter()
            .map(|r| {
                (
                    r.target_entity_label.as_str(),
                    r.ty,
                    r.label.as_deref(),
                    r.target_cardinality.as_deref(),
                )
            })
            .collect();
        assert_eq!(
            summary,
            [
                ("C", RelationshipType::Association, Some("cs"), Some("*")),
                ("C", RelationshipType::Association, Some("more"), Some("*")),
                ("B", RelationshipType::Inheritance, None, None),
                ("I", RelationshipType::Inheritance, Some("implements"), None),
            ]
        );
    }

    #[test]
    fn foreign_model_gets_java_defaults() {
        let mut model = UniversalModel::new();
        model.add_entity(
            Entity::new("users")
                .with_property(Property::new("id", Type::new("INT", UniversalType::Number, None)))
                .with_property(
                    Property::new("name", Type::new("VARCHAR(255)", UniversalType::String, None))
                        .with_extension(keys::ACCESS_MODIFIER, "internal"),
                ),
        );
        let class = &java_from_universal(&model).classes[0];
        assert_eq!(class.access_modifier.as_deref(), Some("public"));
        assert_eq!(class.kind, ClassKind::Class);
        let fields: Vec<_> = class
            .fields
            .iter()
            .map(|f| (f.ty.as_str(), f.access_modifier.as_deref()))
            .collect();
        assert_eq!(fields, [("int", Some("private")), ("String", Some("private"))]);
    }
}
