//! OFN ↔ Universal Model.
//!
//! Classes become entities; properties and relations attach to the class named
//! by their `domain`. Language-tagged text is flattened to `name@cs` style
//! keys and reassembled on the way back.

use super::model::{CLASS, LangString, OfnConcept, OfnModel, PROPERTY, RELATION, TERM};
use super::vocabulary;
use crate::extensions::{ExtValue, Extensions, keys};
use crate::text::element_type;
use crate::traits::Adapter;
use crate::universal::{
    Entity, Property, Relationship, RelationshipType, Type, UniversalModel, UniversalType,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub const CONTEXT: &str = "@context";
pub const OFN_TYPES: &str = "ofnTypes";
pub const CREATED: &str = "created";
pub const UPDATED: &str = "updated";
pub const SUB_CLASS_OF: &str = "subClassOf";
pub const EQUIVALENT: &str = "equivalent";
pub const ALTERNATIVE_NAMES: &str = "alternativeNames";
/// The concept had no `range`.
pub const IMPLICIT_RANGE: &str = "implicitRange";
/// Keys the model has no field for.
pub const EXTRA: &str = "ofnExtra";

const NAME: &str = "name";
const DESCRIPTION: &str = "description";
const DEFINITION: &str = "definition";

pub struct OfnAdapter;

impl Adapter for OfnAdapter {
    type Model = OfnModel;

    fn to_universal(&self, model: &OfnModel) -> UniversalModel {
        let mut universal = UniversalModel {
            id: model.iri.clone(),
            name: pick_lang(&model.name),
            ..Default::default()
        };
        let ext = &mut universal.extensions;
        if let Some(context) = &model.context {
            ext.insert(CONTEXT, ExtValue::from(context.clone()));
        }
        if !model.types.is_empty() {
            ext.insert(OFN_TYPES, ExtValue::strings(&model.types));
        }
        flatten_lang(ext, NAME, &model.name);
        flatten_lang(ext, DESCRIPTION, &model.description);
        if let Some(created) = &model.created {
            ext.insert(CREATED, ExtValue::from(created.clone()));
        }
        if let Some(updated) = &model.updated {
            ext.insert(UPDATED, ExtValue::from(updated.clone()));
        }
        insert_extra(ext, &model.other);

        let live: Vec<&OfnConcept> = model.concepts.iter().filter(|c| !c.is_ignored()).collect();
        let classes: HashMap<String, String> = live
            .iter()
            .filter(|c| c.is_class())
            .map(|c| (c.reference(), c.label()))
            .collect();

        let mut rels = Vec::new();
        for concept in &live {
            if concept.is_class() {
                universal.add_entity(class_to_entity(concept));
                for parent in concept.sub_class_of.iter().filter_map(|p| classes.get(p)) {
                    rels.push(Relationship::new(concept.label(), parent, RelationshipType::Inheritance));
                }
            }
        }
        for concept in &live {
            if concept.is_class() || !(concept.is_property() || concept.is_relation()) {
                if !concept.is_class() {
                    tracing::debug!(concept = %concept.label(), types = ?concept.types, "skipping untyped concept");
                }
                continue;
            }
            let Some(owner) = concept.domain.as_ref().and_then(|d| classes.get(d)) else {
                tracing::debug!(concept = %concept.label(), "no class for domain, skipping");
                continue;
            };
            let target = concept.range.as_ref().and_then(|r| classes.get(r));
            if let (true, Some(target)) = (concept.is_relation(), target) {
                rels.push(
                    Relationship::new(owner, target, RelationshipType::Association)
                        .with_label(concept.label()),
                );
            }
            let property = concept_to_property(concept, target);
            if let Some(entity) = universal.entities.iter_mut().find(|e| &e.label == owner) {
                entity.properties.push(property);
            }
        }
        for rel in rels {
            universal.add_relationship(rel);
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> OfnModel {
        let ext = &model.extensions;
        let mut ofn = OfnModel {
            context: ext.get(CONTEXT).cloned().map(Value::from),
            iri: model.id.clone(),
            types: ext.get_strings(OFN_TYPES),
            name: gather_lang(ext, NAME),
            description: gather_lang(ext, DESCRIPTION),
            created: ext.get(CREATED).cloned().map(Value::from),
            updated: ext.get(UPDATED).cloned().map(Value::from),
            other: extra(ext),
            ..Default::default()
        };
        if ofn.name.is_empty()
            && let Some(name) = &model.name
        {
            ofn.name.insert("cs".into(), name.clone());
        }
        let iris: HashMap<&str, String> = model
            .entities
            .iter()
            .map(|e| (e.label.as_str(), entity_iri(e, model.id.as_deref())))
            .collect();
        for entity in &model.entities {
            ofn.concepts.push(entity_to_class(entity, model, &iris));
            for property in &entity.properties {
                ofn.concepts.push(property_to_concept(property, entity, model, &iris));
            }
        }
        ofn
    }
}

pub fn ofn_to_universal(model: &OfnModel) -> UniversalModel {
    OfnAdapter.to_universal(model)
}

pub fn ofn_from_universal(model: &UniversalModel) -> OfnModel {
    OfnAdapter.from_universal(model)
}

fn pick_lang(text: &LangString) -> Option<String> {
    text.get("cs").or_else(|| text.values().next()).cloned()
}

fn flatten_lang(ext: &mut Extensions, field: &str, text: &LangString) {
    for (lang, value) in text {
        ext.insert(format!("{field}@{lang}"), value.as_str());
    }
}

fn gather_lang(ext: &Extensions, field: &str) -> LangString {
    ext.iter()
        .filter_map(|(key, value)| {
            let (name, lang) = key.split_once('@')?;
            if name != field {
                return None;
            }
            Some((lang.to_string(), value.as_str()?.to_string()))
        })
        .collect()
}

fn insert_extra(ext: &mut Extensions, other: &Map<String, Value>) {
    if !other.is_empty() {
        ext.insert(EXTRA, ExtValue::from(Value::Object(other.clone())));
    }
}

/// Unknown keys, in their original order when the side channel kept them.
fn extra(ext: &Extensions) -> Map<String, Value> {
    match ext.get(EXTRA).cloned().map(Value::from) {
        Some(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn common_extensions(concept: &OfnConcept) -> Extensions {
    let mut ext = Extensions::new();
    ext.insert_opt(keys::IRI, concept.iri.as_deref());
    ext.insert(OFN_TYPES, ExtValue::strings(&concept.types));
    flatten_lang(&mut ext, NAME, &concept.name);
    flatten_lang(&mut ext, DESCRIPTION, &concept.description);
    flatten_lang(&mut ext, DEFINITION, &concept.definition);
    if !concept.alternative_names.is_empty() {
        let names = serde_json::to_value(&concept.alternative_names).unwrap_or(Value::Null);
        ext.insert(ALTERNATIVE_NAMES, ExtValue::from(names));
    }
    if !concept.equivalent.is_empty() {
        ext.insert(EQUIVALENT, ExtValue::strings(&concept.equivalent));
    }
    insert_extra(&mut ext, &concept.other);
    ext
}

fn class_to_entity(concept: &OfnConcept) -> Entity {
    let mut entity = Entity::new(concept.label());
    entity.description = pick_lang(&concept.description);
    entity.extensions = common_extensions(concept);
    entity.extensions.insert(keys::TYPE, "class");
    entity
        .extensions
        .insert(SUB_CLASS_OF, ExtValue::strings(&concept.sub_class_of));
    entity
}

/// `target` is the class label of a relation's range.
fn concept_to_property(concept: &OfnConcept, target: Option<&String>) -> Property {
    let ty = match (target, concept.range.as_deref()) {
        (Some(label), _) => Type::other(label),
        (None, Some(range)) if concept.is_relation() => Type::other(range),
        (None, Some(range)) => vocabulary::to_universal_type(range),
        (None, None) => vocabulary::to_universal_type("xsd:string"),
    };
    let mut property = Property::new(concept.label(), ty);
    property.description = pick_lang(&concept.description);
    property.extensions = common_extensions(concept);
    property
        .extensions
        .insert_flag(IMPLICIT_RANGE, concept.range.is_none());
    property
}

/// Stored IRI, else one minted under the vocabulary IRI, else the label.
fn entity_iri(entity: &Entity, base: Option<&str>) -> String {
    if let Some(iri) = entity.extensions.get_str(keys::IRI) {
        return iri.to_string();
    }
    match base {
        Some(base) => format!("{}/pojem/{}", base.trim_end_matches('/'), slug(&entity.label)),
        None => entity.label.clone(),
    }
}

/// `OrderLine` → `order-line`.
fn slug(label: &str) -> String {
    let mut out = String::new();
    for (i, c) in label.chars().enumerate() {
        if c.is_uppercase() && i > 0 && !out.ends_with('-') {
            out.push('-');
        }
        if c.is_whitespace() || c == '_' {
            if !out.ends_with('-') {
                out.push('-');
            }
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn concept_base(ext: &Extensions, label: &str, fallback_types: &[&str]) -> OfnConcept {
    let mut name = gather_lang(ext, NAME);
    if name.is_empty() {
        name.insert("cs".into(), label.to_string());
    }
    let types = match ext.get_list(OFN_TYPES) {
        Some(_) => ext.get_strings(OFN_TYPES),
        None => fallback_types.iter().map(|t| t.to_string()).collect(),
    };
    OfnConcept {
        iri: ext.get_str(keys::IRI).map(str::to_string),
        types,
        name,
        description: gather_lang(ext, DESCRIPTION),
        definition: gather_lang(ext, DEFINITION),
        alternative_names: ext
            .get(ALTERNATIVE_NAMES)
            .cloned()
            .and_then(|v| serde_json::from_value(Value::from(v)).ok())
            .unwrap_or_default(),
        equivalent: ext.get_strings(EQUIVALENT),
        other: extra(ext),
        ..Default::default()
    }
}

fn entity_to_class(entity: &Entity, model: &UniversalModel, iris: &HashMap<&str, String>) -> OfnConcept {
    let ext = &entity.extensions;
    let mut concept = concept_base(ext, &entity.label, &[TERM, CLASS]);
    if concept.iri.is_none() {
        concept.iri = iris.get(entity.label.as_str()).cloned();
    }
    if concept.description.is_empty()
        && let Some(description) = &entity.description
    {
        concept.description.insert("cs".into(), description.clone());
    }
    concept.sub_class_of = if ext.contains(SUB_CLASS_OF) {
        ext.get_strings(SUB_CLASS_OF)
    } else {
        model
            .relationships_from(&entity.label, RelationshipType::Inheritance)
            .filter_map(|r| iris.get(r.target_entity_label.as_str()).cloned())
            .collect()
    };
    concept
}

fn property_to_concept(
    property: &Property,
    owner: &Entity,
    model: &UniversalModel,
    iris: &HashMap<&str, String>,
) -> OfnConcept {
    let ext = &property.extensions;
    let token = property.ty.domain_specific_type.as_str();
    let target = match property.ty.universal_type {
        UniversalType::Other => Some(token)
            .filter(|t| model.has_entity(t))
            .or_else(|| element_type(token).filter(|e| model.has_entity(e))),
        _ => None,
    };
    let stored_relation = ext.get_strings(OFN_TYPES).iter().any(|t| t == RELATION);
    let is_relation = target.is_some() || stored_relation;
    let fallback: &[&str] = if is_relation { &[TERM, RELATION] } else { &[TERM, PROPERTY] };
    let mut concept = concept_base(ext, &property.label, fallback);
    if concept.iri.is_none()
        && let Some(owner_iri) = iris.get(owner.label.as_str())
    {
        concept.iri = Some(format!("{owner_iri}/{}", slug(&property.label)));
    }
    if concept.description.is_empty()
        && let Some(description) = &property.description
    {
        concept.description.insert("cs".into(), description.clone());
    }
    concept.domain = iris.get(owner.label.as_str()).cloned();
    concept.range = if ext.flag(IMPLICIT_RANGE) {
        None
    } else if let Some(target) = target {
        iris.get(target).cloned()
    } else {
        Some(vocabulary::render(&property.ty))
    };
    concept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ofn::parser::parse_ofn;

    const VEHICLES: &str = r#"{
        "@context": "https://ofn.gov.cz/slovníky/draft/kontexty/slovníky.jsonld",
        "iri": "https://example.org/slovník/vozidla",
        "typ": ["Slovník", "Tezaurus"],
        "název": {"cs": "Vozidla", "en": "Vehicles"},
        "vytvořeno": {"typ": "Časový okamžik", "datum": "2024-01-01"},
        "pojmy": [
            {
                "iri": "https://example.org/pojem/osoba",
                "typ": ["Pojem", "Třída"],
                "název": {"cs": "Osoba"}
            },
            {
                "iri": "https://example.org/pojem/vozidlo",
                "typ": ["Pojem", "Třída"],
                "název": {"cs": "Vozidlo", "en": "Vehicle"},
                "definice": {"cs": "Dopravní prostředek"},
                "nadřazená-třída": ["https://example.org/pojem/věc"],
                "související-ustanovení": ["§ 2"]
            },
            {
                "iri": "https://example.org/pojem/vin",
                "typ": ["Pojem", "Vlastnost"],
                "název": {"cs": "VIN"},
                "definiční-obor": "https://example.org/pojem/vozidlo",
                "obor-hodnot": "xsd:string"
            },
            {
                "iri": "https://example.org/pojem/vlastník",
                "typ": ["Pojem", "Vztah"],
                "název": {"cs": "vlastník"},
                "definiční-obor": "https://example.org/pojem/vozidlo",
                "obor-hodnot": "https://example.org/pojem/osoba"
            },
            {
                "iri": "https://example.org/pojem/registrace",
                "typ": ["Pojem", "Vlastnost"],
                "název": {"cs": "registrace"},
                "definiční-obor": "https://example.org/pojem/vozidlo"
            }
        ]
    }"#;

    #[test]
    fn round_trip_preserves_vocabulary() {
        let model = parse_ofn(VEHICLES).unwrap();
        let back = ofn_from_universal(&ofn_to_universal(&model));
        assert_eq!(back, model);
    }

    #[test]
    fn classes_properties_and_relations() {
        let universal = ofn_to_universal(&parse_ofn(VEHICLES).unwrap());
        let labels: Vec<_> = universal.entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["Osoba", "Vozidlo"]);
        let vehicle = universal.entity("Vozidlo").unwrap();
        assert_eq!(vehicle.extensions.get_str("name@en"), Some("Vehicle"));
        assert_eq!(vehicle.extensions.get_str("definition@cs"), Some("Dopravní prostředek"));

        let vin = vehicle.property("VIN").unwrap();
        assert_eq!(vin.ty.universal_type, UniversalType::String);
        let owner = vehicle.property("vlastník").unwrap();
        assert_eq!(owner.ty, Type::other("Osoba"));

        assert_eq!(universal.relationships.len(), 1);
        let rel = &universal.relationships[0];
        assert_eq!(
            (rel.source_entity_label.as_str(), rel.target_entity_label.as_str(), rel.ty),
            ("Vozidlo", "Osoba", RelationshipType::Association)
        );
    }

    #[test]
    fn ignored_concepts_are_skipped() {
        let model = parse_ofn(
            r#"{"pojmy": [
                {"iri": "a", "typ": ["Koncept", "Pojem"], "název": {"cs": "A"}},
                {"iri": "b", "typ": ["Třída", "Koncept"], "název": {"cs": "B"}}
            ]}"#,
        )
        .unwrap();
        let universal = ofn_to_universal(&model);
        let labels: Vec<_> = universal.entities.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(labels, ["B"]);
    }

    #[test]
    fn foreign_model_mints_iris() {
        let mut model = UniversalModel {
            id: Some("https://example.org/slovník/blog".into()),
            name: Some("Blog".into()),
            ..Default::default()
        };
        model.add_entity(
            Entity::new("BlogPost")
                .with_property(Property::new("title", Type::new("String", UniversalType::String, None)))
                .with_property(Property::new("author", Type::other("User"))),
        );
        model.add_entity(Entity::new("User"));
        let ofn = ofn_from_universal(&model);
        assert_eq!(ofn.name.get("cs").map(String::as_str), Some("Blog"));
        let post = &ofn.concepts[0];
        assert_eq!(post.iri.as_deref(), Some("https://example.org/slovník/blog/pojem/blog-post"));
        assert_eq!(post.types, [TERM, CLASS]);
        let title = &ofn.concepts[1];
        assert_eq!(title.types, [TERM, PROPERTY]);
        assert_eq!(title.range.as_deref(), Some("xsd:string"));
        let author = &ofn.concepts[2];
        assert_eq!(author.types, [TERM, RELATION]);
        assert_eq!(author.range.as_deref(), Some("https://example.org/slovník/blog/pojem/user"));
    }
}
