//! JSON Schema ↔ Universal Model.
//!
//! The root object (if any) becomes an entity flagged `isRoot`, each
//! definition another entity. `$ref` properties keep the referenced name as
//! their type and add an association.

use super::model::{JsonSchemaDefinition, JsonSchemaModel, JsonSchemaProperty, SchemaType};
use super::vocabulary::{JSON_SCHEMA_VOCABULARY, split_token, token_of};
use crate::extensions::{ExtValue, Extensions, keys};
use crate::text::element_type;
use crate::traits::Adapter;
use crate::universal::{
    Entity, Property, Relationship, RelationshipType, Type, UniversalModel, UniversalType,
};
use serde_json::Value;
use std::collections::BTreeMap;

pub const IS_ROOT: &str = "isRoot";
pub const SCHEMA: &str = "$schema";
pub const TITLE: &str = "title";
pub const DESCRIPTION: &str = "description";
/// The raw `type` keyword: always for definitions, for properties only when it
/// is not `T` or `[T, "null"]`. `null` records an absent keyword.
pub const JSON_TYPE: &str = "jsonType";
pub const FORMAT: &str = "format";
/// Keywords without a field of their own.
pub const EXTRA: &str = "jsonExtra";

/// Keywords carried under their own name.
const CARRIED: [&str; 7] = [
    "minLength",
    "maxLength",
    "minimum",
    "maximum",
    "pattern",
    "properties",
    "required",
];

const DEFINITIONS_PREFIX: &str = "#/definitions/";
const DEFS_PREFIX: &str = "#/$defs/";

pub struct JsonSchemaAdapter;

impl Adapter for JsonSchemaAdapter {
    type Model = JsonSchemaModel;

    fn to_universal(&self, model: &JsonSchemaModel) -> UniversalModel {
        let mut universal = UniversalModel {
            id: model.id.clone(),
            name: model.title.clone(),
            ..Default::default()
        };
        let ext = &mut universal.extensions;
        ext.insert_opt(SCHEMA, model.schema.as_deref());
        ext.insert_opt(TITLE, model.title.as_deref());
        ext.insert_opt(DESCRIPTION, model.description.as_deref());
        insert_raw_type(ext, model.ty.as_ref());
        insert_extra(ext, &model.other);

        let mut rels = Vec::new();
        if model.has_root_object() {
            let label = root_label(model);
            let mut entity = Entity::new(&label).with_extension(IS_ROOT, true);
            entity.description = model.description.clone();
            entity.properties =
                object_properties(&label, &model.properties, &model.required, model, &mut rels);
            universal.add_entity(entity);
        }
        for (name, definition) in &model.definitions {
            universal.add_entity(definition_to_entity(name, definition, model, &mut rels));
        }
        for rel in rels {
            universal.add_relationship(rel);
        }
        universal
    }

    fn from_universal(&self, model: &UniversalModel) -> JsonSchemaModel {
        let ext = &model.extensions;
        let mut schema = JsonSchemaModel {
            schema: ext.get_str(SCHEMA).map(str::to_string),
            id: model.id.clone(),
            title: ext.get_str(TITLE).map(str::to_string),
            description: ext.get_str(DESCRIPTION).map(str::to_string),
            ty: raw_type(ext).flatten(),
            other: extra(ext),
            ..Default::default()
        };
        for entity in &model.entities {
            if entity.extensions.flag(IS_ROOT) {
                let (properties, required) = entity_properties(entity, model);
                schema.properties = properties;
                schema.required = required;
                if schema.ty.is_none() && !ext.contains(JSON_TYPE) {
                    schema.ty = Some(SchemaType::single("object"));
                }
            } else {
                schema
                    .definitions
                    .insert(entity.label.clone(), entity_to_definition(entity, model));
            }
        }
        schema
    }
}

pub fn json_schema_to_universal(model: &JsonSchemaModel) -> UniversalModel {
    JsonSchemaAdapter.to_universal(model)
}

pub fn json_schema_from_universal(model: &UniversalModel) -> JsonSchemaModel {
    JsonSchemaAdapter.from_universal(model)
}

/// `#/definitions/Post` → `Post`, when `Post` is defined in this document.
fn local_definition<'a>(reference: &'a str, model: &JsonSchemaModel) -> Option<&'a str> {
    reference
        .strip_prefix(DEFINITIONS_PREFIX)
        .or_else(|| reference.strip_prefix(DEFS_PREFIX))
        .filter(|name| model.definitions.contains_key(*name))
}

fn definition_ref(name: &str) -> String {
    format!("{DEFINITIONS_PREFIX}{name}")
}

fn insert_raw_type(ext: &mut Extensions, ty: Option<&SchemaType>) {
    match ty {
        None => ext.insert(JSON_TYPE, ExtValue::Null),
        Some(ty) if !ty.is_simple() => ext.insert(JSON_TYPE, to_ext(ty)),
        Some(_) => {}
    }
}

/// `None` when no raw type was recorded, `Some(None)` for a recorded absence.
fn raw_type(ext: &Extensions) -> Option<Option<SchemaType>> {
    let value = ext.get(JSON_TYPE)?;
    if *value == ExtValue::Null {
        return Some(None);
    }
    match serde_json::from_value(Value::from(value.clone())) {
        Ok(ty) => Some(Some(ty)),
        Err(err) => {
            tracing::debug!(%err, "ignoring malformed {JSON_TYPE}");
            None
        }
    }
}

/// The root entity is labelled by `title` (or `Root`), suffixed when a
/// definition already owns that name.
fn root_label(model: &JsonSchemaModel) -> String {
    let title = model.title.as_deref().unwrap_or("Root");
    let mut label = title.to_string();
    while model.definitions.contains_key(&label) {
        label.push_str("Root");
    }
    if label != title {
        tracing::warn!(title, label = %label, "root title clashes with a definition; renaming root entity");
    }
    label
}

fn insert_extra(ext: &mut Extensions, other: &BTreeMap<String, Value>) {
    if !other.is_empty() {
        ext.insert(EXTRA, to_ext(other));
    }
}

fn extra(ext: &Extensions) -> BTreeMap<String, Value> {
    ext.get(EXTRA)
        .and_then(|value| from_ext(value, EXTRA))
        .unwrap_or_default()
}

fn to_ext<T: serde::Serialize>(value: &T) -> ExtValue {
    serde_json::to_value(value).map(ExtValue::from).unwrap_or(ExtValue::Null)
}

fn definition_to_entity(
    name: &str,
    definition: &JsonSchemaDefinition,
    model: &JsonSchemaModel,
    rels: &mut Vec<Relationship>,
) -> Entity {
    let mut entity = Entity::new(name);
    entity.description = definition.description.clone();
    let ext = &mut entity.extensions;
    ext.insert_opt(TITLE, definition.title.as_deref());
    ext.insert(JSON_TYPE, definition.ty.as_ref().map_or(ExtValue::Null, to_ext));
    if !definition.enum_values.is_empty() {
        ext.insert(keys::TYPE, "enum");
        ext.insert(keys::ENUM_VALUES, to_ext(&definition.enum_values));
    }
    insert_extra(ext, &definition.other);
    entity.properties =
        object_properties(name, &definition.properties, &definition.required, model, rels);
    entity
}

fn object_properties(
    owner: &str,
    properties: &BTreeMap<String, JsonSchemaProperty>,
    required: &[String],
    model: &JsonSchemaModel,
    rels: &mut Vec<Relationship>,
) -> Vec<Property> {
    properties
        .iter()
        .map(|(name, prop)| {
            let (property, target) = property_to_universal(name, prop, model);
            if let Some((target, cardinality)) = target {
                rels.push(
                    Relationship::new(owner, target, RelationshipType::Association)
                        .with_label(name)
                        .with_cardinality(None, Some(cardinality)),
                );
            }
            property.with_required(required.contains(name))
        })
        .collect()
}

fn property_to_universal<'a>(
    name: &str,
    prop: &'a JsonSchemaProperty,
    model: &JsonSchemaModel,
) -> (Property, Option<(&'a str, &'static str)>) {
    let mut target = None;
    let mut ext = Extensions::new();
    let ty = if let Some(reference) = prop.reference.as_deref() {
        match local_definition(reference, model) {
            Some(def) => {
                target = Some((def, "1"));
                Type::other(def)
            }
            None => Type::other(reference),
        }
    } else if let Some(def) = array_item_definition(prop, model) {
        target = Some((def, "*"));
        Type::other(format!("{def}[]"))
    } else {
        let primary = prop.ty.as_ref().and_then(SchemaType::primary);
        let token = token_of(primary.unwrap_or("object"), prop.format.as_deref());
        if token == primary.unwrap_or("object") {
            ext.insert_opt(FORMAT, prop.format.as_deref());
        }
        if let Some(items) = &prop.items {
            ext.insert("items", to_ext(items));
        }
        insert_raw_type(&mut ext, prop.ty.as_ref());
        JSON_SCHEMA_VOCABULARY.to_universal_type(token)
    };
    if prop.ty.as_ref().is_some_and(SchemaType::is_nullable) {
        ext.insert(keys::IS_NULLABLE, true);
    }
    if let Some(default) = &prop.default {
        ext.insert(keys::DEFAULT_VALUE, default.to_string());
    }
    if !prop.enum_values.is_empty() {
        ext.insert(keys::ENUM_VALUES, to_ext(&prop.enum_values));
    }
    if let Value::Object(carried) = serde_json::to_value(prop).unwrap_or(Value::Null) {
        for (key, value) in carried {
            if CARRIED.contains(&key.as_str()) {
                ext.insert(key, ExtValue::from(value));
            }
        }
    }
    insert_extra(&mut ext, &prop.other);
    let mut property = Property::new(name, ty);
    property.description = prop.description.clone();
    property.extensions = ext;
    (property, target)
}

/// `{"type": "array", "items": {"$ref": "#/definitions/Post"}}` → `Post`.
fn array_item_definition<'a>(prop: &'a JsonSchemaProperty, model: &JsonSchemaModel) -> Option<&'a str> {
    let items = prop.items.as_deref()?;
    let is_plain_item = items.ty.is_none() && items.other.is_empty() && items.description.is_none();
    if prop.ty.as_ref().and_then(SchemaType::primary) != Some("array") || !is_plain_item {
        return None;
    }
    local_definition(items.reference.as_deref()?, model)
}

fn entity_to_definition(entity: &Entity, model: &UniversalModel) -> JsonSchemaDefinition {
    let ext = &entity.extensions;
    let (properties, required) = entity_properties(entity, model);
    let enum_values: Vec<Value> = ext
        .get_list(keys::ENUM_VALUES)
        .map(|values| values.iter().cloned().map(Value::from).collect())
        .unwrap_or_default();
    let ty = match raw_type(ext) {
        Some(ty) => ty,
        None if entity.is_enum() => Some(SchemaType::single("string")),
        None => Some(SchemaType::single("object")),
    };
    JsonSchemaDefinition {
        title: ext.get_str(TITLE).map(str::to_string),
        description: entity.description.clone(),
        ty,
        properties,
        required,
        enum_values,
        other: extra(ext),
    }
}

fn entity_properties(
    entity: &Entity,
    model: &UniversalModel,
) -> (BTreeMap<String, JsonSchemaProperty>, Vec<String>) {
    let properties = entity
        .properties
        .iter()
        .map(|p| (p.label.clone(), property_from_universal(p, model)))
        .collect();
    let required = entity
        .properties
        .iter()
        .filter(|p| p.is_required())
        .map(|p| p.label.clone())
        .collect();
    (properties, required)
}

fn property_from_universal(property: &Property, model: &UniversalModel) -> JsonSchemaProperty {
    let ext = &property.extensions;
    let mut out = JsonSchemaProperty {
        description: property.description.clone(),
        ..Default::default()
    };
    if property.ty.universal_type == UniversalType::Other {
        let token = property.ty.domain_specific_type.as_str();
        if model.has_entity(token) {
            out.reference = Some(definition_ref(token));
        } else if let Some(element) = element_type(token).filter(|e| model.has_entity(e)) {
            out.ty = Some(SchemaType::single("array"));
            out.items = Some(Box::new(JsonSchemaProperty::reference(definition_ref(element))));
        } else if token.starts_with('#') || token.contains('/') {
            out.reference = Some(token.to_string());
        } else {
            out.ty = Some(SchemaType::single(token));
        }
    } else {
        let token = JSON_SCHEMA_VOCABULARY.render(&property.ty);
        let (ty, format) = split_token(&token);
        out.ty = Some(SchemaType::single(ty));
        out.format = format.map(str::to_string);
    }
    if out.format.is_none() {
        out.format = ext.get_str(FORMAT).map(str::to_string);
    }
    if ext.get_bool(keys::IS_NULLABLE) == Some(true) {
        if let Some(SchemaType::Single(ty)) = &out.ty {
            out.ty = Some(SchemaType::Multiple(vec![ty.clone(), "null".into()]));
        }
    }
    if let Some(raw) = raw_type(ext) {
        out.ty = raw;
    }
    out.default = ext.get_str(keys::DEFAULT_VALUE).map(|text| {
        serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
    });
    out.enum_values = ext
        .get_list(keys::ENUM_VALUES)
        .map(|values| values.iter().cloned().map(Value::from).collect())
        .unwrap_or_default();
    if out.items.is_none() {
        out.items = ext.get("items").and_then(|v| from_ext(v, "items"));
    }
    for key in CARRIED {
        if let Some(value) = ext.get(key) {
            apply_carried(&mut out, key, value);
        }
    }
    out.other = extra(ext);
    out
}

fn from_ext<T: serde::de::DeserializeOwned>(value: &ExtValue, key: &str) -> Option<T> {
    serde_json::from_value(Value::from(value.clone()))
        .inspect_err(|err| tracing::debug!(key, %err, "ignoring malformed side-channel value"))
        .ok()
}

fn apply_carried(out: &mut JsonSchemaProperty, key: &str, value: &ExtValue) {
    match key {
        "minLength" => out.min_length = from_ext(value, key),
        "maxLength" => out.max_length = from_ext(value, key),
        "minimum" => out.minimum = from_ext(value, key),
        "maximum" => out.maximum = from_ext(value, key),
        "pattern" => out.pattern = from_ext(value, key),
        "properties" => out.properties = from_ext(value, key).unwrap_or_default(),
        "required" => out.required = from_ext(value, key).unwrap_or_default(),
        _ => {}
    }
}
