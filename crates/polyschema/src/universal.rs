//! The Universal Model.
//!
//! Every domain adapter maps its own model to and from this shape. It is
//! plain data: entities with ordered properties, relationships between
//! entities, and an [`Extensions`] side channel at each level for metadata
//! that has no first-class field.

use crate::extensions::{ExtValue, Extensions, keys};
use serde::{Deserialize, Serialize};

/// Root container.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UniversalModel {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Unique by label; insertion order is meaningful.
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub relationships: Vec<Relationship>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

/// One schema object: a table, a class, a JSON Schema object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entity {
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

/// One attribute of an entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub label: String,
    #[serde(rename = "type")]
    pub ty: Type,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Extensions::is_empty")]
    pub extensions: Extensions,
}

/// A property type: the original token plus its universal bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Type {
    /// The type token exactly as the source domain spelled it.
    pub domain_specific_type: String,
    pub universal_type: UniversalType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<UniversalFormat>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversalType {
    String,
    Number,
    Boolean,
    Date,
    Datetime,
    Other,
}

/// Refinement of a [`UniversalType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UniversalFormat {
    Short,
    Long,
    Float,
    Double,
    Decimal,
    Byte,
    Email,
    Uuid,
    Uri,
    Time,
    Binary,
}

/// A directed edge between two entities, joined on entity labels.
///
/// Dangling labels are tolerated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub source_entity_label: String,
    pub target_entity_label: String,
    #[serde(rename = "type")]
    pub ty: RelationshipType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_cardinality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_cardinality: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationshipType {
    Association,
    Composition,
    Aggregation,
    Inheritance,
    Dependency,
}

impl UniversalModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entity(&self, label: &str) -> Option<&Entity> {
        self.entities.iter().find(|e| e.label == label)
    }

    pub fn has_entity(&self, label: &str) -> bool {
        self.entity(label).is_some()
    }

    /// Add an entity, replacing any existing entity with the same label in place.
    pub fn add_entity(&mut self, entity: Entity) {
        match self.entities.iter_mut().find(|e| e.label == entity.label) {
            Some(existing) => {
                tracing::debug!(label = %entity.label, "duplicate entity label, replacing");
                *existing = entity;
            }
            None => self.entities.push(entity),
        }
    }

    /// Add a relationship unless an identical edge is already present.
    pub fn add_relationship(&mut self, rel: Relationship) {
        let duplicate = self.relationships.iter().any(|r| {
            r.source_entity_label == rel.source_entity_label
                && r.target_entity_label == rel.target_entity_label
                && r.ty == rel.ty
                && r.label == rel.label
        });
        if !duplicate {
            self.relationships.push(rel);
        }
    }

    /// Relationships leaving `label` of the given type.
    pub fn relationships_from<'a>(
        &'a self,
        label: &'a str,
        ty: RelationshipType,
    ) -> impl Iterator<Item = &'a Relationship> + 'a {
        self.relationships
            .iter()
            .filter(move |r| r.source_entity_label == label && r.ty == ty)
    }
}

impl Entity {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Default::default()
        }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_extension(mut self, key: &str, value: impl Into<ExtValue>) -> Self {
        self.extensions.insert(key, value);
        self
    }

    pub fn property(&self, label: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.label == label)
    }

    /// The `type` extension (`class`, `interface`, `enum`, ...).
    pub fn kind(&self) -> Option<&str> {
        self.extensions.get_str(keys::TYPE)
    }

    pub fn is_enum(&self) -> bool {
        self.kind() == Some("enum")
    }
}

impl Property {
    pub fn new(label: impl Into<String>, ty: Type) -> Self {
        Self {
            label: label.into(),
            ty,
            description: None,
            required: None,
            extensions: Extensions::new(),
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn with_extension(mut self, key: &str, value: impl Into<ExtValue>) -> Self {
        self.extensions.insert(key, value);
        self
    }

    /// Whether the property accepts null: `isNullable`, else `!required`, else `true`.
    pub fn is_nullable(&self) -> bool {
        self.extensions
            .get_bool(keys::IS_NULLABLE)
            .or(self.required.map(|r| !r))
            .unwrap_or(true)
    }

    /// Whether a value is mandatory: `required`, else `!isNullable`, else `false`.
    pub fn is_required(&self) -> bool {
        self.required
            .or(self.extensions.get_bool(keys::IS_NULLABLE).map(|n| !n))
            .unwrap_or(false)
    }
}

impl Type {
    pub fn new(
        domain_specific_type: impl Into<String>,
        universal_type: UniversalType,
        format: Option<UniversalFormat>,
    ) -> Self {
        Self {
            domain_specific_type: domain_specific_type.into(),
            universal_type,
            format,
        }
    }

    /// An unmapped type that must survive verbatim.
    pub fn other(domain_specific_type: impl Into<String>) -> Self {
        Self::new(domain_specific_type, UniversalType::Other, None)
    }
}

impl Relationship {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        ty: RelationshipType,
    ) -> Self {
        Self {
            source_entity_label: source.into(),
            target_entity_label: target.into(),
            ty,
            label: None,
            source_cardinality: None,
            target_cardinality: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_cardinality(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source_cardinality = source.map(str::to_string);
        self.target_cardinality = target.map(str::to_string);
        self
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Association => "Association",
            Self::Composition => "Composition",
            Self::Aggregation => "Aggregation",
            Self::Inheritance => "Inheritance",
            Self::Dependency => "Dependency",
        })
    }
}
