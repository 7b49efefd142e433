//! Typed side channel for domain metadata.
//!
//! Every domain has metadata the universal shape has no field for: Java
//! modifiers, SQL constraints, C# nullability, OFN IRIs. Adapters park it in an
//! [`Extensions`] map on the model, entity or property it belongs to, and read
//! it back on the way out. Keys shared between domains live in [`keys`], so a
//! nullability flag written by the SQL adapter is understood by the C# one.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Well-known extension keys.
pub mod keys {
    pub const TYPE: &str = "type";
    pub const ACCESS_MODIFIER: &str = "accessModifier";
    pub const IS_STATIC: &str = "isStatic";
    pub const IS_FINAL: &str = "isFinal";
    pub const IS_ABSTRACT: &str = "isAbstract";
    pub const ANNOTATIONS: &str = "annotations";
    pub const IS_NULLABLE: &str = "isNullable";
    pub const DEFAULT_VALUE: &str = "defaultValue";
    pub const CONSTRAINTS: &str = "constraints";
    pub const ENUM_VALUES: &str = "enumValues";
    pub const METHODS: &str = "methods";
    pub const EXTENDS: &str = "extends";
    pub const IMPLEMENTS: &str = "implements";
    pub const IRI: &str = "iri";
    pub const IS_PRIMARY_KEY: &str = "isPrimaryKey";
    pub const IS_UNIQUE: &str = "isUnique";
}

/// A JSON-like value stored in the side channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<ExtValue>),
    Map(BTreeMap<String, ExtValue>),
}

impl ExtValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ExtValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, ExtValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Build a list of strings.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(|s| Self::Str(s.into())).collect())
    }
}

impl From<&str> for ExtValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ExtValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<bool> for ExtValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<serde_json::Value> for ExtValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                None => Self::Float(n.as_f64().unwrap_or_default()),
            },
            Value::String(s) => Self::Str(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => Self::Map(map.into_iter().map(|(k, v)| (k, v.into())).collect()),
        }
    }
}

impl From<ExtValue> for serde_json::Value {
    fn from(value: ExtValue) -> Self {
        use serde_json::Value;
        match value {
            ExtValue::Null => Value::Null,
            ExtValue::Bool(b) => Value::Bool(b),
            ExtValue::Int(i) => Value::from(i),
            ExtValue::Float(f) => serde_json::Number::from_f64(f)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            ExtValue::Str(s) => Value::String(s),
            ExtValue::List(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            ExtValue::Map(map) => {
                Value::Object(map.into_iter().map(|(k, v)| (k, v.into())).collect())
            }
        }
    }
}

/// Ordered key → value side channel. Empty means "no metadata".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Extensions(BTreeMap<String, ExtValue>);

impl Extensions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, key: &str) -> Option<&ExtValue> {
        self.0.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ExtValue>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only when `value` is `Some`.
    pub fn insert_opt<V: Into<ExtValue>>(&mut self, key: &str, value: Option<V>) {
        if let Some(value) = value {
            self.insert(key, value);
        }
    }

    /// Insert a boolean flag only when it is set.
    pub fn insert_flag(&mut self, key: &str, value: bool) {
        if value {
            self.insert(key, true);
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<ExtValue> {
        self.0.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &ExtValue)> {
        self.0.iter()
    }

    /// String value under `key`; `None` when absent or not a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.typed(key, ExtValue::as_str)
    }

    /// Boolean value under `key`; `None` when absent or not a boolean.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.typed(key, ExtValue::as_bool)
    }

    /// Boolean flag defaulting to `false`.
    pub fn flag(&self, key: &str) -> bool {
        self.get_bool(key).unwrap_or(false)
    }

    pub fn get_list(&self, key: &str) -> Option<&[ExtValue]> {
        self.typed(key, ExtValue::as_list)
    }

    /// String items of a list under `key`, skipping non-string entries.
    pub fn get_strings(&self, key: &str) -> Vec<String> {
        self.get_list(key)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default()
    }

    fn typed<'a, T>(&'a self, key: &str, extract: impl Fn(&'a ExtValue) -> Option<T>) -> Option<T> {
        let value = self.0.get(key)?;
        let typed = extract(value);
        if typed.is_none() {
            tracing::debug!(key, ?value, "side-channel value has unexpected shape, using default");
        }
        typed
    }
}

impl FromIterator<(String, ExtValue)> for Extensions {
    fn from_iter<I: IntoIterator<Item = (String, ExtValue)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Extensions {
    type Item = (String, ExtValue);
    type IntoIter = std::collections::btree_map::IntoIter<String, ExtValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// An annotation (Java) or attribute (C#) carried in the `annotations` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationRef {
    pub name: String,
    pub arguments: Option<String>,
}

impl AnnotationRef {
    pub fn to_ext(&self) -> ExtValue {
        let mut map = BTreeMap::new();
        map.insert("name".to_string(), ExtValue::from(self.name.as_str()));
        if let Some(args) = &self.arguments {
            map.insert("arguments".to_string(), ExtValue::from(args.as_str()));
        }
        ExtValue::Map(map)
    }

    pub fn from_ext(value: &ExtValue) -> Option<Self> {
        let map = value.as_map()?;
        Some(Self {
            name: map.get("name")?.as_str()?.to_string(),
            arguments: map
                .get("arguments")
                .and_then(ExtValue::as_str)
                .map(str::to_string),
        })
    }

    /// Read the `annotations` list, dropping malformed entries.
    pub fn read_all(ext: &Extensions) -> Vec<Self> {
        ext.get_list(keys::ANNOTATIONS)
            .map(|items| items.iter().filter_map(Self::from_ext).collect())
            .unwrap_or_default()
    }

    /// Write the `annotations` list when non-empty.
    pub fn write_all(ext: &mut Extensions, annotations: &[Self]) {
        if !annotations.is_empty() {
            ext.insert(
                keys::ANNOTATIONS,
                ExtValue::List(annotations.iter().map(Self::to_ext).collect()),
            );
        }
    }
}

/// A method signature carried in the `methods` list. Bodies are never carried.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MethodSignature {
    pub name: String,
    pub return_type: Option<String>,
    /// `(name, type)` pairs.
    pub parameters: Vec<(String, String)>,
    pub access_modifier: Option<String>,
    pub is_static: bool,
    pub is_abstract: bool,
    pub annotations: Vec<AnnotationRef>,
}

impl MethodSignature {
    pub fn to_ext(&self) -> ExtValue {
        let mut ext = Extensions::new();
        ext.insert("name", self.name.as_str());
        ext.insert_opt("returnType", self.return_type.as_deref());
        if !self.parameters.is_empty() {
            let params = self
                .parameters
                .iter()
                .map(|(name, ty)| {
                    let mut p = BTreeMap::new();
                    p.insert("name".to_string(), ExtValue::from(name.as_str()));
                    p.insert("type".to_string(), ExtValue::from(ty.as_str()));
                    ExtValue::Map(p)
                })
                .collect();
            ext.insert("parameters", ExtValue::List(params));
        }
        ext.insert_opt(keys::ACCESS_MODIFIER, self.access_modifier.as_deref());
        ext.insert_flag(keys::IS_STATIC, self.is_static);
        ext.insert_flag(keys::IS_ABSTRACT, self.is_abstract);
        AnnotationRef::write_all(&mut ext, &self.annotations);
        ExtValue::Map(ext.0)
    }

    pub fn from_ext(value: &ExtValue) -> Option<Self> {
        let ext = Extensions(value.as_map()?.clone());
        let parameters = ext
            .get_list("parameters")
            .unwrap_or_default()
            .iter()
            .filter_map(|p| {
                let p = p.as_map()?;
                Some((
                    p.get("name")?.as_str()?.to_string(),
                    p.get("type")?.as_str()?.to_string(),
                ))
            })
            .collect();
        Some(Self {
            name: ext.get_str("name")?.to_string(),
            return_type: ext.get_str("returnType").map(str::to_string),
            parameters,
            access_modifier: ext.get_str(keys::ACCESS_MODIFIER).map(str::to_string),
            is_static: ext.flag(keys::IS_STATIC),
            is_abstract: ext.flag(keys::IS_ABSTRACT),
            annotations: AnnotationRef::read_all(&ext),
        })
    }

    pub fn read_all(ext: &Extensions) -> Vec<Self> {
        ext.get_list(keys::METHODS)
            .map(|items| items.iter().filter_map(Self::from_ext).collect())
            .unwrap_or_default()
    }

    pub fn write_all(ext: &mut Extensions, methods: &[Self]) {
        if !methods.is_empty() {
            ext.insert(
                keys::METHODS,
                ExtValue::List(methods.iter().map(Self::to_ext).collect()),
            );
        }
    }
}
