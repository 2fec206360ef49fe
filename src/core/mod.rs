//! Core value, range and formatter types.
//!
//! This module provides the building blocks shared by the format engine:
//!
//! - [`FormatValue`] - The value attached to a range (primitive or flat record)
//! - [`FormatRange`] - A half-open interval `[start_index, end_index)` with a value
//! - [`Formatter`] - The identity of a kind of format, tagged block or inline
//! - [`FormatterRegistry`] - Assigns stable ids to formatters declared as data
//! - [`tile`] - Dense tiling and re-ranging, the normalization primitive

use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub mod tile;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("unknown formatter: {0}")]
    UnknownFormatter(String),
    #[error("formatter already registered: {0}")]
    DuplicateFormatter(String),
    #[error("empty range [{start}, {end}) for formatter {formatter}")]
    EmptyRange {
        formatter: String,
        start: usize,
        end: usize,
    },
}

/// A primitive stored inside a record value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Bool(bool),
    Number(f64),
    String(String),
}

/// The value attached to a range.
///
/// Absence of a value ("void") is expressed as `Option::None` wherever a
/// void value is meaningful, so there is no null variant here. Two records
/// are equal when they carry the same key set with pairwise-equal values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormatValue {
    Bool(bool),
    Number(f64),
    String(String),
    Record(BTreeMap<String, Primitive>),
}

impl FormatValue {
    pub fn record<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Primitive>,
    {
        FormatValue::Record(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl From<bool> for FormatValue {
    fn from(value: bool) -> Self {
        FormatValue::Bool(value)
    }
}

impl From<f64> for FormatValue {
    fn from(value: f64) -> Self {
        FormatValue::Number(value)
    }
}

impl From<i32> for FormatValue {
    fn from(value: i32) -> Self {
        FormatValue::Number(f64::from(value))
    }
}

impl From<&str> for FormatValue {
    fn from(value: &str) -> Self {
        FormatValue::String(value.to_string())
    }
}

impl From<String> for FormatValue {
    fn from(value: String) -> Self {
        FormatValue::String(value)
    }
}

impl From<bool> for Primitive {
    fn from(value: bool) -> Self {
        Primitive::Bool(value)
    }
}

impl From<f64> for Primitive {
    fn from(value: f64) -> Self {
        Primitive::Number(value)
    }
}

impl From<&str> for Primitive {
    fn from(value: &str) -> Self {
        Primitive::String(value.to_string())
    }
}

impl From<String> for Primitive {
    fn from(value: String) -> Self {
        Primitive::String(value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatRange {
    pub start_index: usize,
    pub end_index: usize,
    pub value: FormatValue,
}

impl FormatRange {
    pub fn new(start_index: usize, end_index: usize, value: impl Into<FormatValue>) -> Self {
        Self {
            start_index,
            end_index,
            value: value.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.end_index.saturating_sub(self.start_index)
    }

    pub fn is_empty(&self) -> bool {
        self.start_index >= self.end_index
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatType {
    /// Applies to the whole slot as a single range.
    Block,
    /// Applies to arbitrary sub-ranges.
    Inline,
}

/// Rendering precedence. Higher priorities wrap lower ones.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum FormatPriority {
    Attribute,
    #[default]
    Tag,
    InlineStyle,
    BlockStyle,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct FormatterId(pub u32);

/// Identity of a kind of format.
///
/// Equality, ordering and hashing use the id only; the remaining fields are
/// metadata resolved alongside the key.
#[derive(Debug, Clone)]
pub struct Formatter {
    id: FormatterId,
    name: Arc<str>,
    kind: FormatType,
    columned: bool,
    priority: FormatPriority,
}

impl Formatter {
    pub fn new(id: u32, name: impl Into<Arc<str>>, kind: FormatType) -> Self {
        Self {
            id: FormatterId(id),
            name: name.into(),
            kind,
            columned: false,
            priority: FormatPriority::default(),
        }
    }

    pub fn inline(id: u32, name: impl Into<Arc<str>>) -> Self {
        Self::new(id, name, FormatType::Inline)
    }

    pub fn block(id: u32, name: impl Into<Arc<str>>) -> Self {
        Self::new(id, name, FormatType::Block)
    }

    pub fn with_columned(mut self, columned: bool) -> Self {
        self.columned = columned;
        self
    }

    pub fn with_priority(mut self, priority: FormatPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn id(&self) -> FormatterId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> FormatType {
        self.kind
    }

    pub fn is_block(&self) -> bool {
        self.kind == FormatType::Block
    }

    pub fn is_columned(&self) -> bool {
        self.columned
    }

    pub fn priority(&self) -> FormatPriority {
        self.priority
    }
}

impl PartialEq for Formatter {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Formatter {}

impl PartialOrd for Formatter {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Formatter {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl std::hash::Hash for Formatter {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Formatters serialize as their display name.
impl Serialize for Formatter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// A range flattened together with its formatter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatItem {
    pub formatter: Formatter,
    pub start_index: usize,
    pub end_index: usize,
    pub value: FormatValue,
}

impl FormatItem {
    pub fn new(formatter: &Formatter, range: &FormatRange) -> Self {
        Self {
            formatter: formatter.clone(),
            start_index: range.start_index,
            end_index: range.end_index,
            value: range.value.clone(),
        }
    }
}

/// Declarative description of a formatter, as found in configuration data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormatterSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FormatType,
    #[serde(default)]
    pub columned: bool,
    #[serde(default)]
    pub priority: FormatPriority,
}

#[derive(Debug, Clone, Default)]
pub struct FormatterRegistry {
    formatters: Vec<Formatter>,
    by_name: BTreeMap<String, FormatterId>,
}

impl FormatterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_specs(
        specs: impl IntoIterator<Item = FormatterSpec>,
    ) -> Result<Self, FormatError> {
        let mut registry = Self::new();
        for spec in specs {
            registry.register(spec)?;
        }
        Ok(registry)
    }

    /// Registers a formatter, assigning the next free id.
    pub fn register(&mut self, spec: FormatterSpec) -> Result<Formatter, FormatError> {
        if self.by_name.contains_key(&spec.name) {
            return Err(FormatError::DuplicateFormatter(spec.name));
        }
        let id = self.formatters.len() as u32;
        let formatter = Formatter::new(id, spec.name.as_str(), spec.kind)
            .with_columned(spec.columned)
            .with_priority(spec.priority);
        self.by_name.insert(spec.name, formatter.id());
        self.formatters.push(formatter.clone());
        Ok(formatter)
    }

    pub fn get(&self, name: &str) -> Option<&Formatter> {
        self.by_name
            .get(name)
            .and_then(|id| self.formatters.get(id.0 as usize))
    }

    pub fn by_id(&self, id: FormatterId) -> Option<&Formatter> {
        self.formatters.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.formatters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formatters.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Formatter> {
        self.formatters.iter()
    }
}
