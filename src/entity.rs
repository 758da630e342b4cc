//! Entities offered by the picker.
//!
//! The widget only references entities supplied by the caller. The one thing it
//! needs from them is a stable identity, used to dedupe the selection.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An item that can be offered and selected.
pub trait Entity: Clone {
    /// Identity type, unique within a collection.
    type Id: PartialEq + Clone + fmt::Debug;

    /// The stable identity of this entity.
    fn id(&self) -> Self::Id;
}

/// Identity of a JSON record: either a number or a string.
///
/// `Number(1)` and `Text("1")` are different identities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    /// Numeric id.
    Number(i64),
    /// String id.
    Text(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Number(n) => write!(f, "{}", n),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(value: i64) -> Self {
        EntityId::Number(value)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        EntityId::Text(value.to_string())
    }
}

/// A JSON object loaded from an external source.
///
/// Every record carries an `id`; all other keys are kept as-is and can be
/// picked as the filter field at runtime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// The record identity.
    pub id: EntityId,
    /// Every other field of the object.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record with no fields besides its id.
    pub fn new(id: impl Into<EntityId>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Look up a field by name.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Look up a field and return it only if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

impl Entity for Record {
    type Id = EntityId;

    fn id(&self) -> EntityId {
        self.id.clone()
    }
}

/// Name of the JSON type of a value, as reported in type mismatch errors.
pub fn json_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(Value::Object(_)) => "object",
    }
}
