//! Domain entities: core data structures

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Number, Value};

/// Flat input record describing one person and an optional manager link.
///
/// Everything except `id` and `managerRef` is opaque payload that is carried
/// through to the hierarchy unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonRecord {
    /// Unique identifier (numbers are accepted and stored in decimal form)
    #[serde(deserialize_with = "deserialize_identifier")]
    pub id: String,
    /// Link to the manager's record
    #[serde(
        rename = "managerRef",
        alias = "manager",
        default,
        skip_serializing_if = "ManagerRef::is_unset"
    )]
    pub manager_ref: ManagerRef,
    /// Descriptive fields (name, role, contact, ...)
    #[serde(flatten)]
    pub payload: Map<String, Value>,
}

impl PersonRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            manager_ref: ManagerRef::Unset,
            payload: Map::new(),
        }
    }

    /// Set the manager by bare identifier.
    pub fn with_manager(mut self, manager: impl Into<String>) -> Self {
        self.manager_ref = ManagerRef::ById(manager.into());
        self
    }

    pub fn with_manager_ref(mut self, manager_ref: ManagerRef) -> Self {
        self.manager_ref = manager_ref;
        self
    }

    /// Add a payload field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.payload.insert(key.into(), value.into());
        self
    }

    /// Payload field rendered as text, if present and scalar.
    pub fn field_text(&self, key: &str) -> Option<String> {
        match self.payload.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// Manager object embedded in a record instead of a bare identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedManager {
    /// Empty when the object's `id` is `null` or `""`, which means no manager
    pub id: String,
    /// Remaining fields of the embedded object, including the original `id` value
    pub fields: Map<String, Value>,
}

/// The two accepted shapes of a manager link, plus the states around them.
///
/// Conversion from JSON happens once, here, so the builder never has to sniff
/// shapes itself.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ManagerRef {
    /// No manager: absent, `null` or empty string
    #[default]
    Unset,
    /// Bare identifier
    ById(String),
    /// Bare numeric identifier, kept as a number for serialization
    ByNumber { id: String, number: Number },
    /// Object carrying an `id` field
    Embedded(EmbeddedManager),
    /// Neither an identifier nor an object with `id`
    Malformed(Value),
}

/// Normalized view of a [`ManagerRef`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerTarget<'a> {
    Absent,
    Id(&'a str),
    Malformed,
}

impl ManagerRef {
    pub fn is_unset(&self) -> bool {
        matches!(self, ManagerRef::Unset)
    }

    /// Resolve to a plain identifier, unwrapping the embedded shape.
    pub fn target(&self) -> ManagerTarget<'_> {
        match self {
            ManagerRef::Unset => ManagerTarget::Absent,
            ManagerRef::ById(id) | ManagerRef::ByNumber { id, .. } => ManagerTarget::Id(id),
            ManagerRef::Embedded(embedded) if embedded.id.is_empty() => ManagerTarget::Absent,
            ManagerRef::Embedded(embedded) => ManagerTarget::Id(&embedded.id),
            ManagerRef::Malformed(_) => ManagerTarget::Malformed,
        }
    }
}

impl From<Value> for ManagerRef {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => ManagerRef::Unset,
            Value::String(s) if s.is_empty() => ManagerRef::Unset,
            Value::String(s) => ManagerRef::ById(s),
            Value::Number(number) => ManagerRef::ByNumber {
                id: number.to_string(),
                number,
            },
            Value::Object(fields) => match fields.get("id") {
                Some(Value::Null) => ManagerRef::Embedded(EmbeddedManager {
                    id: String::new(),
                    fields,
                }),
                Some(value) => match identifier_text(value) {
                    Some(id) => ManagerRef::Embedded(EmbeddedManager { id, fields }),
                    None => ManagerRef::Malformed(Value::Object(fields)),
                },
                None => ManagerRef::Malformed(Value::Object(fields)),
            },
            other => ManagerRef::Malformed(other),
        }
    }
}

impl From<ManagerRef> for Value {
    fn from(manager_ref: ManagerRef) -> Self {
        match manager_ref {
            ManagerRef::Unset => Value::Null,
            ManagerRef::ById(id) => Value::String(id),
            ManagerRef::ByNumber { number, .. } => Value::Number(number),
            ManagerRef::Embedded(embedded) => Value::Object(embedded.fields),
            ManagerRef::Malformed(value) => value,
        }
    }
}

fn identifier_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Accept string or numeric identifiers.
fn deserialize_identifier<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "id must be a string or number, got {other}"
        ))),
    }
}
