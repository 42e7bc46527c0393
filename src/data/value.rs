use std::collections::HashMap;

use bson::Bson;

/// Canonical metadata value: generic containers and primitives only, free of
/// driver wrapper types. Metadata carries no fixed schema, so values nest
/// arbitrarily deep.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Sequence(Vec<MetaValue>),
    Map(HashMap<String, MetaValue>),
}

impl MetaValue {
    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// Normalization of values recovered from the driver. Total by construction:
/// every `Bson` shape maps to some canonical value. Driver types without a
/// primitive counterpart (timestamps, binary blobs, ...) are carried through
/// as their relaxed extended-JSON projection instead of being rejected.
impl From<Bson> for MetaValue {
    fn from(value: Bson) -> Self {
        match value {
            Bson::Null | Bson::Undefined => MetaValue::Null,
            Bson::Boolean(b) => MetaValue::Bool(b),
            Bson::Int32(n) => MetaValue::Number(n as f64),
            Bson::Int64(n) => MetaValue::Number(n as f64),
            Bson::Double(n) => MetaValue::Number(n),
            Bson::String(s) => MetaValue::String(s),
            Bson::Array(items) => {
                MetaValue::Sequence(items.into_iter().map(MetaValue::from).collect())
            }
            Bson::Document(document) => MetaValue::Map(
                document
                    .into_iter()
                    .map(|(key, value)| (key, MetaValue::from(value)))
                    .collect(),
            ),
            other => other.into_relaxed_extjson().into(),
        }
    }
}

impl From<serde_json::Value> for MetaValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => MetaValue::Null,
            serde_json::Value::Bool(b) => MetaValue::Bool(b),
            serde_json::Value::Number(n) => {
                n.as_f64().map_or(MetaValue::Null, MetaValue::Number)
            }
            serde_json::Value::String(s) => MetaValue::String(s),
            serde_json::Value::Array(items) => {
                MetaValue::Sequence(items.into_iter().map(MetaValue::from).collect())
            }
            serde_json::Value::Object(entries) => MetaValue::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, MetaValue::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<MetaValue> for Bson {
    fn from(value: MetaValue) -> Bson {
        match value {
            MetaValue::Null => Bson::Null,
            MetaValue::Bool(b) => Bson::Boolean(b),
            MetaValue::Number(n) => Bson::Double(n),
            MetaValue::String(s) => Bson::String(s),
            MetaValue::Sequence(items) => {
                Bson::Array(items.into_iter().map(Bson::from).collect())
            }
            MetaValue::Map(entries) => Bson::Document(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Bson::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::String(value.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::String(value)
    }
}

impl From<f64> for MetaValue {
    fn from(value: f64) -> Self {
        MetaValue::Number(value)
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        MetaValue::Bool(value)
    }
}

impl From<Vec<MetaValue>> for MetaValue {
    fn from(value: Vec<MetaValue>) -> Self {
        MetaValue::Sequence(value)
    }
}

impl From<HashMap<String, MetaValue>> for MetaValue {
    fn from(value: HashMap<String, MetaValue>) -> Self {
        MetaValue::Map(value)
    }
}
