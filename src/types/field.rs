use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::Value;

/// A request body field that keeps track of how it was supplied.
///
/// Plain `Option<T>` cannot tell a missing key from an explicit `null`, and a
/// wrong JSON type would reject the whole body before any field-level message
/// can be produced. Use together with `#[serde(default)]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    #[default]
    Absent,
    Null,
    Present(T),
    Invalid,
}

impl<T> Field<T> {
    #[must_use]
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }
}

impl<T> From<T> for Field<T> {
    fn from(value: T) -> Self {
        Field::Present(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(Field::Null);
        }
        Ok(serde_json::from_value(value).map_or(Field::Invalid, Field::Present))
    }
}

/// Deserializes `T` from a JSON object. Any other JSON value is rejected,
/// including arrays that a derived struct deserializer would read as
/// positional fields.
pub fn from_object<T: DeserializeOwned>(value: Value) -> Result<T, String> {
    if !value.is_object() {
        return Err(format!(
            "Invalid data. Expected an object, but got {}.",
            json_type(&value)
        ));
    }
    serde_json::from_value(value).map_err(|e| format!("Invalid data. {e}"))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
