//! The immutable record handed to one validation pass.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ConfigError;
use crate::sentinel::Sentinels;
use crate::value::{FieldValue, ListItem};

static NULL: FieldValue = FieldValue::Null;

/// Field name to cleaned value.
///
/// A field that is present with a null value is distinct from a field that is
/// absent: several rules only apply when the field is on the form at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSnapshot {
    fields: BTreeMap<String, FieldValue>,
}

impl DataSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    /// The value for `field`, with an absent field reading as null.
    pub fn value(&self, field: &str) -> &FieldValue {
        self.fields.get(field).unwrap_or(&NULL)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Decode a JSON object as submitted by the form layer.
    ///
    /// Sentinel strings become [`FieldValue::Choice`], `YYYY-MM-DD` strings
    /// become dates and arrays become selections.
    pub fn from_json(
        data: &serde_json::Map<String, Value>,
        sentinels: &Sentinels,
    ) -> Result<Self, ConfigError> {
        let mut fields = BTreeMap::new();
        for (field, raw) in data {
            fields.insert(field.clone(), decode_value(field, raw, sentinels)?);
        }
        Ok(Self { fields })
    }
}

impl FromIterator<(String, FieldValue)> for DataSnapshot {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Decode one JSON value for `field`.
pub fn decode_value(
    field: &str,
    raw: &Value,
    sentinels: &Sentinels,
) -> Result<FieldValue, ConfigError> {
    let value = match raw {
        Value::Null => FieldValue::Null,
        Value::Bool(b) => FieldValue::Bool(*b),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        Value::String(s) => decode_text(s, sentinels),
        Value::Array(items) => FieldValue::Selection(
            items
                .iter()
                .map(|item| decode_list_item(field, item))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(_) => {
            return Err(ConfigError::UnsupportedValue {
                field: field.to_string(),
                reason: "nested objects are not field values".to_string(),
            })
        }
    };
    Ok(value)
}

fn decode_text(s: &str, sentinels: &Sentinels) -> FieldValue {
    if let Some(choice) = sentinels.lookup(s) {
        return FieldValue::Choice(choice);
    }
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => FieldValue::Date(date),
        Err(_) => FieldValue::Text(s.to_string()),
    }
}

fn decode_list_item(field: &str, item: &Value) -> Result<ListItem, ConfigError> {
    match item {
        Value::String(s) => Ok(ListItem::new(s.clone(), s.clone())),
        Value::Object(obj) => {
            let short_name = obj.get("short_name").and_then(Value::as_str).ok_or_else(|| {
                ConfigError::UnsupportedValue {
                    field: field.to_string(),
                    reason: "selected item is missing 'short_name'".to_string(),
                }
            })?;
            let name = obj
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or(short_name);
            Ok(ListItem::new(short_name, name))
        }
        other => Err(ConfigError::UnsupportedValue {
            field: field.to_string(),
            reason: format!("selected item must be a string or object, got {other}"),
        }),
    }
}
