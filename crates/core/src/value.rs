//! Submitted field values.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::sentinel::Choice;

/// One selected row of a multi-select (many-to-many) field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    /// Stable stored code, matched by the many-to-many rules.
    pub short_name: String,
    /// Display name, used in messages.
    pub name: String,
}

impl ListItem {
    pub fn new(short_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            short_name: short_name.into(),
            name: name.into(),
        }
    }
}

/// A cleaned value for a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    Choice(Choice),
    Selection(Vec<ListItem>),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Whether the value counts as an answer.
    ///
    /// Null, `false`, zero, empty text and an empty selection are all empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::Text(s) => !s.is_empty(),
            Self::Date(_) | Self::Choice(_) => true,
            Self::Selection(items) => !items.is_empty(),
        }
    }

    /// Numeric zero, including `false`.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Bool(b) => !*b,
            Self::Int(i) => *i == 0,
            Self::Float(f) => *f == 0.0,
            _ => false,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Selected rows; `None` unless this is a selection.
    pub fn as_selection(&self) -> Option<&[ListItem]> {
        match self {
            Self::Selection(items) => Some(items),
            _ => None,
        }
    }

    /// Short name to display name for each selected row.
    pub fn selected(&self) -> Vec<(&str, &str)> {
        self.as_selection()
            .unwrap_or_default()
            .iter()
            .map(|item| (item.short_name.as_str(), item.name.as_str()))
            .collect()
    }

    /// Ordering between values of the same kind. Ints and floats compare
    /// with each other; anything else across kinds is `None`.
    pub fn compare(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Int(a), Self::Int(b)) => Some(a.cmp(b)),
            (Self::Float(a), Self::Float(b)) => a.partial_cmp(b),
            (Self::Int(a), Self::Float(b)) => (*a as f64).partial_cmp(b),
            (Self::Float(a), Self::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => f.write_str(s),
            Self::Date(d) => write!(f, "{d}"),
            Self::Choice(c) => write!(f, "{c}"),
            Self::Selection(items) => {
                let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
                f.write_str(&names.join(", "))
            }
        }
    }
}

impl From<Choice> for FieldValue {
    fn from(c: Choice) -> Self {
        Self::Choice(c)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(d: NaiveDate) -> Self {
        Self::Date(d)
    }
}

impl From<Vec<ListItem>> for FieldValue {
    fn from(items: Vec<ListItem>) -> Self {
        Self::Selection(items)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}
