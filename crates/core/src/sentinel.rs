//! Reserved answer values and their stored representation.
//!
//! Records use a handful of marker answers (YES, NOT_APPLICABLE, ...) that the
//! rule catalogue must recognise. [`Choice`] is the closed set; [`Sentinels`]
//! is the injected mapping from each choice to the string the hosting layer
//! stores for it.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::FieldValue;

/// A reserved answer value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Choice {
    Yes,
    No,
    Unknown,
    /// "Don't want to answer".
    Dwta,
    NotApplicable,
    Other,
}

impl Choice {
    pub const ALL: [Choice; 6] = [
        Self::Yes,
        Self::No,
        Self::Unknown,
        Self::Dwta,
        Self::NotApplicable,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "YES",
            Self::No => "NO",
            Self::Unknown => "UNKNOWN",
            Self::Dwta => "DWTA",
            Self::NotApplicable => "NOT_APPLICABLE",
            Self::Other => "OTHER",
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stored string for each [`Choice`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sentinels {
    pub yes: String,
    pub no: String,
    pub unknown: String,
    pub dwta: String,
    pub not_applicable: String,
    pub other: String,
}

impl Default for Sentinels {
    fn default() -> Self {
        Self {
            yes: "Yes".into(),
            no: "No".into(),
            unknown: "UNKNOWN".into(),
            dwta: "DWTA".into(),
            not_applicable: "N/A".into(),
            other: "OTHER".into(),
        }
    }
}

impl Sentinels {
    /// The stored string for `choice`.
    pub fn stored(&self, choice: Choice) -> &str {
        match choice {
            Choice::Yes => &self.yes,
            Choice::No => &self.no,
            Choice::Unknown => &self.unknown,
            Choice::Dwta => &self.dwta,
            Choice::NotApplicable => &self.not_applicable,
            Choice::Other => &self.other,
        }
    }

    /// The choice stored as `text`, if any.
    pub fn lookup(&self, text: &str) -> Option<Choice> {
        Choice::ALL.into_iter().find(|c| self.stored(*c) == text)
    }

    /// Replace stored sentinel text with the matching [`Choice`].
    pub fn normalize<'v>(&self, value: &'v FieldValue) -> Cow<'v, FieldValue> {
        match value {
            FieldValue::Text(text) => match self.lookup(text) {
                Some(choice) => Cow::Owned(FieldValue::Choice(choice)),
                None => Cow::Borrowed(value),
            },
            _ => Cow::Borrowed(value),
        }
    }

    /// Whether `value` is `choice`, either decoded or as stored text.
    pub fn is(&self, value: &FieldValue, choice: Choice) -> bool {
        match value {
            FieldValue::Choice(c) => *c == choice,
            FieldValue::Text(text) => self.stored(choice) == text,
            _ => false,
        }
    }

    /// Equality that treats a choice and its stored text as the same answer.
    pub fn same(&self, a: &FieldValue, b: &FieldValue) -> bool {
        self.normalize(a) == self.normalize(b)
    }

    /// Whether `value` equals any of `responses`.
    pub fn contains(&self, responses: &[FieldValue], value: &FieldValue) -> bool {
        responses.iter().any(|r| self.same(r, value))
    }
}
