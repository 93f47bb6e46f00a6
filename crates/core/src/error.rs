//! Error types for the rule engine.
//!
//! Two disjoint families: [`ConfigError`] signals a bug in the code invoking
//! the rules and is never captured by a validation pass, while
//! [`ValidationFailure`] is a data-level rule violation that is recorded and
//! re-raised to the hosting form layer.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Key under which non-field errors are collected.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// Programmer misuse of the rule catalogue or the validator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid field validator. Got '{0}'")]
    InvalidConfiguration(String),

    #[error("{0}. Expected a cleaned_data mapping. Got None.")]
    MissingSnapshot(String),

    #[error("Cannot compare '{left}' with '{right}'")]
    IncomparableValues { left: String, right: String },

    #[error("Unsupported value for field '{field}': {reason}")]
    UnsupportedValue { field: String, reason: String },
}

/// Machine-readable classification of a rule violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Required,
    NotRequired,
    Applicable,
    NotApplicable,
    Invalid,
}

impl ErrorCode {
    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::NotRequired => "not_required",
            Self::Applicable => "applicable",
            Self::NotApplicable => "not_applicable",
            Self::Invalid => "invalid",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The shape of the messages carried by a [`ValidationFailure`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "errors", rename_all = "snake_case")]
pub enum ErrorDetail {
    /// Messages keyed by the field they belong to.
    Fields(BTreeMap<String, Vec<String>>),
    /// Messages not tied to any field.
    List(Vec<String>),
    /// A single message not tied to any field.
    Message(String),
}

impl ErrorDetail {
    /// Flatten into `(field, message)` pairs, using [`NON_FIELD_ERRORS`] for
    /// messages that carry no field.
    pub fn entries(&self) -> Vec<(&str, &str)> {
        match self {
            Self::Fields(map) => map
                .iter()
                .flat_map(|(field, msgs)| msgs.iter().map(move |m| (field.as_str(), m.as_str())))
                .collect(),
            Self::List(msgs) => msgs
                .iter()
                .map(|m| (NON_FIELD_ERRORS, m.as_str()))
                .collect(),
            Self::Message(msg) => vec![(NON_FIELD_ERRORS, msg.as_str())],
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fields(map) => {
                let parts: Vec<String> = map
                    .iter()
                    .map(|(field, msgs)| format!("{field}: {}", msgs.join(" ")))
                    .collect();
                f.write_str(&parts.join("; "))
            }
            Self::List(msgs) => f.write_str(&msgs.join("; ")),
            Self::Message(msg) => f.write_str(msg),
        }
    }
}

/// A data-level rule violation.
///
/// A failure raised by a single rule carries exactly one field, one message
/// and one code. The failure re-raised by a validation pass carries everything
/// the pass accumulated.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{detail}")]
pub struct ValidationFailure {
    pub detail: ErrorDetail,
    pub codes: Vec<ErrorCode>,
    /// Set when the messages are already present in the validator's sink.
    pub(crate) recorded: bool,
}

/// Equality ignores whether the failure has already been recorded.
impl PartialEq for ValidationFailure {
    fn eq(&self, other: &Self) -> bool {
        self.detail == other.detail && self.codes == other.codes
    }
}

impl ValidationFailure {
    /// A failure for one field.
    pub fn field(field: impl Into<String>, message: impl Into<String>, code: ErrorCode) -> Self {
        let mut map = BTreeMap::new();
        map.insert(field.into(), vec![message.into()]);
        Self {
            detail: ErrorDetail::Fields(map),
            codes: vec![code],
            recorded: false,
        }
    }

    /// A failure spanning several fields, with an optional code.
    pub fn fields(map: BTreeMap<String, Vec<String>>, code: Option<ErrorCode>) -> Self {
        Self {
            detail: ErrorDetail::Fields(map),
            codes: code.into_iter().collect(),
            recorded: false,
        }
    }

    /// A failure made of non-field messages.
    pub fn list(messages: Vec<String>, code: Option<ErrorCode>) -> Self {
        Self {
            detail: ErrorDetail::List(messages),
            codes: code.into_iter().collect(),
            recorded: false,
        }
    }

    /// A failure made of one non-field message.
    pub fn message(message: impl Into<String>, code: Option<ErrorCode>) -> Self {
        Self {
            detail: ErrorDetail::Message(message.into()),
            codes: code.into_iter().collect(),
            recorded: false,
        }
    }

    /// Messages for `field`, empty when the failure does not mention it.
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.detail
            .entries()
            .into_iter()
            .filter(|(f, _)| *f == field)
            .map(|(_, m)| m)
            .collect()
    }

    /// The first code carried by the failure, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        self.codes.first().copied()
    }

    pub(crate) fn mark_recorded(mut self) -> Self {
        self.recorded = true;
        self
    }
}

/// Anything a rule method or a rule body can return.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Invalid(#[from] ValidationFailure),
}

impl RuleError {
    /// The validation failure, if this is one.
    pub fn as_failure(&self) -> Option<&ValidationFailure> {
        match self {
            Self::Invalid(failure) => Some(failure),
            Self::Config(_) => None,
        }
    }

    /// First error code of a validation failure; `None` for configuration errors.
    pub fn code(&self) -> Option<ErrorCode> {
        self.as_failure().and_then(ValidationFailure::code)
    }
}

/// Convenience alias for rule methods and rule bodies.
pub type RuleResult<T = ()> = Result<T, RuleError>;
