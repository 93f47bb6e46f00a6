//! Per-pass accumulation of field errors and codes.

use std::collections::BTreeMap;

use crate::error::{ErrorCode, ErrorDetail, ValidationFailure, NON_FIELD_ERRORS};

/// Errors collected during one validation pass.
///
/// Messages accumulate per field and codes accumulate in order. Nothing is
/// deduplicated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSink {
    errors: BTreeMap<String, Vec<String>>,
    codes: Vec<ErrorCode>,
}

impl ErrorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `message` for `field` and append `code`.
    pub fn record(&mut self, field: &str, message: &str, code: ErrorCode) {
        self.push_message(field, message);
        self.codes.push(code);
    }

    /// Merge every message and code a failure carries.
    pub fn capture(&mut self, failure: &ValidationFailure) {
        match &failure.detail {
            ErrorDetail::Fields(map) => {
                for (field, messages) in map {
                    for message in messages {
                        self.push_message(field, message);
                    }
                }
            }
            ErrorDetail::List(messages) => {
                for message in messages {
                    self.push_message(NON_FIELD_ERRORS, message);
                }
            }
            ErrorDetail::Message(message) => self.push_message(NON_FIELD_ERRORS, message),
        }
        self.codes.extend(failure.codes.iter().copied());
    }

    pub fn errors(&self) -> &BTreeMap<String, Vec<String>> {
        &self.errors
    }

    pub fn codes(&self) -> &[ErrorCode] {
        &self.codes
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty() && self.codes.is_empty()
    }

    /// A failure carrying everything accumulated so far.
    pub fn to_failure(&self) -> ValidationFailure {
        ValidationFailure {
            detail: ErrorDetail::Fields(self.errors.clone()),
            codes: self.codes.clone(),
            recorded: true,
        }
    }

    fn push_message(&mut self, field: &str, message: &str) {
        self.errors
            .entry(field.to_string())
            .or_default()
            .push(message.to_string());
    }
}
