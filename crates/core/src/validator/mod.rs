//! The form validator: one validation pass over a [`DataSnapshot`].
//!
//! [`FormValidator`] wraps a snapshot, exposes the rule catalogue as methods
//! (split by rule family across the submodules) and runs a caller-supplied
//! rule body through [`FormValidator::validate`]. Rule bodies execute in
//! order and stop at the first failure, like any sequence of `?` calls.

pub mod applicable;
pub mod many_to_many;
pub mod other_specify;
pub mod required;
pub mod simple;

pub use applicable::ApplicableOptions;
pub use other_specify::OtherSpecifyOptions;
pub use required::RequiredOptions;
pub use simple::DateOptions;

use crate::error::{ConfigError, ErrorCode, RuleError, RuleResult, ValidationFailure};
use crate::sentinel::{Choice, Sentinels};
use crate::sink::ErrorSink;
use crate::snapshot::DataSnapshot;
use crate::types::FormMode;
use crate::value::FieldValue;

pub(crate) const REQUIRED_MSG: &str = "This field is required.";
pub(crate) const NOT_REQUIRED_MSG: &str = "This field is not required.";
pub(crate) const APPLICABLE_MSG: &str = "This field is applicable";
pub(crate) const NOT_APPLICABLE_MSG: &str = "This field is not applicable";

/// Result of a validation pass: the untouched snapshot on success.
pub type ValidationOutcome<'a> = Result<&'a DataSnapshot, RuleError>;

/// A sequence of rule invocations, run once per validation pass.
pub trait FormRules {
    fn clean(&self, validator: &mut FormValidator<'_>) -> RuleResult;
}

/// Rule catalogue bound to one snapshot.
#[derive(Debug)]
pub struct FormValidator<'a> {
    cleaned_data: &'a DataSnapshot,
    mode: FormMode,
    sentinels: Sentinels,
    sink: ErrorSink,
}

impl<'a> FormValidator<'a> {
    /// Wrap a snapshot.
    ///
    /// Fails with [`ConfigError::MissingSnapshot`] when the hosting layer has
    /// no cleaned data to hand over.
    pub fn new(cleaned_data: Option<&'a DataSnapshot>, mode: FormMode) -> Result<Self, ConfigError> {
        let cleaned_data = cleaned_data.ok_or_else(|| {
            ConfigError::MissingSnapshot("FormValidator(cleaned_data=None)".to_string())
        })?;
        Ok(Self {
            cleaned_data,
            mode,
            sentinels: Sentinels::default(),
            sink: ErrorSink::new(),
        })
    }

    /// Use a non-default stored representation for the sentinel answers.
    pub fn with_sentinels(mut self, sentinels: Sentinels) -> Self {
        self.sentinels = sentinels;
        self
    }

    pub fn cleaned_data(&self) -> &'a DataSnapshot {
        self.cleaned_data
    }

    pub fn mode(&self) -> FormMode {
        self.mode
    }

    pub fn is_add_form(&self) -> bool {
        self.mode.is_add()
    }

    pub fn is_change_form(&self) -> bool {
        self.mode.is_change()
    }

    pub fn sentinels(&self) -> &Sentinels {
        &self.sentinels
    }

    /// Errors recorded so far in the current pass.
    pub fn sink(&self) -> &ErrorSink {
        &self.sink
    }

    /// Run `rules` against the snapshot.
    pub fn validate<R: FormRules + ?Sized>(&mut self, rules: &R) -> ValidationOutcome<'a> {
        self.validate_with(|v| rules.clean(v))
    }

    /// Run a rule body against the snapshot.
    ///
    /// The sink is emptied first. A validation failure is merged into the
    /// sink and re-raised carrying everything the pass recorded;
    /// configuration errors pass through untouched.
    pub fn validate_with<F>(&mut self, clean: F) -> ValidationOutcome<'a>
    where
        F: FnOnce(&mut Self) -> RuleResult,
    {
        self.sink = ErrorSink::new();
        tracing::debug!(
            mode = self.mode.as_str(),
            fields = self.cleaned_data.len(),
            "Validating form"
        );

        match clean(self) {
            Ok(()) => {
                tracing::debug!("Form validation passed");
                Ok(self.cleaned_data)
            }
            Err(RuleError::Config(err)) => Err(err.into()),
            Err(RuleError::Invalid(failure)) => {
                if !failure.recorded {
                    self.sink.capture(&failure);
                }
                let failure = self.sink.to_failure();
                tracing::warn!(
                    errors = failure.detail.entries().len(),
                    codes = ?failure.codes,
                    "Form validation failed"
                );
                Err(failure.into())
            }
        }
    }

    /// Record a violation for `field` and build the error to return.
    ///
    /// Every rule in the catalogue raises through here; custom rule bodies
    /// should too.
    pub fn raise(&mut self, field: &str, message: &str, code: ErrorCode) -> RuleError {
        tracing::debug!(field, code = code.as_str(), "Form rule violated");
        self.sink.record(field, message, code);
        ValidationFailure::field(field, message, code)
            .mark_recorded()
            .into()
    }

    /// Populated and not the NOT_APPLICABLE sentinel.
    pub(crate) fn is_answered(&self, value: &FieldValue) -> bool {
        value.is_truthy() && !self.sentinels.is(value, Choice::NotApplicable)
    }

    pub(crate) fn is_na(&self, value: &FieldValue) -> bool {
        self.sentinels.is(value, Choice::NotApplicable)
    }
}

/// Reject an empty parameter name.
pub(crate) fn require_param(name: &str, value: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::InvalidConfiguration(format!(
            "\"{name}\" cannot be None."
        )));
    }
    Ok(())
}
