//! Applicability rules: a driving answer decides whether a dependent field
//! may hold the NOT_APPLICABLE sentinel.

use super::{FormValidator, APPLICABLE_MSG, NOT_APPLICABLE_MSG, NOT_REQUIRED_MSG};
use crate::error::{ErrorCode, RuleResult};
use crate::value::FieldValue;

/// Message overrides for [`FormValidator::applicable_if_true`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ApplicableOptions<'m> {
    pub applicable_msg: Option<&'m str>,
    pub not_applicable_msg: Option<&'m str>,
}

impl FormValidator<'_> {
    /// If `field` is one of `responses`, `field_applicable` may not be
    /// NOT_APPLICABLE; otherwise it must be. A no-op unless both fields are
    /// on the form.
    pub fn applicable(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_applicable: &str,
    ) -> RuleResult {
        let data = self.cleaned_data;
        if !data.contains(field) || !data.contains(field_applicable) {
            return Ok(());
        }
        let triggered = self.sentinels.contains(responses, data.value(field));
        let is_na = self.is_na(data.value(field_applicable));
        if triggered && is_na {
            return Err(self.raise(field_applicable, APPLICABLE_MSG, ErrorCode::Applicable));
        }
        if !triggered && !is_na {
            return Err(self.raise(field_applicable, NOT_APPLICABLE_MSG, ErrorCode::NotApplicable));
        }
        Ok(())
    }

    /// Alias of [`FormValidator::applicable`].
    pub fn applicable_if(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_applicable: &str,
    ) -> RuleResult {
        self.applicable(responses, field, field_applicable)
    }

    /// If `field` is one of `responses`, `field_applicable` must be
    /// NOT_APPLICABLE; otherwise it may not be.
    ///
    /// Each branch raises the code matching its message:
    /// [`ErrorCode::NotApplicable`] when the field should be NOT_APPLICABLE
    /// and [`ErrorCode::Applicable`] when it should be answered. Callers
    /// matching on codes should expect both.
    pub fn not_applicable(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_applicable: &str,
    ) -> RuleResult {
        let data = self.cleaned_data;
        if !data.contains(field) || !data.contains(field_applicable) {
            return Ok(());
        }
        let triggered = self.sentinels.contains(responses, data.value(field));
        let is_na = self.is_na(data.value(field_applicable));
        if triggered && !is_na {
            return Err(self.raise(field_applicable, NOT_APPLICABLE_MSG, ErrorCode::NotApplicable));
        }
        if !triggered && is_na {
            return Err(self.raise(field_applicable, APPLICABLE_MSG, ErrorCode::Applicable));
        }
        Ok(())
    }

    /// Alias of [`FormValidator::not_applicable`].
    pub fn not_applicable_if(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_applicable: &str,
    ) -> RuleResult {
        self.not_applicable(responses, field, field_applicable)
    }

    /// If `field` is one of `responses`, `field_applicable` must be empty.
    ///
    /// One-directional: nothing is checked when `field` is not in
    /// `responses`.
    pub fn not_applicable_only_if(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_applicable: &str,
    ) -> RuleResult {
        let data = self.cleaned_data;
        if self.sentinels.contains(responses, data.value(field))
            && data.value(field_applicable).is_truthy()
        {
            return Err(self.raise(field_applicable, NOT_REQUIRED_MSG, ErrorCode::NotApplicable));
        }
        Ok(())
    }

    /// `field_applicable` may not be NOT_APPLICABLE when `condition` holds,
    /// and must be otherwise.
    pub fn applicable_if_true(
        &mut self,
        condition: bool,
        field_applicable: &str,
        opts: ApplicableOptions<'_>,
    ) -> RuleResult {
        let data = self.cleaned_data;
        if !data.contains(field_applicable) {
            return Ok(());
        }
        let is_na = self.is_na(data.value(field_applicable));
        if condition && is_na {
            let msg = opts.applicable_msg.unwrap_or(APPLICABLE_MSG);
            return Err(self.raise(field_applicable, msg, ErrorCode::Applicable));
        }
        if !condition && !is_na {
            let msg = opts.not_applicable_msg.unwrap_or(NOT_APPLICABLE_MSG);
            return Err(self.raise(field_applicable, msg, ErrorCode::NotApplicable));
        }
        Ok(())
    }
}
