//! Requiredness rules: a driving answer makes a dependent field required or
//! not required.

use super::{require_param, FormValidator, NOT_REQUIRED_MSG, REQUIRED_MSG};
use crate::error::{ConfigError, ErrorCode, RuleResult};
use crate::sentinel::Choice;
use crate::value::FieldValue;

/// Optional knobs shared by the requiredness rules.
///
/// `inverse` defaults to `true`: when the trigger does not match, the
/// dependent field must be left empty.
#[derive(Debug, Clone, Copy)]
pub struct RequiredOptions<'m> {
    pub required_msg: Option<&'m str>,
    pub not_required_msg: Option<&'m str>,
    pub optional_if_dwta: bool,
    pub optional_if_na: bool,
    pub inverse: bool,
}

impl Default for RequiredOptions<'_> {
    fn default() -> Self {
        Self {
            required_msg: None,
            not_required_msg: None,
            optional_if_dwta: false,
            optional_if_na: false,
            inverse: true,
        }
    }
}

impl<'m> RequiredOptions<'m> {
    pub fn required_msg(mut self, msg: &'m str) -> Self {
        self.required_msg = Some(msg);
        self
    }

    pub fn not_required_msg(mut self, msg: &'m str) -> Self {
        self.not_required_msg = Some(msg);
        self
    }

    pub fn optional_if_dwta(mut self) -> Self {
        self.optional_if_dwta = true;
        self
    }

    pub fn optional_if_na(mut self) -> Self {
        self.optional_if_na = true;
        self
    }

    pub fn inverse(mut self, inverse: bool) -> Self {
        self.inverse = inverse;
        self
    }

    fn required(&self) -> &'m str {
        self.required_msg.unwrap_or(REQUIRED_MSG)
    }

    fn not_required(&self) -> &'m str {
        self.not_required_msg.unwrap_or(NOT_REQUIRED_MSG)
    }
}

impl FormValidator<'_> {
    /// If `field` is one of `responses`, `field_required` must be answered.
    ///
    /// With `inverse` set, any other answer means `field_required` must be
    /// empty or NOT_APPLICABLE. A no-op when `field` is not on the form.
    pub fn required_if(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_required: &str,
        opts: RequiredOptions<'_>,
    ) -> RuleResult {
        inspect_params(responses, field, field_required)?;
        let data = self.cleaned_data;
        if !data.contains(field) {
            return Ok(());
        }
        let value = data.value(field);
        if self.skip_for_sentinel(responses, value, &opts) {
            return Ok(());
        }

        let triggered = self.sentinels.contains(responses, value);
        let answered = self.is_answered(data.value(field_required));
        if triggered && !answered {
            return Err(self.raise(field_required, opts.required(), ErrorCode::Required));
        }
        if opts.inverse && !triggered && answered {
            return Err(self.raise(field_required, opts.not_required(), ErrorCode::NotRequired));
        }
        Ok(())
    }

    /// If `field` is one of `responses`, `field_required` must be empty.
    ///
    /// With `inverse` set, any other answer means `field_required` must be
    /// answered. A no-op unless both fields are on the form.
    pub fn not_required_if(
        &mut self,
        responses: &[FieldValue],
        field: &str,
        field_required: &str,
        opts: RequiredOptions<'_>,
    ) -> RuleResult {
        inspect_params(responses, field, field_required)?;
        let data = self.cleaned_data;
        if !data.contains(field) || !data.contains(field_required) {
            return Ok(());
        }
        let value = data.value(field);
        if self.skip_for_sentinel(responses, value, &opts) {
            return Ok(());
        }

        let triggered = self.sentinels.contains(responses, value);
        let answered = self.is_answered(data.value(field_required));
        if triggered && answered {
            return Err(self.raise(field_required, opts.not_required(), ErrorCode::NotRequired));
        }
        if opts.inverse && !triggered && !answered {
            return Err(self.raise(field_required, opts.required(), ErrorCode::Required));
        }
        Ok(())
    }

    /// `field_required` must be answered when `condition` holds.
    ///
    /// A numeric zero counts as an answer here. With `inverse` set, a false
    /// condition means `field_required` must be empty.
    pub fn required_if_true(
        &mut self,
        condition: bool,
        field_required: &str,
        opts: RequiredOptions<'_>,
    ) -> RuleResult {
        if field_required.is_empty() {
            return Err(missing_field_required().into());
        }
        let data = self.cleaned_data;
        if !data.contains(field_required) {
            return Ok(());
        }
        let required = data.value(field_required);
        let missing =
            (!required.is_truthy() && !required.is_zero()) || self.is_na(required);
        if condition && missing {
            return Err(self.raise(field_required, opts.required(), ErrorCode::Required));
        }
        if opts.inverse && !condition && self.is_answered(required) {
            return Err(self.raise(field_required, opts.not_required(), ErrorCode::NotRequired));
        }
        Ok(())
    }

    /// `field_required` must be answered whenever `field` holds any value,
    /// and must be empty otherwise.
    pub fn required_if_not_none(
        &mut self,
        field: &str,
        field_required: &str,
        opts: RequiredOptions<'_>,
    ) -> RuleResult {
        if field_required.is_empty() {
            return Err(missing_field_required().into());
        }
        let data = self.cleaned_data;
        let value = data.value(field);
        let condition = if opts.optional_if_dwta && self.sentinels.is(value, Choice::Dwta) {
            false
        } else {
            !value.is_null()
        };
        let required = data.value(field_required);
        if condition && !required.is_truthy() {
            return Err(self.raise(field_required, opts.required(), ErrorCode::Required));
        }
        if !condition && self.is_answered(required) {
            return Err(self.raise(field_required, opts.not_required(), ErrorCode::NotRequired));
        }
        Ok(())
    }

    /// Both fields hold a value or neither does.
    ///
    /// The error lands on whichever field is empty: `field_required` gets a
    /// `required` error when only `field` is set, and `field` gets a
    /// `not_required` error when only `field_required` is set.
    pub fn require_together(
        &mut self,
        field: &str,
        field_required: &str,
        opts: RequiredOptions<'_>,
    ) -> RuleResult {
        require_param("field", field)?;
        require_param("field_required", field_required)?;
        let data = self.cleaned_data;
        let first = data.value(field);
        let second = data.value(field_required);
        if !first.is_null() && second.is_null() {
            return Err(self.raise(field_required, opts.required(), ErrorCode::Required));
        }
        if first.is_null() && !second.is_null() {
            return Err(self.raise(field, opts.not_required(), ErrorCode::NotRequired));
        }
        Ok(())
    }

    /// DWTA / NOT_APPLICABLE escape hatches shared by the trigger rules.
    fn skip_for_sentinel(
        &self,
        responses: &[FieldValue],
        value: &FieldValue,
        opts: &RequiredOptions<'_>,
    ) -> bool {
        let escapes = [
            (opts.optional_if_dwta, Choice::Dwta),
            (opts.optional_if_na, Choice::NotApplicable),
        ];
        escapes.into_iter().any(|(enabled, choice)| {
            enabled
                && self.sentinels.contains(responses, &FieldValue::Choice(choice))
                && self.sentinels.is(value, choice)
        })
    }
}

fn missing_field_required() -> ConfigError {
    ConfigError::InvalidConfiguration("The required field cannot be None.".to_string())
}

fn inspect_params(responses: &[FieldValue], field: &str, field_required: &str) -> Result<(), ConfigError> {
    require_param("field", field)?;
    if responses.is_empty() {
        return Err(ConfigError::InvalidConfiguration(format!(
            "At least one valid response for field '{field}' must be provided."
        )));
    }
    require_param("field_required", field_required)
}
