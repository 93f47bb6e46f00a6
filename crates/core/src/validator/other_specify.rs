//! The "Other, please specify" pattern.

use super::{require_param, FormValidator, NOT_REQUIRED_MSG, REQUIRED_MSG};
use crate::error::{ErrorCode, RuleResult};
use crate::sentinel::Choice;
use crate::value::FieldValue;

/// Overrides for [`FormValidator::validate_other_specify`].
#[derive(Debug, Clone, Default)]
pub struct OtherSpecifyOptions<'m> {
    /// Defaults to `<field>_other`.
    pub other_specify_field: Option<&'m str>,
    /// Defaults to the OTHER sentinel.
    pub other_stored_value: Option<FieldValue>,
    pub required_msg: Option<&'m str>,
    pub not_required_msg: Option<&'m str>,
    /// Appended to the default messages as ` ref: <ref>`.
    pub reference: Option<&'m str>,
}

impl FormValidator<'_> {
    /// The free-text companion of `field` is required exactly when `field`
    /// holds the "other" answer. Nothing is checked while `field` is empty.
    pub fn validate_other_specify(
        &mut self,
        field: &str,
        opts: OtherSpecifyOptions<'_>,
    ) -> RuleResult {
        require_param("field", field)?;
        let other_field = match opts.other_specify_field {
            Some(name) => name.to_string(),
            None => format!("{field}_other"),
        };
        let other = opts
            .other_stored_value
            .unwrap_or(FieldValue::Choice(Choice::Other));

        let data = self.cleaned_data;
        let value = data.value(field);
        if !value.is_truthy() {
            return Ok(());
        }
        let is_other = self.sentinels.same(value, &other);
        let specified = data.value(&other_field).is_truthy();
        let reference = opts
            .reference
            .map(|r| format!(" ref: {r}"))
            .unwrap_or_default();

        if is_other && !specified {
            let message = match opts.required_msg {
                Some(msg) => msg.to_string(),
                None => format!("{REQUIRED_MSG}{reference}"),
            };
            return Err(self.raise(&other_field, &message, ErrorCode::Required));
        }
        if !is_other && specified {
            let message = match opts.not_required_msg {
                Some(msg) => msg.to_string(),
                None => format!("{NOT_REQUIRED_MSG}{reference}"),
            };
            return Err(self.raise(&other_field, &message, ErrorCode::NotRequired));
        }
        Ok(())
    }
}
