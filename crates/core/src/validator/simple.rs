//! Yes/No, age and date comparison rules.

use chrono::NaiveDate;

use super::{require_param, FormValidator};
use crate::compare::{age_delta_years, get_applicable, Comparison};
use crate::error::{ConfigError, ErrorCode, RuleResult};
use crate::sentinel::Choice;
use crate::value::FieldValue;

/// Overrides for [`FormValidator::validate_dates`].
#[derive(Debug, Clone, Default)]
pub struct DateOptions<'m> {
    pub errmsg: Option<&'m str>,
    pub verbose_name1: Option<&'m str>,
    pub verbose_name2: Option<&'m str>,
    /// Used when `field1` is not on the form.
    pub value1: Option<FieldValue>,
    /// Used when `field2` is not on the form.
    pub value2: Option<FieldValue>,
}

impl FormValidator<'_> {
    /// `required_field` is required when `yesno_field` is YES and must be
    /// empty when it is NO or UNKNOWN.
    pub fn require_if_yes(
        &mut self,
        yesno_field: &str,
        required_field: &str,
        required_msg: Option<&str>,
        not_required_msg: Option<&str>,
    ) -> RuleResult {
        require_param("yesno_field", yesno_field)?;
        require_param("required_field", required_field)?;
        let data = self.cleaned_data;
        let answer = data.value(yesno_field);
        let answered = data.value(required_field).is_truthy();
        let declined = self.sentinels.is(answer, Choice::No)
            || self.sentinels.is(answer, Choice::Unknown);

        if declined && answered {
            let msg = not_required_msg
                .unwrap_or("This field is not required based on previous answer.");
            return Err(self.raise(required_field, msg, ErrorCode::NotRequired));
        }
        if self.sentinels.is(answer, Choice::Yes) && !answered {
            let msg = required_msg.unwrap_or("This field is required based on previous answer.");
            return Err(self.raise(required_field, msg, ErrorCode::Required));
        }
        Ok(())
    }

    /// `field` is applicable only when the age at `reference_date`, in whole
    /// years, satisfies `age_years <op> age`.
    ///
    /// An empty `field` is treated as applicable.
    pub fn validate_applicable_by_age(
        &mut self,
        field: &str,
        op: Comparison,
        age: i32,
        dob: NaiveDate,
        reference_date: NaiveDate,
        errmsg: Option<&str>,
    ) -> RuleResult {
        require_param("field", field)?;
        let data = self.cleaned_data;
        let value = data.value(field);
        let years = age_delta_years(dob, reference_date);
        let applicable = if value.is_truthy() {
            get_applicable(op, years, age)
        } else {
            true
        };
        let is_na = self.is_na(value);
        let phrase = op.phrase();

        if !applicable && !is_na {
            let message = match errmsg {
                Some(msg) => msg.to_string(),
                None => format!(
                    "Not applicable. Age {phrase} {age}y at previous visit. Got {years}y"
                ),
            };
            return Err(self.raise(field, &message, ErrorCode::NotApplicable));
        }
        if applicable && is_na {
            let message = match errmsg {
                Some(msg) => msg.to_string(),
                None => format!(
                    "Applicable. Age {phrase} {age}y at previous visit to be \"not applicable\". Got {years}y"
                ),
            };
            return Err(self.raise(field, &message, ErrorCode::Applicable));
        }
        Ok(())
    }

    /// `field1 <op> field2`. Passes when either value is missing.
    ///
    /// A record value that is not a date fails on its own field with
    /// [`ErrorCode::Invalid`].
    pub fn validate_dates(
        &mut self,
        field1: &str,
        op: Comparison,
        field2: &str,
        opts: DateOptions<'_>,
    ) -> RuleResult {
        require_param("field1", field1)?;
        let data = self.cleaned_data;
        let first = lookup_or(data.get(field1), opts.value1.as_ref());
        let second = lookup_or(data.get(field2), opts.value2.as_ref());
        if !first.is_truthy() || !second.is_truthy() {
            return Ok(());
        }

        let Some(ordering) = first.compare(&second) else {
            // A record value that is not a date is bad data; a mismatched
            // fallback value is a bad rule invocation.
            let undated = [(field1, &first), (field2, &second)]
                .into_iter()
                .find(|(field, value)| data.contains(field) && value.as_date().is_none());
            return match undated {
                Some((field, value)) => {
                    let message = format!("Expected a date. Got {value}.");
                    Err(self.raise(field, &message, ErrorCode::Invalid))
                }
                None => Err(ConfigError::IncomparableValues {
                    left: first.to_string(),
                    right: second.to_string(),
                }
                .into()),
            };
        };
        if op.accepts(ordering) {
            return Ok(());
        }

        let message = match opts.errmsg {
            Some(msg) => msg.to_string(),
            None => {
                let name1 = opts.verbose_name1.unwrap_or(field1);
                let name2 = match opts.verbose_name2 {
                    Some(name) => name.to_string(),
                    None if !field2.is_empty() => field2.to_string(),
                    None => second.to_string(),
                };
                format!("{name1} {} {name2}.", op.phrase())
            }
        };
        Err(self.raise(field1, &message, ErrorCode::Invalid))
    }
}

fn lookup_or(present: Option<&FieldValue>, fallback: Option<&FieldValue>) -> FieldValue {
    present
        .or(fallback)
        .cloned()
        .unwrap_or(FieldValue::Null)
}
