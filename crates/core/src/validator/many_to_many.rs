//! Rules over multi-select fields.
//!
//! Selected rows are matched by their `short_name`; display names only show
//! up in messages.

use super::{
    require_param, FormValidator, APPLICABLE_MSG, NOT_APPLICABLE_MSG, NOT_REQUIRED_MSG, REQUIRED_MSG,
};
use crate::error::{ErrorCode, RuleResult};
use crate::value::FieldValue;

const M2M_REQUIRED_MSG: &str = "This field is required";
const M2M_NOT_REQUIRED_MSG: &str = "This field is not required";

impl FormValidator<'_> {
    /// At least one row must be selected.
    pub fn m2m_required(&mut self, m2m_field: &str) -> RuleResult {
        require_param("m2m_field", m2m_field)?;
        if !self.cleaned_data.value(m2m_field).is_truthy() {
            return Err(self.raise(m2m_field, M2M_REQUIRED_MSG, ErrorCode::Required));
        }
        Ok(())
    }

    /// A selection is required when `field` equals `response` and must be
    /// empty otherwise.
    pub fn m2m_required_if(
        &mut self,
        response: &FieldValue,
        field: &str,
        m2m_field: &str,
    ) -> RuleResult {
        require_param("field", field)?;
        require_param("m2m_field", m2m_field)?;
        let data = self.cleaned_data;
        let matches = self.sentinels.same(data.value(field), response);
        let selected = data.value(m2m_field).is_truthy();
        if matches && !selected {
            return Err(self.raise(m2m_field, M2M_REQUIRED_MSG, ErrorCode::Required));
        }
        if !matches && selected {
            return Err(self.raise(m2m_field, M2M_NOT_REQUIRED_MSG, ErrorCode::NotRequired));
        }
        Ok(())
    }

    /// Rows whose short name is in `single_selections` may not be combined
    /// with any other selection.
    pub fn m2m_single_selection_if(
        &mut self,
        single_selections: &[&str],
        m2m_field: &str,
    ) -> RuleResult {
        require_param("m2m_field", m2m_field)?;
        let data = self.cleaned_data;
        let selected = data.value(m2m_field).selected();
        if selected.len() <= 1 {
            return Ok(());
        }
        let exclusive = single_selections.iter().find_map(|code| {
            selected
                .iter()
                .find(|(short_name, _)| short_name == code)
                .map(|(_, name)| *name)
        });
        if let Some(name) = exclusive {
            let message =
                format!("Invalid combination. '{name}' may not be combined with other selections");
            return Err(self.raise(m2m_field, &message, ErrorCode::Invalid));
        }
        Ok(())
    }

    /// `field_other` is required when any selected row is in `responses`,
    /// and must be empty otherwise (including when nothing is selected).
    pub fn m2m_other_specify(
        &mut self,
        responses: &[&str],
        m2m_field: &str,
        field_other: &str,
    ) -> RuleResult {
        require_param("m2m_field", m2m_field)?;
        require_param("field_other", field_other)?;
        let data = self.cleaned_data;
        let found = any_selected(data.value(m2m_field), responses);
        let other = data.value(field_other).is_truthy();
        if found && !other {
            return Err(self.raise(field_other, REQUIRED_MSG, ErrorCode::Required));
        }
        if !found && other {
            return Err(self.raise(field_other, NOT_REQUIRED_MSG, ErrorCode::NotRequired));
        }
        Ok(())
    }

    /// Like [`FormValidator::m2m_other_specify`] but with NOT_APPLICABLE
    /// semantics. A no-op when `field_other` is not on the form.
    pub fn m2m_other_specify_applicable(
        &mut self,
        responses: &[&str],
        m2m_field: &str,
        field_other: &str,
    ) -> RuleResult {
        require_param("m2m_field", m2m_field)?;
        require_param("field_other", field_other)?;
        let data = self.cleaned_data;
        if !data.contains(field_other) {
            return Ok(());
        }
        let found = any_selected(data.value(m2m_field), responses);
        let is_na = self.is_na(data.value(field_other));
        if found && is_na {
            let msg = format!("{APPLICABLE_MSG}.");
            return Err(self.raise(field_other, &msg, ErrorCode::Applicable));
        }
        if !found && !is_na {
            let msg = format!("{NOT_APPLICABLE_MSG}.");
            return Err(self.raise(field_other, &msg, ErrorCode::NotApplicable));
        }
        Ok(())
    }
}

fn any_selected(value: &FieldValue, responses: &[&str]) -> bool {
    value
        .selected()
        .iter()
        .any(|(short_name, _)| responses.contains(short_name))
}
