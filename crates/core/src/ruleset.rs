//! Declarative rule sets.
//!
//! A [`RuleSet`] is an ordered list of [`RuleSpec`]s loaded from JSON. It
//! implements [`FormRules`], so it runs through the same validation pass as
//! hand-written rule bodies and stops at the first violated rule.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::compare::Comparison;
use crate::error::{ConfigError, RuleResult};
use crate::snapshot::decode_value;
use crate::validator::{
    DateOptions, FormRules, FormValidator, OtherSpecifyOptions, RequiredOptions,
};
use crate::value::FieldValue;

fn default_true() -> bool {
    true
}

/// One rule invocation.
///
/// Trigger values are raw JSON and are decoded with the validator's
/// sentinels, so `"Yes"` and `"N/A"` match their choices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum RuleSpec {
    RequiredIf {
        responses: Vec<Value>,
        field: String,
        field_required: String,
        #[serde(default)]
        required_msg: Option<String>,
        #[serde(default)]
        not_required_msg: Option<String>,
        #[serde(default)]
        optional_if_dwta: bool,
        #[serde(default)]
        optional_if_na: bool,
        #[serde(default = "default_true")]
        inverse: bool,
    },
    NotRequiredIf {
        responses: Vec<Value>,
        field: String,
        field_required: String,
        #[serde(default)]
        required_msg: Option<String>,
        #[serde(default)]
        not_required_msg: Option<String>,
        #[serde(default)]
        optional_if_dwta: bool,
        #[serde(default = "default_true")]
        inverse: bool,
    },
    RequiredIfNotNone {
        field: String,
        field_required: String,
        #[serde(default)]
        required_msg: Option<String>,
        #[serde(default)]
        not_required_msg: Option<String>,
        #[serde(default)]
        optional_if_dwta: bool,
    },
    RequireTogether {
        field: String,
        field_required: String,
        #[serde(default)]
        required_msg: Option<String>,
        #[serde(default)]
        not_required_msg: Option<String>,
    },
    #[serde(alias = "applicable_if")]
    Applicable {
        responses: Vec<Value>,
        field: String,
        field_applicable: String,
    },
    #[serde(alias = "not_applicable_if")]
    NotApplicable {
        responses: Vec<Value>,
        field: String,
        field_applicable: String,
    },
    NotApplicableOnlyIf {
        responses: Vec<Value>,
        field: String,
        field_applicable: String,
    },
    M2mRequired {
        m2m_field: String,
    },
    M2mRequiredIf {
        response: Value,
        field: String,
        m2m_field: String,
    },
    M2mSingleSelectionIf {
        selections: Vec<String>,
        m2m_field: String,
    },
    M2mOtherSpecify {
        responses: Vec<String>,
        m2m_field: String,
        field_other: String,
    },
    M2mOtherSpecifyApplicable {
        responses: Vec<String>,
        m2m_field: String,
        field_other: String,
    },
    OtherSpecify {
        field: String,
        #[serde(default)]
        other_specify_field: Option<String>,
        #[serde(default)]
        other_stored_value: Option<Value>,
        #[serde(default)]
        required_msg: Option<String>,
        #[serde(default)]
        not_required_msg: Option<String>,
        #[serde(default, rename = "ref")]
        reference: Option<String>,
    },
    RequireIfYes {
        yesno_field: String,
        required_field: String,
        #[serde(default)]
        required_msg: Option<String>,
        #[serde(default)]
        not_required_msg: Option<String>,
    },
    /// Birth and reference dates are read from the record; the rule is
    /// skipped while either is missing.
    ApplicableByAge {
        field: String,
        op: Comparison,
        age: i32,
        dob_field: String,
        reference_field: String,
        #[serde(default)]
        errmsg: Option<String>,
    },
    Dates {
        field1: String,
        op: Comparison,
        field2: String,
        #[serde(default)]
        errmsg: Option<String>,
        #[serde(default)]
        verbose_name1: Option<String>,
        #[serde(default)]
        verbose_name2: Option<String>,
    },
}

impl RuleSpec {
    /// Stable rule name matching serde's `rename_all = "snake_case"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RequiredIf { .. } => "required_if",
            Self::NotRequiredIf { .. } => "not_required_if",
            Self::RequiredIfNotNone { .. } => "required_if_not_none",
            Self::RequireTogether { .. } => "require_together",
            Self::Applicable { .. } => "applicable",
            Self::NotApplicable { .. } => "not_applicable",
            Self::NotApplicableOnlyIf { .. } => "not_applicable_only_if",
            Self::M2mRequired { .. } => "m2m_required",
            Self::M2mRequiredIf { .. } => "m2m_required_if",
            Self::M2mSingleSelectionIf { .. } => "m2m_single_selection_if",
            Self::M2mOtherSpecify { .. } => "m2m_other_specify",
            Self::M2mOtherSpecifyApplicable { .. } => "m2m_other_specify_applicable",
            Self::OtherSpecify { .. } => "other_specify",
            Self::RequireIfYes { .. } => "require_if_yes",
            Self::ApplicableByAge { .. } => "applicable_by_age",
            Self::Dates { .. } => "dates",
        }
    }

    /// Invoke the matching catalogue operation.
    pub fn apply(&self, v: &mut FormValidator<'_>) -> RuleResult {
        match self {
            Self::RequiredIf {
                responses,
                field,
                field_required,
                required_msg,
                not_required_msg,
                optional_if_dwta,
                optional_if_na,
                inverse,
            } => {
                let responses = decode_responses(v, field, responses)?;
                let opts = RequiredOptions {
                    required_msg: required_msg.as_deref(),
                    not_required_msg: not_required_msg.as_deref(),
                    optional_if_dwta: *optional_if_dwta,
                    optional_if_na: *optional_if_na,
                    inverse: *inverse,
                };
                v.required_if(&responses, field, field_required, opts)
            }
            Self::NotRequiredIf {
                responses,
                field,
                field_required,
                required_msg,
                not_required_msg,
                optional_if_dwta,
                inverse,
            } => {
                let responses = decode_responses(v, field, responses)?;
                let opts = RequiredOptions {
                    required_msg: required_msg.as_deref(),
                    not_required_msg: not_required_msg.as_deref(),
                    optional_if_dwta: *optional_if_dwta,
                    optional_if_na: false,
                    inverse: *inverse,
                };
                v.not_required_if(&responses, field, field_required, opts)
            }
            Self::RequiredIfNotNone {
                field,
                field_required,
                required_msg,
                not_required_msg,
                optional_if_dwta,
            } => {
                let opts = RequiredOptions {
                    required_msg: required_msg.as_deref(),
                    not_required_msg: not_required_msg.as_deref(),
                    optional_if_dwta: *optional_if_dwta,
                    ..RequiredOptions::default()
                };
                v.required_if_not_none(field, field_required, opts)
            }
            Self::RequireTogether {
                field,
                field_required,
                required_msg,
                not_required_msg,
            } => {
                let opts = RequiredOptions {
                    required_msg: required_msg.as_deref(),
                    not_required_msg: not_required_msg.as_deref(),
                    ..RequiredOptions::default()
                };
                v.require_together(field, field_required, opts)
            }
            Self::Applicable {
                responses,
                field,
                field_applicable,
            } => {
                let responses = decode_responses(v, field, responses)?;
                v.applicable(&responses, field, field_applicable)
            }
            Self::NotApplicable {
                responses,
                field,
                field_applicable,
            } => {
                let responses = decode_responses(v, field, responses)?;
                v.not_applicable(&responses, field, field_applicable)
            }
            Self::NotApplicableOnlyIf {
                responses,
                field,
                field_applicable,
            } => {
                let responses = decode_responses(v, field, responses)?;
                v.not_applicable_only_if(&responses, field, field_applicable)
            }
            Self::M2mRequired { m2m_field } => v.m2m_required(m2m_field),
            Self::M2mRequiredIf {
                response,
                field,
                m2m_field,
            } => {
                let response = decode_value(field, response, v.sentinels())?;
                v.m2m_required_if(&response, field, m2m_field)
            }
            Self::M2mSingleSelectionIf {
                selections,
                m2m_field,
            } => {
                let selections: Vec<&str> = selections.iter().map(String::as_str).collect();
                v.m2m_single_selection_if(&selections, m2m_field)
            }
            Self::M2mOtherSpecify {
                responses,
                m2m_field,
                field_other,
            } => {
                let responses: Vec<&str> = responses.iter().map(String::as_str).collect();
                v.m2m_other_specify(&responses, m2m_field, field_other)
            }
            Self::M2mOtherSpecifyApplicable {
                responses,
                m2m_field,
                field_other,
            } => {
                let responses: Vec<&str> = responses.iter().map(String::as_str).collect();
                v.m2m_other_specify_applicable(&responses, m2m_field, field_other)
            }
            Self::OtherSpecify {
                field,
                other_specify_field,
                other_stored_value,
                required_msg,
                not_required_msg,
                reference,
            } => {
                let other_stored_value = other_stored_value
                    .as_ref()
                    .map(|raw| decode_value(field, raw, v.sentinels()))
                    .transpose()?;
                let opts = OtherSpecifyOptions {
                    other_specify_field: other_specify_field.as_deref(),
                    other_stored_value,
                    required_msg: required_msg.as_deref(),
                    not_required_msg: not_required_msg.as_deref(),
                    reference: reference.as_deref(),
                };
                v.validate_other_specify(field, opts)
            }
            Self::RequireIfYes {
                yesno_field,
                required_field,
                required_msg,
                not_required_msg,
            } => v.require_if_yes(
                yesno_field,
                required_field,
                required_msg.as_deref(),
                not_required_msg.as_deref(),
            ),
            Self::ApplicableByAge {
                field,
                op,
                age,
                dob_field,
                reference_field,
                errmsg,
            } => {
                let data = v.cleaned_data();
                let dates = (
                    data.value(dob_field).as_date(),
                    data.value(reference_field).as_date(),
                );
                match dates {
                    (Some(dob), Some(reference)) => v.validate_applicable_by_age(
                        field,
                        *op,
                        *age,
                        dob,
                        reference,
                        errmsg.as_deref(),
                    ),
                    _ => {
                        tracing::debug!(
                            field = field.as_str(),
                            "Skipping age rule without birth and reference dates"
                        );
                        Ok(())
                    }
                }
            }
            Self::Dates {
                field1,
                op,
                field2,
                errmsg,
                verbose_name1,
                verbose_name2,
            } => {
                let opts = DateOptions {
                    errmsg: errmsg.as_deref(),
                    verbose_name1: verbose_name1.as_deref(),
                    verbose_name2: verbose_name2.as_deref(),
                    ..DateOptions::default()
                };
                v.validate_dates(field1, *op, field2, opts)
            }
        }
    }
}

fn decode_responses(
    v: &FormValidator<'_>,
    field: &str,
    responses: &[Value],
) -> Result<Vec<FieldValue>, ConfigError> {
    responses
        .iter()
        .map(|raw| decode_value(field, raw, v.sentinels()))
        .collect()
}

/// An ordered, named list of rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub name: Option<String>,
    pub rules: Vec<RuleSpec>,
}

impl RuleSet {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

impl FormRules for RuleSet {
    fn clean(&self, validator: &mut FormValidator<'_>) -> RuleResult {
        for (index, rule) in self.rules.iter().enumerate() {
            tracing::trace!(index, rule = rule.name(), "Applying rule");
            rule.apply(validator)?;
        }
        Ok(())
    }
}
