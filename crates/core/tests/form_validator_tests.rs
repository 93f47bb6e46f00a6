//! Integration tests for validation passes.
//!
//! Covers the session contract (short-circuiting, error capture, re-raise
//! with accumulated state, configuration errors passing through) and the
//! behaviour of rule bodies written against the public API.

use std::collections::BTreeMap;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use formrules_core::error::NON_FIELD_ERRORS;
use formrules_core::validator::{ApplicableOptions, RequiredOptions};
use formrules_core::{
    Choice, Comparison, ConfigError, DataSnapshot, ErrorCode, FieldValue, FormMode, FormRules,
    FormValidator, ListItem, RuleError, RuleResult, ValidationFailure,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const YES: Choice = Choice::Yes;
const NO: Choice = Choice::No;

fn validator(snap: &DataSnapshot) -> FormValidator<'_> {
    FormValidator::new(Some(snap), FormMode::Add).expect("snapshot is present")
}

fn failure(err: &RuleError) -> &ValidationFailure {
    err.as_failure().expect("expected a validation failure")
}

/// `required_if(YES, field="f1", field_required="f2")` with configurable inverse.
struct F1RequiresF2 {
    inverse: bool,
}

impl FormRules for F1RequiresF2 {
    fn clean(&self, v: &mut FormValidator<'_>) -> RuleResult {
        v.required_if(
            &[YES.into()],
            "f1",
            "f2",
            RequiredOptions::default().inverse(self.inverse),
        )
    }
}

// ---------------------------------------------------------------------------
// Test: construction
// ---------------------------------------------------------------------------

#[test]
fn validator_without_snapshot_is_config_error() {
    assert_matches!(
        FormValidator::new(None, FormMode::Add),
        Err(ConfigError::MissingSnapshot(_))
    );
}

// ---------------------------------------------------------------------------
// Test: required_if through a pass
// ---------------------------------------------------------------------------

#[test]
fn required_if_pass_outcomes() {
    let rules = F1RequiresF2 { inverse: true };

    let snap = DataSnapshot::new().with("f1", YES).with("f2", FieldValue::Null);
    let err = validator(&snap).validate(&rules).unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::Required]);

    let snap = DataSnapshot::new().with("f1", YES).with("f2", "x");
    let mut v = validator(&snap);
    let outcome = v.validate(&rules).expect("should pass");
    assert_eq!(outcome, &snap);

    let snap = DataSnapshot::new().with("f1", NO).with("f2", "x");
    let err = validator(&snap).validate(&rules).unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::NotRequired]);
    assert_eq!(
        failure(&err).messages_for("f2"),
        vec!["This field is not required."]
    );

    let snap = DataSnapshot::new().with("f1", FieldValue::Null).with("f2", "x");
    assert!(validator(&snap).validate(&rules).is_err());
    assert!(validator(&snap)
        .validate(&F1RequiresF2 { inverse: false })
        .is_ok());
}

#[test]
fn required_if_without_responses_is_config_error() {
    let snap = DataSnapshot::new().with("f1", YES);
    let err = validator(&snap)
        .validate_with(|v| v.required_if(&[], "f1", "f2", RequiredOptions::default()))
        .unwrap_err();
    assert_matches!(err, RuleError::Config(ConfigError::InvalidConfiguration(_)));
}

#[test]
fn config_errors_are_not_recorded() {
    let snap = DataSnapshot::new().with("f1", YES);
    let mut v = validator(&snap);
    let err = v
        .validate_with(|v| v.required_if(&[YES.into()], "", "f2", RequiredOptions::default()))
        .unwrap_err();
    assert_matches!(err, RuleError::Config(_));
    assert!(v.sink().is_empty());
}

// ---------------------------------------------------------------------------
// Test: absent driving field never raises
// ---------------------------------------------------------------------------

#[test]
fn absent_field_is_a_no_op_for_trigger_rules() {
    let values: Vec<FieldValue> = vec![
        FieldValue::Null,
        "x".into(),
        Choice::NotApplicable.into(),
        10_i64.into(),
    ];
    for value in values {
        let snap = DataSnapshot::new().with("f2", value);
        let mut v = validator(&snap);
        let responses = vec![YES.into(), NO.into()];
        let opts = RequiredOptions::default();
        assert!(v.required_if(&responses, "f1", "f2", opts).is_ok());
        assert!(v.not_required_if(&responses, "f1", "f2", opts).is_ok());
        assert!(v.applicable(&responses, "f1", "f2").is_ok());
        assert!(v.not_applicable(&responses, "f1", "f2").is_ok());
    }
}

// ---------------------------------------------------------------------------
// Test: applicability, require_together, many-to-many, age
// ---------------------------------------------------------------------------

#[test]
fn applicable_if_on_na_raises_applicable() {
    let snap = DataSnapshot::new()
        .with("f1", YES)
        .with("f2", Choice::NotApplicable);
    let err = validator(&snap)
        .validate_with(|v| v.applicable_if(&[YES.into()], "f1", "f2"))
        .unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::Applicable]);
}

#[test]
fn require_together_targets_the_empty_field() {
    let rules = |v: &mut FormValidator<'_>| v.require_together("a", "b", RequiredOptions::default());

    let snap = DataSnapshot::new().with("a", 1_i64).with("b", FieldValue::Null);
    let err = validator(&snap).validate_with(rules).unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::Required]);
    assert_eq!(failure(&err).messages_for("b").len(), 1);

    let snap = DataSnapshot::new()
        .with("a", FieldValue::Null)
        .with("b", FieldValue::Null);
    assert!(validator(&snap).validate_with(rules).is_ok());

    let snap = DataSnapshot::new().with("a", FieldValue::Null).with("b", 1_i64);
    let err = validator(&snap).validate_with(rules).unwrap_err();
    assert_eq!(failure(&err).messages_for("a").len(), 1);
    assert!(failure(&err).messages_for("b").is_empty());
}

#[test]
fn rule_failure_equals_the_same_failure_built_by_hand() {
    let snap = DataSnapshot::new().with("a", 1_i64).with("b", FieldValue::Null);
    let err = validator(&snap)
        .require_together("a", "b", RequiredOptions::default())
        .unwrap_err();
    assert_eq!(
        err,
        RuleError::Invalid(ValidationFailure::field(
            "b",
            "This field is required.",
            ErrorCode::Required
        ))
    );
}

#[test]
fn single_selection_with_exclusive_code() {
    let both = FieldValue::Selection(vec![
        ListItem::new("excl", "None of the above"),
        ListItem::new("cough", "Cough"),
    ]);
    let snap = DataSnapshot::new().with("qs", both);
    let err = validator(&snap)
        .validate_with(|v| v.m2m_single_selection_if(&["excl"], "qs"))
        .unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::Invalid]);

    for item in [ListItem::new("excl", "None"), ListItem::new("cough", "Cough")] {
        let snap = DataSnapshot::new().with("qs", vec![item]);
        assert!(validator(&snap)
            .validate_with(|v| v.m2m_single_selection_if(&["excl"], "qs"))
            .is_ok());
    }
}

#[test]
fn age_gt_threshold_rejects_not_applicable() {
    let reference = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
    let dob = NaiveDate::from_ymd_opt(2004, 3, 10).unwrap();
    let snap = DataSnapshot::new().with("field", Choice::NotApplicable);
    let err = validator(&snap)
        .validate_with(|v| {
            v.validate_applicable_by_age("field", Comparison::Gt, 18, dob, reference, None)
        })
        .unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::Applicable]);
}

// ---------------------------------------------------------------------------
// Test: session capture and re-raise
// ---------------------------------------------------------------------------

#[test]
fn rule_body_stops_at_first_failure() {
    let snap = DataSnapshot::new()
        .with("f1", YES)
        .with("f2", FieldValue::Null)
        .with("f3", YES)
        .with("f4", Choice::NotApplicable);
    let err = validator(&snap)
        .validate_with(|v| {
            v.required_if(&[YES.into()], "f1", "f2", RequiredOptions::default())?;
            v.applicable_if(&[YES.into()], "f3", "f4")
        })
        .unwrap_err();
    let failure = failure(&err);
    assert_eq!(failure.codes, vec![ErrorCode::Required]);
    assert!(failure.messages_for("f4").is_empty());
}

#[test]
fn caught_failures_accumulate_into_the_reraise() {
    let snap = DataSnapshot::new()
        .with("f1", YES)
        .with("f2", FieldValue::Null)
        .with("f3", YES)
        .with("f4", Choice::NotApplicable);
    let err = validator(&snap)
        .validate_with(|v| {
            let first = v.required_if(&[YES.into()], "f1", "f2", RequiredOptions::default());
            assert!(first.is_err());
            v.applicable_if(&[YES.into()], "f3", "f4")
        })
        .unwrap_err();
    let failure = failure(&err);
    assert_eq!(failure.codes, vec![ErrorCode::Required, ErrorCode::Applicable]);
    assert_eq!(failure.messages_for("f2"), vec!["This field is required."]);
    assert_eq!(failure.messages_for("f4"), vec!["This field is applicable"]);
}

#[test]
fn user_raised_failures_are_merged() {
    let snap = DataSnapshot::new().with("f1", YES);

    let err = validator(&snap)
        .validate_with(|_| Err(ValidationFailure::message("Form is locked", None).into()))
        .unwrap_err();
    assert_eq!(failure(&err).messages_for(NON_FIELD_ERRORS), vec!["Form is locked"]);
    assert!(failure(&err).codes.is_empty());

    let err = validator(&snap)
        .validate_with(|_| {
            Err(ValidationFailure::list(vec!["one".into(), "two".into()], Some(ErrorCode::Invalid))
                .into())
        })
        .unwrap_err();
    assert_eq!(failure(&err).messages_for(NON_FIELD_ERRORS), vec!["one", "two"]);
    assert_eq!(failure(&err).codes, vec![ErrorCode::Invalid]);

    let mut map = BTreeMap::new();
    map.insert("f1".to_string(), vec!["Bad".to_string()]);
    map.insert("f9".to_string(), vec!["Worse".to_string()]);
    let err = validator(&snap)
        .validate_with(|_| Err(ValidationFailure::fields(map, Some(ErrorCode::Invalid)).into()))
        .unwrap_err();
    assert_eq!(failure(&err).messages_for("f1"), vec!["Bad"]);
    assert_eq!(failure(&err).messages_for("f9"), vec!["Worse"]);
}

#[test]
fn each_pass_starts_with_an_empty_sink() {
    let snap = DataSnapshot::new().with("f1", NO).with("f2", "x");
    let rules = F1RequiresF2 { inverse: true };
    let mut v = validator(&snap);

    let first = v.validate(&rules).unwrap_err();
    let second = v.validate(&rules).unwrap_err();
    assert_eq!(first, second);
    assert_eq!(v.sink().codes(), &[ErrorCode::NotRequired]);
}

#[test]
fn successful_pass_is_idempotent() {
    let snap = DataSnapshot::new().with("f1", YES).with("f2", "x");
    let rules = F1RequiresF2 { inverse: true };
    let mut v = validator(&snap);
    assert_eq!(v.validate(&rules).unwrap(), &snap);
    assert_eq!(v.validate(&rules).unwrap(), &snap);
    assert!(v.sink().is_empty());
}

// ---------------------------------------------------------------------------
// Test: form mode visible to rule bodies
// ---------------------------------------------------------------------------

#[test]
fn rule_body_can_branch_on_form_mode() {
    let snap = DataSnapshot::new().with("reason_changed", FieldValue::Null);
    let rules = |v: &mut FormValidator<'_>| {
        let editing = v.is_change_form();
        v.required_if_true(editing, "reason_changed", RequiredOptions::default())
    };

    assert!(validator(&snap).validate_with(rules).is_ok());

    let mut v = FormValidator::new(Some(&snap), FormMode::from_instance(Some(42))).unwrap();
    let err = v.validate_with(rules).unwrap_err();
    assert_eq!(failure(&err).codes, vec![ErrorCode::Required]);
}

#[test]
fn applicable_if_true_with_computed_condition() {
    let snap = DataSnapshot::new()
        .with("con1", YES)
        .with("con2", NO)
        .with("f2", Choice::NotApplicable);
    let rules = |v: &mut FormValidator<'_>| {
        let data = v.cleaned_data();
        let both = data.value("con1") == &FieldValue::from(YES)
            && data.value("con2") == &FieldValue::from(YES);
        v.applicable_if_true(both, "f2", ApplicableOptions::default())
    };
    assert!(validator(&snap).validate_with(rules).is_ok());
}
