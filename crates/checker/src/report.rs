//! Running a check and reporting its outcome.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use formrules_core::{
    ConfigError, DataSnapshot, ErrorCode, FormMode, FormValidator, RuleError, RuleSet, Sentinels,
};

use crate::config::CheckerConfig;
use crate::error::CheckError;

/// Outcome of one validation pass over a record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub valid: bool,
    #[serde(flatten)]
    pub mode: FormMode,
    /// Field name (or `__all__`) to messages.
    pub errors: BTreeMap<String, Vec<String>>,
    pub codes: Vec<ErrorCode>,
}

impl CheckReport {
    fn passed(mode: FormMode) -> Self {
        Self {
            valid: true,
            mode,
            errors: BTreeMap::new(),
            codes: Vec::new(),
        }
    }
}

/// Load the configured files and check the record against the rule set.
pub fn check(config: &CheckerConfig) -> Result<CheckReport, CheckError> {
    let ruleset: RuleSet = read_json(&config.ruleset_path)?;
    let sentinels = match &config.sentinels_path {
        Some(path) => read_json(path)?,
        None => Sentinels::default(),
    };
    let record = match read_json::<Value>(&config.record_path)? {
        Value::Object(map) => map,
        other => {
            return Err(ConfigError::UnsupportedValue {
                field: config.record_path.display().to_string(),
                reason: format!("record must be a JSON object, got {other}"),
            }
            .into())
        }
    };

    tracing::info!(
        ruleset = ruleset.name.as_deref().unwrap_or("unnamed"),
        rules = ruleset.rules.len(),
        fields = record.len(),
        mode = config.mode.as_str(),
        "Checking record",
    );

    run_check(&ruleset, &record, &sentinels, config.mode)
}

/// Check an already-loaded record.
///
/// Rule violations produce an invalid report; misconfigured rules are errors.
pub fn run_check(
    ruleset: &RuleSet,
    record: &Map<String, Value>,
    sentinels: &Sentinels,
    mode: FormMode,
) -> Result<CheckReport, CheckError> {
    let snapshot = DataSnapshot::from_json(record, sentinels)?;
    let mut validator =
        FormValidator::new(Some(&snapshot), mode)?.with_sentinels(sentinels.clone());

    match validator.validate(ruleset) {
        Ok(_) => Ok(CheckReport::passed(mode)),
        Err(RuleError::Config(err)) => Err(err.into()),
        Err(RuleError::Invalid(failure)) => {
            let mut errors: BTreeMap<String, Vec<String>> = BTreeMap::new();
            for (field, message) in failure.detail.entries() {
                errors
                    .entry(field.to_string())
                    .or_default()
                    .push(message.to_string());
            }
            Ok(CheckReport {
                valid: false,
                mode,
                errors,
                codes: failure.codes,
            })
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CheckError> {
    let raw = std::fs::read_to_string(path).map_err(|source| CheckError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| CheckError::Json {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn ruleset() -> RuleSet {
        serde_json::from_value(json!({
            "rules": [
                {"rule": "required_if", "responses": ["Yes"], "field": "smokes", "field_required": "cigarettes"}
            ]
        }))
        .unwrap()
    }

    fn record(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn valid_record_passes() {
        let report = run_check(
            &ruleset(),
            &record(json!({"smokes": "Yes", "cigarettes": 10})),
            &Sentinels::default(),
            FormMode::Add,
        )
        .unwrap();
        assert!(report.valid);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn violation_is_reported_not_raised() {
        let report = run_check(
            &ruleset(),
            &record(json!({"smokes": "No", "cigarettes": 10})),
            &Sentinels::default(),
            FormMode::Change { id: 3 },
        )
        .unwrap();
        assert!(!report.valid);
        assert_eq!(report.codes, vec![ErrorCode::NotRequired]);
        assert_eq!(
            report.errors["cigarettes"],
            vec!["This field is not required.".to_string()]
        );

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["mode"], "change");
        assert_eq!(json["id"], 3);
        assert_eq!(json["codes"], json!(["not_required"]));
    }

    #[test]
    fn custom_sentinels_drive_matching() {
        let sentinels: Sentinels = serde_json::from_value(json!({"yes": "Y", "no": "N"})).unwrap();
        let set: RuleSet = serde_json::from_value(json!({
            "rules": [
                {"rule": "required_if", "responses": ["Y"], "field": "smokes", "field_required": "cigarettes"}
            ]
        }))
        .unwrap();
        let report = run_check(
            &set,
            &record(json!({"smokes": "Y", "cigarettes": null})),
            &sentinels,
            FormMode::Add,
        )
        .unwrap();
        assert_eq!(report.codes, vec![ErrorCode::Required]);
    }

    #[test]
    fn misconfigured_rule_is_an_error() {
        let set: RuleSet = serde_json::from_value(json!({
            "rules": [{"rule": "required_if", "responses": [], "field": "smokes", "field_required": "cigarettes"}]
        }))
        .unwrap();
        assert_matches!(
            run_check(&set, &record(json!({"smokes": "Yes"})), &Sentinels::default(), FormMode::Add),
            Err(CheckError::Config(ConfigError::InvalidConfiguration(_)))
        );
    }
}
