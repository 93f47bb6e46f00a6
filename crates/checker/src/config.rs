use std::path::PathBuf;

use formrules_core::{DbId, FormMode};

use crate::error::CheckError;

/// Checker configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckerConfig {
    /// JSON rule set to apply.
    pub ruleset_path: PathBuf,
    /// JSON object holding the record's cleaned values.
    pub record_path: PathBuf,
    /// Optional JSON overrides for the stored sentinel strings.
    pub sentinels_path: Option<PathBuf>,
    /// Add form unless a record id is configured.
    pub mode: FormMode,
}

impl CheckerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var               | Required | Default  |
    /// |-----------------------|----------|----------|
    /// | `FORMRULES_RULESET`   | yes      | --       |
    /// | `FORMRULES_RECORD`    | yes      | --       |
    /// | `FORMRULES_SENTINELS` | no       | built-in |
    /// | `FORMRULES_RECORD_ID` | no       | unset    |
    ///
    /// Setting `FORMRULES_RECORD_ID` checks the record as a change form.
    pub fn from_env() -> Result<Self, CheckError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`CheckerConfig::from_env`], reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, CheckError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| CheckError::Env(format!("{key} environment variable is required")))
        };

        let ruleset_path = PathBuf::from(required("FORMRULES_RULESET")?);
        let record_path = PathBuf::from(required("FORMRULES_RECORD")?);
        let sentinels_path = lookup("FORMRULES_SENTINELS")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let record_id: Option<DbId> = match lookup("FORMRULES_RECORD_ID") {
            Some(raw) if !raw.trim().is_empty() => Some(raw.trim().parse().map_err(|_| {
                CheckError::Env("FORMRULES_RECORD_ID must be a valid integer".into())
            })?),
            _ => None,
        };

        Ok(Self {
            ruleset_path,
            record_path,
            sentinels_path,
            mode: FormMode::from_instance(record_id),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn minimal_config_is_an_add_form() {
        let config = CheckerConfig::from_lookup(lookup(&[
            ("FORMRULES_RULESET", "rules.json"),
            ("FORMRULES_RECORD", "record.json"),
        ]))
        .unwrap();
        assert_eq!(config.ruleset_path, PathBuf::from("rules.json"));
        assert_eq!(config.sentinels_path, None);
        assert_eq!(config.mode, FormMode::Add);
    }

    #[test]
    fn record_id_selects_change_form() {
        let config = CheckerConfig::from_lookup(lookup(&[
            ("FORMRULES_RULESET", "rules.json"),
            ("FORMRULES_RECORD", "record.json"),
            ("FORMRULES_SENTINELS", "sentinels.json"),
            ("FORMRULES_RECORD_ID", " 17 "),
        ]))
        .unwrap();
        assert_eq!(config.mode, FormMode::Change { id: 17 });
        assert_eq!(config.sentinels_path, Some(PathBuf::from("sentinels.json")));
    }

    #[test]
    fn missing_or_malformed_vars_are_rejected() {
        assert_matches!(
            CheckerConfig::from_lookup(lookup(&[("FORMRULES_RECORD", "record.json")])),
            Err(CheckError::Env(msg)) if msg.contains("FORMRULES_RULESET")
        );
        assert_matches!(
            CheckerConfig::from_lookup(lookup(&[
                ("FORMRULES_RULESET", "rules.json"),
                ("FORMRULES_RECORD", "record.json"),
                ("FORMRULES_RECORD_ID", "abc"),
            ])),
            Err(CheckError::Env(_))
        );
    }
}
