//! `formrules-checker` -- check one record against a declarative rule set.
//!
//! Prints a JSON report to stdout. Exits `0` when the record is valid, `2`
//! when a rule fails and `1` when the check could not run.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default  | Description                          |
//! |-----------------------|----------|----------|--------------------------------------|
//! | `FORMRULES_RULESET`   | yes      | --       | Path to the JSON rule set            |
//! | `FORMRULES_RECORD`    | yes      | --       | Path to the JSON record (an object)  |
//! | `FORMRULES_SENTINELS` | no       | built-in | Path to JSON stored-value overrides  |
//! | `FORMRULES_RECORD_ID` | no       | --       | Record id; checks as a change form   |

use std::process::ExitCode;

use formrules_checker::{check, CheckerConfig};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "formrules_checker=info,formrules_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match CheckerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::from(1);
        }
    };

    let report = match check(&config) {
        Ok(report) => report,
        Err(e) => {
            tracing::error!(error = %e, "Check failed");
            return ExitCode::from(1);
        }
    };

    match serde_json::to_string_pretty(&report) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize report");
            return ExitCode::from(1);
        }
    }

    if report.valid {
        tracing::info!("Record is valid");
        ExitCode::SUCCESS
    } else {
        tracing::info!(errors = report.errors.len(), "Record failed validation");
        ExitCode::from(2)
    }
}
