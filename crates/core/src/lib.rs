//! `formrules-core`: cross-field validation rules for data-entry records.
//!
//! A hosting form layer hands over a [`DataSnapshot`] of cleaned values; a
//! [`FormValidator`] runs a rule body against it and either returns the
//! snapshot untouched or a [`ValidationFailure`] with field-keyed messages and
//! error codes. Pure logic: no I/O, no shared state between passes.

pub mod compare;
pub mod error;
pub mod ruleset;
pub mod sentinel;
pub mod sink;
pub mod snapshot;
pub mod types;
pub mod validator;
pub mod value;

pub use compare::Comparison;
pub use error::{ConfigError, ErrorCode, ErrorDetail, RuleError, RuleResult, ValidationFailure};
pub use ruleset::{RuleSet, RuleSpec};
pub use sentinel::{Choice, Sentinels};
pub use sink::ErrorSink;
pub use snapshot::DataSnapshot;
pub use types::{DbId, FormMode};
pub use validator::{FormRules, FormValidator, ValidationOutcome};
pub use value::{FieldValue, ListItem};
