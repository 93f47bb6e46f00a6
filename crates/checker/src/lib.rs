//! `formrules-checker` library crate.
//!
//! Loads a rule set and a record from disk, runs one validation pass and
//! builds a [`report::CheckReport`]. The binary entrypoint lives in `main.rs`.

pub mod config;
pub mod error;
pub mod report;

pub use config::CheckerConfig;
pub use error::CheckError;
pub use report::{check, run_check, CheckReport};
