//! Comparison operators and age arithmetic used by the date and age rules.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One of the six ordering operators accepted by the date and age rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    Gt,
    Gte,
    Lt,
    Lte,
    Ne,
    Eq,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::Ne => "ne",
            Self::Eq => "eq",
        }
    }

    /// Phrase used in violation messages, e.g. "must be greater than".
    pub fn phrase(&self) -> &'static str {
        match self {
            Self::Gt => "must be greater than",
            Self::Gte => "must be greater than or equal to",
            Self::Lt => "must be less than",
            Self::Lte => "must be less than or equal to",
            Self::Ne => "may not equal",
            Self::Eq => "must equal",
        }
    }

    /// Whether `ordering` (left compared to right) satisfies the operator.
    pub fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            Self::Gt => ordering == Ordering::Greater,
            Self::Gte => ordering != Ordering::Less,
            Self::Lt => ordering == Ordering::Less,
            Self::Lte => ordering != Ordering::Greater,
            Self::Ne => ordering != Ordering::Equal,
            Self::Eq => ordering == Ordering::Equal,
        }
    }

    /// `left <op> right`.
    pub fn holds<T: Ord>(&self, left: &T, right: &T) -> bool {
        self.accepts(left.cmp(right))
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Comparison {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            "ne" => Ok(Self::Ne),
            "eq" => Ok(Self::Eq),
            other => Err(ConfigError::InvalidConfiguration(format!(
                "Unknown comparison operator '{other}'. Must be one of: gt, gte, lt, lte, ne, eq"
            ))),
        }
    }
}

/// Whole years from `dob` to `reference`.
///
/// A year only counts once its anniversary has been reached. Negative when
/// `reference` is before `dob`.
pub fn age_delta_years(dob: NaiveDate, reference: NaiveDate) -> i32 {
    if reference < dob {
        return -age_delta_years(reference, dob);
    }
    let mut years = reference.year() - dob.year();
    if (reference.month(), reference.day()) < (dob.month(), dob.day()) {
        years -= 1;
    }
    years
}

/// Whether an age in whole years satisfies `years <op> age`.
pub fn get_applicable(op: Comparison, years: i32, age: i32) -> bool {
    op.holds(&years, &age)
}

/// `date1 <op> date2`, passing when either date is missing.
pub fn compare_dates(date1: Option<NaiveDate>, op: Comparison, date2: Option<NaiveDate>) -> bool {
    match (date1, date2) {
        (Some(a), Some(b)) => op.holds(&a, &b),
        _ => true,
    }
}
