use serde::{Deserialize, Serialize};

/// Record primary keys are 64-bit integers.
pub type DbId = i64;

/// Whether the record being validated is new or already stored.
///
/// Supplied by the hosting form layer. Exposed to rule bodies; the rule
/// catalogue itself never looks at it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Add,
    Change {
        id: DbId,
    },
}

impl FormMode {
    /// `Change` when the record has an id, `Add` otherwise.
    pub fn from_instance(id: Option<DbId>) -> Self {
        match id {
            Some(id) => Self::Change { id },
            None => Self::Add,
        }
    }

    pub fn is_add(&self) -> bool {
        matches!(self, Self::Add)
    }

    pub fn is_change(&self) -> bool {
        matches!(self, Self::Change { .. })
    }

    /// Stable string representation matching serde's `rename_all = "snake_case"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Change { .. } => "change",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_from_instance() {
        assert_eq!(FormMode::from_instance(None), FormMode::Add);
        assert_eq!(FormMode::from_instance(Some(7)), FormMode::Change { id: 7 });
        assert!(FormMode::from_instance(Some(7)).is_change());
        assert!(FormMode::default().is_add());
    }
}
