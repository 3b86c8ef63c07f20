use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Required field missing or unusable; the record was skipped.
    MalformedRecord,
    /// Optional field unusable; the record was kept without it.
    MalformedField,
    /// Status encoding not recognised; the record was treated as open.
    UnknownPaymentStatus,
    /// Due dates filled in from the configured grace period.
    DueDateInferred,
    /// Expense category absent from the category map; booked as `other`.
    UnclassifiedExpense,
    /// Balance-sheet figures were missing and derived from transactions.
    EstimatedIndicator,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
/// A recovered data anomaly reported alongside the results.
pub struct Warning {
    pub kind: WarningKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub record_id: Option<String>,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, record_id: Option<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            record_id,
            message: message.into(),
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.record_id {
            Some(id) => write!(f, "[{id}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}
