use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::transaction::PaymentStatus;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
/// Income-statement bucket an expense category rolls up into.
pub enum ExpenseGroup {
    Administrative,
    Commercial,
    Personnel,
    Marketing,
    /// Interest and bank charges; below the operating line.
    Financial,
    Other,
}

impl ExpenseGroup {
    /// Recurring structure costs used for reserve coverage.
    pub fn is_fixed(self) -> bool {
        matches!(self, ExpenseGroup::Administrative | ExpenseGroup::Personnel)
    }
}

impl fmt::Display for ExpenseGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ExpenseGroup::Administrative => "administrative",
            ExpenseGroup::Commercial => "commercial",
            ExpenseGroup::Personnel => "personnel",
            ExpenseGroup::Marketing => "marketing",
            ExpenseGroup::Financial => "financial",
            ExpenseGroup::Other => "other",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A cost-center posting or payable.
pub struct ExpenseRecord {
    pub id: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub category: String,
    #[serde(default = "ExpenseRecord::default_status")]
    pub status: PaymentStatus,
    #[serde(default)]
    pub cost_center_id: Option<String>,
    #[serde(default)]
    pub unit_id: Option<String>,
}

impl ExpenseRecord {
    pub fn new(
        id: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            amount,
            date,
            category: category.into(),
            status: PaymentStatus::Paid,
            cost_center_id: None,
            unit_id: None,
        }
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_cost_center(mut self, cost_center_id: impl Into<String>) -> Self {
        self.cost_center_id = Some(cost_center_id.into());
        self
    }

    pub fn with_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    pub fn is_settled(&self) -> bool {
        self.status.is_paid()
    }

    fn default_status() -> PaymentStatus {
        PaymentStatus::Paid
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Interest earned, yields and similar non-operating income.
pub struct FinancialIncomeRecord {
    pub id: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub unit_id: Option<String>,
}
