pub mod dre_service;
pub mod goal_service;
pub mod growth_service;
pub mod indicator_service;
pub mod rentability_service;
pub mod report_service;

pub use dre_service::{DreOutcome, DreService};
pub use goal_service::GoalService;
pub use growth_service::GrowthService;
pub use indicator_service::{IndicatorContext, IndicatorService};
pub use rentability_service::RentabilityService;
pub use report_service::ReportService;

use crate::{
    calendar::DateWindow,
    domain::{ExpenseRecord, FinancialIncomeRecord, TransactionRecord},
};

/// The typed records one computation runs over.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    pub transactions: Vec<TransactionRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub financial_income: Vec<FinancialIncomeRecord>,
}

impl RecordSet {
    pub fn new(
        transactions: Vec<TransactionRecord>,
        expenses: Vec<ExpenseRecord>,
        financial_income: Vec<FinancialIncomeRecord>,
    ) -> Self {
        Self {
            transactions,
            expenses,
            financial_income,
        }
    }

    /// Records tagged with `unit`; `None` keeps everything.
    pub fn for_unit(&self, unit: Option<&str>) -> RecordSet {
        let Some(unit) = unit else {
            return self.clone();
        };
        let matches = |candidate: &Option<String>| candidate.as_deref() == Some(unit);
        RecordSet {
            transactions: self
                .transactions
                .iter()
                .filter(|txn| txn.belongs_to_unit(unit))
                .cloned()
                .collect(),
            expenses: self
                .expenses
                .iter()
                .filter(|expense| matches(&expense.unit_id))
                .cloned()
                .collect(),
            financial_income: self
                .financial_income
                .iter()
                .filter(|income| matches(&income.unit_id))
                .cloned()
                .collect(),
        }
    }

    /// Records dated inside `window`.
    pub fn within(&self, window: &DateWindow) -> RecordSet {
        RecordSet {
            transactions: self
                .transactions
                .iter()
                .filter(|txn| window.contains(txn.date))
                .cloned()
                .collect(),
            expenses: self
                .expenses
                .iter()
                .filter(|expense| window.contains(expense.date))
                .cloned()
                .collect(),
            financial_income: self
                .financial_income
                .iter()
                .filter(|income| window.contains(income.date))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.expenses.is_empty() && self.financial_income.is_empty()
    }
}
