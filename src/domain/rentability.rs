use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::Dimension;
use crate::{currency::round_currency, finance::Ratio};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ProfitStatus {
    Profitable,
    Breakeven,
    Loss,
}

impl ProfitStatus {
    pub fn from_profit(profit: f64) -> Self {
        if profit > 0.0 {
            ProfitStatus::Profitable
        } else if profit < 0.0 {
            ProfitStatus::Loss
        } else {
            ProfitStatus::Breakeven
        }
    }
}

impl fmt::Display for ProfitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProfitStatus::Profitable => "profitable",
            ProfitStatus::Breakeven => "breakeven",
            ProfitStatus::Loss => "loss",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Profitability of one dimension value.
pub struct RentabilityEntry {
    pub dimension: Dimension,
    pub id: String,
    pub name: String,
    pub revenue: f64,
    pub cost: f64,
    pub expense: f64,
    /// `revenue - cost - expense`
    pub profit: f64,
    pub margin_percent: f64,
    /// Share of the dimension's total revenue.
    pub participation_percent: f64,
    /// Profit over cost plus expense.
    pub roi: Ratio,
    pub status: ProfitStatus,
    pub transaction_count: usize,
}

impl RentabilityEntry {
    pub fn has_activity(&self) -> bool {
        self.revenue + self.expense > 0.0
    }

    pub fn rounded(&self) -> Self {
        Self {
            revenue: round_currency(self.revenue),
            cost: round_currency(self.cost),
            expense: round_currency(self.expense),
            profit: round_currency(self.profit),
            margin_percent: round_currency(self.margin_percent),
            participation_percent: round_currency(self.participation_percent),
            roi: self.roi.map(round_currency),
            ..self.clone()
        }
    }
}
