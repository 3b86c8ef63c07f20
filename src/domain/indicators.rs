//! Indicator result objects for the liquidity, delinquency, efficiency and
//! sustainability families.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    currency::round_currency,
    finance::{Classification, Ratio, RatioStatus, Thresholds},
};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A named metric with its tier and the raw inputs behind it.
pub struct IndicatorSnapshot {
    pub name: String,
    pub value: f64,
    pub status: RatioStatus,
    pub classification: Classification,
    pub inputs: BTreeMap<String, f64>,
    /// Inputs were derived from heuristics rather than balance-sheet figures.
    pub estimated: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
}

impl IndicatorSnapshot {
    pub fn new(name: impl Into<String>, ratio: Ratio) -> Self {
        Self {
            name: name.into(),
            value: ratio.value,
            status: ratio.status,
            classification: Classification::NotApplicable,
            inputs: BTreeMap::new(),
            estimated: false,
            notes: Vec::new(),
        }
    }

    pub fn classified(mut self, thresholds: &Thresholds) -> Self {
        self.classification = thresholds.classify_ratio(self.ratio());
        self
    }

    pub fn input(mut self, key: &str, value: f64) -> Self {
        self.inputs.insert(key.to_string(), value);
        self
    }

    pub fn estimated_with(mut self, note: impl Into<String>) -> Self {
        self.estimated = true;
        self.notes.push(note.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn ratio(&self) -> Ratio {
        Ratio {
            value: self.value,
            status: self.status,
        }
    }

    pub fn is_applicable(&self) -> bool {
        self.status == RatioStatus::Defined
    }

    pub fn rounded(&self) -> Self {
        Self {
            value: round_currency(self.value),
            inputs: self
                .inputs
                .iter()
                .map(|(key, value)| (key.clone(), round_currency(*value)))
                .collect(),
            ..self.clone()
        }
    }
}

impl LiquidityIndicators {
    pub fn rounded(&self) -> Self {
        Self {
            current_ratio: self.current_ratio.rounded(),
            quick_ratio: self.quick_ratio.rounded(),
            immediate_liquidity: self.immediate_liquidity.rounded(),
            receivable_days: self.receivable_days.rounded(),
            inventory_days: self.inventory_days.rounded(),
            payable_days: self.payable_days.rounded(),
            cash_conversion_cycle: self.cash_conversion_cycle.rounded(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiquidityIndicators {
    pub current_ratio: IndicatorSnapshot,
    pub quick_ratio: IndicatorSnapshot,
    pub immediate_liquidity: IndicatorSnapshot,
    pub receivable_days: IndicatorSnapshot,
    pub inventory_days: IndicatorSnapshot,
    pub payable_days: IndicatorSnapshot,
    pub cash_conversion_cycle: IndicatorSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Overdue receivables within one delay range.
pub struct AgingBucket {
    pub label: String,
    /// Inclusive lower bound in days past due.
    pub min_days: i64,
    /// Exclusive upper bound; `None` for the open-ended last bucket.
    pub max_days: Option<i64>,
    pub count: usize,
    pub value: f64,
    /// Share of total overdue value.
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DebtorRanking {
    pub customer_id: String,
    pub outstanding: f64,
    pub overdue_transactions: usize,
    pub average_days_overdue: f64,
    pub max_days_overdue: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DelinquencyIndicators {
    pub delinquency_rate: IndicatorSnapshot,
    pub total_value: f64,
    pub overdue_value: f64,
    pub overdue_count: usize,
    pub average_days_overdue: f64,
    pub aging: Vec<AgingBucket>,
    pub top_debtors: Vec<DebtorRanking>,
}

impl DelinquencyIndicators {
    pub fn rounded(&self) -> Self {
        Self {
            delinquency_rate: self.delinquency_rate.rounded(),
            total_value: round_currency(self.total_value),
            overdue_value: round_currency(self.overdue_value),
            average_days_overdue: round_currency(self.average_days_overdue),
            aging: self
                .aging
                .iter()
                .map(|bucket| AgingBucket {
                    value: round_currency(bucket.value),
                    percent: round_currency(bucket.percent),
                    ..bucket.clone()
                })
                .collect(),
            top_debtors: self
                .top_debtors
                .iter()
                .map(|debtor| DebtorRanking {
                    outstanding: round_currency(debtor.outstanding),
                    average_days_overdue: round_currency(debtor.average_days_overdue),
                    ..debtor.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EfficiencyIndicators {
    pub cost_to_revenue: IndicatorSnapshot,
    pub average_ticket: f64,
    pub new_customers: usize,
    pub customer_acquisition_cost: IndicatorSnapshot,
    pub lifetime_value: IndicatorSnapshot,
    pub ltv_cac_ratio: IndicatorSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SustainabilityIndicators {
    pub average_monthly_fixed_expenses: f64,
    pub reserve_coverage_months: IndicatorSnapshot,
    pub debt_ratio: IndicatorSnapshot,
    pub solvency_index: IndicatorSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndicatorSet {
    pub liquidity: LiquidityIndicators,
    pub delinquency: DelinquencyIndicators,
    pub efficiency: EfficiencyIndicators,
    pub sustainability: SustainabilityIndicators,
}

impl IndicatorSet {
    pub fn rounded(&self) -> Self {
        let efficiency = &self.efficiency;
        let sustainability = &self.sustainability;
        Self {
            liquidity: self.liquidity.rounded(),
            delinquency: self.delinquency.rounded(),
            efficiency: EfficiencyIndicators {
                cost_to_revenue: efficiency.cost_to_revenue.rounded(),
                average_ticket: round_currency(efficiency.average_ticket),
                new_customers: efficiency.new_customers,
                customer_acquisition_cost: efficiency.customer_acquisition_cost.rounded(),
                lifetime_value: efficiency.lifetime_value.rounded(),
                ltv_cac_ratio: efficiency.ltv_cac_ratio.rounded(),
            },
            sustainability: SustainabilityIndicators {
                average_monthly_fixed_expenses: round_currency(
                    sustainability.average_monthly_fixed_expenses,
                ),
                reserve_coverage_months: sustainability.reserve_coverage_months.rounded(),
                debt_ratio: sustainability.debt_ratio.rounded(),
                solvency_index: sustainability.solvency_index.rounded(),
            },
        }
    }
}
