use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    catalog::Dimension,
    dre::{ConsolidatedDre, UnitComparison},
    goal::GoalAttainment,
    growth::{Forecast, GrowthSummary, RecurrenceSummary, Seasonality},
    indicators::IndicatorSet,
    rentability::RentabilityEntry,
    warning::Warning,
};
use crate::calendar::DateWindow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Read-only bundle of every figure computed for one request.
pub struct FinancialReport {
    pub fingerprint: Uuid,
    pub window: DateWindow,
    pub reference_date: NaiveDate,
    pub currency: String,
    pub dre: ConsolidatedDre,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_comparison: Option<UnitComparison>,
    pub rentability: BTreeMap<Dimension, Vec<RentabilityEntry>>,
    pub indicators: IndicatorSet,
    pub growth: GrowthSummary,
    pub seasonality: Seasonality,
    pub forecast: Forecast,
    pub recurrence: RecurrenceSummary,
    pub goals: Vec<GoalAttainment>,
    pub warnings: Vec<Warning>,
}

impl FinancialReport {
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}
