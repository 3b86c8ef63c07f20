use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{
    currency::round_currency,
    stats::{DescriptiveStats, LinearRegression},
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum GrowthStatus {
    Growth,
    Decline,
    Stable,
}

impl fmt::Display for GrowthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GrowthStatus::Growth => "growth",
            GrowthStatus::Decline => "decline",
            GrowthStatus::Stable => "stable",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Percent change between two period aggregates.
pub struct GrowthResult {
    pub percent: f64,
    pub status: GrowthStatus,
    pub current: f64,
    pub previous: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CagrResult {
    /// Compound rate per monthly period, in percent.
    pub monthly_rate_percent: f64,
    /// The monthly rate compounded over twelve months, in percent.
    pub annualized_percent: f64,
    /// Rate over the elapsed periods between first and last bucket.
    pub elapsed_rate_percent: f64,
    pub initial: f64,
    pub final_value: f64,
    pub periods: u32,
    /// False when the base was non-positive or the series was empty.
    pub defined: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GrowthSummary {
    /// First day of the month growth is measured for.
    pub current_month: NaiveDate,
    pub mom: GrowthResult,
    pub yoy: GrowthResult,
    pub cagr: CagrResult,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MonthlyRevenue {
    pub month: NaiveDate,
    pub revenue: f64,
    pub transactions: usize,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum VolatilityTier {
    Low,
    Moderate,
    High,
}

impl fmt::Display for VolatilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            VolatilityTier::Low => "low",
            VolatilityTier::Moderate => "moderate",
            VolatilityTier::High => "high",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Average revenue of one calendar month relative to the overall monthly mean.
pub struct SeasonalIndex {
    pub month: u32,
    pub average: f64,
    pub index: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seasonality {
    pub monthly: Vec<MonthlyRevenue>,
    pub stats: DescriptiveStats,
    pub volatility_tier: VolatilityTier,
    pub seasonal_indices: Vec<SeasonalIndex>,
    pub peak_month: Option<NaiveDate>,
    pub trough_month: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ForecastPoint {
    pub month: NaiveDate,
    /// Regression x-value; the history occupies `1..=n`.
    pub month_index: u32,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// Linear trend extrapolation. Seasonality is deliberately not modelled.
pub struct Forecast {
    pub model: Option<LinearRegression>,
    pub points: Vec<ForecastPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecurrenceSummary {
    pub customers: usize,
    pub recurring_customers: usize,
    /// Revenue from second and later purchases inside the window.
    pub recurring_revenue: f64,
    pub total_revenue: f64,
    pub recurring_share_percent: f64,
}

impl GrowthSummary {
    pub fn rounded(&self) -> Self {
        let round = |result: &GrowthResult| GrowthResult {
            percent: round_currency(result.percent),
            current: round_currency(result.current),
            previous: round_currency(result.previous),
            ..result.clone()
        };
        Self {
            current_month: self.current_month,
            mom: round(&self.mom),
            yoy: round(&self.yoy),
            cagr: CagrResult {
                monthly_rate_percent: round_currency(self.cagr.monthly_rate_percent),
                annualized_percent: round_currency(self.cagr.annualized_percent),
                elapsed_rate_percent: round_currency(self.cagr.elapsed_rate_percent),
                initial: round_currency(self.cagr.initial),
                final_value: round_currency(self.cagr.final_value),
                ..self.cagr.clone()
            },
        }
    }
}

impl Seasonality {
    pub fn rounded(&self) -> Self {
        Self {
            monthly: self
                .monthly
                .iter()
                .map(|month| MonthlyRevenue {
                    revenue: round_currency(month.revenue),
                    ..month.clone()
                })
                .collect(),
            ..self.clone()
        }
    }
}

impl Forecast {
    pub fn rounded(&self) -> Self {
        Self {
            model: self.model,
            points: self
                .points
                .iter()
                .map(|point| ForecastPoint {
                    value: round_currency(point.value),
                    ..point.clone()
                })
                .collect(),
        }
    }
}

impl RecurrenceSummary {
    pub fn rounded(&self) -> Self {
        Self {
            recurring_revenue: round_currency(self.recurring_revenue),
            total_revenue: round_currency(self.total_revenue),
            recurring_share_percent: round_currency(self.recurring_share_percent),
            ..self.clone()
        }
    }
}
