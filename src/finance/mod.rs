//! Scalar financial formulas: ratios, margins, working-capital cycles and
//! customer economics.
//!
//! Divisions never fail. A zero or negative denominator without financial
//! meaning yields [`Ratio::not_applicable`], which carries a zero value and an
//! explicit status so dashboards can render "n/a" instead of a wrong number.

use std::fmt;

use serde::{Deserialize, Serialize};

pub use crate::currency::round_currency;

const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RatioStatus {
    Defined,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// A computed ratio together with whether its denominator made sense.
pub struct Ratio {
    pub value: f64,
    pub status: RatioStatus,
}

impl Ratio {
    pub fn defined(value: f64) -> Self {
        Self {
            value,
            status: RatioStatus::Defined,
        }
    }

    pub fn not_applicable() -> Self {
        Self {
            value: 0.0,
            status: RatioStatus::NotApplicable,
        }
    }

    pub fn is_defined(&self) -> bool {
        self.status == RatioStatus::Defined
    }

    pub fn map(self, f: impl FnOnce(f64) -> f64) -> Self {
        match self.status {
            RatioStatus::Defined => Self::defined(f(self.value)),
            RatioStatus::NotApplicable => self,
        }
    }
}

/// `numerator / denominator`, not applicable when the denominator is not positive.
pub fn safe_ratio(numerator: f64, denominator: f64) -> Ratio {
    if denominator <= EPSILON {
        Ratio::not_applicable()
    } else {
        Ratio::defined(numerator / denominator)
    }
}

/// `part / whole * 100`, defined as zero when `whole` is zero.
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole.abs() < EPSILON {
        0.0
    } else {
        part / whole * 100.0
    }
}

/// Profit as a percentage of revenue; zero for zero revenue.
pub fn margin_percent(profit: f64, revenue: f64) -> f64 {
    percent_of(profit, revenue)
}

/// Return on investment in percent, where the investment is cost plus expense.
pub fn roi_percent(profit: f64, investment: f64) -> Ratio {
    safe_ratio(profit, investment).map(|ratio| ratio * 100.0)
}

pub fn current_ratio(current_assets: f64, current_liabilities: f64) -> Ratio {
    safe_ratio(current_assets, current_liabilities)
}

pub fn quick_ratio(current_assets: f64, inventory: f64, current_liabilities: f64) -> Ratio {
    safe_ratio(current_assets - inventory, current_liabilities)
}

pub fn immediate_liquidity(cash: f64, current_liabilities: f64) -> Ratio {
    safe_ratio(cash, current_liabilities)
}

/// Days a balance represents of the flow over `period_days` (DSO, DIO, DPO).
pub fn days_outstanding(balance: f64, period_flow: f64, period_days: f64) -> Ratio {
    safe_ratio(balance, period_flow).map(|ratio| ratio * period_days)
}

/// Receivable days plus inventory days minus payable days.
pub fn cash_conversion_cycle(receivable_days: f64, inventory_days: f64, payable_days: f64) -> f64 {
    receivable_days + inventory_days - payable_days
}

/// Overdue value over total receivable value, in percent.
pub fn delinquency_rate(overdue_value: f64, total_value: f64) -> Ratio {
    safe_ratio(overdue_value, total_value).map(|ratio| ratio * 100.0)
}

pub fn customer_acquisition_cost(marketing_spend: f64, new_customers: usize) -> Ratio {
    safe_ratio(marketing_spend, new_customers as f64)
}

/// Average ticket x monthly purchase frequency x lifespan in months x margin fraction.
///
/// Every factor but the ticket is a configured assumption, not a measurement.
pub fn lifetime_value(
    average_ticket: f64,
    purchase_frequency_per_month: f64,
    lifespan_months: f64,
    margin_fraction: f64,
) -> f64 {
    average_ticket * purchase_frequency_per_month * lifespan_months * margin_fraction
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
/// Qualitative tier assigned to an indicator value.
pub enum Classification {
    Excellent,
    Adequate,
    Attention,
    Critical,
    NotApplicable,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Classification::Excellent => "excellent",
            Classification::Adequate => "adequate",
            Classification::Attention => "attention",
            Classification::Critical => "critical",
            Classification::NotApplicable => "n/a",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Three cut points splitting a value range into four tiers.
pub struct Thresholds {
    pub excellent: f64,
    pub adequate: f64,
    pub attention: f64,
    pub polarity: Polarity,
}

impl Thresholds {
    pub const fn higher_is_better(excellent: f64, adequate: f64, attention: f64) -> Self {
        Self {
            excellent,
            adequate,
            attention,
            polarity: Polarity::HigherIsBetter,
        }
    }

    pub const fn lower_is_better(excellent: f64, adequate: f64, attention: f64) -> Self {
        Self {
            excellent,
            adequate,
            attention,
            polarity: Polarity::LowerIsBetter,
        }
    }

    /// Whether the cut points are ordered consistently with the polarity.
    pub fn is_ordered(&self) -> bool {
        match self.polarity {
            Polarity::HigherIsBetter => {
                self.excellent >= self.adequate && self.adequate >= self.attention
            }
            Polarity::LowerIsBetter => {
                self.excellent <= self.adequate && self.adequate <= self.attention
            }
        }
    }

    pub fn classify(&self, value: f64) -> Classification {
        match self.polarity {
            Polarity::HigherIsBetter => {
                if value >= self.excellent {
                    Classification::Excellent
                } else if value >= self.adequate {
                    Classification::Adequate
                } else if value >= self.attention {
                    Classification::Attention
                } else {
                    Classification::Critical
                }
            }
            Polarity::LowerIsBetter => {
                if value <= self.excellent {
                    Classification::Excellent
                } else if value <= self.adequate {
                    Classification::Adequate
                } else if value <= self.attention {
                    Classification::Attention
                } else {
                    Classification::Critical
                }
            }
        }
    }

    pub fn classify_ratio(&self, ratio: Ratio) -> Classification {
        if ratio.is_defined() {
            self.classify(ratio.value)
        } else {
            Classification::NotApplicable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_denominator_is_not_applicable() {
        let ratio = safe_ratio(10.0, 0.0);
        assert_eq!(ratio.status, RatioStatus::NotApplicable);
        assert_eq!(ratio.value, 0.0);
        assert!(!current_ratio(5.0, -1.0).is_defined());
        assert_eq!(percent_of(3.0, 0.0), 0.0);
    }

    #[test]
    fn liquidity_thresholds_classify() {
        let thresholds = Thresholds::higher_is_better(1.5, 1.0, 0.5);
        assert_eq!(thresholds.classify(1.5), Classification::Excellent);
        assert_eq!(thresholds.classify(1.2), Classification::Adequate);
        assert_eq!(thresholds.classify(0.5), Classification::Attention);
        assert_eq!(thresholds.classify(0.1), Classification::Critical);
        assert_eq!(
            thresholds.classify_ratio(Ratio::not_applicable()),
            Classification::NotApplicable
        );
    }

    #[test]
    fn lower_is_better_thresholds_classify() {
        let thresholds = Thresholds::lower_is_better(2.0, 5.0, 10.0);
        assert!(thresholds.is_ordered());
        assert_eq!(thresholds.classify(0.0), Classification::Excellent);
        assert_eq!(thresholds.classify(7.0), Classification::Attention);
        assert_eq!(thresholds.classify(100.0), Classification::Critical);
        assert!(!Thresholds::lower_is_better(5.0, 2.0, 10.0).is_ordered());
    }

    #[test]
    fn working_capital_cycle() {
        let dso = days_outstanding(300.0, 900.0, 30.0);
        assert!((dso.value - 10.0).abs() < 1e-9);
        assert_eq!(cash_conversion_cycle(10.0, 20.0, 5.0), 25.0);
    }

    #[test]
    fn customer_economics() {
        assert!((customer_acquisition_cost(1000.0, 4).value - 250.0).abs() < 1e-9);
        assert!(!customer_acquisition_cost(1000.0, 0).is_defined());
        assert!((lifetime_value(100.0, 1.0, 12.0, 0.3) - 360.0).abs() < 1e-9);
        assert!((roi_percent(50.0, 200.0).value - 25.0).abs() < 1e-9);
    }
}
