use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use tracing::debug;

use crate::{
    calendar::{month_start, months_from_to, previous_month_start, same_month_previous_year, shift_month},
    config::AnalysisConfig,
    domain::{
        CagrResult, Forecast, ForecastPoint, GrowthResult, GrowthStatus, GrowthSummary,
        MonthlyRevenue, RecurrenceSummary, SeasonalIndex, Seasonality, TransactionRecord,
        VolatilityTier,
    },
    finance::percent_of,
    stats::{mean, DescriptiveStats, LinearRegression},
};

pub struct GrowthService;

impl GrowthService {
    /// Revenue per calendar month from the first sale through `current_month`.
    ///
    /// Months without sales are present with zero revenue. Sales after
    /// `current_month` are ignored.
    pub fn monthly_series(
        history: &[TransactionRecord],
        current_month: NaiveDate,
    ) -> Vec<MonthlyRevenue> {
        let current_month = month_start(current_month);
        let mut buckets: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();
        for txn in history {
            let month = month_start(txn.date);
            if month > current_month {
                continue;
            }
            let bucket = buckets.entry(month).or_default();
            bucket.0 += txn.amount;
            bucket.1 += 1;
        }
        let first = buckets.keys().next().copied().unwrap_or(current_month);
        months_from_to(first, current_month)
            .into_iter()
            .map(|month| {
                let (revenue, transactions) = buckets.get(&month).copied().unwrap_or_default();
                MonthlyRevenue {
                    month,
                    revenue,
                    transactions,
                }
            })
            .collect()
    }

    /// Percent change from `previous` to `current`.
    ///
    /// A zero base yields 0 when both are zero and +/-100 otherwise.
    pub fn growth_rate(current: f64, previous: f64, tolerance_percent: f64) -> GrowthResult {
        let percent = if previous == 0.0 {
            if current > 0.0 {
                100.0
            } else if current < 0.0 {
                -100.0
            } else {
                0.0
            }
        } else {
            (current - previous) / previous.abs() * 100.0
        };
        let status = if percent > tolerance_percent {
            GrowthStatus::Growth
        } else if percent < -tolerance_percent {
            GrowthStatus::Decline
        } else {
            GrowthStatus::Stable
        };
        GrowthResult {
            percent,
            status,
            current,
            previous,
        }
    }

    /// Compound growth over `N` monthly buckets: `(final / initial)^(1/N) - 1`.
    ///
    /// `elapsed_rate_percent` uses the `N - 1` periods between the first and
    /// last bucket instead. A non-positive base, a negative end value or an
    /// empty series is undefined.
    pub fn cagr(values: &[f64]) -> CagrResult {
        let initial = values.first().copied().unwrap_or(0.0);
        let final_value = values.last().copied().unwrap_or(0.0);
        let periods = values.len() as u32;
        let undefined = CagrResult {
            monthly_rate_percent: 0.0,
            annualized_percent: 0.0,
            elapsed_rate_percent: 0.0,
            initial,
            final_value,
            periods,
            defined: false,
        };
        if periods == 0 || initial <= 0.0 || final_value < 0.0 {
            return undefined;
        }
        let growth = final_value / initial;
        let rate = growth.powf(1.0 / periods as f64) - 1.0;
        let elapsed_rate = match periods - 1 {
            0 => 0.0,
            elapsed => growth.powf(1.0 / elapsed as f64) - 1.0,
        };
        CagrResult {
            monthly_rate_percent: rate * 100.0,
            annualized_percent: ((1.0 + rate).powi(12) - 1.0) * 100.0,
            elapsed_rate_percent: elapsed_rate * 100.0,
            defined: true,
            ..undefined
        }
    }

    pub fn summary(
        series: &[MonthlyRevenue],
        current_month: NaiveDate,
        config: &AnalysisConfig,
    ) -> GrowthSummary {
        let current_month = month_start(current_month);
        let revenue_of = |month: NaiveDate| {
            series
                .iter()
                .find(|entry| entry.month == month)
                .map(|entry| entry.revenue)
                .unwrap_or(0.0)
        };
        let current = revenue_of(current_month);
        let tolerance = config.growth_tolerance_percent;
        let trailing = Self::trailing(series, config.history_months);
        let values: Vec<f64> = trailing.iter().map(|entry| entry.revenue).collect();

        GrowthSummary {
            current_month,
            mom: Self::growth_rate(current, revenue_of(previous_month_start(current_month)), tolerance),
            yoy: Self::growth_rate(
                current,
                revenue_of(same_month_previous_year(current_month)),
                tolerance,
            ),
            cagr: Self::cagr(&values),
        }
    }

    /// Dispersion of the trailing `history_months` of the series.
    pub fn seasonality(series: &[MonthlyRevenue], config: &AnalysisConfig) -> Seasonality {
        let monthly = Self::trailing(series, config.history_months).to_vec();
        let values: Vec<f64> = monthly.iter().map(|entry| entry.revenue).collect();
        let stats = DescriptiveStats::from_values(&values);
        let limits = config.volatility_thresholds;
        let volatility_tier = if !stats.cv_defined || stats.coefficient_of_variation < limits.low_below
        {
            VolatilityTier::Low
        } else if stats.coefficient_of_variation > limits.high_above {
            VolatilityTier::High
        } else {
            VolatilityTier::Moderate
        };

        let mut by_month: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for entry in &monthly {
            by_month.entry(entry.month.month()).or_default().push(entry.revenue);
        }
        let overall = stats.mean;
        let seasonal_indices = by_month
            .into_iter()
            .map(|(month, revenues)| {
                let average = mean(&revenues);
                SeasonalIndex {
                    month,
                    average,
                    index: if overall == 0.0 { 0.0 } else { average / overall },
                    samples: revenues.len(),
                }
            })
            .collect();

        // first occurrence wins on ties
        let mut peak: Option<&MonthlyRevenue> = None;
        let mut trough: Option<&MonthlyRevenue> = None;
        for entry in &monthly {
            if peak.map_or(true, |best| entry.revenue > best.revenue) {
                peak = Some(entry);
            }
            if trough.map_or(true, |worst| entry.revenue < worst.revenue) {
                trough = Some(entry);
            }
        }

        debug!(months = monthly.len(), tier = %volatility_tier, "computed seasonality");
        Seasonality {
            peak_month: peak.map(|entry| entry.month),
            trough_month: trough.map(|entry| entry.month),
            monthly,
            stats,
            volatility_tier,
            seasonal_indices,
        }
    }

    /// Linear trend over the trailing history, extrapolated `forecast_horizon` months.
    pub fn forecast(
        series: &[MonthlyRevenue],
        current_month: NaiveDate,
        config: &AnalysisConfig,
    ) -> Forecast {
        let trailing = Self::trailing(series, config.history_months);
        let values: Vec<f64> = trailing.iter().map(|entry| entry.revenue).collect();
        let Some(model) = LinearRegression::fit_series(&values) else {
            return Forecast {
                model: None,
                points: Vec::new(),
            };
        };
        let last_index = values.len() as u32;
        let base = month_start(current_month);
        let points = (1..=config.forecast_horizon)
            .map(|step| {
                let month_index = last_index + step;
                ForecastPoint {
                    month: shift_month(base, step as i32),
                    month_index,
                    value: model.predict(month_index as f64),
                }
            })
            .collect();
        Forecast {
            model: Some(model),
            points,
        }
    }

    /// Customers buying at least twice inside the window and the revenue of
    /// their repeat purchases.
    ///
    /// Only in-window sales are considered, so a returning customer's first
    /// in-window sale counts as non-recurring.
    pub fn recurrence(transactions: &[TransactionRecord]) -> RecurrenceSummary {
        let mut by_customer: BTreeMap<&str, Vec<&TransactionRecord>> = BTreeMap::new();
        for txn in transactions {
            if let Some(customer) = txn.customer_id.as_deref() {
                by_customer.entry(customer).or_default().push(txn);
            }
        }

        let mut recurring_customers = 0;
        let mut recurring_revenue = 0.0;
        for purchases in by_customer.values_mut() {
            if purchases.len() < 2 {
                continue;
            }
            recurring_customers += 1;
            purchases.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
            recurring_revenue += purchases.iter().skip(1).map(|txn| txn.amount).sum::<f64>();
        }
        let total_revenue: f64 = transactions.iter().map(|txn| txn.amount).sum();

        RecurrenceSummary {
            customers: by_customer.len(),
            recurring_customers,
            recurring_revenue,
            total_revenue,
            recurring_share_percent: percent_of(recurring_revenue, total_revenue),
        }
    }

    fn trailing(series: &[MonthlyRevenue], months: u32) -> &[MonthlyRevenue] {
        let keep = (months as usize).min(series.len());
        &series[series.len() - keep..]
    }
}
