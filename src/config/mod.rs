//! Business assumptions that drive the engine.
//!
//! Every heuristic the calculations rely on (flat tax estimate, due-date grace
//! period, customer-lifetime factors, classification cut points) lives here so
//! deployments can audit and override them instead of hunting for inline
//! constants.

use std::{
    collections::BTreeMap,
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    domain::ExpenseGroup,
    errors::{EngineError, Result},
    finance::Thresholds,
};

const DEFAULT_DIR_NAME: &str = ".dre_core";
const CONFIG_FILE: &str = "config.json";
const HOME_ENV: &str = "DRE_CORE_HOME";

/// Expense categories commonly found in chart-of-accounts exports.
static DEFAULT_CATEGORY_MAP: Lazy<BTreeMap<String, ExpenseGroup>> = Lazy::new(|| {
    use ExpenseGroup::*;
    [
        ("aluguel", Administrative),
        ("rent", Administrative),
        ("administrativo", Administrative),
        ("administrative", Administrative),
        ("utilities", Administrative),
        ("energia", Administrative),
        ("comissoes", Commercial),
        ("commissions", Commercial),
        ("comercial", Commercial),
        ("frete", Commercial),
        ("salarios", Personnel),
        ("salaries", Personnel),
        ("payroll", Personnel),
        ("beneficios", Personnel),
        ("marketing", Marketing),
        ("publicidade", Marketing),
        ("advertising", Marketing),
        ("juros", Financial),
        ("interest", Financial),
        ("tarifas_bancarias", Financial),
        ("bank_fees", Financial),
    ]
    .into_iter()
    .map(|(key, group)| (key.to_string(), group))
    .collect()
});

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
/// Coefficient-of-variation cut points (percent) for volatility tiers.
pub struct VolatilityThresholds {
    /// Below this the series is `low` volatility.
    pub low_below: f64,
    /// Above this the series is `high` volatility; in between is `moderate`.
    pub high_above: f64,
}

impl Default for VolatilityThresholds {
    fn default() -> Self {
        Self {
            low_below: 10.0,
            high_above: 20.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Flat tax rate (fraction) applied to revenue lacking an explicit tax amount.
    /// `None` means no estimate is configured.
    pub tax_rate_estimate: Option<f64>,
    /// Grace period assumed when a transaction has no due date.
    pub default_due_days: i64,
    pub purchase_frequency_per_month: f64,
    pub customer_lifespan_months: f64,
    /// Margin fraction applied to lifetime value.
    pub margin_fraction: f64,
    /// Inventory days used in the cash-conversion cycle without balance-sheet inventory.
    pub default_inventory_days: f64,
    /// Inclusive lower bounds (days past due) of every aging bucket after the first.
    pub aging_bucket_boundaries: Vec<i64>,
    pub liquidity_thresholds: Thresholds,
    /// Delinquency rate cut points in percent.
    pub delinquency_thresholds: Thresholds,
    /// Reserve coverage cut points in months.
    pub reserve_thresholds: Thresholds,
    pub ltv_cac_thresholds: Thresholds,
    pub volatility_thresholds: VolatilityThresholds,
    /// Percent change inside `(-tolerance, +tolerance)` counts as stable.
    pub growth_tolerance_percent: f64,
    /// Attainment percent from which an unmet goal is still on track.
    pub goal_on_track_percent: f64,
    pub top_products: usize,
    pub top_debtors: usize,
    /// Months of history feeding seasonality and forecast.
    pub history_months: u32,
    pub forecast_horizon: u32,
    pub currency: String,
    /// Expense category (case-insensitive) to expense group.
    pub category_map: BTreeMap<String, ExpenseGroup>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tax_rate_estimate: Some(0.15),
            default_due_days: 30,
            purchase_frequency_per_month: 1.0,
            customer_lifespan_months: 12.0,
            margin_fraction: 0.30,
            default_inventory_days: 0.0,
            aging_bucket_boundaries: vec![30, 60, 90],
            liquidity_thresholds: Thresholds::higher_is_better(1.5, 1.0, 0.5),
            delinquency_thresholds: Thresholds::lower_is_better(2.0, 5.0, 10.0),
            reserve_thresholds: Thresholds::higher_is_better(6.0, 3.0, 1.0),
            ltv_cac_thresholds: Thresholds::higher_is_better(3.0, 2.0, 1.0),
            volatility_thresholds: VolatilityThresholds::default(),
            growth_tolerance_percent: 0.5,
            goal_on_track_percent: 80.0,
            top_products: 20,
            top_debtors: 10,
            history_months: 12,
            forecast_horizon: 3,
            currency: "BRL".into(),
            category_map: DEFAULT_CATEGORY_MAP.clone(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(data: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(data)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects assumptions that cannot produce meaningful figures.
    pub fn validate(&self) -> Result<()> {
        if let Some(rate) = self.tax_rate_estimate {
            if !(0.0..1.0).contains(&rate) {
                return invalid(format!("tax_rate_estimate {rate} must be in [0, 1)"));
            }
        }
        if !(0..=MAX_DUE_DAYS).contains(&self.default_due_days) {
            return invalid(format!("default_due_days must be in [0, {MAX_DUE_DAYS}]"));
        }
        if self.purchase_frequency_per_month <= 0.0 || self.customer_lifespan_months <= 0.0 {
            return invalid("lifetime value assumptions must be positive");
        }
        if !(0.0..=1.0).contains(&self.margin_fraction) {
            return invalid("margin_fraction must be in [0, 1]");
        }
        if self.default_inventory_days < 0.0 {
            return invalid("default_inventory_days must not be negative");
        }
        let bounds = &self.aging_bucket_boundaries;
        if bounds.is_empty()
            || bounds[0] <= 0
            || bounds.windows(2).any(|pair| pair[0] >= pair[1])
        {
            return invalid("aging_bucket_boundaries must be positive and strictly increasing");
        }
        for (name, thresholds) in [
            ("liquidity_thresholds", &self.liquidity_thresholds),
            ("delinquency_thresholds", &self.delinquency_thresholds),
            ("reserve_thresholds", &self.reserve_thresholds),
            ("ltv_cac_thresholds", &self.ltv_cac_thresholds),
        ] {
            if !thresholds.is_ordered() {
                return invalid(format!("{name} are not ordered for their polarity"));
            }
        }
        let volatility = self.volatility_thresholds;
        if volatility.low_below < 0.0 || volatility.low_below > volatility.high_above {
            return invalid("volatility_thresholds must satisfy 0 <= low_below <= high_above");
        }
        if self.growth_tolerance_percent < 0.0 {
            return invalid("growth_tolerance_percent must not be negative");
        }
        if self.top_products == 0 || self.top_debtors == 0 {
            return invalid("top_products and top_debtors must be at least 1");
        }
        if self.history_months == 0 {
            return invalid("history_months must be at least 1");
        }
        Ok(())
    }

    /// The flat tax estimate, failing loudly when none is configured.
    pub fn required_tax_rate(&self) -> Result<f64> {
        self.tax_rate_estimate.ok_or_else(|| {
            EngineError::ConfigMissing(
                "tax_rate_estimate is required for transactions without an explicit tax".into(),
            )
        })
    }

    /// Looks up the expense group for a category, ignoring case and surrounding spaces.
    pub fn expense_group(&self, category: &str) -> Option<ExpenseGroup> {
        let key = category.trim();
        if let Some(group) = self.category_map.get(key) {
            return Some(*group);
        }
        self.category_map
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, group)| *group)
    }
}

/// Upper bound for the inferred payment term.
pub const MAX_DUE_DAYS: i64 = 3650;

fn invalid<T>(message: impl Into<String>) -> Result<T> {
    Err(EngineError::InvalidConfig(message.into()))
}

/// Reads [`AnalysisConfig`] documents from disk.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Application directory, defaulting to `~/.dre_core` unless `DRE_CORE_HOME` is set.
    pub fn app_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn default_path() -> PathBuf {
        Self::app_dir().join(CONFIG_FILE)
    }

    /// Loads and validates a config file; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<AnalysisConfig> {
        if !path.exists() {
            debug!(path = %path.display(), "config file absent, using defaults");
            return Ok(AnalysisConfig::default());
        }
        let data = fs::read_to_string(path)?;
        AnalysisConfig::from_json_str(&data)
    }

    pub fn load_default() -> Result<AnalysisConfig> {
        Self::load(&Self::default_path())
    }
}
