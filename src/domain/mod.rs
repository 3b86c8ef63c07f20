//! Input records and output value objects.
//!
//! Inputs are validated once at the boundary ([`input`]); everything the
//! services produce is a plain serializable value that nothing mutates.

pub mod catalog;
pub mod dre;
pub mod expense;
pub mod goal;
pub mod growth;
pub mod indicators;
pub mod input;
pub mod rentability;
pub mod report;
pub mod transaction;
pub mod warning;

pub use catalog::{CatalogEntry, Dimension, DimensionCatalogs, UnknownDimension};
pub use dre::{
    ConsolidatedDre, DreComponents, DrePercentages, OperatingExpenses, StatementLine,
    UnitComparison, UnitScope,
};
pub use expense::{ExpenseGroup, ExpenseRecord, FinancialIncomeRecord};
pub use goal::{Goal, GoalAttainment, GoalMetric, GoalStatus};
pub use growth::{
    CagrResult, Forecast, ForecastPoint, GrowthResult, GrowthStatus, GrowthSummary,
    MonthlyRevenue, RecurrenceSummary, SeasonalIndex, Seasonality, VolatilityTier,
};
pub use indicators::{
    AgingBucket, DebtorRanking, DelinquencyIndicators, EfficiencyIndicators, IndicatorSet,
    IndicatorSnapshot, LiquidityIndicators, SustainabilityIndicators,
};
pub use input::{
    validate_transactions, AnalysisInput, BalanceSheet, RawAmount, RawId, RawStatus,
    RawTransaction, ValidatedTransactions,
};
pub use rentability::{ProfitStatus, RentabilityEntry};
pub use report::FinancialReport;
pub use transaction::{PaymentStatus, ProductLine, TransactionRecord};
pub use warning::{Warning, WarningKind};
