//! Request payload accepted by the engine and its one-time validation into
//! typed records.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::{
    catalog::DimensionCatalogs,
    expense::{ExpenseRecord, FinancialIncomeRecord},
    goal::Goal,
    transaction::{PaymentStatus, ProductLine, TransactionRecord},
    warning::{Warning, WarningKind},
};
use crate::{
    calendar::DateWindow,
    config::AnalysisConfig,
    errors::Result,
};

/// Namespace for report cache keys.
const FINGERPRINT_NAMESPACE: Uuid = Uuid::from_u128(0x5f1c_2a7e_8d34_4b9f_a1e6_0c3d_9b72_e418);

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Text(text) => text,
            RawId::Number(number) => number.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
/// Amount as delivered by the source: a JSON number or a formatted string.
pub enum RawAmount {
    Number(f64),
    Text(String),
}

impl RawAmount {
    pub fn parse(&self) -> Option<f64> {
        let value = match self {
            RawAmount::Number(number) => *number,
            RawAmount::Text(text) => parse_amount_text(text)?,
        };
        value.is_finite().then_some(value)
    }
}

impl From<f64> for RawAmount {
    fn from(value: f64) -> Self {
        RawAmount::Number(value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawStatus {
    Flag(bool),
    Label(String),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Transaction exactly as supplied, every field optional.
pub struct RawTransaction {
    pub id: Option<RawId>,
    pub amount: Option<RawAmount>,
    pub cost: Option<RawAmount>,
    pub tax: Option<RawAmount>,
    pub discount: Option<RawAmount>,
    pub returns: Option<RawAmount>,
    pub date: Option<String>,
    pub due_date: Option<String>,
    pub customer_id: Option<String>,
    pub status: Option<RawStatus>,
    pub paid: Option<bool>,
    pub unit_id: Option<String>,
    pub cost_center_id: Option<String>,
    pub seller_id: Option<String>,
    pub store_id: Option<String>,
    pub channel_id: Option<String>,
    pub products: Vec<ProductLine>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
/// Balance-sheet figures, when the caller has them. Missing values are estimated.
pub struct BalanceSheet {
    pub current_assets: Option<f64>,
    pub current_liabilities: Option<f64>,
    pub inventory: Option<f64>,
    pub cash: Option<f64>,
    pub total_assets: Option<f64>,
    pub total_liabilities: Option<f64>,
    pub reserves: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisInput {
    pub window_start: NaiveDate,
    pub window_end: NaiveDate,
    /// "Today" for aging purposes; defaults to the window's last day.
    #[serde(default)]
    pub reference_date: Option<NaiveDate>,
    #[serde(default)]
    pub transactions: Vec<RawTransaction>,
    #[serde(default)]
    pub expense_records: Vec<ExpenseRecord>,
    #[serde(default)]
    pub financial_income: Vec<FinancialIncomeRecord>,
    #[serde(default)]
    pub dimension_catalogs: DimensionCatalogs,
    #[serde(default)]
    pub balance_sheet: Option<BalanceSheet>,
    #[serde(default)]
    pub goals: Vec<Goal>,
    /// Restricts the analysis to one legal unit.
    #[serde(default)]
    pub unit_filter: Option<String>,
    /// Units to compare side by side.
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default)]
    pub config: Option<AnalysisConfig>,
}

impl AnalysisInput {
    pub fn new(window_start: NaiveDate, window_end: NaiveDate) -> Self {
        Self {
            window_start,
            window_end,
            reference_date: None,
            transactions: Vec::new(),
            expense_records: Vec::new(),
            financial_income: Vec::new(),
            dimension_catalogs: DimensionCatalogs::new(),
            balance_sheet: None,
            goals: Vec::new(),
            unit_filter: None,
            units: Vec::new(),
            config: None,
        }
    }

    pub fn window(&self) -> Result<DateWindow> {
        Ok(DateWindow::new(self.window_start, self.window_end)?)
    }

    pub fn reference_date(&self, window: &DateWindow) -> NaiveDate {
        self.reference_date.unwrap_or_else(|| window.last_day())
    }

    pub fn effective_config(&self) -> AnalysisConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Deterministic cache key over unit scope, period, filters and assumptions.
    ///
    /// Record contents are not hashed; callers caching across data refreshes
    /// must fold their own data version into the key.
    pub fn fingerprint(&self) -> Result<Uuid> {
        let key = serde_json::json!({
            "window_start": self.window_start,
            "window_end": self.window_end,
            "reference_date": self.reference_date,
            "unit_filter": self.unit_filter,
            "units": self.units,
            "config": self.effective_config(),
        });
        let bytes = serde_json::to_vec(&key)?;
        Ok(Uuid::new_v5(&FINGERPRINT_NAMESPACE, &bytes))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidatedTransactions {
    pub records: Vec<TransactionRecord>,
    pub warnings: Vec<Warning>,
}

/// Converts raw transactions into typed records.
///
/// Records missing an amount or date are skipped with a `MalformedRecord`
/// warning; one bad row never aborts the batch.
pub fn validate_transactions(
    raw: &[RawTransaction],
    config: &AnalysisConfig,
) -> ValidatedTransactions {
    let mut out = ValidatedTransactions::default();
    let mut inferred_due_dates = 0usize;

    for (idx, item) in raw.iter().enumerate() {
        let id = item
            .id
            .clone()
            .map(RawId::into_string)
            .unwrap_or_else(|| format!("row-{}", idx + 1));
        let record_id = Some(id.clone());

        let Some(amount) = item.amount.as_ref().and_then(RawAmount::parse) else {
            out.warnings.push(Warning::new(
                WarningKind::MalformedRecord,
                record_id,
                "missing or unreadable amount; record skipped",
            ));
            continue;
        };
        let Some(date) = item.date.as_deref().and_then(parse_date) else {
            out.warnings.push(Warning::new(
                WarningKind::MalformedRecord,
                record_id,
                "missing or unreadable date; record skipped",
            ));
            continue;
        };

        let mut optional_amount = |field: &str, value: &Option<RawAmount>| -> Option<f64> {
            let raw_value = value.as_ref()?;
            let parsed = raw_value.parse();
            if parsed.is_none() {
                out.warnings.push(Warning::new(
                    WarningKind::MalformedField,
                    record_id.clone(),
                    format!("unreadable {field}; ignored"),
                ));
            }
            parsed
        };
        let cost = optional_amount("cost", &item.cost).unwrap_or(0.0);
        let tax = optional_amount("tax", &item.tax);
        let discount = optional_amount("discount", &item.discount).unwrap_or(0.0);
        let returns = optional_amount("returns", &item.returns).unwrap_or(0.0);

        let explicit_due = match item.due_date.as_deref() {
            Some(text) => {
                let parsed = parse_date(text);
                if parsed.is_none() {
                    out.warnings.push(Warning::new(
                        WarningKind::MalformedField,
                        record_id.clone(),
                        format!("unreadable due date `{text}`; grace period applied"),
                    ));
                }
                parsed
            }
            None => None,
        };
        let due_date_inferred = explicit_due.is_none();
        if due_date_inferred {
            inferred_due_dates += 1;
        }
        let due_date = match explicit_due {
            Some(due) => due,
            None => match grace_due_date(date, config.default_due_days) {
                Some(due) => due,
                None => {
                    out.warnings.push(Warning::new(
                        WarningKind::MalformedField,
                        record_id.clone(),
                        "grace period runs past the calendar; due on the sale date",
                    ));
                    date
                }
            },
        };

        let status = match (&item.status, item.paid) {
            (Some(RawStatus::Flag(flag)), _) => PaymentStatus::from_paid_flag(*flag),
            (Some(RawStatus::Label(label)), _) => match PaymentStatus::normalize(label) {
                Some(status) => status,
                None => {
                    out.warnings.push(Warning::new(
                        WarningKind::UnknownPaymentStatus,
                        record_id.clone(),
                        format!("unrecognised payment status `{label}`; treated as open"),
                    ));
                    PaymentStatus::Open
                }
            },
            (None, Some(flag)) => PaymentStatus::from_paid_flag(flag),
            (None, None) => PaymentStatus::Open,
        };

        out.records.push(TransactionRecord {
            id,
            amount,
            cost,
            tax,
            discount,
            returns,
            date,
            due_date,
            due_date_inferred,
            customer_id: non_empty(&item.customer_id),
            status,
            unit_id: non_empty(&item.unit_id),
            cost_center_id: non_empty(&item.cost_center_id),
            seller_id: non_empty(&item.seller_id),
            store_id: non_empty(&item.store_id),
            channel_id: non_empty(&item.channel_id),
            products: item.products.clone(),
        });
    }

    if inferred_due_dates > 0 {
        out.warnings.push(Warning::new(
            WarningKind::DueDateInferred,
            None,
            format!(
                "{inferred_due_dates} transaction(s) without due date; assumed {} days after sale",
                config.default_due_days
            ),
        ));
    }
    let skipped = raw.len() - out.records.len();
    if skipped > 0 {
        warn!(skipped, total = raw.len(), "skipped malformed transactions");
    }
    out
}

fn grace_due_date(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    let days = u64::try_from(days).ok()?;
    date.checked_add_days(Days::new(days))
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// Accepts ISO dates, `dd/mm/yyyy`, and timestamps whose first ten characters are a date.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    let candidates = [text, text.get(..10).unwrap_or(text)];
    candidates.iter().find_map(|candidate| {
        DATE_FORMATS
            .iter()
            .find_map(|format| NaiveDate::parse_from_str(candidate, format).ok())
    })
}

/// Parses `1234.56`, `1,234.56`, `1.234,56` and `R$ 1.234,56` style amounts.
pub fn parse_amount_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|ch| ch.is_ascii_digit() || matches!(ch, '.' | ',' | '-'))
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        (Some(comma), Some(dot)) if comma > dot => cleaned.replace('.', "").replace(',', "."),
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        _ => cleaned,
    };
    normalized.parse().ok()
}
