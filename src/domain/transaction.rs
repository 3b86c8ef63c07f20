use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::catalog::Dimension;
use crate::calendar::days_between;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[serde(alias = "pago", alias = "liquidado", alias = "quitado", alias = "settled")]
    Paid,
    #[serde(alias = "aberto", alias = "pendente", alias = "pending")]
    Open,
    #[serde(alias = "vencido", alias = "atrasado", alias = "late")]
    Overdue,
}

impl PaymentStatus {
    /// Maps heterogeneous source encodings onto the three canonical states.
    ///
    /// Matching ignores case, accents are expected to be stripped upstream.
    pub fn normalize(raw: &str) -> Option<Self> {
        let key = raw.trim().to_ascii_lowercase().replace([' ', '-'], "_");
        match key.as_str() {
            "paid" | "pago" | "paga" | "liquidado" | "quitado" | "recebido" | "received"
            | "settled" | "true" | "1" | "s" | "sim" | "yes" => Some(PaymentStatus::Paid),
            "open" | "aberto" | "em_aberto" | "pendente" | "pending" | "a_receber"
            | "false" | "0" | "n" | "nao" | "no" => Some(PaymentStatus::Open),
            "overdue" | "vencido" | "atrasado" | "late" | "inadimplente" => {
                Some(PaymentStatus::Overdue)
            }
            _ => None,
        }
    }

    pub fn from_paid_flag(paid: bool) -> Self {
        if paid {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Open
        }
    }

    pub fn is_paid(self) -> bool {
        self == PaymentStatus::Paid
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PaymentStatus::Paid => "paid",
            PaymentStatus::Open => "open",
            PaymentStatus::Overdue => "overdue",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// One product line inside a sale, with its own revenue and cost share.
pub struct ProductLine {
    pub product_id: String,
    pub amount: f64,
    #[serde(default)]
    pub cost: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
/// A validated sale or receivable. Read-only input to every service.
pub struct TransactionRecord {
    pub id: String,
    /// Gross revenue.
    pub amount: f64,
    /// Cost of goods sold; zero when the source had none.
    pub cost: f64,
    /// Explicit tax; when absent the flat-rate estimate applies.
    pub tax: Option<f64>,
    pub discount: f64,
    pub returns: f64,
    pub date: NaiveDate,
    pub due_date: NaiveDate,
    /// Set when `due_date` was inferred from the grace period.
    pub due_date_inferred: bool,
    pub customer_id: Option<String>,
    pub status: PaymentStatus,
    pub unit_id: Option<String>,
    pub cost_center_id: Option<String>,
    pub seller_id: Option<String>,
    pub store_id: Option<String>,
    pub channel_id: Option<String>,
    pub products: Vec<ProductLine>,
}

impl TransactionRecord {
    /// A paid record due on its own date; dimension keys unset.
    pub fn new(id: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            id: id.into(),
            amount,
            cost: 0.0,
            tax: None,
            discount: 0.0,
            returns: 0.0,
            date,
            due_date: date,
            due_date_inferred: false,
            customer_id: None,
            status: PaymentStatus::Paid,
            unit_id: None,
            cost_center_id: None,
            seller_id: None,
            store_id: None,
            channel_id: None,
            products: Vec::new(),
        }
    }

    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    /// Explicit tax amount; takes priority over the flat-rate estimate.
    pub fn with_tax(mut self, tax: f64) -> Self {
        self.tax = Some(tax);
        self
    }

    pub fn with_status(mut self, status: PaymentStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = due_date;
        self.due_date_inferred = false;
        self
    }

    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_unit(mut self, unit_id: impl Into<String>) -> Self {
        self.unit_id = Some(unit_id.into());
        self
    }

    pub fn with_dimension(mut self, dimension: Dimension, key: impl Into<String>) -> Self {
        let key = Some(key.into());
        match dimension {
            Dimension::CostCenter => self.cost_center_id = key,
            Dimension::Seller => self.seller_id = key,
            Dimension::Store => self.store_id = key,
            Dimension::Channel => self.channel_id = key,
            Dimension::Product => {
                if let Some(product_id) = key {
                    self.products.push(ProductLine {
                        product_id,
                        amount: self.amount,
                        cost: self.cost,
                    });
                }
            }
        }
        self
    }

    /// Key for a single-valued dimension. Products live in [`Self::products`].
    pub fn dimension_key(&self, dimension: Dimension) -> Option<&str> {
        match dimension {
            Dimension::CostCenter => self.cost_center_id.as_deref(),
            Dimension::Seller => self.seller_id.as_deref(),
            Dimension::Store => self.store_id.as_deref(),
            Dimension::Channel => self.channel_id.as_deref(),
            Dimension::Product => None,
        }
    }

    pub fn belongs_to_unit(&self, unit: &str) -> bool {
        self.unit_id.as_deref() == Some(unit)
    }

    /// Unpaid and past due as of `reference`.
    pub fn is_overdue(&self, reference: NaiveDate) -> bool {
        !self.status.is_paid() && self.due_date < reference
    }

    pub fn days_overdue(&self, reference: NaiveDate) -> i64 {
        days_between(self.due_date, reference).max(0)
    }

    /// Amount still receivable.
    pub fn outstanding(&self) -> f64 {
        if self.status.is_paid() {
            0.0
        } else {
            self.amount
        }
    }
}
